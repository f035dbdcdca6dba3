use std::time::{Duration, Instant};

use log::debug;

use crate::track::TrackId;

use super::types::PlayerEvent;

/// Source of wall-clock instants for the listen tracker.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Accumulates how long the current track was actually heard.
///
/// Idle while `active_since` is `None`. `started` makes sure one session emits
/// at most one `ListenStarted`, however often it is paused and resumed.
#[derive(Debug, Default)]
pub struct ListenTimeTracker {
    track_id: Option<TrackId>,
    accumulated: Duration,
    active_since: Option<Instant>,
    started: bool,
}

impl ListenTimeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh, empty session for `track_id`.
    ///
    /// Callers flush the previous session first.
    pub fn begin(&mut self, track_id: TrackId) {
        self.track_id = Some(track_id);
        self.accumulated = Duration::ZERO;
        self.active_since = None;
        self.started = false;
    }

    pub fn on_playing(&mut self, now: Instant) -> Option<PlayerEvent> {
        if self.active_since.is_some() {
            return None;
        }
        let id = self.track_id.clone()?;
        self.active_since = Some(now);
        if self.started {
            return None;
        }
        self.started = true;
        Some(PlayerEvent::ListenStarted(id))
    }

    /// Pause or buffering stall: close the open interval, if any.
    pub fn on_interrupted(&mut self, now: Instant) {
        if let Some(since) = self.active_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    /// End of session (ended, stop or replacement).
    ///
    /// Returns `ListenFinished` only when some time was accumulated. The
    /// tracker is reset either way.
    pub fn flush(&mut self, now: Instant) -> Option<PlayerEvent> {
        self.on_interrupted(now);
        let played = std::mem::take(&mut self.accumulated);
        self.started = false;

        let track_id = self.track_id.clone()?;
        let played_ms = u64::try_from(played.as_millis()).unwrap_or(u64::MAX);
        if played_ms == 0 {
            return None;
        }
        debug!("listen session for {track_id} finished after {played_ms} ms");
        Some(PlayerEvent::ListenFinished {
            track_id,
            played_ms,
        })
    }

    pub fn accumulated(&self) -> Duration {
        self.accumulated
    }

    pub fn is_active(&self) -> bool {
        self.active_since.is_some()
    }
}
