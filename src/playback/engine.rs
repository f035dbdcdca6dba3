use std::sync::mpsc::Sender;

use log::{debug, warn};

use crate::Result;
use crate::settings::{PlaybackSettings, SettingsStore};
use crate::track::TrackDescriptor;

use super::element::MediaElement;
use super::listen::{Clock, ListenTimeTracker, SystemClock};
use super::mode::resolve_mode;
use super::replay_gain::linear_gain;
use super::session::{MediaSession, PlaybackStatus, PositionState};
use super::sources::{SourceCandidateList, append_param, select_sources, transcoded_url};
use super::surface::{SurfaceState, duration_to_string};
use super::types::{ControlCmd, ElementEvent, PlaybackMode, PlayerEvent};
use super::volume::VolumeController;

/// Default relative seek, seconds.
pub const SEEK_STEP_SECONDS: f64 = 5.0;

/// Work deferred until the output chain exists.
#[derive(Debug, Clone)]
struct PendingTrackParameters {
    track: TrackDescriptor,
    autoplay: bool,
}

/// Owns one audio primitive and everything needed to drive it.
///
/// Single threaded: the host forwards primitive events through
/// [`dispatch`](Self::dispatch) (or [`poll_element`](Self::poll_element)) and
/// user commands through the public operations. Outbound notifications go to
/// the `events` channel.
pub struct PlaybackEngine<E: MediaElement> {
    element: E,
    session: Option<Box<dyn MediaSession>>,
    settings: SettingsStore,
    volume: VolumeController,
    tracker: ListenTimeTracker,
    clock: Box<dyn Clock>,
    events: Sender<PlayerEvent>,

    track: Option<TrackDescriptor>,
    /// Completed transcoding URL of the current track, without offset.
    transcoding_src: Option<String>,
    /// Logical position of the primitive's local time zero, seconds.
    offset: f64,
    mode: PlaybackMode,

    output_ready: bool,
    pending: Option<PendingTrackParameters>,
    seek_step: f64,
}

impl<E: MediaElement> PlaybackEngine<E> {
    pub fn new(mut element: E, settings: SettingsStore, events: Sender<PlayerEvent>) -> Self {
        let volume = VolumeController::new(settings.volume());
        element.set_volume(volume.level());
        let _ = events.send(PlayerEvent::SettingsLoaded(settings.to_json()));

        Self {
            element,
            session: None,
            settings,
            volume,
            tracker: ListenTimeTracker::new(),
            clock: Box::new(SystemClock),
            events,
            track: None,
            transcoding_src: None,
            offset: 0.0,
            mode: PlaybackMode::Unknown,
            output_ready: false,
            pending: None,
            seek_step: SEEK_STEP_SECONDS,
        }
    }

    pub fn with_session(mut self, session: Box<dyn MediaSession>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_seek_step(mut self, seconds: f64) -> Self {
        if seconds > 0.0 {
            self.seek_step = seconds;
        }
        self
    }

    pub fn with_volume_step(mut self, step: f32) -> Self {
        self.volume = self.volume.with_step(step);
        self
    }

    fn emit(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    // ---- track loading ----

    /// Replace the current track.
    ///
    /// The previous listen session is flushed first. Replay gain, metadata and
    /// autoplay are applied immediately when the output chain exists, otherwise
    /// they are parked until [`unlock`](Self::unlock); a newer load replaces
    /// anything parked.
    pub fn load_track(&mut self, track: TrackDescriptor, autoplay: bool) {
        if let Some(finished) = self.tracker.flush(self.clock.now()) {
            self.emit(finished);
        }
        self.tracker.begin(track.id.clone());

        self.offset = 0.0;
        self.mode = PlaybackMode::Unknown;

        let settings = self.settings.settings();
        let sources = select_sources(&track, settings);
        self.transcoding_src = track
            .transcoding_resource
            .as_deref()
            .map(|template| transcoded_url(template, &settings.transcoding));

        if sources.is_empty() {
            warn!("track {} has no playable source", track.id);
        }
        debug!("loading {} with {} candidate(s)", track.id, sources.len());
        self.element.set_sources(&sources);
        self.element.load();

        self.track = Some(track.clone());
        if self.output_ready {
            self.apply_track_parameters(&track, autoplay);
        } else {
            debug!("output not ready, deferring parameters for {}", track.id);
            self.pending = Some(PendingTrackParameters { track, autoplay });
        }
    }

    fn apply_track_parameters(&mut self, track: &TrackDescriptor, autoplay: bool) {
        let gain = linear_gain(&self.settings.settings().replay_gain, &track.replay_gain);
        self.element.set_output_gain(gain);

        if let Some(session) = self.session.as_mut() {
            session.set_metadata(track);
        }

        if autoplay && self.element.output_running() && self.element.has_sources() {
            self.request_play();
        }
    }

    /// Open the gesture gate: build the output chain and apply any parked
    /// track parameters. Idempotent.
    pub fn unlock(&mut self) -> Result<()> {
        if self.output_ready {
            return Ok(());
        }
        self.element.init_output()?;
        self.output_ready = true;

        if let Some(pending) = self.pending.take() {
            debug!("applying deferred parameters for {}", pending.track.id);
            self.apply_track_parameters(&pending.track, pending.autoplay);
        }
        Ok(())
    }

    fn unlock_or_warn(&mut self) {
        if let Err(e) = self.unlock() {
            warn!("failed to initialise audio output: {e}");
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.output_ready
    }

    // ---- transport ----

    fn request_play(&mut self) {
        if let Err(e) = self.element.play() {
            warn!("play request rejected: {e}");
        }
    }

    pub fn play(&mut self) {
        self.unlock_or_warn();
        if self.element.has_sources() {
            self.request_play();
        }
    }

    pub fn pause(&mut self) {
        self.element.pause();
    }

    /// Plays when paused with sources attached, pauses otherwise.
    ///
    /// The decision is taken on the state before the gate opens, so a parked
    /// autoplay drained by this call is not paused again.
    pub fn play_pause(&mut self) {
        let was_paused = self.element.is_paused();
        self.unlock_or_warn();
        if was_paused {
            if self.element.is_paused() && self.element.has_sources() {
                self.request_play();
            }
        } else {
            self.element.pause();
        }
    }

    /// Pause and close the listen session.
    pub fn stop(&mut self) {
        self.element.pause();
        if let Some(finished) = self.tracker.flush(self.clock.now()) {
            self.emit(finished);
        }
        if let Some(session) = self.session.as_mut() {
            session.set_playback_status(PlaybackStatus::Stopped);
        }
    }

    pub fn play_previous(&mut self) {
        self.unlock_or_warn();
        self.emit(PlayerEvent::PlayPrevious);
    }

    pub fn play_next(&mut self) {
        self.unlock_or_warn();
        self.emit(PlayerEvent::PlayNext);
    }

    // ---- seeking ----

    /// Move to `seconds` of logical position using the strategy of the
    /// resolved mode. Opens the gesture gate; dropped while the mode is
    /// unknown.
    pub fn seek_to(&mut self, seconds: f64) {
        self.unlock_or_warn();
        let Some(duration) = self.track.as_ref().map(|t| t.duration) else {
            return;
        };
        let target = seconds.clamp(0.0, duration.max(0.0));

        match self.mode {
            PlaybackMode::Unknown => {
                debug!("seek to {target:.1}s ignored, no source committed");
                return;
            }
            PlaybackMode::Native => {
                self.element.set_current_time(target);
                self.request_play();
            }
            PlaybackMode::Transcoded => {
                let Some(base) = self.transcoding_src.as_deref() else {
                    warn!("transcoded seek without a transcoding resource");
                    return;
                };
                let src = append_param(base, "offset", target);
                self.offset = target;
                self.element.set_sources(&SourceCandidateList::single(src));
                self.element.load();
                self.element.set_current_time(0.0);
                self.request_play();
            }
        }

        self.refresh_position();
    }

    pub fn seek_by(&mut self, delta: f64) {
        let Some(duration) = self.track.as_ref().map(|t| t.duration) else {
            return;
        };
        let target = (self.position() + delta).clamp(0.0, duration.max(0.0));
        self.seek_to(target);
    }

    pub fn seek_back(&mut self) {
        self.seek_by(-self.seek_step);
    }

    pub fn seek_forward(&mut self) {
        self.seek_by(self.seek_step);
    }

    // ---- volume ----

    pub fn set_volume(&mut self, volume: f32) {
        let level = self.volume.set(volume);
        self.apply_volume(level);
    }

    pub fn step_volume_up(&mut self) {
        let level = self.volume.step_up();
        self.apply_volume(level);
    }

    pub fn step_volume_down(&mut self) {
        let level = self.volume.step_down();
        self.apply_volume(level);
    }

    pub fn toggle_mute(&mut self) {
        let level = self.volume.toggle_mute();
        self.apply_volume(level);
    }

    fn apply_volume(&mut self, level: f32) {
        self.element.set_volume(level);
        self.settings.set_volume(level);
    }

    pub fn volume(&self) -> &VolumeController {
        &self.volume
    }

    // ---- settings ----

    pub fn settings(&self) -> &PlaybackSettings {
        self.settings.settings()
    }

    /// Replace and persist the settings. Source policy applies from the next
    /// load; replay gain is re-applied to the current track right away.
    pub fn set_settings(&mut self, settings: PlaybackSettings) {
        self.settings.set(settings);
        if self.output_ready {
            if let Some(track) = self.track.as_ref() {
                let gain = linear_gain(&self.settings.settings().replay_gain, &track.replay_gain);
                self.element.set_output_gain(gain);
            }
        }
    }

    // ---- primitive events ----

    pub fn dispatch(&mut self, event: ElementEvent) {
        match event {
            ElementEvent::CanPlay | ElementEvent::SourceChanged => {
                let mode = resolve_mode(self.element.current_src());
                if mode != self.mode {
                    debug!("playback mode {:?} -> {mode:?}", self.mode);
                }
                self.mode = mode;
            }
            ElementEvent::Play => {
                self.set_status(PlaybackStatus::Playing);
            }
            ElementEvent::Playing => {
                if let Some(started) = self.tracker.on_playing(self.clock.now()) {
                    self.emit(started);
                }
                self.set_status(PlaybackStatus::Playing);
                self.refresh_position();
            }
            ElementEvent::Pause => {
                self.tracker.on_interrupted(self.clock.now());
                self.set_status(PlaybackStatus::Paused);
                self.refresh_position();
            }
            ElementEvent::Waiting => {
                self.tracker.on_interrupted(self.clock.now());
            }
            ElementEvent::Ended => {
                if let Some(finished) = self.tracker.flush(self.clock.now()) {
                    self.emit(finished);
                }
                self.set_status(PlaybackStatus::Stopped);
                self.emit(PlayerEvent::PlaybackEnded);
            }
        }
    }

    /// Drain and dispatch whatever the primitive queued up.
    pub fn poll_element(&mut self) {
        for event in self.element.take_events() {
            self.dispatch(event);
        }
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if let Some(session) = self.session.as_mut() {
            session.set_playback_status(status);
        }
    }

    fn refresh_position(&mut self) {
        let Some(duration) = self.track.as_ref().map(|t| t.duration) else {
            return;
        };
        let state = PositionState::new(duration, self.position());
        let status = if self.element.is_paused() {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Playing
        };
        if let Some(session) = self.session.as_mut() {
            session.set_position_state(state);
            session.set_playback_status(status);
        }
    }

    // ---- media controls ----

    /// Apply one control command. Returns `false` once the host should quit.
    pub fn handle_control(&mut self, cmd: ControlCmd) -> bool {
        match cmd {
            ControlCmd::Quit => return false,
            ControlCmd::Play => self.play(),
            ControlCmd::Pause => self.pause(),
            ControlCmd::PlayPause => self.play_pause(),
            ControlCmd::Stop => self.stop(),
            ControlCmd::Next => self.play_next(),
            ControlCmd::Prev => self.play_previous(),
            ControlCmd::SeekTo(seconds) => self.seek_to(seconds),
            ControlCmd::SeekBy(delta) => self.seek_by(delta),
        }
        true
    }

    // ---- state ----

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Logical position: offset plus the primitive's local time.
    pub fn position(&self) -> f64 {
        self.offset + self.element.current_time()
    }

    pub fn track(&self) -> Option<&TrackDescriptor> {
        self.track.as_ref()
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    pub fn surface(&self) -> SurfaceState {
        let duration = self.track.as_ref().map_or(0.0, |t| t.duration);
        let position = self.position().clamp(0.0, duration.max(0.0));
        SurfaceState {
            playing: !self.element.is_paused(),
            volume: self.volume.level(),
            volume_icon: self.volume.icon(),
            position,
            duration,
            progress: SurfaceState::progress_of(position, duration),
            current_time_text: duration_to_string(position),
            duration_text: duration_to_string(duration),
            transcoding_active: self.mode == PlaybackMode::Transcoded,
            mode: self.mode,
        }
    }
}
