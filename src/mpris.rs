//! MPRIS bridge: publishes the media session on the D-Bus session bus and
//! forwards remote commands as [`ControlCmd`]s.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_io::{Timer, block_on};
use log::{debug, warn};
use zbus::object_server::SignalEmitter;
use zbus::{Connection, interface};
use zvariant::{ObjectPath, OwnedValue, Value};

use crate::playback::{ControlCmd, MediaSession, PlaybackStatus, PositionState};
use crate::track::TrackDescriptor;

const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const BUS_NAME: &str = "org.mpris.MediaPlayer2.cadenza";
const NOTIFY_POLL: Duration = Duration::from_millis(100);

#[derive(Debug)]
struct SharedState {
    status: PlaybackStatus,
    track_id: Option<ObjectPath<'static>>,
    title: Option<String>,
    artist: Vec<String>,
    album: Option<String>,
    art_url: Option<String>,
    length_micros: Option<i64>,
    /// Last reported position, seconds, and when it was reported.
    position: f64,
    position_at: Instant,
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            track_id: None,
            title: None,
            artist: Vec::new(),
            album: None,
            art_url: None,
            length_micros: None,
            position: 0.0,
            position_at: Instant::now(),
        }
    }
}

impl SharedState {
    fn position_micros(&self, now: Instant) -> i64 {
        let mut position = self.position;
        if self.status == PlaybackStatus::Playing {
            position += now.saturating_duration_since(self.position_at).as_secs_f64();
        }
        let mut micros = (position.max(0.0) * 1_000_000.0).round() as i64;
        if let Some(length) = self.length_micros {
            micros = micros.min(length);
        }
        micros
    }
}

/// What the service loop should announce on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Notice {
    /// Status or metadata changed.
    Changed,
    /// The position jumped; clients must stop extrapolating from the old one.
    Seeked,
}

/// D-Bus object path for a track id; characters MPRIS does not allow become `_`.
fn track_object_path(id: &str) -> Option<ObjectPath<'static>> {
    let sanitized: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let sanitized = if sanitized.is_empty() {
        String::from("_")
    } else {
        sanitized
    };
    ObjectPath::try_from(format!("{OBJECT_PATH}/track/{sanitized}")).ok()
}

/// Handle the engine uses as its [`MediaSession`].
pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<Notice>,
}

impl MprisHandle {
    fn changed(&self) {
        let _ = self.notify.send(Notice::Changed);
    }
}

impl MediaSession for MprisHandle {
    fn set_metadata(&mut self, track: &TrackDescriptor) {
        if let Ok(mut s) = self.state.lock() {
            s.track_id = track_object_path(track.id.as_str());
            s.title = (!track.title.is_empty()).then(|| track.title.clone());
            s.artist = track.artist.iter().cloned().collect();
            s.album = track.release.clone();
            s.art_url = track.artwork.first().map(|a| a.src.clone());
            s.length_micros =
                (track.duration > 0.0).then(|| (track.duration * 1_000_000.0).round() as i64);
            s.position = 0.0;
            s.position_at = Instant::now();
        }
        self.changed();
    }

    fn set_position_state(&mut self, state: PositionState) {
        if let Ok(mut s) = self.state.lock() {
            s.position = state.position;
            s.position_at = Instant::now();
        }
        let _ = self.notify.send(Notice::Seeked);
    }

    fn set_playback_status(&mut self, status: PlaybackStatus) {
        let mut changed = false;
        if let Ok(mut s) = self.state.lock() {
            if s.status != status {
                // freeze the extrapolated position at the transition
                let now = Instant::now();
                s.position = s.position_micros(now) as f64 / 1_000_000.0;
                s.position_at = now;
                s.status = status;
                changed = true;
            }
        }
        if changed {
            self.changed();
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "cadenza"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string(), "http".to_string(), "https".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    /// Relative seek, microseconds.
    fn seek(&self, offset: i64) {
        let _ = self.tx.send(ControlCmd::SeekBy(offset as f64 / 1_000_000.0));
    }

    /// Absolute seek, microseconds. Ignored unless `track_id` is the current track.
    fn set_position(&self, track_id: ObjectPath<'_>, position: i64) {
        let current = self
            .state
            .lock()
            .ok()
            .and_then(|s| s.track_id.clone());
        match current {
            Some(id) if id.as_str() == track_id.as_str() && position >= 0 => {
                let _ = self
                    .tx
                    .send(ControlCmd::SeekTo(position as f64 / 1_000_000.0));
            }
            _ => debug!("MPRIS: stale SetPosition for {track_id}"),
        }
    }

    /// New position after a jump, microseconds.
    #[zbus(signal)]
    async fn seeked(emitter: &SignalEmitter<'_>, position: i64) -> zbus::Result<()>;

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        s.status.as_str()
    }

    #[zbus(property(emits_changed_signal = "false"))]
    fn position(&self) -> i64 {
        self.state
            .lock()
            .map(|s| s.position_micros(Instant::now()))
            .unwrap_or(0)
    }

    #[zbus(property)]
    fn rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn minimum_rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn maximum_rate(&self) -> f64 {
        1.0
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(id) = &s.track_id {
            put("mpris:trackid", Value::from(id.clone()));
        }
        if let Some(title) = &s.title {
            put("xesam:title", Value::from(title.clone()));
        }
        if !s.artist.is_empty() {
            put("xesam:artist", Value::from(s.artist.clone()));
        }
        if let Some(album) = &s.album {
            put("xesam:album", Value::from(album.clone()));
        }
        if let Some(art) = &s.art_url {
            put("mpris:artUrl", Value::from(art.clone()));
        }
        if let Some(length) = s.length_micros {
            put("mpris:length", Value::from(length));
        }
        map
    }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
    notify: Receiver<Notice>,
) -> zbus::Result<()> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state: state.clone() })
        .await?;

    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;

    loop {
        Timer::after(NOTIFY_POLL).await;

        let mut changed = false;
        let mut seeked = false;
        loop {
            match notify.try_recv() {
                Ok(Notice::Changed) => changed = true,
                Ok(Notice::Seeked) => seeked = true,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return Ok(()),
            }
        }

        let emitter = player.signal_emitter();
        if changed {
            let iface = player.get().await;
            iface.playback_status_changed(emitter).await?;
            iface.metadata_changed(emitter).await?;
        }
        if seeked {
            let position = match state.lock() {
                Ok(s) => s.position_micros(Instant::now()),
                Err(_) => continue,
            };
            debug!("MPRIS: seeked to {position}us");
            PlayerIface::seeked(emitter, position).await?;
        }
    }
}

/// Register the MPRIS service on a background thread.
///
/// Bus failures are logged; the returned handle keeps working without a bus.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<Notice>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        if let Err(e) = block_on(serve(tx, state_for_thread, notify_rx)) {
            warn!("MPRIS: service stopped: {e}");
        }
    });

    MprisHandle {
        state,
        notify: notify_tx,
    }
}

#[cfg(test)]
mod tests;
