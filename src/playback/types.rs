//! Small enums shared by the engine, its host and the media-control bridge.

use crate::track::TrackId;

/// Which candidate the primitive committed to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    /// No source committed yet (or none playable).
    #[default]
    Unknown,
    /// Original file: locally seekable.
    Native,
    /// Server transcode: seeking restarts the stream at an offset.
    Transcoded,
}

/// Lifecycle signals fired by the audio primitive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementEvent {
    /// Enough data to start; the active source is known.
    CanPlay,
    /// The primitive switched to another candidate.
    SourceChanged,
    /// Playback was requested.
    Play,
    /// Audio is actually flowing.
    Playing,
    Pause,
    /// Stalled on buffering.
    Waiting,
    Ended,
}

/// Outbound notifications to the surrounding application.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    PlayPrevious,
    PlayNext,
    PlaybackEnded,
    /// Wire JSON of the effective settings, sent once at startup.
    SettingsLoaded(String),
    ListenStarted(TrackId),
    ListenFinished { track_id: TrackId, played_ms: u64 },
}

/// Commands coming from the system media controls (or key bindings).
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
    /// Absolute logical position, seconds.
    SeekTo(f64),
    /// Relative to the logical position, seconds.
    SeekBy(f64),
}
