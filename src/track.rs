//! Track descriptors handed to the engine by the surrounding application.

use std::fmt;

/// Opaque track identifier, echoed back in listen events.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(String);

impl TrackId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TrackId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One artwork reference published to the system media controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub src: String,
    /// e.g. `"128x128"`
    pub sizes: String,
    pub mime_type: String,
}

/// Loudness information measured for a track.
///
/// `same_release_run` is set by the host when the neighbouring queue entries
/// belong to the same release; `Auto` replay-gain mode then prefers the
/// release gain.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplayGainInfo {
    pub track_gain: Option<f32>,
    pub release_gain: Option<f32>,
    pub same_release_run: bool,
}

/// Everything the engine needs to play one track.
///
/// Immutable for the lifetime of one playback session; replaced wholesale by
/// the next `load_track`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDescriptor {
    pub id: TrackId,
    /// Track length in seconds.
    pub duration: f64,
    /// Locator of the original file.
    pub native_resource: Option<String>,
    /// Transcoding endpoint, completed with bitrate/format (and offset) query
    /// parameters by the engine.
    pub transcoding_resource: Option<String>,
    pub replay_gain: ReplayGainInfo,
    pub title: String,
    pub artist: Option<String>,
    pub release: Option<String>,
    pub artwork: Vec<Artwork>,
}

impl TrackDescriptor {
    /// Minimal descriptor with no resources and no display metadata.
    pub fn new(id: impl Into<TrackId>, duration: f64) -> Self {
        Self {
            id: id.into(),
            duration,
            native_resource: None,
            transcoding_resource: None,
            replay_gain: ReplayGainInfo::default(),
            title: String::new(),
            artist: None,
            release: None,
            artwork: Vec::new(),
        }
    }

    pub fn with_native(mut self, uri: impl Into<String>) -> Self {
        self.native_resource = Some(uri.into());
        self
    }

    pub fn with_transcoding(mut self, template: impl Into<String>) -> Self {
        self.transcoding_resource = Some(template.into());
        self
    }
}
