use crate::track::TrackDescriptor;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlaybackStatus {
    Playing,
    Paused,
    Stopped,
}

impl PlaybackStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
        }
    }
}

/// Seconds; `position` never exceeds `duration`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionState {
    pub duration: f64,
    pub playback_rate: f64,
    pub position: f64,
}

impl PositionState {
    pub fn new(duration: f64, position: f64) -> Self {
        let duration = duration.max(0.0);
        Self {
            duration,
            playback_rate: 1.0,
            position: position.clamp(0.0, duration),
        }
    }
}

/// The system media-control surface (lock screen, desktop widgets, MPRIS).
pub trait MediaSession {
    fn set_metadata(&mut self, track: &TrackDescriptor);
    fn set_position_state(&mut self, state: PositionState);
    fn set_playback_status(&mut self, status: PlaybackStatus);
}
