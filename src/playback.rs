//! Playback-mode resolution and session-timing engine.
//!
//! The engine owns the source selector, mode resolver, seek strategy, listen
//! tracker, replay-gain processor and volume controller, and is driven by the
//! host through [`PlaybackEngine::dispatch`] (primitive lifecycle signals) and
//! its public operations (user and media-control commands).

mod element;
mod engine;
mod listen;
mod mode;
mod replay_gain;
mod session;
mod sources;
mod surface;
mod types;
mod volume;

pub use element::MediaElement;
pub use engine::{PlaybackEngine, SEEK_STEP_SECONDS};
pub use listen::{Clock, ListenTimeTracker, SystemClock};
pub use mode::resolve_mode;
pub use replay_gain::{apply as apply_replay_gain, linear_gain, select_gain};
pub use session::{MediaSession, PlaybackStatus, PositionState};
pub use sources::{SourceCandidateList, select_sources, transcoded_url};
pub use surface::{SurfaceState, duration_to_string};
pub use types::{ControlCmd, ElementEvent, PlaybackMode, PlayerEvent};
pub use volume::{VOLUME_STEP, VolumeController, VolumeIcon};

#[cfg(test)]
mod tests;
