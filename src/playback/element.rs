use crate::Result;

use super::sources::SourceCandidateList;
use super::types::ElementEvent;

/// The host's audio-playback primitive.
///
/// It is given an ordered candidate list, commits to the first candidate it
/// can decode and reports lifecycle changes as [`ElementEvent`]s. Times are
/// local to the attached stream, in seconds.
pub trait MediaElement {
    /// Replace every attached candidate.
    fn set_sources(&mut self, sources: &SourceCandidateList);
    fn has_sources(&self) -> bool;
    /// Start (re)opening the attached candidates.
    fn load(&mut self);
    /// The candidate currently committed to.
    fn current_src(&self) -> Option<&str>;

    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn is_paused(&self) -> bool;

    /// Request playback. Rejection is reported, not retried.
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    /// User volume in `[0, 1]`.
    fn set_volume(&mut self, volume: f32);

    /// Build the output chain. Only called once the gesture gate opens.
    fn init_output(&mut self) -> Result<()>;
    fn output_running(&self) -> bool;
    /// Replay-gain multiplier, applied on top of the user volume.
    fn set_output_gain(&mut self, gain: f32);

    /// Lifecycle changes since the last call, oldest first.
    fn take_events(&mut self) -> Vec<ElementEvent> {
        Vec::new()
    }
}
