use crate::settings::{ReplayGainMode, ReplayGainSettings};
use crate::track::ReplayGainInfo;

fn db_to_linear(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

/// Linear multiplier for a measured track gain plus pre-amplification, in dB.
pub fn apply(track_gain_db: f32, pre_amp_db: f32) -> f32 {
    db_to_linear(pre_amp_db + track_gain_db)
}

/// The measured gain `mode` picks for a track, if the track has one.
pub fn select_gain(mode: ReplayGainMode, info: &ReplayGainInfo) -> Option<f32> {
    match mode {
        ReplayGainMode::None => None,
        ReplayGainMode::Track => info.track_gain,
        ReplayGainMode::Release => info.release_gain.or(info.track_gain),
        ReplayGainMode::Auto if info.same_release_run => info.release_gain.or(info.track_gain),
        ReplayGainMode::Auto => info.track_gain.or(info.release_gain),
    }
}

/// Output-chain multiplier for one track under `settings`.
pub fn linear_gain(settings: &ReplayGainSettings, info: &ReplayGainInfo) -> f32 {
    if settings.mode == ReplayGainMode::None {
        return 1.0;
    }
    match select_gain(settings.mode, info) {
        Some(gain) => apply(gain, settings.pre_amp_gain),
        None => db_to_linear(settings.pre_amp_gain_if_no_info),
    }
}
