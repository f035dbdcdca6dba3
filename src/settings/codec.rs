use log::debug;
use serde_json::Value;

use super::model::{
    PlaybackSettings, ReplayGainMode, TranscodingFormat, TranscodingMode, clamp_pre_amp,
    is_bitrate_allowed,
};

/// Serialize settings into the wire JSON.
pub fn to_json(settings: &PlaybackSettings) -> crate::Result<String> {
    Ok(serde_json::to_string(settings)?)
}

/// Overlay a persisted JSON document on top of `defaults`.
///
/// Every field is read and validated on its own: a missing, malformed or
/// out-of-range field keeps the default while its valid siblings still apply.
/// Unparseable documents yield `defaults` unchanged.
pub fn merge_json(text: &str, defaults: &PlaybackSettings) -> PlaybackSettings {
    let mut settings = defaults.clone();

    let parsed: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            debug!("ignoring unparseable persisted settings: {e}");
            return settings;
        }
    };

    if let Some(transcoding) = parsed.get("transcoding").filter(|v| v.is_object()) {
        if let Some(mode) = read_int(transcoding, "mode").and_then(TranscodingMode::from_code) {
            settings.transcoding.mode = mode;
        }
        if let Some(format) = read_int(transcoding, "format").and_then(TranscodingFormat::from_code)
        {
            settings.transcoding.format = format;
        }
        if let Some(bitrate) = read_int(transcoding, "bitrate")
            .and_then(|b| u32::try_from(b).ok())
            .filter(|b| is_bitrate_allowed(*b))
        {
            settings.transcoding.bitrate = bitrate;
        }
    }

    if let Some(replay_gain) = parsed.get("replayGain").filter(|v| v.is_object()) {
        if let Some(mode) = read_int(replay_gain, "mode").and_then(ReplayGainMode::from_code) {
            settings.replay_gain.mode = mode;
        }
        if let Some(gain) = read_float(replay_gain, "preAmpGain") {
            settings.replay_gain.pre_amp_gain = clamp_pre_amp(gain);
        }
        if let Some(gain) = read_float(replay_gain, "preAmpGainIfNoInfo") {
            settings.replay_gain.pre_amp_gain_if_no_info = clamp_pre_amp(gain);
        }
    }

    settings
}

// Numbers and numeric strings are both accepted.
fn read_int(obj: &Value, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn read_float(obj: &Value, key: &str) -> Option<f32> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value as f32)
}
