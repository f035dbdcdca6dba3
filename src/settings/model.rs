use serde::Serialize;

/// Bitrates the transcoder accepts, in bits per second.
pub const ALLOWED_BITRATES: [u32; 5] = [64_000, 96_000, 128_000, 192_000, 320_000];

pub const MIN_PRE_AMP_GAIN: f32 = -15.0;
pub const MAX_PRE_AMP_GAIN: f32 = 15.0;

pub fn is_bitrate_allowed(bitrate: u32) -> bool {
    ALLOWED_BITRATES.contains(&bitrate)
}

pub fn clamp_pre_amp(gain: f32) -> f32 {
    gain.clamp(MIN_PRE_AMP_GAIN, MAX_PRE_AMP_GAIN)
}

/// Which resources are offered for a track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "u8")]
pub enum TranscodingMode {
    /// Only the original file.
    Never,
    /// Only the server transcode.
    Always,
    /// Original first, transcode as fallback.
    #[default]
    IfFormatNotSupported,
}

impl TranscodingMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Never),
            1 => Some(Self::Always),
            2 => Some(Self::IfFormatNotSupported),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Never => 0,
            Self::Always => 1,
            Self::IfFormatNotSupported => 2,
        }
    }
}

impl From<TranscodingMode> for u8 {
    fn from(mode: TranscodingMode) -> Self {
        mode.code()
    }
}

/// Output container/codec requested from the transcoder.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "u8")]
pub enum TranscodingFormat {
    Mp3,
    #[default]
    OggOpus,
    OggVorbis,
    WebmVorbis,
    MatroskaOpus,
}

impl TranscodingFormat {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Mp3),
            2 => Some(Self::OggOpus),
            3 => Some(Self::OggVorbis),
            4 => Some(Self::WebmVorbis),
            5 => Some(Self::MatroskaOpus),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Mp3 => 1,
            Self::OggOpus => 2,
            Self::OggVorbis => 3,
            Self::WebmVorbis => 4,
            Self::MatroskaOpus => 5,
        }
    }
}

impl From<TranscodingFormat> for u8 {
    fn from(format: TranscodingFormat) -> Self {
        format.code()
    }
}

/// Which measured gain is used for a track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "u8")]
pub enum ReplayGainMode {
    /// Replay gain disabled.
    #[default]
    None,
    /// Release gain inside a run of same-release tracks, track gain otherwise.
    Auto,
    Track,
    /// Release gain, falling back to track gain.
    Release,
}

impl ReplayGainMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Auto),
            2 => Some(Self::Track),
            3 => Some(Self::Release),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Auto => 1,
            Self::Track => 2,
            Self::Release => 3,
        }
    }
}

impl From<ReplayGainMode> for u8 {
    fn from(mode: ReplayGainMode) -> Self {
        mode.code()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodingSettings {
    pub mode: TranscodingMode,
    pub format: TranscodingFormat,
    pub bitrate: u32,
}

impl Default for TranscodingSettings {
    fn default() -> Self {
        Self {
            mode: TranscodingMode::default(),
            format: TranscodingFormat::default(),
            bitrate: 128_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayGainSettings {
    pub mode: ReplayGainMode,
    /// dB added to the measured gain.
    pub pre_amp_gain: f32,
    /// dB used alone when the track carries no gain information.
    pub pre_amp_gain_if_no_info: f32,
}

/// The persisted user preferences.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSettings {
    pub transcoding: TranscodingSettings,
    pub replay_gain: ReplayGainSettings,
}
