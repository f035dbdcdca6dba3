use std::path::PathBuf;

use serde::Deserialize;

use crate::settings::{
    PlaybackSettings, ReplayGainMode, ReplayGainSettings, TranscodingFormat, TranscodingMode,
    TranscodingSettings, clamp_pre_amp,
};

/// Top-level host configuration loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
///
/// The `[player]` section only supplies *defaults*: values the user changed at
/// runtime are persisted separately and win over it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub player: PlayerDefaults,
    pub controls: ControlsSettings,
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub library: LibrarySettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerDefaults {
    pub transcoding_mode: TranscodingModeSetting,
    pub transcoding_format: TranscodingFormatSetting,
    /// Bits per second; one of 64000, 96000, 128000, 192000, 320000.
    pub transcoding_bitrate: u32,
    pub replay_gain_mode: ReplayGainModeSetting,
    /// dB, clamped to [-15, 15].
    pub pre_amp_gain: f32,
    /// dB used when a track has no replay-gain tags.
    pub pre_amp_gain_if_no_info: f32,
}

impl Default for PlayerDefaults {
    fn default() -> Self {
        Self {
            transcoding_mode: TranscodingModeSetting::IfFormatNotSupported,
            transcoding_format: TranscodingFormatSetting::OggOpus,
            transcoding_bitrate: 128_000,
            replay_gain_mode: ReplayGainModeSetting::None,
            pre_amp_gain: 0.0,
            pre_amp_gain_if_no_info: 0.0,
        }
    }
}

impl PlayerDefaults {
    pub fn playback_settings(&self) -> PlaybackSettings {
        PlaybackSettings {
            transcoding: TranscodingSettings {
                mode: self.transcoding_mode.into(),
                format: self.transcoding_format.into(),
                bitrate: self.transcoding_bitrate,
            },
            replay_gain: ReplayGainSettings {
                mode: self.replay_gain_mode.into(),
                pre_amp_gain: clamp_pre_amp(self.pre_amp_gain),
                pre_amp_gain_if_no_info: clamp_pre_amp(self.pre_amp_gain_if_no_info),
            },
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranscodingModeSetting {
    #[serde(alias = "off", alias = "native")]
    Never,
    #[serde(alias = "on", alias = "transcode")]
    Always,
    #[serde(
        alias = "if_format_not_supported",
        alias = "fallback",
        alias = "auto"
    )]
    IfFormatNotSupported,
}

impl From<TranscodingModeSetting> for TranscodingMode {
    fn from(value: TranscodingModeSetting) -> Self {
        match value {
            TranscodingModeSetting::Never => TranscodingMode::Never,
            TranscodingModeSetting::Always => TranscodingMode::Always,
            TranscodingModeSetting::IfFormatNotSupported => TranscodingMode::IfFormatNotSupported,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranscodingFormatSetting {
    Mp3,
    #[serde(alias = "ogg_opus", alias = "opus")]
    OggOpus,
    #[serde(alias = "ogg_vorbis", alias = "vorbis")]
    OggVorbis,
    #[serde(alias = "webm_vorbis", alias = "webm")]
    WebmVorbis,
    #[serde(alias = "matroska_opus", alias = "mka")]
    MatroskaOpus,
}

impl From<TranscodingFormatSetting> for TranscodingFormat {
    fn from(value: TranscodingFormatSetting) -> Self {
        match value {
            TranscodingFormatSetting::Mp3 => TranscodingFormat::Mp3,
            TranscodingFormatSetting::OggOpus => TranscodingFormat::OggOpus,
            TranscodingFormatSetting::OggVorbis => TranscodingFormat::OggVorbis,
            TranscodingFormatSetting::WebmVorbis => TranscodingFormat::WebmVorbis,
            TranscodingFormatSetting::MatroskaOpus => TranscodingFormat::MatroskaOpus,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplayGainModeSetting {
    #[serde(alias = "off", alias = "disabled")]
    None,
    Auto,
    Track,
    #[serde(alias = "album")]
    Release,
}

impl From<ReplayGainModeSetting> for ReplayGainMode {
    fn from(value: ReplayGainModeSetting) -> Self {
        match value {
            ReplayGainModeSetting::None => ReplayGainMode::None,
            ReplayGainModeSetting::Auto => ReplayGainMode::Auto,
            ReplayGainModeSetting::Track => ReplayGainMode::Track,
            ReplayGainModeSetting::Release => ReplayGainMode::Release,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Seconds moved by the seek-back / seek-forward keys.
    pub seek_step_seconds: f64,
    /// Increment of the volume keys, in (0, 1].
    pub volume_step: f32,
    /// Volume used when nothing was persisted yet.
    pub initial_volume: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_step_seconds: 5.0,
            volume_step: 0.05,
            initial_volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of a transcoding server. When unset, tracks are offered
    /// without a transcoded candidate.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Where the last volume and settings are kept.
    /// Defaults to `$XDG_STATE_HOME/cadenza`.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    pub recursive: bool,
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: LogLevelSetting,
    /// Log destination; defaults to `cadenza.log` in the storage directory.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevelSetting {
    #[serde(alias = "none")]
    Off,
    Error,
    #[default]
    #[serde(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelSetting> for log::LevelFilter {
    fn from(value: LogLevelSetting) -> Self {
        match value {
            LogLevelSetting::Off => log::LevelFilter::Off,
            LogLevelSetting::Error => log::LevelFilter::Error,
            LogLevelSetting::Warn => log::LevelFilter::Warn,
            LogLevelSetting::Info => log::LevelFilter::Info,
            LogLevelSetting::Debug => log::LevelFilter::Debug,
            LogLevelSetting::Trace => log::LevelFilter::Trace,
        }
    }
}
