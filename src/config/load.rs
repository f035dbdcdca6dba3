use std::{env, path::PathBuf};

use crate::settings::is_bitrate_allowed;
use crate::storage::default_state_dir;
use crate::{Error, Result};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` layers environment variables (prefix `CADENZA__`) over an
/// optional config file over struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CADENZA")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Reject values the player cannot work with.
    pub fn validate(&self) -> Result<()> {
        let controls = &self.controls;
        if !(controls.seek_step_seconds.is_finite() && controls.seek_step_seconds > 0.0) {
            return Err(Error::InvalidConfig(
                "controls.seek_step_seconds must be > 0".to_string(),
            ));
        }
        if !(controls.volume_step > 0.0 && controls.volume_step <= 1.0) {
            return Err(Error::InvalidConfig(
                "controls.volume_step must be in (0, 1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&controls.initial_volume) {
            return Err(Error::InvalidConfig(
                "controls.initial_volume must be in [0, 1]".to_string(),
            ));
        }
        if !is_bitrate_allowed(self.player.transcoding_bitrate) {
            return Err(Error::InvalidConfig(format!(
                "player.transcoding_bitrate {} is not one of 64000, 96000, 128000, 192000, 320000",
                self.player.transcoding_bitrate
            )));
        }
        Ok(())
    }

    /// Configured storage directory, or the XDG state default.
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage.dir.clone().or_else(default_state_dir)
    }

    /// Configured log file, or `cadenza.log` inside the storage directory.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log
            .file
            .clone()
            .or_else(|| self.storage_dir().map(|d| d.join("cadenza.log")))
    }
}

/// Resolve the config path from `CADENZA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CADENZA_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// `$XDG_CONFIG_HOME/cadenza/config.toml`, or `~/.config/cadenza/config.toml`
/// when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("cadenza").join("config.toml"))
}
