use log::{debug, warn};

use crate::storage::KeyValueStore;

use super::codec::{merge_json, to_json};
use super::model::PlaybackSettings;

pub const SETTINGS_KEY: &str = "settings";
pub const VOLUME_KEY: &str = "volume";

/// Active settings and volume, backed by a [`KeyValueStore`].
///
/// Both values are read once at construction and written back on every change.
/// Write failures are logged; the in-memory value still changes.
pub struct SettingsStore {
    settings: PlaybackSettings,
    volume: f32,
    backend: Box<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn load(
        backend: Box<dyn KeyValueStore>,
        defaults: PlaybackSettings,
        default_volume: f32,
    ) -> Self {
        let settings = match backend.get(SETTINGS_KEY) {
            Some(text) => merge_json(&text, &defaults),
            None => defaults,
        };

        let volume = backend
            .get(VOLUME_KEY)
            .and_then(|text| text.trim().parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(default_volume)
            .clamp(0.0, 1.0);

        debug!("settings loaded: {settings:?}, volume {volume}");

        Self {
            settings,
            volume,
            backend,
        }
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    /// Replace the settings wholesale and persist them.
    pub fn set(&mut self, settings: PlaybackSettings) {
        self.settings = settings;
        match to_json(&self.settings) {
            Ok(json) => {
                if let Err(e) = self.backend.set(SETTINGS_KEY, &json) {
                    warn!("failed to persist settings: {e}");
                }
            }
            Err(e) => warn!("failed to serialize settings: {e}"),
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Err(e) = self.backend.set(VOLUME_KEY, &volume.to_string()) {
            warn!("failed to persist volume: {e}");
        }
    }

    /// Wire JSON of the active settings.
    pub fn to_json(&self) -> String {
        to_json(&self.settings).unwrap_or_else(|e| {
            warn!("failed to serialize settings: {e}");
            String::from("{}")
        })
    }
}
