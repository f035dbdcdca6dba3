//! User playback settings: model, JSON wire format and the persisting store.
//!
//! The JSON layout mirrors what the server expects in its `settingsLoaded`
//! handler (integer enum codes, camelCase replay-gain keys).

mod codec;
mod model;
mod store;

pub use codec::{merge_json, to_json};
pub use model::*;
pub use store::{SETTINGS_KEY, SettingsStore, VOLUME_KEY};
