use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::mpsc::Sender;

use env_logger::{Target, WriteStyle};
use log::{LevelFilter, info, warn};

use cadenza::config;
use cadenza::mpris::MprisHandle;
use cadenza::playback::{PlaybackEngine, PlayerEvent};
use cadenza::settings::SettingsStore;
use cadenza::storage::{FileStore, KeyValueStore, MemoryStore};

use crate::app::App;
use crate::audio::RodioElement;

/// Install `colog`, writing to `file`.
///
/// The terminal UI owns stderr, so logging is switched off when no file can
/// be opened.
pub fn init_logging(level: LevelFilter, file: Option<&Path>) {
    let mut clog = colog::default_builder();
    match file.and_then(open_log_file) {
        Some(f) => {
            clog.filter(None, level);
            clog.write_style(WriteStyle::Never);
            clog.target(Target::Pipe(Box::new(f)));
        }
        None => {
            clog.filter(None, LevelFilter::Off);
        }
    }
    clog.init();
}

fn open_log_file(path: &Path) -> Option<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// File-backed user state, or an in-memory store when no directory is known.
pub fn open_store(settings: &config::Settings) -> Box<dyn KeyValueStore> {
    match settings.storage_dir() {
        Some(dir) => {
            info!("user state in {}", dir.display());
            Box::new(FileStore::new(dir))
        }
        None => {
            warn!("no state directory available, settings will not be kept");
            Box::new(MemoryStore::new())
        }
    }
}

pub fn build_engine(
    settings: &config::Settings,
    events: Sender<PlayerEvent>,
    mpris: MprisHandle,
) -> PlaybackEngine<RodioElement> {
    let store = SettingsStore::load(
        open_store(settings),
        settings.player.playback_settings(),
        settings.controls.initial_volume,
    );

    PlaybackEngine::new(RodioElement::new(), store, events)
        .with_session(Box::new(mpris))
        .with_seek_step(settings.controls.seek_step_seconds)
        .with_volume_step(settings.controls.volume_step)
}

/// Hand the first track to the engine without playing it; the first key press
/// opens the audio output.
pub fn load_first_track(app: &App, engine: &mut PlaybackEngine<RodioElement>) {
    if let Some(descriptor) = app.descriptor() {
        engine.load_track(descriptor, false);
    }
}
