use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use log::{debug, info};
use ratatui::{Terminal, backend::CrosstermBackend};

use cadenza::config;
use cadenza::playback::{ControlCmd, PlaybackEngine, PlayerEvent};

use crate::app::App;
use crate::audio::RodioElement;
use crate::runtime::keys::{KeyAction, map_key};
use crate::ui;

type Engine = PlaybackEngine<RodioElement>;

/// Main terminal event loop: pumps primitive events, reacts to engine
/// notifications, draws, and applies media-control and key commands.
/// Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    engine: &mut Engine,
    events: &Receiver<PlayerEvent>,
    control_rx: &Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        engine.poll_element();
        drain_player_events(events, app, engine);

        let surface = engine.surface();
        terminal.draw(|f| ui::draw(f, app, &surface, &settings.controls))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if !engine.handle_control(cmd) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(action) = map_key(key) else {
                    continue;
                };
                if !apply_key_action(action, engine) {
                    return Ok(());
                }
            }
        }
    }
}

fn apply_key_action(action: KeyAction, engine: &mut Engine) -> bool {
    match action {
        KeyAction::Control(cmd) => return engine.handle_control(cmd),
        KeyAction::SeekBack => engine.seek_back(),
        KeyAction::SeekForward => engine.seek_forward(),
        KeyAction::VolumeUp => engine.step_volume_up(),
        KeyAction::VolumeDown => engine.step_volume_down(),
        KeyAction::ToggleMute => engine.toggle_mute(),
    }
    true
}

pub fn drain_player_events(events: &Receiver<PlayerEvent>, app: &mut App, engine: &mut Engine) {
    while let Ok(event) = events.try_recv() {
        handle_player_event(event, app, engine);
    }
}

fn load_current(app: &App, engine: &mut Engine, autoplay: bool) {
    if let Some(descriptor) = app.descriptor() {
        engine.load_track(descriptor, autoplay);
    }
}

fn handle_player_event(event: PlayerEvent, app: &mut App, engine: &mut Engine) {
    match event {
        PlayerEvent::PlayNext => {
            if app.advance() {
                load_current(app, engine, true);
            }
        }
        PlayerEvent::PlayPrevious => {
            if app.back() {
                load_current(app, engine, true);
            } else {
                engine.seek_to(0.0);
            }
        }
        PlayerEvent::PlaybackEnded => {
            if app.advance() {
                load_current(app, engine, true);
            }
        }
        PlayerEvent::SettingsLoaded(json) => debug!("effective settings: {json}"),
        PlayerEvent::ListenStarted(ref id) => {
            info!("listen started: {id}");
            app.record_listen(&event);
        }
        PlayerEvent::ListenFinished {
            ref track_id,
            played_ms,
        } => {
            info!("listen finished: {track_id} after {played_ms} ms");
            app.record_listen(&event);
        }
    }
}
