use std::env;
use std::path::Path;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use log::{error, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};

use cadenza::playback::{ControlCmd, PlayerEvent};

use crate::app::App;
use crate::library::scan;

mod event_loop;
mod keys;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    startup::init_logging(settings.log.level.into(), settings.log_file().as_deref());
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let dir = env::args().nth(1).unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    let tracks = scan(Path::new(&dir), &settings.library);
    info!("{} track(s) found in {dir}", tracks.len());
    let mut app = App::new(tracks, settings.server.base_url.clone());
    app.set_current_dir(dir);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>();
    let mpris = cadenza::mpris::spawn_mpris(control_tx);

    let mut engine = startup::build_engine(&settings, event_tx, mpris);
    startup::load_first_track(&app, &mut engine);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut engine,
        &event_rx,
        &control_rx,
    );

    // close the last listen session before exiting
    engine.stop();
    event_loop::drain_player_events(&event_rx, &mut app, &mut engine);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!("event loop stopped: {e}");
    }
    run_result
}
