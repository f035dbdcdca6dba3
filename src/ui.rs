//! UI rendering for the terminal host.
//!
//! Everything shown about playback comes from the engine's [`SurfaceState`];
//! the track list comes from the [`App`].

use std::{collections::BTreeMap, sync::LazyLock};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use cadenza::config::ControlsSettings;
use cadenza::playback::{SurfaceState, VolumeIcon};

use crate::app::App;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next");
    // H/L and volume are filled from config.
    map.insert("m", "mute");
    map.insert("s", "stop");
    map.insert("q", "quit");
    map
});

fn controls_text(controls: &ControlsSettings) -> String {
    let order = ["space/p", "h/l", "H/L", "+/-", "m", "s", "q"];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] seek -/+{}s", controls.seek_step_seconds)),
            "+/-" => Some(format!(
                "[+/-] volume -/+{}%",
                (controls.volume_step * 100.0).round()
            )),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}")),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

fn volume_text(surface: &SurfaceState) -> String {
    let glyph = match surface.volume_icon {
        VolumeIcon::Muted => "muted",
        VolumeIcon::Low => "vol-",
        VolumeIcon::High => "vol+",
    };
    format!("{glyph} {:.0}%", surface.volume * 100.0)
}

fn status_text(app: &App, surface: &SurfaceState) -> String {
    let mut parts: Vec<String> = Vec::new();

    match app.current_track() {
        Some(track) => {
            parts.push(format!(
                "Song: {} [{} / {}]",
                track.display, surface.current_time_text, surface.duration_text
            ));
            parts.push(if surface.playing { "Playing" } else { "Paused" }.to_string());
        }
        None => parts.push("No tracks".to_string()),
    }

    parts.push(volume_text(surface));

    if surface.transcoding_active {
        parts.push("TRANSCODING".to_string());
    }

    if let Some(listen) = &app.last_listen {
        parts.push(listen.clone());
    }

    if let Some(dir) = &app.current_dir {
        parts.push(format!("Dir: {dir}"));
    }

    parts.join(" • ")
}

/// Render the entire UI into `frame`.
pub fn draw(frame: &mut Frame, app: &App, surface: &SurfaceState, controls: &ControlsSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(format!("{} track(s), {} listened", app.tracks.len(), app.listens))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadenza ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, surface))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    let progress = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .ratio(surface.progress.clamp(0.0, 1.0))
        .label(format!(
            "{} / {}",
            surface.current_time_text, surface.duration_text
        ))
        .bold();
    frame.render_widget(progress, chunks[2]);

    // Only build ListItems for the visible window, centered on the current track.
    {
        let total = app.tracks.len();
        let list_height = chunks[3].height.saturating_sub(2) as usize;
        let (start, end, selected) = if total <= list_height || list_height == 0 {
            (0, total, app.current)
        } else {
            let half = list_height / 2;
            let mut start = app.current.saturating_sub(half);
            if start + list_height > total {
                start = total - list_height;
            }
            (start, start + list_height, app.current - start)
        };

        let items: Vec<ListItem> = app.tracks[start..end]
            .iter()
            .map(|t| ListItem::new(t.display.as_str()))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(selected));
        }
        frame.render_stateful_widget(list, chunks[3], &mut state);
    }

    let footer = Paragraph::new(controls_text(controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);
}
