//! Application model: the play order and what the host shows about it.
//!
//! The engine never advances on its own; it asks for the previous/next track
//! and reports the end of playback, and the `App` decides what gets loaded.

use cadenza::playback::PlayerEvent;
use cadenza::track::TrackDescriptor;

use crate::library::LibraryTrack;

pub struct App {
    pub tracks: Vec<LibraryTrack>,
    /// Index of the loaded track.
    pub current: usize,
    pub base_url: Option<String>,
    pub current_dir: Option<String>,
    /// Last listen report, for the status panel.
    pub last_listen: Option<String>,
    pub listens: usize,
}

impl App {
    pub fn new(tracks: Vec<LibraryTrack>, base_url: Option<String>) -> Self {
        Self {
            tracks,
            current: 0,
            base_url,
            current_dir: None,
            last_listen: None,
            listens: 0,
        }
    }

    pub fn set_current_dir(&mut self, dir: String) {
        self.current_dir = Some(dir);
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn current_track(&self) -> Option<&LibraryTrack> {
        self.tracks.get(self.current)
    }

    /// Whether a neighbour of `idx` belongs to the same album.
    fn in_release_run(&self, idx: usize) -> bool {
        let Some(album) = self.tracks.get(idx).and_then(|t| t.album.as_deref()) else {
            return false;
        };
        let same = |i: usize| self.tracks.get(i).and_then(|t| t.album.as_deref()) == Some(album);
        (idx > 0 && same(idx - 1)) || same(idx + 1)
    }

    /// Descriptor for the current track.
    pub fn descriptor(&self) -> Option<TrackDescriptor> {
        let track = self.current_track()?;
        Some(track.to_descriptor(self.base_url.as_deref(), self.in_release_run(self.current)))
    }

    /// Move to the next track. `false` at the end of the list.
    pub fn advance(&mut self) -> bool {
        if self.current + 1 < self.tracks.len() {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous track. `false` at the start of the list.
    pub fn back(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Keep a human-readable note of listen reports.
    pub fn record_listen(&mut self, event: &PlayerEvent) {
        let title_of = |id: &str| {
            self.tracks
                .iter()
                .find(|t| t.path.to_string_lossy() == id)
                .map(|t| t.display.clone())
                .unwrap_or_else(|| id.to_string())
        };
        match event {
            PlayerEvent::ListenStarted(id) => {
                self.last_listen = Some(format!("now playing: {}", title_of(id.as_str())));
            }
            PlayerEvent::ListenFinished {
                track_id,
                played_ms,
            } => {
                self.listens += 1;
                self.last_listen = Some(format!(
                    "listened to {} for {}s",
                    title_of(track_id.as_str()),
                    played_ms / 1000
                ));
            }
            _ => {}
        }
    }
}
