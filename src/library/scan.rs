use std::path::Path;
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, ItemKey, TaggedFileExt};
use log::debug;
use walkdir::WalkDir;

use cadenza::config::LibrarySettings;

use super::model::{LibraryTrack, find_cover, make_display, parse_gain};

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn non_empty(v: &str) -> Option<String> {
    let v = v.trim();
    (!v.is_empty()).then(|| v.to_string())
}

fn read_track(path: &Path) -> LibraryTrack {
    let mut track = LibraryTrack {
        path: path.to_path_buf(),
        title: path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string(),
        artist: None,
        album: None,
        duration: None,
        display: String::new(),
        track_gain: None,
        album_gain: None,
        cover: path.parent().and_then(find_cover),
    };

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let duration: Duration = tagged.properties().duration();
            track.duration = Some(duration);

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(title) = tag.title().as_deref().and_then(non_empty) {
                    track.title = title;
                }
                track.artist = tag.artist().as_deref().and_then(non_empty);
                track.album = tag.album().as_deref().and_then(non_empty);

                for item in tag.items() {
                    let Some(text) = item.value().text() else {
                        continue;
                    };
                    if matches!(item.key(), ItemKey::ReplayGainTrackGain) {
                        track.track_gain = parse_gain(text);
                    } else if matches!(item.key(), ItemKey::ReplayGainAlbumGain) {
                        track.album_gain = parse_gain(text);
                    }
                }
            }
        }
        Err(e) => debug!("no tags for {}: {e}", path.display()),
    }

    track.display = make_display(&track.title, track.artist.as_deref());
    track
}

pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<LibraryTrack> {
    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut tracks: Vec<LibraryTrack> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|entry| {
            let path = entry.path();
            path.is_file() && is_audio_file(path, settings)
        })
        .map(|entry| read_track(entry.path()))
        .collect();

    // album order keeps same-release runs adjacent
    tracks.sort_by(|a, b| {
        let key = |t: &LibraryTrack| {
            (
                t.album.as_deref().unwrap_or("").to_lowercase(),
                t.path.clone(),
            )
        };
        key(a).cmp(&key(b))
    });
    tracks
}
