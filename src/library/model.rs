use std::path::{Path, PathBuf};
use std::time::Duration;

use cadenza::track::{Artwork, ReplayGainInfo, TrackDescriptor};

/// Cover image file names looked up next to a track, in order.
const COVER_NAMES: [&str; 4] = ["cover.jpg", "cover.png", "folder.jpg", "folder.png"];

#[derive(Debug, Clone)]
pub struct LibraryTrack {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub display: String,
    pub track_gain: Option<f32>,
    pub album_gain: Option<f32>,
    pub cover: Option<PathBuf>,
}

impl LibraryTrack {
    /// Descriptor handed to the engine.
    ///
    /// The native candidate is the file itself. With a server configured the
    /// track also gets a transcoding template on that server.
    pub fn to_descriptor(&self, base_url: Option<&str>, same_release_run: bool) -> TrackDescriptor {
        let path = self.path.to_string_lossy();
        let mut descriptor =
            TrackDescriptor::new(path.as_ref(), self.duration.map_or(0.0, |d| d.as_secs_f64()))
                .with_native(file_uri(&self.path));

        if let Some(base) = base_url {
            descriptor = descriptor.with_transcoding(format!(
                "{}/transcode?path={}",
                base.trim_end_matches('/'),
                encode_query_value(&path)
            ));
        }

        descriptor.title = self.title.clone();
        descriptor.artist = self.artist.clone();
        descriptor.release = self.album.clone();
        descriptor.replay_gain = ReplayGainInfo {
            track_gain: self.track_gain,
            release_gain: self.album_gain,
            same_release_run,
        };
        descriptor.artwork = self
            .cover
            .iter()
            .map(|cover| Artwork {
                src: file_uri(cover),
                sizes: String::new(),
                mime_type: mime_for(cover).to_string(),
            })
            .collect();
        descriptor
    }
}

pub fn make_display(title: &str, artist: Option<&str>) -> String {
    match artist {
        Some(a) if !a.trim().is_empty() => format!("{} - {}", a.trim(), title),
        _ => title.to_string(),
    }
}

pub fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// First cover image found in `dir`.
pub fn find_cover(dir: &Path) -> Option<PathBuf> {
    COVER_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// Percent-encode everything outside the URI unreserved set.
pub fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~' | b'/') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Parse a replay-gain tag value such as `"-6.54 dB"`.
pub fn parse_gain(value: &str) -> Option<f32> {
    let v = value.trim();
    let v = v
        .strip_suffix("dB")
        .or_else(|| v.strip_suffix("db"))
        .or_else(|| v.strip_suffix("DB"))
        .unwrap_or(v);
    v.trim().parse::<f32>().ok().filter(|g| g.is_finite())
}
