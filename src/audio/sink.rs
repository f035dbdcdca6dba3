//! Helpers for opening candidates and creating `rodio` sinks from them.
//!
//! Only local files can be opened; network locators are left to hosts that
//! have a transport.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use cadenza::{Error, Result};

/// Filesystem path of a candidate locator, if it points at a local file.
pub(super) fn local_path(uri: &str) -> Option<PathBuf> {
    if let Some(rest) = uri.strip_prefix("file://") {
        return Some(PathBuf::from(rest));
    }
    if uri.contains("://") {
        return None;
    }
    Some(PathBuf::from(uri))
}

fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(path)?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| Error::Element(format!("cannot decode {}: {e}", path.display())))
}

/// Whether `path` opens and has a decodable header.
pub(super) fn probe(path: &Path) -> Result<()> {
    open_decoder(path).map(|_| ())
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(stream: &OutputStream, path: &Path, start_at: Duration) -> Result<Sink> {
    // `skip_duration` is the seeking primitive; Duration::ZERO is fine.
    let source = open_decoder(path)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
