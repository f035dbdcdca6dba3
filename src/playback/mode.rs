use super::sources::FORMAT_PARAM;
use super::types::PlaybackMode;

/// Classify the source the primitive is actually playing.
///
/// A locator carrying the `format` query parameter was built by the
/// transcoding branch of the source selector; anything else is the original
/// file. No active source means [`PlaybackMode::Unknown`].
pub fn resolve_mode(active_source: Option<&str>) -> PlaybackMode {
    match active_source {
        None => PlaybackMode::Unknown,
        Some(src) if src.is_empty() => PlaybackMode::Unknown,
        Some(src) if has_format_param(src) => PlaybackMode::Transcoded,
        Some(_) => PlaybackMode::Native,
    }
}

fn has_format_param(uri: &str) -> bool {
    let Some((_, query)) = uri.split_once('?') else {
        return false;
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .any(|pair| pair.split('=').next() == Some(FORMAT_PARAM))
}
