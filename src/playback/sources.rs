//! Candidate source ordering.
//!
//! The primitive commits to the first candidate it can decode, so the order of
//! the list is the fallback priority.

use crate::settings::{PlaybackSettings, TranscodingMode, TranscodingSettings};
use crate::track::TrackDescriptor;

/// Query parameter that marks a transcoded locator.
pub(crate) const FORMAT_PARAM: &str = "format";

/// Ordered, immutable list of locators offered to the primitive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceCandidateList(Vec<String>);

impl SourceCandidateList {
    pub fn single(uri: String) -> Self {
        Self(vec![uri])
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Append `key=value` to `uri`, starting the query string if needed.
pub(crate) fn append_param(uri: &str, key: &str, value: impl std::fmt::Display) -> String {
    let sep = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{sep}{key}={value}")
}

/// Complete a transcoding template with the configured bitrate and format.
pub fn transcoded_url(template: &str, transcoding: &TranscodingSettings) -> String {
    let with_bitrate = append_param(template, "bitrate", transcoding.bitrate);
    append_param(&with_bitrate, FORMAT_PARAM, transcoding.format.code())
}

/// Build the candidate list for `track` under the current transcoding policy.
///
/// Missing locators are skipped; the result may be empty.
pub fn select_sources(track: &TrackDescriptor, settings: &PlaybackSettings) -> SourceCandidateList {
    let transcoding = &settings.transcoding;
    let native = track.native_resource.clone();
    let transcoded = track
        .transcoding_resource
        .as_deref()
        .map(|template| transcoded_url(template, transcoding));

    let ordered = match transcoding.mode {
        TranscodingMode::Never => vec![native],
        TranscodingMode::Always => vec![transcoded],
        TranscodingMode::IfFormatNotSupported => vec![native, transcoded],
    };

    SourceCandidateList(ordered.into_iter().flatten().collect())
}
