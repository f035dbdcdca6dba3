use super::element::RodioElement;
use super::sink::local_path;
use cadenza::playback::{
    ElementEvent, MediaElement, PlaybackMode, SourceCandidateList, resolve_mode,
};
use cadenza::settings::{PlaybackSettings, TranscodingMode};
use cadenza::track::TrackDescriptor;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn local_path_accepts_file_uris_and_bare_paths() {
    assert_eq!(
        local_path("file:///music/a b.flac"),
        Some(PathBuf::from("/music/a b.flac"))
    );
    assert_eq!(local_path("/music/a.flac"), Some(PathBuf::from("/music/a.flac")));
    assert_eq!(local_path("http://srv/transcode?path=/a.flac"), None);
}

fn candidates(track: &TrackDescriptor, mode: TranscodingMode) -> SourceCandidateList {
    let mut settings = PlaybackSettings::default();
    settings.transcoding.mode = mode;
    cadenza::playback::select_sources(track, &settings)
}

#[test]
fn undecodable_candidates_leave_nothing_committed() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus.mp3");
    std::fs::write(&bogus, b"definitely not audio").unwrap();

    let track = TrackDescriptor::new("t", 10.0)
        .with_native(format!("file://{}", bogus.display()))
        .with_transcoding("http://srv/transcode?path=bogus");

    let mut element = RodioElement::new();
    element.set_sources(&candidates(&track, TranscodingMode::IfFormatNotSupported));
    element.load();

    assert!(element.has_sources());
    assert_eq!(element.current_src(), None);
    assert_eq!(resolve_mode(element.current_src()), PlaybackMode::Unknown);
    assert!(element.take_events().is_empty());

    // nothing to play and no output yet: rejected, not panicking
    assert!(element.play().is_err());
    assert!(element.is_paused());
}

#[test]
fn missing_file_is_skipped() {
    let mut element = RodioElement::new();
    let track = TrackDescriptor::new("t", 10.0).with_native("file:///definitely/not/here.flac");
    element.set_sources(&candidates(&track, TranscodingMode::Never));
    element.load();
    assert_eq!(element.current_src(), None);
}

#[test]
fn seeking_without_a_sink_only_moves_the_origin() {
    let mut element = RodioElement::new();
    element.set_current_time(12.5);
    assert_eq!(element.current_time(), 12.5);
    assert!(!element.output_running());

    element.pause();
    assert!(
        !element
            .take_events()
            .iter()
            .any(|e| matches!(e, ElementEvent::Pause))
    );
}
