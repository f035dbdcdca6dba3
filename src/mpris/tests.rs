use super::*;
use crate::track::{Artwork, TrackDescriptor};
use std::sync::mpsc;

fn make_track() -> TrackDescriptor {
    let mut track = TrackDescriptor::new("album-3/track 7", 1.234_567)
        .with_native("file:///tmp/music/test.flac");
    track.title = "Test Title".to_string();
    track.artist = Some("Test Artist".to_string());
    track.release = Some("Test Album".to_string());
    track.artwork = vec![Artwork {
        src: "file:///tmp/music/cover.jpg".to_string(),
        sizes: "512x512".to_string(),
        mime_type: "image/jpeg".to_string(),
    }];
    track
}

fn handle() -> (MprisHandle, Arc<Mutex<SharedState>>, mpsc::Receiver<Notice>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify_tx, notify_rx) = mpsc::channel::<Notice>();
    let handle = MprisHandle {
        state: state.clone(),
        notify: notify_tx,
    };
    (handle, state, notify_rx)
}

fn iface(state: &Arc<Mutex<SharedState>>) -> (PlayerIface, mpsc::Receiver<ControlCmd>) {
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    (
        PlayerIface {
            tx,
            state: state.clone(),
        },
        rx,
    )
}

#[test]
fn set_metadata_fills_shared_state_and_notifies() {
    let (mut handle, state, notify) = handle();
    handle.set_metadata(&make_track());

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.album.as_deref(), Some("Test Album"));
        assert_eq!(s.art_url.as_deref(), Some("file:///tmp/music/cover.jpg"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/album_3_track_7")
        );
    }
    assert_eq!(notify.try_recv().ok(), Some(Notice::Changed));
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let (mut handle, state, notify) = handle();
    let (iface, _rx) = iface(&state);

    assert_eq!(iface.playback_status(), "Stopped");
    handle.set_playback_status(PlaybackStatus::Playing);
    assert_eq!(iface.playback_status(), "Playing");
    handle.set_playback_status(PlaybackStatus::Paused);
    assert_eq!(iface.playback_status(), "Paused");
    assert_eq!(notify.try_iter().count(), 2);

    // unchanged status is not re-announced
    handle.set_playback_status(PlaybackStatus::Paused);
    assert_eq!(notify.try_iter().count(), 0);
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (mut handle, state, _notify) = handle();
    let (iface, _rx) = iface(&state);
    assert!(iface.metadata().is_empty());

    handle.set_metadata(&make_track());
    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:album",
        "mpris:artUrl",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn position_is_clamped_and_frozen_while_paused() {
    let (mut handle, state, _notify) = handle();
    let (iface, _rx) = iface(&state);
    handle.set_metadata(&make_track());

    handle.set_position_state(PositionState::new(1.234_567, 0.5));
    assert_eq!(iface.position(), 500_000);

    handle.set_position_state(PositionState::new(1.234_567, 30.0));
    assert_eq!(iface.position(), 1_234_567);
}

#[test]
fn seek_methods_forward_control_commands() {
    let (mut handle, state, _notify) = handle();
    let (iface, rx) = iface(&state);
    handle.set_metadata(&make_track());

    iface.seek(-5_000_000);
    let current = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/album_3_track_7").unwrap();
    iface.set_position(current, 1_000_000);
    let stale = ObjectPath::try_from("/org/mpris/MediaPlayer2/track/other").unwrap();
    iface.set_position(stale, 2_000_000);
    iface.play_pause();

    let cmds: Vec<_> = rx.try_iter().collect();
    assert_eq!(
        cmds,
        vec![
            ControlCmd::SeekBy(-5.0),
            ControlCmd::SeekTo(1.0),
            ControlCmd::PlayPause,
        ]
    );
}

#[test]
fn position_update_announces_a_seek() {
    let (mut handle, state, notify) = handle();
    handle.set_metadata(&make_track());
    assert_eq!(notify.try_iter().collect::<Vec<_>>(), vec![Notice::Changed]);

    handle.set_position_state(PositionState::new(1.234_567, 0.75));
    assert_eq!(notify.try_iter().collect::<Vec<_>>(), vec![Notice::Seeked]);
    assert_eq!(state.lock().unwrap().position_micros(Instant::now()), 750_000);
}
