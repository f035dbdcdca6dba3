use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use super::*;
use crate::Error;
use crate::settings::{
    PlaybackSettings, ReplayGainMode, SettingsStore, TranscodingMode, VOLUME_KEY,
};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::track::{ReplayGainInfo, TrackDescriptor, TrackId};

#[derive(Default)]
struct FakeElement {
    sources: Vec<String>,
    committed: Option<String>,
    loads: usize,
    time: f64,
    paused: bool,
    volume: f32,
    gain: Option<f32>,
    output: bool,
    reject_play: bool,
    plays: usize,
    queued: Vec<ElementEvent>,
}

impl FakeElement {
    fn new() -> Self {
        Self {
            paused: true,
            ..Self::default()
        }
    }

    /// Pretend the primitive settled on candidate `idx`.
    fn commit(&mut self, idx: usize) {
        self.committed = self.sources.get(idx).cloned();
    }
}

impl MediaElement for FakeElement {
    fn set_sources(&mut self, sources: &SourceCandidateList) {
        self.sources = sources.iter().cloned().collect();
        self.committed = None;
    }

    fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }

    fn load(&mut self) {
        self.loads += 1;
    }

    fn current_src(&self) -> Option<&str> {
        self.committed.as_deref()
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.time = seconds;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> crate::Result<()> {
        if self.reject_play {
            return Err(Error::Element("not allowed".into()));
        }
        self.plays += 1;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn init_output(&mut self) -> crate::Result<()> {
        self.output = true;
        Ok(())
    }

    fn output_running(&self) -> bool {
        self.output
    }

    fn set_output_gain(&mut self, gain: f32) {
        self.gain = Some(gain);
    }

    fn take_events(&mut self) -> Vec<ElementEvent> {
        std::mem::take(&mut self.queued)
    }
}

#[derive(Default)]
struct SessionLog {
    metadata: Vec<TrackId>,
    positions: Vec<PositionState>,
    statuses: Vec<PlaybackStatus>,
}

#[derive(Clone, Default)]
struct FakeSession(Rc<RefCell<SessionLog>>);

impl MediaSession for FakeSession {
    fn set_metadata(&mut self, track: &TrackDescriptor) {
        self.0.borrow_mut().metadata.push(track.id.clone());
    }

    fn set_position_state(&mut self, state: PositionState) {
        self.0.borrow_mut().positions.push(state);
    }

    fn set_playback_status(&mut self, status: PlaybackStatus) {
        self.0.borrow_mut().statuses.push(status);
    }
}

#[derive(Clone)]
struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    fn advance(&self, secs: u64) {
        self.0.set(self.0.get() + Duration::from_secs(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

struct Harness {
    engine: PlaybackEngine<FakeElement>,
    rx: Receiver<PlayerEvent>,
    clock: ManualClock,
    session: FakeSession,
    backend: MemoryStore,
}

impl Harness {
    fn events(&self) -> Vec<PlayerEvent> {
        self.rx.try_iter().collect()
    }
}

fn harness_with(settings: PlaybackSettings) -> Harness {
    let backend = MemoryStore::new();
    let store = SettingsStore::load(Box::new(backend.clone()), settings, 0.8);
    let (tx, rx) = mpsc::channel();
    let clock = ManualClock::new();
    let session = FakeSession::default();
    let engine = PlaybackEngine::new(FakeElement::new(), store, tx)
        .with_clock(Box::new(clock.clone()))
        .with_session(Box::new(session.clone()));
    Harness {
        engine,
        rx,
        clock,
        session,
        backend,
    }
}

fn harness() -> Harness {
    harness_with(PlaybackSettings::default())
}

fn track(id: &str) -> TrackDescriptor {
    TrackDescriptor::new(id, 240.0)
        .with_native(format!("http://host/audio/file?trackid={id}"))
        .with_transcoding(format!("http://host/audio/transcode?trackid={id}"))
}

/// Load, open the gate and let the primitive commit to candidate `idx`.
fn ready(h: &mut Harness, id: &str, idx: usize) {
    h.engine.load_track(track(id), false);
    h.engine.unlock().unwrap();
    h.engine.element_mut().commit(idx);
    h.engine.dispatch(ElementEvent::CanPlay);
}

#[test]
fn construction_reports_settings_and_restores_volume() {
    let h = harness();
    let events = h.events();
    assert!(matches!(events.as_slice(), [PlayerEvent::SettingsLoaded(json)] if json.contains("\"replayGain\"")));
    assert_eq!(h.engine.element().volume, 0.8);
    assert_eq!(h.engine.mode(), PlaybackMode::Unknown);
}

#[test]
fn parameters_wait_for_the_gate_and_last_load_wins() {
    let mut settings = PlaybackSettings::default();
    settings.replay_gain.mode = ReplayGainMode::Track;
    let mut h = harness_with(settings);

    let mut quiet = track("b");
    quiet.replay_gain = ReplayGainInfo {
        track_gain: Some(-20.0),
        ..ReplayGainInfo::default()
    };
    h.engine.load_track(track("a"), true);
    h.engine.load_track(quiet, true);
    assert_eq!(h.engine.element().gain, None);
    assert_eq!(h.engine.element().plays, 0);
    assert!(h.session.0.borrow().metadata.is_empty());

    h.engine.unlock().unwrap();
    let gain = h.engine.element().gain.unwrap();
    assert!((gain - 0.1).abs() < 1e-5);
    assert_eq!(h.engine.element().plays, 1);
    assert_eq!(h.session.0.borrow().metadata, vec![TrackId::from("b")]);

    // draining happens once
    h.engine.unlock().unwrap();
    assert_eq!(h.engine.element().plays, 1);
}

#[test]
fn load_after_unlock_applies_immediately() {
    let mut h = harness();
    h.engine.unlock().unwrap();
    h.engine.load_track(track("a"), true);
    assert_eq!(h.engine.element().gain, Some(1.0));
    assert_eq!(h.engine.element().plays, 1);

    h.engine.load_track(track("b"), false);
    assert_eq!(h.engine.element().plays, 1);
}

#[test]
fn candidates_follow_policy_and_mode_follows_commit() {
    let mut h = harness();
    ready(&mut h, "a", 0);
    assert_eq!(h.engine.element().sources.len(), 2);
    assert_eq!(h.engine.mode(), PlaybackMode::Native);

    h.engine.element_mut().commit(1);
    h.engine.dispatch(ElementEvent::SourceChanged);
    assert_eq!(h.engine.mode(), PlaybackMode::Transcoded);
    assert!(h.engine.surface().transcoding_active);
}

#[test]
fn native_seek_moves_local_time_only() {
    let mut h = harness();
    ready(&mut h, "a", 0);
    h.engine.element_mut().time = 12.0;

    h.engine.seek_to(42.0);
    assert_eq!(h.engine.offset(), 0.0);
    assert_eq!(h.engine.element().time, 42.0);
    assert_eq!(h.engine.position(), 42.0);
    assert_eq!(h.engine.element().loads, 1);
    assert!(!h.engine.element().is_paused());
}

#[test]
fn transcoded_seek_restarts_stream_at_offset() {
    let mut settings = PlaybackSettings::default();
    settings.transcoding.mode = TranscodingMode::Always;
    let mut h = harness_with(settings);
    ready(&mut h, "a", 0);
    assert_eq!(h.engine.mode(), PlaybackMode::Transcoded);
    h.engine.element_mut().time = 10.0;

    h.engine.seek_to(42.7);
    let element = h.engine.element();
    assert_eq!(h.engine.offset(), 42.7);
    assert_eq!(element.time, 0.0);
    assert_eq!(element.loads, 2);
    assert_eq!(
        element.sources,
        vec!["http://host/audio/transcode?trackid=a&bitrate=128000&format=2&offset=42.7".to_string()]
    );
    assert_eq!(h.engine.position(), 42.7);

    // position keeps advancing from the new offset
    h.engine.element_mut().time = 3.0;
    h.engine.seek_forward();
    assert!((h.engine.offset() - 50.7).abs() < 1e-9);
    assert_eq!(h.engine.element().time, 0.0);
}

#[test]
fn seek_opens_the_gate_and_applies_parked_parameters() {
    let mut h = harness();
    h.engine.load_track(track("a"), false);
    h.engine.element_mut().commit(0);
    h.engine.dispatch(ElementEvent::CanPlay);
    assert!(!h.engine.is_unlocked());

    h.engine.seek_to(12.5);
    assert!(h.engine.is_unlocked());
    assert_eq!(h.engine.element().gain, Some(1.0));
    assert_eq!(h.session.0.borrow().metadata, vec![TrackId::from("a")]);
    assert_eq!(h.engine.element().time, 12.5);
    assert!(!h.engine.element().is_paused());
}

#[test]
fn seek_before_commit_is_dropped() {
    let mut h = harness();
    h.engine.load_track(track("a"), false);
    h.engine.unlock().unwrap();

    h.engine.seek_to(30.0);
    h.engine.seek_forward();
    assert_eq!(h.engine.element().time, 0.0);
    assert_eq!(h.engine.element().loads, 1);
    assert_eq!(h.engine.offset(), 0.0);
    assert!(h.session.0.borrow().positions.is_empty());
}

#[test]
fn relative_seeks_clamp_to_the_track() {
    let mut h = harness().engine_with_step(30.0);
    ready(&mut h, "a", 0);
    h.engine.element_mut().time = 225.0;
    h.engine.seek_forward();
    assert_eq!(h.engine.element().time, 240.0);

    h.engine.element_mut().time = 10.0;
    h.engine.seek_back();
    assert_eq!(h.engine.element().time, 0.0);
}

impl Harness {
    fn engine_with_step(mut self, step: f64) -> Self {
        self.engine = self.engine.with_seek_step(step);
        self
    }
}

#[test]
fn every_seek_refreshes_the_media_session() {
    let mut h = harness();
    ready(&mut h, "a", 0);
    h.engine.seek_to(300.0);

    let log = h.session.0.borrow();
    let last = log.positions.last().copied().unwrap();
    assert_eq!(last.duration, 240.0);
    assert_eq!(last.position, 240.0);
    assert_eq!(last.playback_rate, 1.0);
    assert_eq!(log.statuses.last(), Some(&PlaybackStatus::Playing));
}

#[test]
fn pause_and_resume_make_one_listen_session() {
    let mut h = harness();
    ready(&mut h, "a", 0);
    h.events();

    h.engine.dispatch(ElementEvent::Playing);
    h.clock.advance(10);
    h.engine.dispatch(ElementEvent::Pause);
    h.clock.advance(60);
    h.engine.dispatch(ElementEvent::Playing);
    h.clock.advance(5);
    h.engine.dispatch(ElementEvent::Ended);

    assert_eq!(
        h.events(),
        vec![
            PlayerEvent::ListenStarted(TrackId::from("a")),
            PlayerEvent::ListenFinished {
                track_id: TrackId::from("a"),
                played_ms: 15_000,
            },
            PlayerEvent::PlaybackEnded,
        ]
    );
}

#[test]
fn buffering_stalls_are_not_counted() {
    let mut h = harness();
    ready(&mut h, "a", 0);
    h.engine.dispatch(ElementEvent::Playing);
    h.clock.advance(4);
    h.engine.dispatch(ElementEvent::Waiting);
    h.clock.advance(20);
    h.engine.dispatch(ElementEvent::Playing);
    h.clock.advance(1);
    h.engine.stop();

    let finished: Vec<_> = h
        .events()
        .into_iter()
        .filter(|e| matches!(e, PlayerEvent::ListenFinished { .. }))
        .collect();
    assert_eq!(
        finished,
        vec![PlayerEvent::ListenFinished {
            track_id: TrackId::from("a"),
            played_ms: 5_000,
        }]
    );
    assert!(h.engine.element().is_paused());
}

#[test]
fn replacing_a_playing_track_flushes_and_resets() {
    let mut settings = PlaybackSettings::default();
    settings.transcoding.mode = TranscodingMode::Always;
    let mut h = harness_with(settings);
    ready(&mut h, "a", 0);
    h.engine.seek_to(30.0);
    h.engine.dispatch(ElementEvent::Playing);
    h.clock.advance(7);
    h.events();

    h.engine.load_track(track("b"), false);
    assert_eq!(
        h.events(),
        vec![PlayerEvent::ListenFinished {
            track_id: TrackId::from("a"),
            played_ms: 7_000,
        }]
    );
    assert_eq!(h.engine.mode(), PlaybackMode::Unknown);
    assert_eq!(h.engine.offset(), 0.0);

    // nothing heard for "b"
    h.engine.load_track(track("c"), false);
    assert!(h.events().is_empty());
}

#[test]
fn empty_candidate_list_leaves_mode_unknown() {
    let mut h = harness();
    h.engine.load_track(TrackDescriptor::new("bare", 60.0), true);
    h.engine.unlock().unwrap();
    h.engine.dispatch(ElementEvent::CanPlay);
    assert_eq!(h.engine.mode(), PlaybackMode::Unknown);
    assert!(!h.engine.element().has_sources());

    h.engine.play_pause();
    assert_eq!(h.engine.element().plays, 0);
}

#[test]
fn rejected_play_is_logged_and_state_kept() {
    let mut h = harness();
    ready(&mut h, "a", 0);
    h.engine.element_mut().reject_play = true;

    h.engine.play();
    h.engine.seek_to(20.0);
    assert_eq!(h.engine.mode(), PlaybackMode::Native);
    assert_eq!(h.engine.offset(), 0.0);
    assert!(h.engine.element().is_paused());
    assert_eq!(h.engine.element().plays, 0);
}

#[test]
fn play_pause_toggles_and_opens_the_gate() {
    let mut h = harness();
    h.engine.load_track(track("a"), false);
    assert!(!h.engine.is_unlocked());

    h.engine.play_pause();
    assert!(h.engine.is_unlocked());
    assert!(!h.engine.element().is_paused());
    h.engine.play_pause();
    assert!(h.engine.element().is_paused());
}

#[test]
fn first_play_pause_with_parked_autoplay_keeps_playing() {
    let mut h = harness();
    h.engine.load_track(track("a"), true);
    assert_eq!(h.engine.element().plays, 0);

    h.engine.play_pause();
    assert!(h.engine.is_unlocked());
    assert!(!h.engine.element().is_paused());
    assert_eq!(h.engine.element().plays, 1);

    h.engine.play_pause();
    assert!(h.engine.element().is_paused());
}

#[test]
fn volume_changes_reach_element_and_storage() {
    let mut h = harness();
    h.engine.set_volume(0.5);
    h.engine.step_volume_up();
    assert!((h.engine.element().volume - 0.55).abs() < 1e-4);
    assert_eq!(h.backend.get(VOLUME_KEY), Some(h.engine.volume().level().to_string()));

    h.engine.toggle_mute();
    assert_eq!(h.engine.element().volume, 0.0);
    assert_eq!(h.engine.surface().volume_icon, VolumeIcon::Muted);
    h.engine.toggle_mute();
    assert!((h.engine.element().volume - 0.55).abs() < 1e-4);
}

#[test]
fn settings_change_reapplies_gain_and_next_load_uses_policy() {
    let mut h = harness();
    ready(&mut h, "a", 0);
    assert_eq!(h.engine.element().gain, Some(1.0));

    let mut next = PlaybackSettings::default();
    next.transcoding.mode = TranscodingMode::Never;
    next.replay_gain.mode = ReplayGainMode::Track;
    next.replay_gain.pre_amp_gain_if_no_info = -20.0;
    h.engine.set_settings(next.clone());
    assert!((h.engine.element().gain.unwrap() - 0.1).abs() < 1e-5);
    assert_eq!(h.engine.settings(), &next);

    h.engine.load_track(track("b"), false);
    assert_eq!(h.engine.element().sources.len(), 1);
}

#[test]
fn control_commands_map_onto_operations() {
    let mut h = harness();
    ready(&mut h, "a", 0);
    h.events();

    assert!(h.engine.handle_control(ControlCmd::Next));
    assert!(h.engine.handle_control(ControlCmd::Prev));
    assert!(h.engine.handle_control(ControlCmd::SeekTo(12.0)));
    assert_eq!(h.engine.element().time, 12.0);
    assert!(h.engine.handle_control(ControlCmd::Pause));
    assert!(h.engine.element().is_paused());
    assert!(!h.engine.handle_control(ControlCmd::Quit));

    assert_eq!(
        h.events(),
        vec![PlayerEvent::PlayNext, PlayerEvent::PlayPrevious]
    );
}

#[test]
fn queued_element_events_are_dispatched_in_order() {
    let mut h = harness();
    h.engine.load_track(track("a"), false);
    h.engine.element_mut().commit(1);
    h.engine.element_mut().queued = vec![ElementEvent::CanPlay, ElementEvent::Playing];
    h.engine.poll_element();

    assert_eq!(h.engine.mode(), PlaybackMode::Transcoded);
    assert!(h
        .events()
        .contains(&PlayerEvent::ListenStarted(TrackId::from("a"))));
}

#[test]
fn surface_formats_position_and_progress() {
    let mut h = harness();
    ready(&mut h, "a", 0);
    h.engine.element_mut().time = 60.0;
    let s = h.engine.surface();
    assert_eq!(s.current_time_text, "1:00");
    assert_eq!(s.duration_text, "4:00");
    assert_eq!(s.progress, 0.25);
    assert!(!s.transcoding_active);
}
