use std::path::PathBuf;
use std::time::Duration;

use log::{debug, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use cadenza::playback::{ElementEvent, MediaElement, SourceCandidateList};
use cadenza::{Error, Result};

use super::sink::{create_sink_at, local_path, probe};

/// Audio primitive backed by the default output device.
///
/// `load` commits to the first candidate that opens and decodes. The output
/// stream only exists after `init_output`; until then nothing can play.
pub struct RodioElement {
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    sources: Vec<String>,
    /// Committed candidate and the file behind it.
    current: Option<(String, PathBuf)>,
    /// Local time at which the current sink started.
    start_at: Duration,
    paused: bool,
    volume: f32,
    gain: f32,
    ended: bool,
    events: Vec<ElementEvent>,
}

impl Default for RodioElement {
    fn default() -> Self {
        Self::new()
    }
}

impl RodioElement {
    pub fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            sources: Vec::new(),
            current: None,
            start_at: Duration::ZERO,
            paused: true,
            volume: 1.0,
            gain: 1.0,
            ended: false,
            events: Vec::new(),
        }
    }

    fn effective_volume(&self) -> f32 {
        self.volume * self.gain
    }

    fn drop_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    /// Build a paused sink for the committed file at `start_at`.
    fn rebuild_sink(&mut self) -> Result<()> {
        self.drop_sink();
        let Some(stream) = self.stream.as_ref() else {
            return Err(Error::Element("audio output not initialised".to_string()));
        };
        let Some((_, path)) = self.current.as_ref() else {
            return Err(Error::Element("no decodable source".to_string()));
        };
        let sink = create_sink_at(stream, path, self.start_at)?;
        sink.set_volume(self.effective_volume());
        self.sink = Some(sink);
        Ok(())
    }
}

impl MediaElement for RodioElement {
    fn set_sources(&mut self, sources: &SourceCandidateList) {
        self.drop_sink();
        self.sources = sources.iter().cloned().collect();
        self.current = None;
        self.start_at = Duration::ZERO;
        self.paused = true;
        self.ended = false;
    }

    fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }

    fn load(&mut self) {
        self.drop_sink();
        self.current = None;

        for (idx, uri) in self.sources.iter().enumerate() {
            let Some(path) = local_path(uri) else {
                debug!("skipping {uri}: not a local file");
                continue;
            };
            match probe(&path) {
                Ok(()) => {
                    self.current = Some((uri.clone(), path));
                    if idx > 0 {
                        self.events.push(ElementEvent::SourceChanged);
                    }
                    self.events.push(ElementEvent::CanPlay);
                    return;
                }
                Err(e) => debug!("skipping {uri}: {e}"),
            }
        }

        if !self.sources.is_empty() {
            warn!("none of {} candidate(s) could be opened", self.sources.len());
        }
    }

    fn current_src(&self) -> Option<&str> {
        self.current.as_ref().map(|(uri, _)| uri.as_str())
    }

    fn current_time(&self) -> f64 {
        let played = self.sink.as_ref().map_or(Duration::ZERO, |s| s.get_pos());
        (self.start_at + played).as_secs_f64()
    }

    fn set_current_time(&mut self, seconds: f64) {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        self.start_at = Duration::from_secs_f64(seconds);
        self.ended = false;
        if self.sink.is_some() {
            let was_paused = self.paused;
            match self.rebuild_sink() {
                Ok(()) => {
                    if !was_paused {
                        if let Some(sink) = self.sink.as_ref() {
                            sink.play();
                        }
                    }
                }
                Err(e) => warn!("seek failed: {e}"),
            }
        }
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> Result<()> {
        if self.sink.is_none() {
            self.rebuild_sink()?;
        }
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
        }
        let was_paused = self.paused;
        self.paused = false;
        self.ended = false;
        if was_paused {
            self.events.push(ElementEvent::Play);
        }
        self.events.push(ElementEvent::Playing);
        Ok(())
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
        if !self.paused {
            self.paused = true;
            self.events.push(ElementEvent::Pause);
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.effective_volume());
        }
    }

    fn init_output(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| Error::Element(format!("no audio output device: {e}")))?;
        // rodio logs to stderr when the stream is dropped, which garbles the TUI
        stream.log_on_drop(false);
        self.stream = Some(stream);
        Ok(())
    }

    fn output_running(&self) -> bool {
        self.stream.is_some()
    }

    fn set_output_gain(&mut self, gain: f32) {
        self.gain = gain;
        if let Some(sink) = self.sink.as_ref() {
            sink.set_volume(self.effective_volume());
        }
    }

    fn take_events(&mut self) -> Vec<ElementEvent> {
        let finished = !self.paused && !self.ended && self.sink.as_ref().is_some_and(Sink::empty);
        if finished {
            self.ended = true;
            self.paused = true;
            self.events.push(ElementEvent::Ended);
        }
        std::mem::take(&mut self.events)
    }
}
