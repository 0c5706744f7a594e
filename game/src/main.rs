use std::collections::HashMap;

use anyhow::{Context, Result};
use engine::app::{AppConfig, run_game};
use engine::audio::DEFAULT_SAMPLE_RATE;
use jigsaw::app::JigsawApp;
use jigsaw::config::{AudioSettings, SettingsStore};
use jigsaw::sfx::{AudioSink, NullAudio, SoundCue, clip_for_cue};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};
use winit::dpi::PhysicalSize;

/// Plays pre-rendered cue clips on the default output device.
struct RodioAudio {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    clips: HashMap<SoundCue, Vec<f32>>,
    gain: f32,
}

impl RodioAudio {
    fn new(settings: AudioSettings) -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("no default audio output device")?;
        let clips = SoundCue::ALL
            .into_iter()
            .map(|cue| (cue, clip_for_cue(cue).render_mono(DEFAULT_SAMPLE_RATE)))
            .collect();
        Ok(Self {
            _stream: stream,
            handle,
            clips,
            gain: settings.effective_sfx_gain(),
        })
    }
}

impl AudioSink for RodioAudio {
    fn play_once(&mut self, cue: SoundCue) {
        if self.gain <= 0.0 {
            return;
        }
        let Some(samples) = self.clips.get(&cue) else {
            return;
        };
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        sink.set_volume(cue.volume() * self.gain);
        sink.append(SamplesBuffer::new(1, DEFAULT_SAMPLE_RATE, samples.clone()));
        sink.detach();
    }
}

fn main() -> Result<()> {
    jigsaw::init_tracing();

    let store = SettingsStore::from_env();
    let settings = store.load();
    if !store.path().exists() {
        if let Err(err) = store.save(&settings) {
            tracing::warn!(path = %store.path().display(), "could not write default settings: {err}");
        }
    }

    let audio: Box<dyn AudioSink> = match RodioAudio::new(settings.audio) {
        Ok(audio) => Box::new(audio),
        Err(err) => {
            tracing::warn!("audio disabled: {err:#}");
            Box::new(NullAudio)
        }
    };

    let app = JigsawApp::new(settings.puzzle.clone(), audio).context("invalid puzzle settings")?;
    let config = AppConfig {
        title: "Jigsaw".to_string(),
        desired_size: PhysicalSize::new(settings.video.window_width, settings.video.window_height),
        clamp_to_monitor: true,
        vsync: Some(settings.video.vsync),
    };
    run_game(config, app).map_err(|err| anyhow::anyhow!("window loop failed: {err}"))
}
