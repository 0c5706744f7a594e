//! Synthesized one-shot sound clips.
//!
//! Clips are short step sequences of tones rendered to mono `f32` samples. Playback is the
//! frontend's job; this module only produces the samples.

use std::f32::consts::TAU;
use std::time::Duration;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Saw,
}

/// A sequence of equally long steps, each a tone or a rest.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneClip {
    notes_hz: Vec<Option<f32>>,
    step_secs: f32,
    waveform: Waveform,
    gain: f32,
    attack: f32,
    release: f32,
}

impl ToneClip {
    pub fn from_notes(notes_hz: impl Into<Vec<Option<f32>>>, step_secs: f32) -> Self {
        Self {
            notes_hz: notes_hz.into(),
            step_secs: step_secs.max(0.005),
            waveform: Waveform::Sine,
            gain: 0.5,
            attack: 0.05,
            release: 0.2,
        }
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain.clamp(0.0, 1.0);
        self
    }

    /// Attack and release as fractions of one step.
    pub fn with_envelope(mut self, attack: f32, release: f32) -> Self {
        self.attack = attack.clamp(0.0, 0.49);
        self.release = release.clamp(0.0, 0.49);
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f32(self.step_secs * self.notes_hz.len() as f32)
    }

    pub fn render_mono(&self, sample_rate: u32) -> Vec<f32> {
        let sample_rate = sample_rate.max(1);
        let step_samples = ((self.step_secs * sample_rate as f32).round() as usize).max(1);
        let mut out = Vec::with_capacity(step_samples * self.notes_hz.len());
        let mut phase = 0.0f32;

        for note in &self.notes_hz {
            for i in 0..step_samples {
                let Some(freq_hz) = *note else {
                    out.push(0.0);
                    continue;
                };
                let in_step = i as f32 / step_samples as f32;
                let env = envelope(in_step, self.attack, self.release);
                phase = (phase + TAU * freq_hz / sample_rate as f32) % TAU;
                out.push(waveform_sample(self.waveform, phase) * self.gain * env);
            }
        }
        out
    }
}

fn waveform_sample(wave: Waveform, phase: f32) -> f32 {
    match wave {
        Waveform::Sine => phase.sin(),
        Waveform::Triangle => (2.0 / std::f32::consts::PI) * phase.sin().asin(),
        Waveform::Square => {
            if phase.sin() >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Saw => 2.0 * (phase / TAU) - 1.0,
    }
}

fn envelope(in_step: f32, attack: f32, release: f32) -> f32 {
    if attack > 0.0 && in_step < attack {
        return in_step / attack;
    }
    if release > 0.0 && in_step > (1.0 - release) {
        return ((1.0 - in_step) / release).max(0.0);
    }
    1.0
}
