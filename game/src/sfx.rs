//! Sound cues for puzzle events.
//!
//! Playback sits behind `AudioSink`; the windowed binary plugs in a rodio-backed sink, tests and
//! headless tools use `NullAudio` or their own recorder.

use engine::audio::{ToneClip, Waveform};

use crate::session::SessionEvent;

/// Shared SFX volume constants (0.0..=1.0).
pub const CORRECT_SFX_VOLUME: f32 = 0.35;
pub const INCORRECT_SFX_VOLUME: f32 = 0.25;
pub const SOLVED_SFX_VOLUME: f32 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    CorrectPlacement,
    IncorrectPlacement,
    PuzzleSolved,
}

impl SoundCue {
    pub const ALL: [SoundCue; 3] = [
        SoundCue::CorrectPlacement,
        SoundCue::IncorrectPlacement,
        SoundCue::PuzzleSolved,
    ];

    pub fn volume(self) -> f32 {
        match self {
            SoundCue::CorrectPlacement => CORRECT_SFX_VOLUME,
            SoundCue::IncorrectPlacement => INCORRECT_SFX_VOLUME,
            SoundCue::PuzzleSolved => SOLVED_SFX_VOLUME,
        }
    }
}

/// Fire-and-forget playback.
pub trait AudioSink {
    fn play_once(&mut self, cue: SoundCue);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_once(&mut self, _cue: SoundCue) {}
}

pub fn cue_for_event(event: &SessionEvent) -> Option<SoundCue> {
    match event {
        SessionEvent::Generated { .. } => None,
        SessionEvent::PlacedCorrectly { .. } => Some(SoundCue::CorrectPlacement),
        SessionEvent::PlacedIncorrectly { .. } => Some(SoundCue::IncorrectPlacement),
        SessionEvent::Won { .. } => Some(SoundCue::PuzzleSolved),
    }
}

pub fn clip_for_cue(cue: SoundCue) -> ToneClip {
    match cue {
        // E6 blip.
        SoundCue::CorrectPlacement => ToneClip::from_notes(vec![Some(1318.5)], 0.08)
            .with_waveform(Waveform::Triangle)
            .with_envelope(0.02, 0.4),
        // Low falling buzz.
        SoundCue::IncorrectPlacement => ToneClip::from_notes(vec![Some(220.0), Some(174.6)], 0.07)
            .with_waveform(Waveform::Square)
            .with_gain(0.3),
        // C major arpeggio.
        SoundCue::PuzzleSolved => ToneClip::from_notes(
            vec![Some(523.3), Some(659.3), Some(784.0), None, Some(1046.5)],
            0.11,
        )
        .with_waveform(Waveform::Triangle),
    }
}
