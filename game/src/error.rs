use std::io;

use thiserror::Error;

/// Why a puzzle could not be generated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("puzzle grid needs at least one row and one column, got {rows}x{cols}")]
    InvalidGrid { rows: u32, cols: u32 },
    #[error("tile resolution must be at least one pixel")]
    InvalidTileSize,
    #[error("piece size must be positive and finite, got {0}")]
    InvalidPieceSize(f32),
    #[error("knob radius ratio must be finite and non-negative, got {0}")]
    InvalidKnobRatio(f32),
    #[error("source image and piece buffers must fit in {limit} pixels per side")]
    TextureTooLarge { limit: u32 },
    #[error("slot epsilon {slot_epsilon} must be smaller than the piece size {piece_size}")]
    SlotEpsilonTooLarge { slot_epsilon: f32, piece_size: f32 },
    #[error("scramble spacing must be positive and distortion non-negative (distance {distance}, distortion {distortion})")]
    InvalidScrambleSpacing { distance: f32, distortion: f32 },
    #[error("interaction tuning must be positive and finite: {0}")]
    InvalidInteraction(&'static str),
    #[error("no image source configured")]
    MissingImageSource,
    #[error("image source produced {actual:?}, expected {expected:?}")]
    ImageSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("no puzzle has been generated yet, nothing to restart")]
    NothingToRestart,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings json invalid: {0}")]
    Json(#[from] serde_json::Error),
}
