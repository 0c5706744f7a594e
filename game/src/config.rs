use std::fs;
use std::path::PathBuf;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SettingsError};
use crate::image_source::ImageSourceKind;

pub const DEFAULT_ROWS: u32 = 4;
pub const DEFAULT_COLS: u32 = 4;
pub const DEFAULT_PIECE_SIZE: f32 = 1.5;
pub const DEFAULT_TILE_PX: u32 = 128;
pub const DEFAULT_KNOB_RADIUS_RATIO: f32 = 0.25;
pub const DEFAULT_SCRAMBLE_DISTANCE: f32 = 1.1;
pub const DEFAULT_SCRAMBLE_DISTORTION: f32 = 0.2;
pub const DEFAULT_SNAP_THRESHOLD: f32 = 0.7;
pub const DEFAULT_RETURN_SPEED: f32 = 10.0;
pub const DEFAULT_SLOT_EPSILON: f32 = 0.1;
/// Largest side, in pixels, of the source image or of a single piece buffer.
pub const MAX_TEXTURE_PX: u32 = 8192;

/// Everything `PuzzleSession::generate` needs. World space is y-up; the board grows right and
/// down from `board_origin`, which is the centre of piece (0, 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub rows: u32,
    pub cols: u32,
    /// World size of one content tile (one board slot).
    pub piece_size: f32,
    /// Source pixels per content tile.
    pub tile_px: u32,
    pub knob_radius_ratio: f32,
    pub board_origin: Vec2,
    pub scramble_origin: Vec2,
    /// Multiplier on the sprite footprint between scramble grid cells.
    pub scramble_distance: f32,
    /// Radius of the random offset added to each scramble position.
    pub scramble_distortion: f32,
    pub snap_threshold: f32,
    /// World units per second while a rejected piece slides back.
    pub return_speed: f32,
    pub slot_epsilon: f32,
    pub seed: Option<u64>,
    pub image: ImageSourceKind,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            piece_size: DEFAULT_PIECE_SIZE,
            tile_px: DEFAULT_TILE_PX,
            knob_radius_ratio: DEFAULT_KNOB_RADIUS_RATIO,
            board_origin: Vec2::new(-7.0, 2.25),
            scramble_origin: Vec2::new(4.0, 0.0),
            scramble_distance: DEFAULT_SCRAMBLE_DISTANCE,
            scramble_distortion: DEFAULT_SCRAMBLE_DISTORTION,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            return_speed: DEFAULT_RETURN_SPEED,
            slot_epsilon: DEFAULT_SLOT_EPSILON,
            seed: None,
            image: ImageSourceKind::default(),
        }
    }
}

impl PuzzleConfig {
    pub fn with_grid(mut self, rows: u32, cols: u32) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects configurations generation cannot honour. Nothing is clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.tile_px == 0 {
            return Err(ConfigError::InvalidTileSize);
        }
        if !(self.piece_size.is_finite() && self.piece_size > 0.0) {
            return Err(ConfigError::InvalidPieceSize(self.piece_size));
        }
        if !(self.knob_radius_ratio.is_finite() && self.knob_radius_ratio >= 0.0) {
            return Err(ConfigError::InvalidKnobRatio(self.knob_radius_ratio));
        }
        let fits = |side: Option<u32>| side.is_some_and(|px| px <= MAX_TEXTURE_PX);
        let width = self.cols.checked_mul(self.tile_px);
        let height = self.rows.checked_mul(self.tile_px);
        if !(fits(width) && fits(height) && fits(self.checked_sprite_px())) {
            return Err(ConfigError::TextureTooLarge {
                limit: MAX_TEXTURE_PX,
            });
        }
        let spacing_ok = self.scramble_distance.is_finite() && self.scramble_distance > 0.0;
        let distortion_ok =
            self.scramble_distortion.is_finite() && self.scramble_distortion >= 0.0;
        if !spacing_ok || !distortion_ok {
            return Err(ConfigError::InvalidScrambleSpacing {
                distance: self.scramble_distance,
                distortion: self.scramble_distortion,
            });
        }
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.snap_threshold) {
            return Err(ConfigError::InvalidInteraction("snap_threshold"));
        }
        if !positive(self.return_speed) {
            return Err(ConfigError::InvalidInteraction("return_speed"));
        }
        if !positive(self.slot_epsilon) {
            return Err(ConfigError::InvalidInteraction("slot_epsilon"));
        }
        // Neighbouring slots are `piece_size` apart; a wider epsilon lets a placed piece block them.
        if self.slot_epsilon >= self.piece_size {
            return Err(ConfigError::SlotEpsilonTooLarge {
                slot_epsilon: self.slot_epsilon,
                piece_size: self.piece_size,
            });
        }
        Ok(())
    }

    pub fn piece_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Pixel size of the whole source image: `cols*tile_px` × `rows*tile_px`.
    pub fn source_size(&self) -> (u32, u32) {
        (
            self.cols.saturating_mul(self.tile_px),
            self.rows.saturating_mul(self.tile_px),
        )
    }

    /// Board slot of the piece at (`row`, `col`), row-major from `board_origin`.
    pub fn target_for(&self, row: u32, col: u32) -> Vec2 {
        self.board_origin + Vec2::new(col as f32 * self.piece_size, -(row as f32) * self.piece_size)
    }

    pub fn knob_radius_px(&self) -> u32 {
        (self.tile_px as f32 * self.knob_radius_ratio).floor() as u32
    }

    /// Side of a rasterized piece in pixels, or `None` if it does not fit in a `u32`.
    pub fn checked_sprite_px(&self) -> Option<u32> {
        self.knob_radius_px()
            .checked_mul(2)
            .and_then(|margin| margin.checked_add(self.tile_px))
    }

    /// World-space side length of a rasterized piece, margins included.
    pub fn sprite_extent(&self) -> f32 {
        let sprite_px = self.checked_sprite_px().unwrap_or(u32::MAX);
        self.piece_size * sprite_px as f32 / self.tile_px.max(1) as f32
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub mute_all: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            mute_all: false,
        }
    }
}

impl AudioSettings {
    pub fn clamp(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    pub fn effective_sfx_gain(self) -> f32 {
        if self.mute_all {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VideoSettings {
    pub vsync: bool,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            vsync: true,
            window_width: 1280,
            window_height: 720,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JigsawSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub puzzle: PuzzleConfig,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub video: VideoSettings,
}

impl Default for JigsawSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            puzzle: PuzzleConfig::default(),
            audio: AudioSettings::default(),
            video: VideoSettings::default(),
        }
    }
}

impl JigsawSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.audio = self.audio.clamp();
        self.video.window_width = self.video.window_width.max(320);
        self.video.window_height = self.video.window_height.max(240);
        self
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("JIGSAW_SETTINGS_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("jigsaw");
        path.push("settings.json");
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Missing files give defaults silently; unreadable or malformed ones warn and give defaults.
    pub fn load(&self) -> JigsawSettings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return JigsawSettings::default();
            }
            Err(err) => {
                tracing::warn!("settings read failed, using defaults: {err}");
                return JigsawSettings::default();
            }
        };
        match serde_json::from_slice::<JigsawSettings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "settings invalid, using defaults: {err}");
                JigsawSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &JigsawSettings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}
