//! Puzzle orchestration: generation, piece ownership, placement bookkeeping and win detection.

use std::collections::BTreeSet;
use std::time::Duration;

use engine::image::RgbaImage;
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::PuzzleConfig;
use crate::edges::classify_piece;
use crate::error::ConfigError;
use crate::image_source::ImageSource;
use crate::joints::JointTopology;
use crate::piece::{DropOutcome, Piece, PieceId};
use crate::puzzle_timer::PuzzleTimer;
use crate::raster::{PieceSprite, RasterLayout, rasterize_piece, slice_tile};
use crate::scramble::ScrambleLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Active,
    Won,
}

/// Things the frontend reacts to (sounds, banners). Drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Generated { pieces: usize },
    PlacedCorrectly { piece: PieceId },
    PlacedIncorrectly { piece: PieceId },
    Won { elapsed: Duration },
}

/// Pointer state for one frame, already in world space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    pub world: Option<Vec2>,
    pub pressed: bool,
    pub released: bool,
}

pub struct PuzzleSession {
    image_source: Option<Box<dyn ImageSource>>,
    config: Option<PuzzleConfig>,
    status: SessionStatus,
    topology: Option<JointTopology>,
    source_image: Option<RgbaImage>,
    pieces: Vec<Piece>,
    targets: Vec<Vec2>,
    placed: BTreeSet<PieceId>,
    timer: PuzzleTimer,
    dragging: Option<PieceId>,
    events: Vec<SessionEvent>,
}

impl Default for PuzzleSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PuzzleSession {
    pub fn new() -> Self {
        Self {
            image_source: None,
            config: None,
            status: SessionStatus::Idle,
            topology: None,
            source_image: None,
            pieces: Vec::new(),
            targets: Vec::new(),
            placed: BTreeSet::new(),
            timer: PuzzleTimer::new(),
            dragging: None,
            events: Vec::new(),
        }
    }

    pub fn with_image_source(mut self, source: Box<dyn ImageSource>) -> Self {
        self.image_source = Some(source);
        self
    }

    pub fn set_image_source(&mut self, source: Box<dyn ImageSource>) {
        self.image_source = Some(source);
    }

    /// Builds a fresh puzzle and makes the session Active.
    ///
    /// Every check runs before the previous puzzle is torn down, so on error the old puzzle is
    /// left exactly as it was. Undrained events from the old puzzle are discarded.
    pub fn generate(&mut self, config: &PuzzleConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let source = self
            .image_source
            .as_mut()
            .ok_or(ConfigError::MissingImageSource)?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::random()),
        };
        let topology = JointTopology::generate(config.rows, config.cols, &mut rng);

        let (width, height) = config.source_size();
        let image_seed: u64 = rng.random();
        let image = source.image(width, height, image_seed);
        if (image.width(), image.height()) != (width, height) {
            return Err(ConfigError::ImageSizeMismatch {
                expected: (width, height),
                actual: (image.width(), image.height()),
            });
        }

        let layout = RasterLayout::new(config.tile_px, config.knob_radius_ratio);
        let scramble = ScrambleLayout::from_config(config).assign(config.piece_count(), &mut rng);

        self.clear();

        let mut pieces = Vec::with_capacity(config.piece_count());
        let mut targets = Vec::with_capacity(config.piece_count());
        for row in 0..config.rows {
            for col in 0..config.cols {
                let id = pieces.len();
                let edges = classify_piece(&topology, row, col);
                let tile = slice_tile(&image, row, col, config.tile_px);
                let buffer = rasterize_piece(&tile, edges, &layout);
                let sprite = PieceSprite::new(buffer, &layout, config.piece_size);
                let target = config.target_for(row, col);
                let home = scramble.get(id).copied().unwrap_or(config.scramble_origin);
                targets.push(target);
                pieces.push(Piece::new(id, (row, col), target, home, edges, sprite));
            }
        }

        tracing::info!(
            rows = config.rows,
            cols = config.cols,
            pieces = pieces.len(),
            seed = ?config.seed,
            "puzzle generated"
        );

        self.pieces = pieces;
        self.targets = targets;
        self.topology = Some(topology);
        self.source_image = Some(image);
        self.config = Some(config.clone());
        self.status = SessionStatus::Active;
        self.events.push(SessionEvent::Generated {
            pieces: self.pieces.len(),
        });

        if self.pieces.is_empty() {
            self.win();
        }
        Ok(())
    }

    /// Regenerates with the last successfully used config.
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        let config = self.config.clone().ok_or(ConfigError::NothingToRestart)?;
        self.generate(&config)
    }

    fn clear(&mut self) {
        self.pieces.clear();
        self.targets.clear();
        self.placed.clear();
        self.topology = None;
        self.source_image = None;
        self.dragging = None;
        self.events.clear();
        self.timer.reset();
        self.status = SessionStatus::Idle;
    }

    /// Records the outcome of a resolved drop. Returns true when `piece` was newly placed.
    ///
    /// Repeated correct reports for the same piece change nothing.
    pub fn report_placement(&mut self, piece: PieceId, correct: bool) -> bool {
        if piece >= self.pieces.len() {
            tracing::warn!(piece, "placement reported for unknown piece");
            return false;
        }
        if !correct {
            tracing::debug!(piece, "placement rejected");
            self.events.push(SessionEvent::PlacedIncorrectly { piece });
            return false;
        }
        if !self.placed.insert(piece) {
            return false;
        }
        tracing::debug!(
            piece,
            placed = self.placed.len(),
            total = self.pieces.len(),
            "piece placed"
        );
        self.events.push(SessionEvent::PlacedCorrectly { piece });
        if self.status == SessionStatus::Active && self.placed.len() == self.pieces.len() {
            self.win();
        }
        true
    }

    fn win(&mut self) {
        self.status = SessionStatus::Won;
        let elapsed = self.timer.elapsed();
        tracing::info!(elapsed = %self.timer.formatted(), "puzzle solved");
        self.events.push(SessionEvent::Won { elapsed });
    }

    /// True if a placed piece other than `piece` already sits within `slot_epsilon` of `position`.
    pub fn is_slot_taken(&self, piece: PieceId, position: Vec2) -> bool {
        let epsilon = self
            .config
            .as_ref()
            .map(|c| c.slot_epsilon)
            .unwrap_or(crate::config::DEFAULT_SLOT_EPSILON);
        self.placed
            .iter()
            .filter(|id| **id != piece)
            .filter_map(|id| self.pieces.get(*id))
            .any(|other| other.position().distance(position) < epsilon)
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Topmost piece that can be grabbed at `world`.
    pub fn piece_at(&self, world: Vec2) -> Option<PieceId> {
        self.pieces
            .iter()
            .filter(|p| !p.is_placed() && p.hit(world))
            .max_by_key(|p| (p.draw_order(), p.id()))
            .map(Piece::id)
    }

    /// Starts dragging the topmost piece under `world`.
    pub fn pick_up_at(&mut self, world: Vec2) -> Option<PieceId> {
        if !self.is_active() || self.dragging.is_some() {
            return None;
        }
        let id = self.piece_at(world)?;
        let active = self.is_active();
        let piece = self.pieces.get_mut(id)?;
        if !piece.pick_up(world, active) {
            return None;
        }
        self.dragging = Some(id);
        Some(id)
    }

    pub fn drag_to(&mut self, world: Vec2) {
        let active = self.is_active();
        if let Some(piece) = self.dragging.and_then(|id| self.pieces.get_mut(id)) {
            piece.drag_to(world, active);
        }
    }

    /// Releases the dragged piece, if any, and reports the result.
    pub fn drop_piece(&mut self) -> Option<DropOutcome> {
        let id = self.dragging.take()?;
        let (snap_threshold, return_speed) = self
            .config
            .as_ref()
            .map(|c| (c.snap_threshold, c.return_speed))?;
        let target = self.pieces.get(id)?.target();
        let slot_taken = self.is_slot_taken(id, target);
        let already_placed = self.placed.contains(&id);

        let outcome = self
            .pieces
            .get_mut(id)?
            .release(slot_taken, already_placed, snap_threshold, return_speed)?;
        match outcome {
            DropOutcome::Placed => {
                self.report_placement(id, true);
            }
            DropOutcome::Resnapped => {}
            DropOutcome::Returned(reason) => {
                tracing::debug!(piece = id, ?reason, "returning piece to scramble area");
                self.report_placement(id, false);
            }
        }
        Some(outcome)
    }

    /// One frame of pointer input: press grabs, movement drags, release drops.
    pub fn handle_pointer(&mut self, input: PointerInput) {
        if let Some(world) = input.world {
            if input.pressed {
                self.pick_up_at(world);
            }
            self.drag_to(world);
        }
        if input.released {
            self.drop_piece();
        }
    }

    /// Advances the timer while Active and steps return animations regardless of status.
    pub fn tick(&mut self, dt: Duration) {
        self.timer.tick_if_running(dt, self.is_active());
        let secs = dt.as_secs_f32();
        for piece in &mut self.pieces {
            piece.tick(secs);
        }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id)
    }

    pub fn dragging(&self) -> Option<PieceId> {
        self.dragging
    }

    pub fn placed_count(&self) -> usize {
        self.placed.len()
    }

    pub fn is_placed(&self, id: PieceId) -> bool {
        self.placed.contains(&id)
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    pub fn timer(&self) -> &PuzzleTimer {
        &self.timer
    }

    pub fn config(&self) -> Option<&PuzzleConfig> {
        self.config.as_ref()
    }

    pub fn topology(&self) -> Option<&JointTopology> {
        self.topology.as_ref()
    }

    pub fn source_image(&self) -> Option<&RgbaImage> {
        self.source_image.as_ref()
    }

    /// Board slots indexed by piece id.
    pub fn target_slots(&self) -> &[Vec2] {
        &self.targets
    }

    /// Smallest world rectangle (min, max) holding every slot and scramble home, grown by half a
    /// sprite. Dragging does not change it.
    pub fn world_bounds(&self) -> Option<(Vec2, Vec2)> {
        let half = self.config.as_ref()?.sprite_extent() / 2.0;
        let points = self
            .targets
            .iter()
            .copied()
            .chain(self.pieces.iter().map(Piece::scramble_position));
        let mut bounds: Option<(Vec2, Vec2)> = None;
        for point in points {
            bounds = Some(match bounds {
                None => (point, point),
                Some((min, max)) => (min.min(point), max.max(point)),
            });
        }
        bounds.map(|(min, max)| (min - Vec2::splat(half), max + Vec2::splat(half)))
    }
}
