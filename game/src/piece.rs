//! One puzzle piece and its drag/drop state machine.
//!
//! A piece never looks at other pieces. Whatever it needs to know about the rest of the puzzle
//! (is the session running, is my slot already occupied, was I placed before) is passed in by
//! `PuzzleSession` at the call site.

use glam::Vec2;

use crate::edges::PieceEdges;
use crate::raster::PieceSprite;

pub type PieceId = usize;

/// Draw order while a piece follows the pointer.
pub const DRAG_DRAW_ORDER: i32 = 10;
/// Draw order of every piece that is not being dragged.
pub const REST_DRAW_ORDER: i32 = 1;

/// Return animations shorter than this complete on the spot.
const MIN_RETURN_SECS: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PiecePhase {
    Idle,
    /// `offset` is piece position minus pointer position at pick-up.
    Dragging { offset: Vec2 },
    Placed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    TooFar,
    SlotTaken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// First correct drop; the session should record it.
    Placed,
    /// Dropped back onto its own slot after being placed before. Nothing to report.
    Resnapped,
    Returned(RejectReason),
}

/// Decides what a drop at `distance` from the target means.
pub fn resolve_drop(
    distance: f32,
    snap_threshold: f32,
    slot_taken: bool,
    already_placed: bool,
) -> DropOutcome {
    if distance >= snap_threshold {
        return DropOutcome::Returned(RejectReason::TooFar);
    }
    if already_placed {
        DropOutcome::Resnapped
    } else if slot_taken {
        DropOutcome::Returned(RejectReason::SlotTaken)
    } else {
        DropOutcome::Placed
    }
}

/// Constant-speed slide back to the scramble position, advanced by `tick`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnAnimation {
    start: Vec2,
    end: Vec2,
    elapsed: f32,
    duration: f32,
}

impl ReturnAnimation {
    /// `None` when the distance is too small to animate.
    pub fn new(start: Vec2, end: Vec2, speed: f32) -> Option<Self> {
        let distance = start.distance(end);
        if !(speed > 0.0) {
            return None;
        }
        let duration = distance / speed;
        if !(duration > MIN_RETURN_SECS) {
            return None;
        }
        Some(Self {
            start,
            end,
            elapsed: 0.0,
            duration,
        })
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    pub fn position(&self) -> Vec2 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.start.lerp(self.end, t)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advances by `dt` seconds and returns the new position.
    pub fn step(&mut self, dt: f32) -> Vec2 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.position()
    }
}

#[derive(Debug, Clone)]
pub struct Piece {
    id: PieceId,
    row: u32,
    col: u32,
    target: Vec2,
    scramble: Vec2,
    position: Vec2,
    edges: PieceEdges,
    sprite: PieceSprite,
    phase: PiecePhase,
    draw_order: i32,
    returning: Option<ReturnAnimation>,
}

impl Piece {
    pub fn new(
        id: PieceId,
        (row, col): (u32, u32),
        target: Vec2,
        scramble: Vec2,
        edges: PieceEdges,
        sprite: PieceSprite,
    ) -> Self {
        Self {
            id,
            row,
            col,
            target,
            scramble,
            position: scramble,
            edges,
            sprite,
            phase: PiecePhase::Idle,
            draw_order: REST_DRAW_ORDER,
            returning: None,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn grid_pos(&self) -> (u32, u32) {
        (self.row, self.col)
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn scramble_position(&self) -> Vec2 {
        self.scramble
    }

    /// Moves the piece's home in the scramble area. Does not move an idle piece by itself.
    pub fn set_scramble_position(&mut self, scramble: Vec2) {
        self.scramble = scramble;
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn edges(&self) -> PieceEdges {
        self.edges
    }

    pub fn sprite(&self) -> &PieceSprite {
        &self.sprite
    }

    pub fn phase(&self) -> PiecePhase {
        self.phase
    }

    pub fn draw_order(&self) -> i32 {
        self.draw_order
    }

    pub fn is_placed(&self) -> bool {
        self.phase == PiecePhase::Placed
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, PiecePhase::Dragging { .. })
    }

    pub fn is_returning(&self) -> bool {
        self.returning.is_some()
    }

    pub fn return_animation(&self) -> Option<&ReturnAnimation> {
        self.returning.as_ref()
    }

    /// True when the sprite is opaque at `world`.
    pub fn hit(&self, world: Vec2) -> bool {
        self.sprite.hit(world - self.position)
    }

    /// Starts a drag. Refused while the session is inactive and once the piece is placed.
    /// Grabbing a piece mid-return stops the animation where it is.
    pub fn pick_up(&mut self, pointer: Vec2, session_active: bool) -> bool {
        if !session_active || self.phase != PiecePhase::Idle {
            return false;
        }
        self.returning = None;
        self.phase = PiecePhase::Dragging {
            offset: self.position - pointer,
        };
        self.draw_order = DRAG_DRAW_ORDER;
        true
    }

    pub fn drag_to(&mut self, pointer: Vec2, session_active: bool) {
        if !session_active {
            return;
        }
        if let PiecePhase::Dragging { offset } = self.phase {
            self.position = pointer + offset;
        }
    }

    /// Resolves the drop of a dragged piece. Returns `None` if the piece was not being dragged.
    ///
    /// A release always completes, even if the session stopped accepting input mid-drag.
    pub fn release(
        &mut self,
        slot_taken: bool,
        already_placed: bool,
        snap_threshold: f32,
        return_speed: f32,
    ) -> Option<DropOutcome> {
        if !self.is_dragging() {
            return None;
        }
        self.draw_order = REST_DRAW_ORDER;
        let distance = self.position.distance(self.target);
        let outcome = resolve_drop(distance, snap_threshold, slot_taken, already_placed);
        match outcome {
            DropOutcome::Placed | DropOutcome::Resnapped => {
                self.position = self.target;
                self.phase = PiecePhase::Placed;
            }
            DropOutcome::Returned(_) => {
                self.phase = PiecePhase::Idle;
                self.start_return(return_speed);
            }
        }
        Some(outcome)
    }

    fn start_return(&mut self, speed: f32) {
        self.returning = ReturnAnimation::new(self.position, self.scramble, speed);
        if self.returning.is_none() {
            self.position = self.scramble;
        }
    }

    /// Steps the return animation by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let Some(anim) = self.returning.as_mut() else {
            return;
        };
        self.position = anim.step(dt);
        if anim.is_finished() {
            self.position = anim.end();
            self.returning = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{RasterLayout, rasterize_piece};
    use engine::image::RgbaImage;

    fn piece_at(target: Vec2, scramble: Vec2) -> Piece {
        let layout = RasterLayout::new(8, 0.25);
        let tile = RgbaImage::filled(8, 8, [200, 10, 10, 255]);
        let sprite = PieceSprite::new(rasterize_piece(&tile, PieceEdges::FLAT, &layout), &layout, 1.0);
        Piece::new(0, (0, 0), target, scramble, PieceEdges::FLAT, sprite)
    }

    #[test]
    fn drop_rules_prefer_distance_then_placement_then_contention() {
        assert_eq!(
            resolve_drop(0.0, 0.7, false, false),
            DropOutcome::Placed
        );
        assert_eq!(
            resolve_drop(0.69, 0.7, true, false),
            DropOutcome::Returned(RejectReason::SlotTaken)
        );
        assert_eq!(
            resolve_drop(0.2, 0.7, true, true),
            DropOutcome::Resnapped
        );
        assert_eq!(
            resolve_drop(0.7, 0.7, false, false),
            DropOutcome::Returned(RejectReason::TooFar)
        );
    }

    #[test]
    fn drag_keeps_grab_offset() {
        let mut piece = piece_at(Vec2::ZERO, Vec2::new(5.0, 5.0));
        assert!(piece.pick_up(Vec2::new(5.25, 4.75), true));
        assert_eq!(piece.draw_order(), DRAG_DRAW_ORDER);
        piece.drag_to(Vec2::new(1.25, -0.25), true);
        assert_eq!(piece.position(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn inactive_session_blocks_pick_up_and_move() {
        let mut piece = piece_at(Vec2::ZERO, Vec2::new(5.0, 5.0));
        assert!(!piece.pick_up(Vec2::new(5.0, 5.0), false));
        assert!(piece.pick_up(Vec2::new(5.0, 5.0), true));
        piece.drag_to(Vec2::new(9.0, 9.0), false);
        assert_eq!(piece.position(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn near_drop_snaps_exactly_to_target() {
        let mut piece = piece_at(Vec2::ZERO, Vec2::new(5.0, 5.0));
        piece.pick_up(Vec2::new(5.0, 5.0), true);
        piece.drag_to(Vec2::new(0.3, -0.2), true);
        assert_eq!(piece.release(false, false, 0.7, 10.0), Some(DropOutcome::Placed));
        assert_eq!(piece.position(), Vec2::ZERO);
        assert!(piece.is_placed());
        assert!(!piece.pick_up(Vec2::ZERO, true));
        assert_eq!(piece.release(false, false, 0.7, 10.0), None);
    }

    #[test]
    fn far_drop_slides_back_at_constant_speed() {
        let mut piece = piece_at(Vec2::ZERO, Vec2::new(5.0, 0.0));
        piece.pick_up(Vec2::new(5.0, 0.0), true);
        piece.drag_to(Vec2::new(15.0, 0.0), true);
        assert_eq!(
            piece.release(false, false, 0.7, 10.0),
            Some(DropOutcome::Returned(RejectReason::TooFar))
        );
        let anim = piece.return_animation().copied().expect("animation started");
        assert!((anim.duration() - 1.0).abs() < 1e-6);

        piece.tick(0.5);
        assert!((piece.position().x - 10.0).abs() < 1e-4);
        piece.tick(0.6);
        assert_eq!(piece.position(), Vec2::new(5.0, 0.0));
        assert!(!piece.is_returning());
    }

    #[test]
    fn zero_distance_return_completes_immediately() {
        let mut piece = piece_at(Vec2::new(-20.0, 0.0), Vec2::new(5.0, 0.0));
        piece.pick_up(Vec2::new(5.0, 0.0), true);
        assert_eq!(
            piece.release(false, false, 0.7, 10.0),
            Some(DropOutcome::Returned(RejectReason::TooFar))
        );
        assert!(!piece.is_returning());
        assert_eq!(piece.position(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn grabbing_mid_return_cancels_animation() {
        let mut piece = piece_at(Vec2::ZERO, Vec2::new(5.0, 0.0));
        piece.pick_up(Vec2::new(5.0, 0.0), true);
        piece.drag_to(Vec2::new(15.0, 0.0), true);
        piece.release(false, false, 0.7, 10.0);
        piece.tick(0.25);
        let mid = piece.position();
        assert!(piece.pick_up(mid, true));
        assert!(!piece.is_returning());
        piece.tick(1.0);
        assert_eq!(piece.position(), mid);
    }

    #[test]
    fn hit_test_follows_position() {
        let piece = piece_at(Vec2::ZERO, Vec2::new(5.0, 5.0));
        assert!(piece.hit(Vec2::new(5.1, 4.9)));
        assert!(!piece.hit(Vec2::ZERO));
    }
}
