use engine::graphics::{Color, ImageDst, Renderer2d, text_size};
use engine::surface::SurfaceSize;
use engine::ui::{Anchor, Rect, Size};
use glam::Vec2;

use crate::camera::Camera;
use crate::puzzle_timer::win_banner;
use crate::session::{PuzzleSession, SessionStatus};

pub const BACKGROUND: Color = [28, 30, 38, 255];
pub const SLOT_OUTLINE: Color = [88, 94, 112, 255];
pub const TEXT: Color = [240, 240, 240, 255];
pub const TEXT_SHADOW: Color = [0, 0, 0, 255];
pub const BANNER_DIM: Color = [0, 0, 0, 255];

pub const TIMER_SCALE: u32 = 3;
pub const BANNER_SCALE: u32 = 6;
const TIMER_MARGIN: u32 = 16;

/// Pixels per world unit used before a puzzle exists.
const FALLBACK_PIXELS_PER_UNIT: f32 = 40.0;

/// Camera that keeps the board and the scramble area on screen.
pub fn camera_for_session(session: &PuzzleSession, viewport: SurfaceSize) -> Camera {
    match session.world_bounds() {
        Some((min, max)) => Camera::fit(min, max, viewport),
        None => Camera {
            center: Vec2::ZERO,
            pixels_per_unit: FALLBACK_PIXELS_PER_UNIT,
            viewport,
        },
    }
}

pub fn draw_session(gfx: &mut dyn Renderer2d, session: &PuzzleSession, camera: &Camera) {
    gfx.clear(BACKGROUND);
    draw_slots(gfx, session, camera);
    draw_pieces(gfx, session, camera);
    draw_text_with_shadow(
        gfx,
        TIMER_MARGIN,
        TIMER_MARGIN,
        &session.timer().formatted(),
        TIMER_SCALE,
    );
    if session.status() == SessionStatus::Won {
        draw_banner(gfx, &win_banner(session.elapsed()));
    }
}

fn draw_slots(gfx: &mut dyn Renderer2d, session: &PuzzleSession, camera: &Camera) {
    let Some(config) = session.config() else {
        return;
    };
    let side = camera.scale_len(config.piece_size).round().max(1.0) as u32;
    for target in session.target_slots() {
        let center = camera.world_to_screen(*target);
        let half = side as f32 / 2.0;
        let x = (center.x - half).round() as i32;
        let y = (center.y - half).round() as i32;
        if let Some(rect) = Rect::from_signed(x, y, side, side) {
            gfx.rect_outline(rect, SLOT_OUTLINE);
        }
    }
}

fn draw_pieces(gfx: &mut dyn Renderer2d, session: &PuzzleSession, camera: &Camera) {
    let mut order: Vec<_> = session.pieces().iter().collect();
    order.sort_by_key(|p| (p.draw_order(), p.id()));
    for piece in order {
        let sprite = piece.sprite();
        let size = sprite.world_size() * camera.pixels_per_unit;
        let center = camera.world_to_screen(piece.position());
        let top_left = center - size * sprite.pivot;
        let dst = ImageDst::new(
            top_left.x.round() as i32,
            top_left.y.round() as i32,
            size.x.round().max(1.0) as u32,
            size.y.round().max(1.0) as u32,
        );
        gfx.draw_image(dst, &sprite.image);
    }
}

fn draw_text_with_shadow(gfx: &mut dyn Renderer2d, x: u32, y: u32, text: &str, scale: u32) {
    gfx.draw_text_scaled(x + scale, y + scale, text, TEXT_SHADOW, scale);
    gfx.draw_text_scaled(x, y, text, TEXT, scale);
}

fn draw_banner(gfx: &mut dyn Renderer2d, text: &str) {
    let screen = gfx.size();
    let frame = Rect::from_size(screen.width, screen.height);
    let (w, h) = text_size(text, BANNER_SCALE);
    let text_rect = frame.place(Size::new(w, h), Anchor::Center);
    gfx.blend_rect(text_rect.expand(BANNER_SCALE * 3), BANNER_DIM, 160);
    draw_text_with_shadow(gfx, text_rect.x, text_rect.y, text, BANNER_SCALE);
}
