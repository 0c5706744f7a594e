//! Piece texture generation.
//!
//! Every piece buffer is `tile + 2*radius` pixels square: the content tile sits in the middle
//! and the `radius`-wide margin is where knobs grow. Indents are carved out of the tile itself.
//! Buffers are y-down like the source image, and everything is a pure function of its inputs.

use engine::graphics::Color;
use engine::image::{RgbaImage, TRANSPARENT};
use glam::Vec2;

use crate::edges::{EdgeDir, PieceEdgeType, PieceEdges};

/// Pixel geometry shared by every piece of one puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterLayout {
    pub tile_px: u32,
    pub knob_radius_px: u32,
}

impl RasterLayout {
    pub fn new(tile_px: u32, knob_radius_ratio: f32) -> Self {
        let knob_radius_px = (tile_px as f32 * knob_radius_ratio.max(0.0)).floor() as u32;
        Self {
            tile_px,
            knob_radius_px,
        }
    }

    pub fn sprite_px(&self) -> u32 {
        self.tile_px.saturating_add(self.knob_radius_px.saturating_mul(2))
    }

    /// Offset of the content tile inside the sprite, on both axes.
    pub fn content_offset(&self) -> u32 {
        self.knob_radius_px
    }
}

/// A rasterized piece and how to place it in the world.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceSprite {
    pub image: RgbaImage,
    /// Normalised anchor inside `image`; the piece position maps to this point.
    pub pivot: Vec2,
    /// Image pixels per world unit.
    pub pixels_per_unit: f32,
}

impl PieceSprite {
    pub fn new(image: RgbaImage, layout: &RasterLayout, piece_size: f32) -> Self {
        Self {
            image,
            pivot: Vec2::splat(0.5),
            pixels_per_unit: layout.tile_px as f32 / piece_size,
        }
    }

    /// World-space size of the whole image.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.image.width() as f32, self.image.height() as f32) / self.pixels_per_unit
    }

    /// Image pixel under world offset `local` from the pivot (world y-up, image y-down).
    pub fn pixel_at(&self, local: Vec2) -> Option<(u32, u32)> {
        let w = self.image.width() as f32;
        let h = self.image.height() as f32;
        let px = self.pivot.x * w + local.x * self.pixels_per_unit;
        let py = self.pivot.y * h - local.y * self.pixels_per_unit;
        if px < 0.0 || py < 0.0 || px >= w || py >= h {
            return None;
        }
        Some((px as u32, py as u32))
    }

    /// True when the sprite is opaque at world offset `local` from its pivot.
    pub fn hit(&self, local: Vec2) -> bool {
        self.pixel_at(local)
            .is_some_and(|(x, y)| self.image.alpha_at(x, y) > 0)
    }
}

/// The content tile of piece (`row`, `col`) cut from the source image.
pub fn slice_tile(source: &RgbaImage, row: u32, col: u32, tile_px: u32) -> RgbaImage {
    source.sub_image(col * tile_px, row * tile_px, tile_px, tile_px)
}

/// Builds the full piece buffer for `tile` with the given edges.
pub fn rasterize_piece(tile: &RgbaImage, edges: PieceEdges, layout: &RasterLayout) -> RgbaImage {
    let side = layout.sprite_px();
    let mut buf = RgbaImage::new(side, side);
    buf.copy_from(tile, layout.content_offset(), layout.content_offset());

    for (dir, kind) in edges.iter() {
        match kind {
            PieceEdgeType::Flat => {}
            PieceEdgeType::Knob => {
                let color = knob_sample(tile, dir);
                stamp_half_disc(&mut buf, layout, dir, Side::Outside, color);
            }
            PieceEdgeType::Indent => {
                stamp_half_disc(&mut buf, layout, dir, Side::Inside, TRANSPARENT);
            }
        }
    }
    buf
}

/// Colour a knob on `dir` is painted with: the content pixel at the middle of that edge.
pub fn knob_sample(tile: &RgbaImage, dir: EdgeDir) -> Color {
    let w = tile.width();
    let h = tile.height();
    if w == 0 || h == 0 {
        return [0, 0, 0, 255];
    }
    let (x, y) = match dir {
        EdgeDir::Top => (w / 2, 0),
        EdgeDir::Right => (w - 1, h / 2),
        EdgeDir::Bottom => (w / 2, h - 1),
        EdgeDir::Left => (0, h / 2),
    };
    tile.get(x, y).unwrap_or([0, 0, 0, 255])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// Margin pixels just beyond the content edge.
    Outside,
    /// Content pixels just within the content edge.
    Inside,
}

/// Paints a half disc of radius `knob_radius_px` centred on the middle of the `dir` edge.
///
/// `lateral` runs along the edge, `depth` away from it (0 is the row or column touching the
/// edge). Depth stops one short of the radius on both sides, so a knob covers exactly the
/// pixels its neighbour's indent removes. Writes outside the buffer are clipped, so radii
/// larger than half a tile are fine.
fn stamp_half_disc(buf: &mut RgbaImage, layout: &RasterLayout, dir: EdgeDir, side: Side, color: Color) {
    let r = layout.knob_radius_px as i64;
    if r == 0 {
        return;
    }
    let m = layout.content_offset() as i64;
    let s = layout.tile_px as i64;
    let mid = m + s / 2;
    // First pixel row/column outside (or inside) the content along the edge normal, and the
    // direction of increasing depth.
    let (base, step) = match (dir, side) {
        (EdgeDir::Top, Side::Outside) | (EdgeDir::Left, Side::Outside) => (m - 1, -1),
        (EdgeDir::Top, Side::Inside) | (EdgeDir::Left, Side::Inside) => (m, 1),
        (EdgeDir::Bottom, Side::Outside) | (EdgeDir::Right, Side::Outside) => (m + s, 1),
        (EdgeDir::Bottom, Side::Inside) | (EdgeDir::Right, Side::Inside) => (m + s - 1, -1),
    };
    let r2 = r * r;

    for depth in 0..r {
        let normal = base + step * depth;
        for lateral in -r..=r {
            if lateral * lateral + depth * depth > r2 {
                continue;
            }
            let along = mid + lateral;
            let (x, y) = match dir {
                EdgeDir::Top | EdgeDir::Bottom => (along, normal),
                EdgeDir::Left | EdgeDir::Right => (normal, along),
            };
            buf.put_clipped(x, y, color);
        }
    }
}
