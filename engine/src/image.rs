//! Owned RGBA8 image buffers.
//!
//! Row-major, y-down (row 0 is the top row), four bytes per pixel. This is the pixel format the
//! CPU renderer and the `pixels` frame buffer already use, so images can be blitted without any
//! conversion.

use crate::graphics::Color;

pub const TRANSPARENT: Color = [0, 0, 0, 0];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; rgba_len(width, height)],
        }
    }

    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Color,
    {
        let mut pixels = Vec::with_capacity(rgba_len(width, height));
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wraps an existing RGBA byte buffer. Returns `None` if the length does not match.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != rgba_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        let idx = self.index(x, y)?;
        let px = &self.pixels[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Writes a pixel; out-of-bounds writes are dropped.
    pub fn put(&mut self, x: u32, y: u32, color: Color) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        self.pixels[idx..idx + 4].copy_from_slice(&color);
        true
    }

    /// Signed-coordinate variant of [`RgbaImage::put`] for stamping shapes that may hang off
    /// the edges.
    pub fn put_clipped(&mut self, x: i64, y: i64, color: Color) -> bool {
        if x < 0 || y < 0 || x > u32::MAX as i64 || y > u32::MAX as i64 {
            return false;
        }
        self.put(x as u32, y as u32, color)
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.get(x, y).map(|c| c[3]).unwrap_or(0)
    }

    pub fn fill(&mut self, color: Color) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Copies a `width`×`height` window starting at (`x`, `y`). Parts of the window outside
    /// this image come back transparent.
    pub fn sub_image(&self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let mut out = Self::new(width, height);
        for dy in 0..height {
            for dx in 0..width {
                let (Some(sx), Some(sy)) = (x.checked_add(dx), y.checked_add(dy)) else {
                    continue;
                };
                if let Some(color) = self.get(sx, sy) {
                    out.put(dx, dy, color);
                }
            }
        }
        out
    }

    /// Opaque copy of `src` with its top-left corner at (`dst_x`, `dst_y`), clipped to bounds.
    pub fn copy_from(&mut self, src: &RgbaImage, dst_x: u32, dst_y: u32) {
        let max_x = dst_x.saturating_add(src.width).min(self.width);
        let max_y = dst_y.saturating_add(src.height).min(self.height);
        if dst_x >= max_x || dst_y >= max_y {
            return;
        }
        let row_bytes = (max_x - dst_x) as usize * 4;
        for y in dst_y..max_y {
            let src_start = (y - dst_y) as usize * src.width as usize * 4;
            let dst_start = (y as usize * self.width as usize + dst_x as usize) * 4;
            self.pixels[dst_start..dst_start + row_bytes]
                .copy_from_slice(&src.pixels[src_start..src_start + row_bytes]);
        }
    }

    pub fn count_opaque(&self) -> usize {
        self.pixels.chunks_exact(4).filter(|px| px[3] != 0).count()
    }
}

fn rgba_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

/// Linear blend of two colors, `t` in 0..=1.
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let v = a[i] as f32 + (b[i] as f32 - a[i] as f32) * t;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}
