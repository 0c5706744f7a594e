//! Source image providers.
//!
//! The session only sees the `ImageSource` trait; which provider fills the puzzle is a
//! configuration choice.

use engine::graphics::Color;
use engine::image::{RgbaImage, lerp_color};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub trait ImageSource {
    /// Returns a `width`×`height` RGBA image. Providers that use randomness derive it from
    /// `seed` only.
    fn image(&mut self, width: u32, height: u32, seed: u64) -> RgbaImage;
}

pub const RED: Color = [255, 0, 0, 255];
pub const BLUE: Color = [0, 0, 255, 255];
pub const GREEN: Color = [0, 255, 0, 255];
pub const YELLOW: Color = [255, 235, 4, 255];

/// Bilinear blend of four corner colours. `top_*` blend across the first row, `bottom_*`
/// across the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientImage {
    pub top_left: Color,
    pub top_right: Color,
    pub bottom_left: Color,
    pub bottom_right: Color,
}

impl Default for GradientImage {
    fn default() -> Self {
        Self {
            top_left: RED,
            top_right: BLUE,
            bottom_left: GREEN,
            bottom_right: YELLOW,
        }
    }
}

impl GradientImage {
    pub fn render(&self, width: u32, height: u32) -> RgbaImage {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        RgbaImage::from_fn(width, height, |x, y| {
            let u = x as f32 / w;
            let v = y as f32 / h;
            let top = lerp_color(self.top_left, self.top_right, u);
            let bottom = lerp_color(self.bottom_left, self.bottom_right, u);
            lerp_color(top, bottom, v)
        })
    }
}

impl ImageSource for GradientImage {
    fn image(&mut self, width: u32, height: u32, _seed: u64) -> RgbaImage {
        self.render(width, height)
    }
}

/// A `GradientImage` whose corner colours are drawn from the seed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGradientImage;

impl RandomGradientImage {
    pub fn corners_for_seed(seed: u64) -> GradientImage {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut color = || -> Color { [rng.random(), rng.random(), rng.random(), 255] };
        GradientImage {
            top_left: color(),
            top_right: color(),
            bottom_left: color(),
            bottom_right: color(),
        }
    }
}

impl ImageSource for RandomGradientImage {
    fn image(&mut self, width: u32, height: u32, seed: u64) -> RgbaImage {
        Self::corners_for_seed(seed).render(width, height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSourceKind {
    Gradient(GradientImage),
    RandomGradient,
}

impl Default for ImageSourceKind {
    fn default() -> Self {
        ImageSourceKind::RandomGradient
    }
}

impl ImageSourceKind {
    pub fn build(&self) -> Box<dyn ImageSource> {
        match self {
            ImageSourceKind::Gradient(gradient) => Box::new(*gradient),
            ImageSourceKind::RandomGradient => Box::new(RandomGradientImage),
        }
    }
}
