use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::PuzzleConfig;

/// Where pieces wait before they are dragged onto the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrambleLayout {
    pub origin: Vec2,
    /// World size of one piece including its knob margin.
    pub footprint: f32,
    pub distance: f32,
    pub distortion: f32,
}

impl ScrambleLayout {
    pub fn from_config(config: &PuzzleConfig) -> Self {
        Self {
            origin: config.scramble_origin,
            footprint: config.sprite_extent(),
            distance: config.scramble_distance,
            distortion: config.scramble_distortion,
        }
    }

    /// (rows, cols) of the near-square grid that holds `count` pieces.
    pub fn grid_dims(count: usize) -> (usize, usize) {
        if count == 0 {
            return (0, 0);
        }
        let cols = (count as f64).sqrt().ceil() as usize;
        let rows = count.div_ceil(cols);
        (rows, cols)
    }

    /// `count` distinct cell centres, row-major, centred on `origin`.
    pub fn grid_positions(&self, count: usize) -> Vec<Vec2> {
        let (rows, cols) = Self::grid_dims(count);
        let spacing = self.footprint * self.distance;
        let half_w = (cols as f32 - 1.0) / 2.0;
        let half_h = (rows as f32 - 1.0) / 2.0;
        (0..count)
            .map(|i| {
                let r = (i / cols) as f32;
                let c = (i % cols) as f32;
                self.origin + Vec2::new((c - half_w) * spacing, -(r - half_h) * spacing)
            })
            .collect()
    }

    /// Scramble positions indexed by piece id: grid cells in random order plus a jitter of at
    /// most `distortion`.
    pub fn assign<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Vec2> {
        let mut positions = self.grid_positions(count);
        positions.shuffle(rng);
        for pos in &mut positions {
            *pos += random_in_disc(rng, self.distortion);
        }
        positions
    }
}

/// Uniform point in a disc of `radius` around the origin.
pub fn random_in_disc<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec2 {
    if radius <= 0.0 {
        return Vec2::ZERO;
    }
    let r = radius * rng.random::<f32>().sqrt();
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    Vec2::from_angle(angle) * r
}
