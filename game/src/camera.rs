use engine::surface::SurfaceSize;
use glam::Vec2;

/// Orthographic world (y-up) to screen (y-down, pixels) mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center: Vec2,
    pub pixels_per_unit: f32,
    pub viewport: SurfaceSize,
}

impl Camera {
    pub const FIT_MARGIN_PX: f32 = 24.0;

    /// Largest zoom that shows the whole `min`..`max` rectangle with a small margin.
    pub fn fit(min: Vec2, max: Vec2, viewport: SurfaceSize) -> Self {
        let extent = (max - min).max(Vec2::splat(1e-3));
        let usable = Vec2::new(
            (viewport.width as f32 - 2.0 * Self::FIT_MARGIN_PX).max(1.0),
            (viewport.height as f32 - 2.0 * Self::FIT_MARGIN_PX).max(1.0),
        );
        let scale = (usable / extent).min_element();
        Self {
            center: (min + max) / 2.0,
            pixels_per_unit: scale,
            viewport,
        }
    }

    fn screen_center(&self) -> Vec2 {
        Vec2::new(self.viewport.width as f32, self.viewport.height as f32) / 2.0
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let d = (world - self.center) * self.pixels_per_unit;
        self.screen_center() + Vec2::new(d.x, -d.y)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let d = screen - self.screen_center();
        self.center + Vec2::new(d.x, -d.y) / self.pixels_per_unit
    }

    /// On-screen length of `world_len` world units.
    pub fn scale_len(&self, world_len: f32) -> f32 {
        world_len * self.pixels_per_unit
    }
}
