//! Small frame-driven 2D engine: RGBA images, a CPU renderer, a `pixels`/`winit` window loop,
//! synthesized sound clips and digest helpers for determinism checks.

pub mod app;
pub mod audio;
pub mod graphics;
pub mod image;
pub mod pixels_renderer;
pub mod regression;
pub mod surface;
pub mod ui;
