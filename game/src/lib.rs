pub mod app;
pub mod camera;
pub mod config;
pub mod edges;
pub mod error;
pub mod image_source;
pub mod input_adapter;
pub mod joints;
pub mod piece;
pub mod puzzle_timer;
pub mod raster;
pub mod render;
pub mod scramble;
pub mod session;
pub mod sfx;

pub use config::PuzzleConfig;
pub use error::ConfigError;
pub use session::{PointerInput, PuzzleSession, SessionEvent, SessionStatus};

/// Installs the stderr `tracing` subscriber used by the binaries. `RUST_LOG` overrides the
/// default `info` filter.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
