//! Generates a puzzle without a window and writes every texture to disk.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use engine::image::RgbaImage;
use engine::regression::image_sha256_hex;
use jigsaw::PuzzleSession;
use jigsaw::config::SettingsStore;

#[derive(Parser)]
#[command(name = "dump_pieces", about = "Write a generated puzzle's source image and pieces as PNG")]
struct Cli {
    #[arg(long, default_value_t = 4)]
    rows: u32,
    #[arg(long, default_value_t = 4)]
    cols: u32,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    tile_px: Option<u32>,
    #[arg(long)]
    knob_ratio: Option<f32>,
    /// Start from the saved settings instead of the built-in defaults.
    #[arg(long)]
    use_settings: bool,
    #[arg(long, default_value = "target/jigsaw_pieces")]
    out: PathBuf,
    /// Print hashes only.
    #[arg(long)]
    no_write: bool,
}

fn main() -> Result<()> {
    jigsaw::init_tracing();
    let cli = Cli::parse();

    let mut config = if cli.use_settings {
        SettingsStore::from_env().load().puzzle
    } else {
        jigsaw::PuzzleConfig::default()
    };
    config = config.with_grid(cli.rows, cli.cols);
    config.seed = cli.seed.or(config.seed);
    if let Some(tile_px) = cli.tile_px {
        config.tile_px = tile_px;
    }
    if let Some(ratio) = cli.knob_ratio {
        config.knob_radius_ratio = ratio;
    }

    let mut session = PuzzleSession::new().with_image_source(config.image.build());
    session.generate(&config).context("puzzle generation failed")?;

    if !cli.no_write {
        fs::create_dir_all(&cli.out)
            .with_context(|| format!("creating {}", cli.out.display()))?;
    }

    if let Some(source) = session.source_image() {
        println!("source {}", image_sha256_hex(source));
        if !cli.no_write {
            write_png(&cli.out.join("source.png"), source)?;
        }
    }
    for piece in session.pieces() {
        let (row, col) = piece.grid_pos();
        let image = &piece.sprite().image;
        println!(
            "piece {:>3} r{row} c{col} {:?} {}",
            piece.id(),
            piece.edges(),
            image_sha256_hex(image)
        );
        if !cli.no_write {
            write_png(&cli.out.join(format!("piece_{row}_{col}.png")), image)?;
        }
    }
    Ok(())
}

fn write_png(path: &Path, image: &RgbaImage) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let writer = BufWriter::new(file);
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = encoder
        .write_header()
        .with_context(|| format!("writing png header to {}", path.display()))?;
    png_writer
        .write_image_data(image.as_bytes())
        .with_context(|| format!("writing png data to {}", path.display()))?;
    Ok(())
}
