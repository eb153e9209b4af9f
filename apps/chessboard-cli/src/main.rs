use anyhow::Context;
use chessboard_common::Viewport;
use chessboard_layout::{BoardLayout, BoardSpec, PieceShape, sample_placeholders};
use chessboard_render::{DebugTextRenderer, FrameDriver, FrameStatus, SceneConfig, assemble};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chessboard-cli", about = "CLI tool for the chessboard scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the generated tiles and piece placeholders
    Layout {
        /// Edge length of one tile in world units
        #[arg(long, default_value = "25")]
        tile_size: f32,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Assemble the scene and print its text rendering
    Describe {
        /// Scene config file (YAML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Viewport size as WIDTHxHEIGHT
        #[arg(long, default_value = "1280x720")]
        viewport: Viewport,
    },
    /// Drive a few headless frames through the text renderer
    Frames {
        /// Number of frames to draw
        #[arg(short, long, default_value = "3")]
        count: u32,
        /// Initial viewport size as WIDTHxHEIGHT
        #[arg(long, default_value = "1280x720")]
        viewport: Viewport,
        /// Resize to WIDTHxHEIGHT after the first frame
        #[arg(long)]
        resize: Option<Viewport>,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    match path {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => Ok(SceneConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("chessboard-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", chessboard_common::crate_info());
            println!("layout: {}", chessboard_layout::crate_info());
            println!("render: {}", chessboard_render::crate_info());
            println!("render-wgpu: {}", chessboard_render_wgpu::crate_info());
        }
        Commands::Layout { tile_size, json } => {
            let layout = BoardLayout::generate(&BoardSpec::with_tile_size(tile_size))?;
            let placeholders = sample_placeholders(&layout, &PieceShape::default())?;

            if json {
                let doc = serde_json::json!({
                    "spec": layout.spec(),
                    "offset": layout.half_extent_offset(),
                    "tiles": layout.tiles(),
                    "placeholders": placeholders,
                });
                println!("{}", serde_json::to_string_pretty(&doc)?);
                return Ok(());
            }

            println!(
                "Board: {} tiles, tile_size={}, offset={}",
                layout.len(),
                layout.spec().tile_size,
                layout.half_extent_offset()
            );
            for tile in layout.tiles() {
                let p = tile.position;
                println!(
                    "  {:<3} ({}, {}) {:?} at ({:.1}, {:.1}, {:.1})",
                    tile.square_name(),
                    tile.column,
                    tile.row,
                    tile.shade,
                    p.x,
                    p.y,
                    p.z
                );
            }
            println!("Pieces:");
            for piece in &placeholders {
                let p = piece.position;
                println!(
                    "  {:?} pawn on ({}, {}) at ({:.1}, {:.1}, {:.1})",
                    piece.side, piece.column, piece.row, p.x, p.y, p.z
                );
            }
        }
        Commands::Describe { config, viewport } => {
            let config = load_config(config.as_ref())?;
            let assembled = assemble(&config, viewport)?;
            let mut driver = FrameDriver::new(
                DebugTextRenderer::new(viewport),
                assembled.scene,
                assembled.camera,
                viewport,
            );
            driver.set_shadows_enabled(config.renderer.shadows);
            if let FrameStatus::Drawn(text) = driver.tick()? {
                print!("{text}");
            }
        }
        Commands::Frames {
            count,
            viewport,
            resize,
        } => {
            let assembled = assemble(&SceneConfig::default(), viewport)?;
            let mut driver = FrameDriver::new(
                DebugTextRenderer::new(viewport),
                assembled.scene,
                assembled.camera,
                viewport,
            );
            println!("State: {:?}", driver.state());
            for frame in 0..count {
                driver.tick()?;
                if frame == 0 {
                    if let Some(next) = resize {
                        if !driver.resize(next) {
                            println!("Ignored zero-area resize to {next}");
                        }
                    }
                }
            }
            let stats = driver.stats();
            println!("State: {:?}", driver.state());
            println!(
                "Frames: drawn={}, dropped={}, resizes={}",
                stats.drawn, stats.dropped, stats.resizes
            );
            println!(
                "Viewport: {} aspect={:.3}",
                driver.viewport(),
                driver.camera().aspect()
            );
        }
    }

    Ok(())
}
