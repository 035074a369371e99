// main.rs - Game of Life with an incremental engine and fixed-timestep updates
//
// Opens the settings dialog, then the board. `--headless` runs the same loop
// without a window and prints the final generation and population.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use conway_engine::patterns;
use conway_engine::scheduler::DEFAULT_UPS;
use eframe::egui;
use log::info;

mod headless;
mod render;
mod settings;
mod store;
mod ui;

use settings::Settings;
use store::JsonFileStore;

#[derive(Debug, Parser)]
#[command(name = "conway", version, about = "Conway's Game of Life")]
struct Cli {
    /// Board width in cells
    #[arg(long, default_value_t = settings::DEFAULT_WIDTH)]
    width: u32,

    /// Board height in cells
    #[arg(long, default_value_t = settings::DEFAULT_HEIGHT)]
    height: u32,

    /// Pixels per cell
    #[arg(long, default_value_t = settings::DEFAULT_TILE_SIZE)]
    tile_size: u32,

    /// Pixels of gridline between cells
    #[arg(long, default_value_t = settings::DEFAULT_GRID_WIDTH)]
    grid_width: u32,

    /// Start the board straight away with the sizes given here
    #[arg(long)]
    skip_settings: bool,

    /// Shape catalog file
    #[arg(long, default_value = store::DEFAULT_PATH)]
    shapes: PathBuf,

    /// Generations per second
    #[arg(long, default_value_t = DEFAULT_UPS)]
    ups: u32,

    /// Run as many generations as each frame allows
    #[arg(long)]
    fast: bool,

    /// Seed an empty catalog with the built-in patterns
    #[arg(long)]
    builtin_shapes: bool,

    /// Run without a window
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode
    #[arg(long, default_value_t = 300, requires = "headless")]
    frames: u32,

    /// Built-in pattern to start from in headless mode
    #[arg(long, requires = "headless")]
    pattern: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let settings = Settings {
        width: cli.width,
        height: cli.height,
        tile_size: cli.tile_size,
        grid_width: cli.grid_width,
    };

    let store = JsonFileStore::new(&cli.shapes);
    let mut shapes = store::load_or_empty(&store, store.path());
    if shapes.is_empty() && cli.builtin_shapes {
        shapes = patterns::builtin_shapes();
        info!("seeded catalog with {} built-in patterns", shapes.len());
    }

    if cli.headless {
        let settings = settings.validate()?;
        return headless::run(
            settings,
            shapes,
            headless::Options {
                ups: cli.ups,
                fast: cli.fast,
                frames: cli.frames,
                pattern: cli.pattern.as_deref(),
            },
        );
    }

    let window = render::canvas_size(&settings) + egui::vec2(40.0, 80.0);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(window.clamp(egui::vec2(360.0, 200.0), egui::vec2(1600.0, 1000.0))),
        ..Default::default()
    };

    let launch = ui::Launch {
        settings,
        skip_settings: cli.skip_settings,
        shapes,
        ups: cli.ups,
        fast: cli.fast,
    };
    let app = ui::LifeApp::new(launch, store);
    eframe::run_native("Game of Life", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|e| anyhow!("window failed: {e}"))
}
