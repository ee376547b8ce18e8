//! # Tilemaze Entry Point
//!
//! Generates one level and hands it to a TMX or JSON sink.

use clap::{Parser, ValueEnum};
use log::{error, info};
use std::path::PathBuf;
use tilemaze::{
    generation::utils::create_rng, GenerationConfig, JsonSink, LevelGenerator, LevelSink,
    PieceLibrary, TileSet, TilemazeResult, TmxOptions, TmxSink,
};

/// Output formats for the generated level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Tiled TMX map
    Tmx,
    /// Encoded layers as JSON
    Json,
}

/// Command line arguments for the level generator.
#[derive(Parser, Debug)]
#[command(name = "tilemaze")]
#[command(about = "Procedural tile maze level generator")]
#[command(version)]
struct Args {
    /// Random seed for generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Generation config JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Piece catalog JSON file (built-in pieces when omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Tile set JSON file (built-in tile IDs when omitted)
    #[arg(long)]
    tileset: Option<PathBuf>,

    /// Output file
    #[arg(short, long, default_value = "level.tmx")]
    output: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Tmx)]
    format: Format,

    /// Widening coarseness; 1 or less disables widening
    #[arg(long)]
    roughness: Option<u32>,

    /// Skip the widening pass
    #[arg(long)]
    no_widening: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting tilemaze v{}", tilemaze::VERSION);

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// Initializes the logging backend at the requested level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let level = match log_level.to_lowercase().as_str() {
            "error" => tracing::Level::ERROR,
            "warn" => tracing::Level::WARN,
            "info" => tracing::Level::INFO,
            "debug" => tracing::Level::DEBUG,
            "trace" => tracing::Level::TRACE,
            _ => tracing::Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .init();
    }
}

/// Builds the config from the file and flags, generates and writes a level.
fn run(args: &Args) -> TilemazeResult<()> {
    let mut config = match &args.config {
        Some(path) => GenerationConfig::load(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(roughness) = args.roughness {
        config.roughness = roughness;
    }
    if args.no_widening {
        config.widening = false;
    }
    config.validate()?;

    let library = match &args.catalog {
        Some(path) => PieceLibrary::load(path)?,
        None => PieceLibrary::builtin(),
    };
    let tiles = match &args.tileset {
        Some(path) => TileSet::load(path)?,
        None => TileSet::default(),
    };

    info!("Generating level with seed {}", config.seed);
    let mut rng = create_rng(&config);
    let level = LevelGenerator::new(library, tiles).generate_level(&config, &mut rng)?;
    let encoded = level.layers.encode()?;

    let mut sink: Box<dyn LevelSink> = match args.format {
        Format::Tmx => Box::new(TmxSink::new(&args.output, TmxOptions::default())),
        Format::Json => Box::new(JsonSink::new(&args.output)),
    };
    info!("Writing level through {}", sink.sink_type());
    sink.accept(&encoded)?;

    Ok(())
}
