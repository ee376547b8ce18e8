//! # Tilemaze
//!
//! Procedural tile maze level generator.
//!
//! ## Architecture Overview
//!
//! A level is built in a straight pipeline:
//!
//! - **Generation**: a randomized depth-first carve over a grid of rooms,
//!   followed by healing and widening passes, with every room resolved to an
//!   authored piece matching its open doors
//! - **Composition**: pieces are stamped onto a wall layer, then shadows,
//!   pillar repairs and decorations are derived from it onto the background
//!   and prop layers
//! - **Codec**: each layer is packed as little-endian `u32` tiles, zlib
//!   compressed and base64 encoded, the format tile map editors embed
//! - **Level output**: the three encoded layers go to a sink, usually a TMX
//!   map file
//!
//! All randomness flows through one injectable [`RandomSource`], so a seeded
//! `StdRng` reproduces a level byte for byte.

pub mod codec;
pub mod compose;
pub mod generation;
pub mod level;
pub mod utils;

pub use codec::*;
pub use compose::*;
pub use generation::*;
pub use level::*;
pub use utils::*;

pub use codec::TileGrid;
pub use compose::{LayerCompositor, LayerSet, LevelGenerator, TileSet, WalkableMap};
pub use generation::{
    Direction, DoorState, GenerationConfig, Generator, MazeGenerator, MazeGrid, PieceLibrary,
    PieceRole, Room,
};
pub use level::{EncodedLayers, JsonSink, LevelSink, MemorySink, TmxOptions, TmxSink};
pub use utils::RandomSource;

/// Core error type for level generation.
#[derive(thiserror::Error, Debug)]
pub enum TilemazeError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A layer payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Configuration, catalog or tile set is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A room reached the compositor without a piece
    #[error("Room ({x}, {y}) has no resolved piece")]
    UnresolvedPiece { x: usize, y: usize },

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the crate.
pub type TilemazeResult<T> = Result<T, TilemazeError>;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generation constants.
pub mod config {
    /// Rooms per maze row
    pub const GRID_WIDTH: usize = 12;

    /// Rooms per maze column
    pub const GRID_HEIGHT: usize = 9;

    /// Tile map width
    pub const MAP_WIDTH: usize = 100;

    /// Tile map height
    pub const MAP_HEIGHT: usize = 100;

    /// Piece width in tiles, also the horizontal room stride
    pub const PIECE_WIDTH: usize = 8;

    /// Piece height in tiles, also the vertical room stride
    pub const PIECE_HEIGHT: usize = 11;

    /// Tile column of the first room
    pub const MARGIN_X: usize = 2;

    /// Tile row of the first room
    pub const MARGIN_Y: usize = 1;

    /// Maximum carve iterations
    pub const SAFETY_BOUND: usize = 5000;

    /// Default widening coarseness
    pub const DEFAULT_ROUGHNESS: u32 = 5;
}
