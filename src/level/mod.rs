//! # Level Output
//!
//! Sinks that receive the three finished, compressed layers.
//!
//! Generation ends with an [`EncodedLayers`] value; a [`LevelSink`] decides
//! what to do with it. The TMX sink embeds the layers in a Tiled map, the
//! JSON sink writes them as-is and the memory sink keeps them for tests.

pub mod tmx;

pub use tmx::*;

use crate::TilemazeResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Three base64 + zlib layer payloads and their shared dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedLayers {
    pub width: usize,
    pub height: usize,
    pub background: String,
    pub walls: String,
    pub props: String,
}

impl EncodedLayers {
    /// Layers in document order with their names.
    pub fn named(&self) -> [(&'static str, &str); 3] {
        [
            ("background", self.background.as_str()),
            ("walls", self.walls.as_str()),
            ("props", self.props.as_str()),
        ]
    }
}

/// Consumer of a finished level.
pub trait LevelSink {
    /// Accepts the encoded layers.
    fn accept(&mut self, layers: &EncodedLayers) -> TilemazeResult<()>;

    /// Gets the sink name for logging.
    fn sink_type(&self) -> &'static str;
}

/// Keeps the last level it received.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub last: Option<EncodedLayers>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LevelSink for MemorySink {
    fn accept(&mut self, layers: &EncodedLayers) -> TilemazeResult<()> {
        self.last = Some(layers.clone());
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "MemorySink"
    }
}

/// Writes the encoded layers to a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LevelSink for JsonSink {
    fn accept(&mut self, layers: &EncodedLayers) -> TilemazeResult<()> {
        let json = serde_json::to_string_pretty(layers)?;
        std::fs::write(&self.path, json)?;
        log::info!("Wrote level layers to {}", self.path.display());
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "JsonSink"
    }
}
