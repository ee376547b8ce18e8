//! Tiled TMX map output.

use crate::level::{EncodedLayers, LevelSink};
use crate::TilemazeResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Map-level settings of the written TMX document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TmxOptions {
    pub tile_width: u32,
    pub tile_height: u32,
    /// External tileset file referenced by the map
    pub tileset_source: String,
    pub first_gid: u32,
}

impl Default for TmxOptions {
    fn default() -> Self {
        Self {
            tile_width: 16,
            tile_height: 16,
            tileset_source: "tileset.tsx".to_string(),
            first_gid: 1,
        }
    }
}

/// Writes the layers into an orthogonal TMX map, one `<layer>` each,
/// numbered 1 to 3 in background, walls, props order.
#[derive(Debug, Clone)]
pub struct TmxSink {
    path: PathBuf,
    options: TmxOptions,
}

impl TmxSink {
    pub fn new(path: impl Into<PathBuf>, options: TmxOptions) -> Self {
        Self {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the TMX document.
    pub fn render(&self, layers: &EncodedLayers) -> String {
        let o = &self.options;
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        xml.push_str(&format!(
            "<map version=\"1.10\" orientation=\"orthogonal\" renderorder=\"right-down\" width=\"{}\" height=\"{}\" tilewidth=\"{}\" tileheight=\"{}\" infinite=\"0\" nextlayerid=\"4\" nextobjectid=\"1\">\n",
            layers.width, layers.height, o.tile_width, o.tile_height
        ));
        xml.push_str(&format!(
            " <tileset firstgid=\"{}\" source=\"{}\"/>\n",
            o.first_gid,
            escape(&o.tileset_source)
        ));
        for (id, (name, payload)) in layers.named().iter().enumerate() {
            xml.push_str(&format!(
                " <layer id=\"{}\" name=\"{}\" width=\"{}\" height=\"{}\">\n",
                id + 1,
                name,
                layers.width,
                layers.height
            ));
            xml.push_str("  <data encoding=\"base64\" compression=\"zlib\">\n");
            xml.push_str(&format!("   {}\n", payload));
            xml.push_str("  </data>\n");
            xml.push_str(" </layer>\n");
        }
        xml.push_str("</map>\n");

        xml
    }
}

impl LevelSink for TmxSink {
    fn accept(&mut self, layers: &EncodedLayers) -> TilemazeResult<()> {
        std::fs::write(&self.path, self.render(layers))?;
        log::info!("Wrote TMX map to {}", self.path.display());
        Ok(())
    }

    fn sink_type(&self) -> &'static str {
        "TmxSink"
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
