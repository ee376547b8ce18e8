//! Maze carve and compositing run back to back.

use crate::compose::{CompositionStats, LayerCompositor, LayerSet, TileSet};
use crate::generation::{
    GenerationConfig, GenerationReport, Generator, MazeGenerator, MazeGrid, PieceLibrary,
};
use crate::utils::RandomSource;
use crate::{TilemazeError, TilemazeResult};
use log::info;

/// A finished level with the statistics of both stages.
#[derive(Debug, Clone)]
pub struct GeneratedLevel {
    pub maze: MazeGrid,
    pub layers: LayerSet,
    pub report: GenerationReport,
    pub stats: CompositionStats,
}

/// Generates complete levels: maze, then layers.
#[derive(Debug, Clone, Default)]
pub struct LevelGenerator {
    maze: MazeGenerator,
    tiles: TileSet,
    base: Option<LayerSet>,
}

impl LevelGenerator {
    pub fn new(library: PieceLibrary, tiles: TileSet) -> Self {
        Self {
            maze: MazeGenerator::new(library),
            tiles,
            base: None,
        }
    }

    /// Composites onto `layers` instead of blank canvases.
    pub fn with_base_layers(mut self, layers: LayerSet) -> Self {
        self.base = Some(layers);
        self
    }

    pub fn library(&self) -> &PieceLibrary {
        self.maze.library()
    }

    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// Runs both stages and keeps everything they produced.
    pub fn generate_level<R: RandomSource + ?Sized>(
        &self,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> TilemazeResult<GeneratedLevel> {
        let maze = self.maze.generate_maze(config, rng)?;
        let compositor = LayerCompositor::new(self.tiles.clone(), config);

        let (layers, stats) = match &self.base {
            Some(base) => {
                let mut layers = base.clone();
                let stats = compositor.compose_onto(&mut layers, &maze.grid, self.library(), rng)?;
                (layers, stats)
            }
            None => compositor.compose(&maze.grid, self.library(), config, rng)?,
        };

        info!(
            "Generated {}x{} level with {} walkable tiles and {} props",
            layers.width(),
            layers.height(),
            stats.walkable_tiles,
            stats.wall_props + stats.floor_props
        );

        Ok(GeneratedLevel {
            maze: maze.grid,
            layers,
            report: maze.report,
            stats,
        })
    }
}

impl Generator<LayerSet> for LevelGenerator {
    fn generate<R: RandomSource + ?Sized>(
        &self,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> TilemazeResult<LayerSet> {
        let level = self.generate_level(config, rng)?;
        self.validate(&level.layers, config)?;
        Ok(level.layers)
    }

    fn validate(&self, layers: &LayerSet, config: &GenerationConfig) -> TilemazeResult<()> {
        let expected = (config.map_width, config.map_height);
        let sizes = [
            (layers.background.width(), layers.background.height()),
            (layers.walls.width(), layers.walls.height()),
            (layers.props.width(), layers.props.height()),
        ];

        if self.base.is_none() && sizes.iter().any(|&s| s != expected) {
            return Err(TilemazeError::GenerationFailed(format!(
                "Layers do not match the {}x{} map",
                expected.0, expected.1
            )));
        }
        if sizes.iter().any(|&s| s != sizes[0]) {
            return Err(TilemazeError::GenerationFailed(
                "Layers differ in size".to_string(),
            ));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "LevelGenerator"
    }
}
