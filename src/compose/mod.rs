//! # Layer Compositor
//!
//! Turns a finished maze into the three tile layers of a level.
//!
//! The passes run in a fixed order, each with a single writer:
//! 1. Stamp every room's piece into the wall layer
//! 2. Derive which wall-layer tiles are walkable
//! 3. Scan the wall layer for faces and edges, drawing shadows on the
//!    background and dropping wall-side props
//! 4. Sprinkle floor decorations over free walkable tiles
//!
//! The scan in step 3 works on flat row-major indices, so a one-column
//! offset at the end of a row lands at the start of the next row.

pub mod pipeline;
pub mod props;
pub mod tileset;

pub use pipeline::*;
pub use props::*;
pub use tileset::*;

use crate::codec::{TileGrid, EMPTY_TILE};
use crate::generation::{GenerationConfig, MazeGrid, PieceLibrary};
use crate::level::EncodedLayers;
use crate::utils::RandomSource;
use crate::{TilemazeError, TilemazeResult};
use log::debug;

/// Whether a tile can be walked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Walkability {
    Walkable,
    Blocked,
}

impl Walkability {
    pub fn is_walkable(self) -> bool {
        self == Walkability::Walkable
    }
}

/// One walkability marker per wall-layer tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkableMap {
    cells: Vec<Walkability>,
}

impl WalkableMap {
    /// Empty wall tiles are walkable, everything else blocks.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilemaze::{TileGrid, WalkableMap};
    ///
    /// let walls = TileGrid::from_tiles(3, 1, vec![0, 855, 0]);
    /// let walkable = WalkableMap::from_walls(&walls);
    /// assert_eq!(walkable.walkable_count(), 2);
    /// ```
    pub fn from_walls(walls: &TileGrid) -> Self {
        let cells = walls
            .tiles()
            .iter()
            .map(|&tile| {
                if tile == EMPTY_TILE {
                    Walkability::Walkable
                } else {
                    Walkability::Blocked
                }
            })
            .collect();
        Self { cells }
    }

    pub fn from_cells(cells: Vec<Walkability>) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Walkability] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_walkable()).count()
    }
}

/// Background, walls and props, index-aligned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerSet {
    pub background: TileGrid,
    pub walls: TileGrid,
    pub props: TileGrid,
}

impl LayerSet {
    /// Fresh layers: floor background, solid walls, no props.
    pub fn blank(width: usize, height: usize, tiles: &TileSet) -> Self {
        Self {
            background: TileGrid::filled(width, height, tiles.floor),
            walls: TileGrid::filled(width, height, tiles.fill),
            props: TileGrid::new(width, height),
        }
    }

    /// Starting layers decoded from editor payloads. The background and
    /// wall canvases are refilled with the floor and fill tiles; props are
    /// kept as-is.
    pub fn from_payloads(
        background: &str,
        walls: &str,
        props: &str,
        width: usize,
        height: usize,
        tiles: &TileSet,
    ) -> TilemazeResult<Self> {
        let mut background = TileGrid::decode(background, width, height)?;
        let mut walls = TileGrid::decode(walls, width, height)?;
        let props = TileGrid::decode(props, width, height)?;

        background.fill(tiles.floor);
        walls.fill(tiles.fill);

        Ok(Self {
            background,
            walls,
            props,
        })
    }

    pub fn width(&self) -> usize {
        self.walls.width()
    }

    pub fn height(&self) -> usize {
        self.walls.height()
    }

    /// Compresses all three layers for a sink.
    pub fn encode(&self) -> TilemazeResult<EncodedLayers> {
        Ok(EncodedLayers {
            width: self.width(),
            height: self.height(),
            background: self.background.encode()?,
            walls: self.walls.encode()?,
            props: self.props.encode()?,
        })
    }
}

/// Summary of a compositing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositionStats {
    pub rooms_stamped: usize,
    pub walkable_tiles: usize,
    pub shadow_tiles: usize,
    pub wall_props: usize,
    pub floor_props: usize,
}

/// Draws a maze into tile layers.
#[derive(Debug, Clone)]
pub struct LayerCompositor {
    pub tiles: TileSet,
    pub margin_x: usize,
    pub margin_y: usize,
    pub floor_prop_chance: f64,
    pub sand_chance: f64,
}

impl LayerCompositor {
    pub fn new(tiles: TileSet, config: &GenerationConfig) -> Self {
        Self {
            tiles,
            margin_x: config.margin_x,
            margin_y: config.margin_y,
            floor_prop_chance: config.floor_prop_chance,
            sand_chance: config.sand_chance,
        }
    }

    /// Patches each room's piece into `walls`, column by column.
    ///
    /// # Errors
    ///
    /// [`TilemazeError::UnresolvedPiece`] for a room with no open doors or
    /// a piece missing from `library`.
    pub fn stamp(
        &self,
        walls: &mut TileGrid,
        maze: &MazeGrid,
        library: &PieceLibrary,
    ) -> TilemazeResult<usize> {
        let step_x = library.width();
        let step_y = library.height();
        let mut stamped = 0;

        for room in maze.rooms_by_column() {
            let piece = room
                .piece
                .as_ref()
                .and_then(|resolved| library.piece(resolved))
                .ok_or(TilemazeError::UnresolvedPiece {
                    x: room.x,
                    y: room.y,
                })?;

            let origin_x = self.margin_x + room.x * step_x;
            let origin_y = self.margin_y + room.y * step_y;
            walls.patch_region(piece, origin_x as i64, origin_y as i64);
            stamped += 1;
        }

        Ok(stamped)
    }

    /// Scans `walls` for faces and edges, writing shadows into
    /// `background` and wall-side decorations into `props`.
    ///
    /// Returns the number of face tiles that cast a shadow.
    pub fn derive_shadows<R: RandomSource + ?Sized>(
        &self,
        walls: &TileGrid,
        background: &mut TileGrid,
        props: &mut TileGrid,
        counters: &mut PropCounters,
        rng: &mut R,
    ) -> usize {
        let tiles = &self.tiles;
        let row = walls.width() as i64;
        let len = walls.len() as i64;
        let mut faces = 0;

        for (index, &tile) in walls.tiles().iter().enumerate() {
            let i = index as i64;
            let at = |offset: i64| walls.get_index(i + offset);

            if tile == tiles.right_edge_wall || tile == tiles.bottom_right_corner {
                background.set_index(i + 1, tiles.shadow);
                if i + row + 1 < len {
                    background.set_index(i + row + 1, tiles.shadow);
                }
            }

            if !tiles.is_edge_facing(tile) {
                continue;
            }
            faces += 1;

            if tile == tiles.edge_facing_left || tile == tiles.edge_facing_right {
                counters.end_face(props, i, tiles, rng);
            }

            let middle = Some(tiles.edge_facing_middle);
            if tile == tiles.edge_facing_middle && at(1) == middle && at(2) == middle {
                counters.middle_run(props, i, tiles, rng);
            }

            background.set_index(i, tiles.shadow);
            if i + row < len {
                background.set_index(i + row, tiles.shadow);
            }

            if tile == tiles.edge_facing_right {
                background.set_index(i + 1, tiles.shadow);
                if i + row + 1 < len {
                    background.set_index(i + row + 1, tiles.shadow);
                }
                self.repair_pillar(walls, background, i);
            }
        }

        faces
    }

    /// Fixes up shadows under a pillar standing above the right face at `i`.
    fn repair_pillar(&self, walls: &TileGrid, background: &mut TileGrid, i: i64) {
        let tiles = &self.tiles;
        let row = walls.width() as i64;
        let height = tiles.pillar_signature.len() as i64;

        if i - row * height < 0 {
            return;
        }

        let matches = tiles
            .pillar_signature
            .iter()
            .enumerate()
            .all(|(k, &id)| walls.get_index(i - row * (k as i64 + 1)) == Some(id));
        if !matches {
            return;
        }

        for k in 1..height {
            background.set_index(i - row * k, tiles.shadow);
            background.set_index(i - row * k + 1, tiles.shadow);
        }

        let marker = walls.get_index(i - row * tiles.pillar_marker_offset as i64);
        if marker == Some(tiles.top_right_corner) {
            for k in tiles.pillar_floor_rows.clone() {
                let k = k as i64;
                background.set_index(i - row * k, tiles.floor);
                background.set_index(i - row * k + 1, tiles.floor);
            }
        }
    }

    /// Runs every pass over fresh layers sized for `config`.
    pub fn compose<R: RandomSource + ?Sized>(
        &self,
        maze: &MazeGrid,
        library: &PieceLibrary,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> TilemazeResult<(LayerSet, CompositionStats)> {
        let mut layers = LayerSet::blank(config.map_width, config.map_height, &self.tiles);
        let stats = self.compose_onto(&mut layers, maze, library, rng)?;
        Ok((layers, stats))
    }

    /// Runs every pass over existing layers.
    pub fn compose_onto<R: RandomSource + ?Sized>(
        &self,
        layers: &mut LayerSet,
        maze: &MazeGrid,
        library: &PieceLibrary,
        rng: &mut R,
    ) -> TilemazeResult<CompositionStats> {
        let mut stats = CompositionStats {
            rooms_stamped: self.stamp(&mut layers.walls, maze, library)?,
            ..CompositionStats::default()
        };

        let walkable = WalkableMap::from_walls(&layers.walls);
        stats.walkable_tiles = walkable.walkable_count();

        let mut counters = PropCounters::new();
        stats.shadow_tiles = self.derive_shadows(
            &layers.walls,
            &mut layers.background,
            &mut layers.props,
            &mut counters,
            rng,
        );
        stats.wall_props = layers.props.tiles().iter().filter(|&&t| t != EMPTY_TILE).count();

        stats.floor_props = scatter_floor_props(
            &walkable,
            &mut layers.props,
            &self.tiles,
            self.floor_prop_chance,
            self.sand_chance,
            rng,
        );

        debug!(
            "Composited {} rooms: {} walkable, {} shadow faces, {} wall props, {} floor props",
            stats.rooms_stamped,
            stats.walkable_tiles,
            stats.shadow_tiles,
            stats.wall_props,
            stats.floor_props
        );

        Ok(stats)
    }
}

impl Default for LayerCompositor {
    fn default() -> Self {
        Self::new(TileSet::default(), &GenerationConfig::default())
    }
}
