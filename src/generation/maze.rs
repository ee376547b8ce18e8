//! # Maze Generation
//!
//! Randomized depth-first spanning-tree carve over the room grid.
//!
//! The carve works like this:
//! 1. Pick a random start room and push it on an explicit stack
//! 2. Repeatedly look at the top of the stack, try the four directions in a
//!    freshly shuffled order and open a door into the first unvisited
//!    neighbor, or pop the room as a dead end when there is none
//! 3. Heal any room the carve never reached by connecting it to a neighbor
//! 4. Optionally widen the maze by opening extra doors on a coarse sample of
//!    rooms, which adds cycles and breaks up long corridors
//!
//! The carve keeps an explicit stack and counts every loop iteration
//! against the configured safety bound.

use crate::generation::pieces::PieceLibrary;
use crate::generation::rooms::{Direction, MazeGrid};
use crate::generation::{GenerationConfig, Generator};
use crate::utils::RandomSource;
use crate::{TilemazeError, TilemazeResult};
use log::{debug, info, warn};

/// Statistics from a single carve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Start room `(x, y)`
    pub start: (usize, usize),
    /// Rooms visited by the carve
    pub rooms_filled: usize,
    /// Loop iterations spent carving
    pub iterations: usize,
    /// The safety bound ran out before every room was visited
    pub exhausted: bool,
    /// Rooms the healing pass connected
    pub healed: usize,
    /// Rooms healing could not connect (only a grid with a single room)
    pub unhealable: usize,
    /// Extra connections opened by widening
    pub widened: usize,
}

/// A carved maze together with how it was carved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMaze {
    pub grid: MazeGrid,
    pub report: GenerationReport,
}

/// Depth-first maze carver with healing and widening passes.
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    library: PieceLibrary,
}

impl MazeGenerator {
    /// Creates a generator resolving pieces against `library`.
    pub fn new(library: PieceLibrary) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &PieceLibrary {
        &self.library
    }

    /// Carves a spanning tree from a random start room.
    ///
    /// Stops early when the stack empties or `config.safety_bound`
    /// iterations have run; either way the grid is returned as-is for the
    /// healing pass to repair.
    pub fn carve<R: RandomSource + ?Sized>(
        &self,
        grid: &mut MazeGrid,
        config: &GenerationConfig,
        rng: &mut R,
        report: &mut GenerationReport,
    ) {
        if grid.is_empty() {
            return;
        }

        let start_x = rng.range_inclusive(0, grid.width() as i64 - 1) as usize;
        let start_y = rng.range_inclusive(0, grid.height() as i64 - 1) as usize;
        debug!("Carving from room ({}, {})", start_x, start_y);

        if let Some(start) = grid.room_mut(start_x, start_y) {
            start.used = true;
            start.first = true;
        }
        report.start = (start_x, start_y);

        let total = grid.len();
        let mut stack = vec![(start_x, start_y)];
        let mut filled = 1;
        let mut iterations = 0;
        let mut directions = Direction::ALL;

        while filled < total && iterations < config.safety_bound {
            let Some(&(x, y)) = stack.last() else {
                break;
            };

            shuffle(&mut directions, rng);

            let next = directions.iter().find_map(|&d| {
                grid.neighbor(x, y, d)
                    .filter(|&(nx, ny)| grid.room(nx, ny).is_some_and(|r| !r.used))
                    .map(|_| d)
            });

            match next {
                Some(direction) => {
                    if let Some((nx, ny)) = grid.connect(x, y, direction, &self.library, rng) {
                        if let Some(room) = grid.room_mut(nx, ny) {
                            room.used = true;
                        }
                        stack.push((nx, ny));
                        filled += 1;
                    }
                }
                None => {
                    if let Some(room) = grid.room_mut(x, y) {
                        room.dead_end = true;
                    }
                    stack.pop();
                }
            }

            iterations += 1;
        }

        report.rooms_filled = filled;
        report.iterations = iterations;
        report.exhausted = filled < total;

        if report.exhausted {
            warn!(
                "Maze carve stopped after {} iterations with {}/{} rooms visited",
                iterations, filled, total
            );
        }
    }

    /// Connects every room that has no open door to its first in-bounds
    /// neighbor in `+X, -X, +Y, -Y` order.
    ///
    /// A room with no neighbors at all (a 1x1 grid) is left as-is and
    /// counted as unhealable.
    pub fn heal<R: RandomSource + ?Sized>(
        &self,
        grid: &mut MazeGrid,
        rng: &mut R,
        report: &mut GenerationReport,
    ) {
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                if grid.room(x, y).is_some_and(|r| r.door_count() > 0) {
                    continue;
                }

                warn!("Room ({}, {}) has no open doors, healing", x, y);
                let healed = Direction::REPAIR_PRIORITY
                    .into_iter()
                    .any(|d| grid.connect(x, y, d, &self.library, rng).is_some());

                if healed {
                    report.healed += 1;
                } else {
                    warn!("Room ({}, {}) has no neighbors to connect to", x, y);
                    report.unhealable += 1;
                }
            }
        }
    }

    /// Opens one extra door on a coarse sample of rooms.
    ///
    /// Sampling steps by roughly `dimension / roughness` per axis from a
    /// random offset. Each sampled room gets the first connection in
    /// `+X, -X, +Y, -Y` order that is on the grid and not yet open. Does
    /// nothing when `roughness <= 1`.
    pub fn widen<R: RandomSource + ?Sized>(
        &self,
        grid: &mut MazeGrid,
        roughness: u32,
        rng: &mut R,
        report: &mut GenerationReport,
    ) {
        if roughness <= 1 {
            return;
        }

        let r = roughness as f64;
        let width = grid.width() as f64;
        let height = grid.height() as f64;
        let step_x = ((width / r).floor() as usize).max(1);
        let step_y = ((height / r).round() as usize).max(1);

        let mut x = rng.range_inclusive(0, (width / r).round() as i64) as usize;
        while x < grid.width() {
            let mut y = rng.range_inclusive(0, (height / r).round() as i64) as usize;
            while y < grid.height() {
                let Some(doors) = grid.room(x, y).map(|room| room.doors) else {
                    break;
                };

                let extra = Direction::REPAIR_PRIORITY
                    .into_iter()
                    .find(|&d| !doors.is_open(d) && grid.neighbor(x, y, d).is_some());

                if let Some(direction) = extra {
                    grid.connect(x, y, direction, &self.library, rng);
                    report.widened += 1;
                }

                y += step_y;
            }
            x += step_x;
        }
    }

    /// Runs carve, heal and (when enabled) widen, returning the report.
    pub fn generate_maze<R: RandomSource + ?Sized>(
        &self,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> TilemazeResult<GeneratedMaze> {
        config.validate()?;

        let mut grid = MazeGrid::new(config.grid_width, config.grid_height);
        let mut report = GenerationReport::default();

        self.carve(&mut grid, config, rng, &mut report);
        self.heal(&mut grid, rng, &mut report);
        if config.widening {
            self.widen(&mut grid, config.roughness, rng, &mut report);
        }

        info!(
            "Generated {}x{} maze: {} iterations, {} healed, {} widened",
            grid.width(),
            grid.height(),
            report.iterations,
            report.healed,
            report.widened
        );

        Ok(GeneratedMaze { grid, report })
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self::new(PieceLibrary::builtin())
    }
}

impl Generator<MazeGrid> for MazeGenerator {
    fn generate<R: RandomSource + ?Sized>(
        &self,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> TilemazeResult<MazeGrid> {
        let maze = self.generate_maze(config, rng)?;

        if maze.report.exhausted {
            // Healing only guarantees doors, not a single component.
            check_structure(&maze.grid)?;
            if !maze.grid.is_connected() {
                warn!("Healed maze is split into several regions");
            }
        } else {
            self.validate(&maze.grid, config)?;
        }

        Ok(maze.grid)
    }

    fn validate(&self, grid: &MazeGrid, _config: &GenerationConfig) -> TilemazeResult<()> {
        check_structure(grid)?;

        if grid.len() > 1 && !grid.is_connected() {
            return Err(TilemazeError::GenerationFailed(
                "Maze is not connected".to_string(),
            ));
        }

        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "MazeGenerator"
    }
}

/// Every room has a door and a matching piece, and every door is mirrored.
fn check_structure(grid: &MazeGrid) -> TilemazeResult<()> {
    // A lone room has nothing to connect to.
    if grid.len() <= 1 {
        return Ok(());
    }

    if let Some(room) = grid.rooms().find(|r| r.door_count() == 0) {
        return Err(TilemazeError::GenerationFailed(format!(
            "Room ({}, {}) has no open doors",
            room.x, room.y
        )));
    }

    if let Some(room) = grid.rooms().find(|r| r.piece.map(|p| p.role) != r.role()) {
        return Err(TilemazeError::GenerationFailed(format!(
            "Room ({}, {}) has a piece that does not match its doors",
            room.x, room.y
        )));
    }

    if !grid.doors_are_reciprocal() {
        return Err(TilemazeError::GenerationFailed(
            "Maze has a one-sided door".to_string(),
        ));
    }

    Ok(())
}

/// Fisher-Yates shuffle driven by the injected random source.
fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.range_inclusive(0, i as i64) as usize;
        items.swap(i, j);
    }
}
