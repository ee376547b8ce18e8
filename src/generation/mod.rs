//! # Generation Module
//!
//! Procedural maze topology generation.
//!
//! This module owns everything that happens before a single tile is drawn:
//! the room grid and its doors, the catalog of authored pieces each room is
//! drawn with, and the maze carver that decides which doors are open.

mod builtin;
pub mod maze;
pub mod pieces;
pub mod rooms;

pub use maze::*;
pub use pieces::*;
pub use rooms::*;

use crate::config;
use crate::utils::RandomSource;
use crate::{TilemazeError, TilemazeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for procedural generation.
///
/// Controls the room grid, where it lands on the tile map, and the tuning
/// knobs of the carve and decoration passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Rooms per row
    pub grid_width: usize,
    /// Rooms per column
    pub grid_height: usize,
    /// Tile map width
    pub map_width: usize,
    /// Tile map height
    pub map_height: usize,
    /// Tile column of the first room
    pub margin_x: usize,
    /// Tile row of the first room
    pub margin_y: usize,
    /// Maximum carve iterations before giving up on full coverage
    pub safety_bound: usize,
    /// Whether to open extra doors after the carve
    pub widening: bool,
    /// Sampling coarseness of widening; 1 or less disables it
    pub roughness: u32,
    /// Chance of a decoration on a walkable tile (0.0 to 1.0)
    pub floor_prop_chance: f64,
    /// Chance a floor decoration is sand rather than pebbles (0.0 to 1.0)
    pub sand_chance: f64,
}

impl GenerationConfig {
    /// Creates a configuration with the standard 12x9 maze on a 100x100 map.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilemaze::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.grid_width, 12);
    /// assert_eq!(config.grid_height, 9);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            grid_width: config::GRID_WIDTH,
            grid_height: config::GRID_HEIGHT,
            map_width: config::MAP_WIDTH,
            map_height: config::MAP_HEIGHT,
            margin_x: config::MARGIN_X,
            margin_y: config::MARGIN_Y,
            safety_bound: config::SAFETY_BOUND,
            widening: true,
            roughness: config::DEFAULT_ROUGHNESS,
            floor_prop_chance: 0.27,
            sand_chance: 0.15,
        }
    }

    /// Creates a configuration for testing with a smaller map.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            grid_width: 6,
            grid_height: 4,
            map_width: 52,
            map_height: 46,
            ..Self::new(seed)
        }
    }

    /// Loads a configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> TilemazeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can produce a maze.
    pub fn validate(&self) -> TilemazeResult<()> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(TilemazeError::InvalidConfig(format!(
                "room grid must not be empty, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }
        if self.map_width == 0 || self.map_height == 0 {
            return Err(TilemazeError::InvalidConfig(format!(
                "tile map must not be empty, got {}x{}",
                self.map_width, self.map_height
            )));
        }
        for (name, p) in [
            ("floor_prop_chance", self.floor_prop_chance),
            ("sand_chance", self.sand_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(TilemazeError::InvalidConfig(format!(
                    "{} must be between 0 and 1, got {}",
                    name, p
                )));
            }
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
///
/// Generators draw every random value from the injected [`RandomSource`],
/// so a seeded source reproduces the same output.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random source.
    fn generate<R: RandomSource + ?Sized>(
        &self,
        config: &GenerationConfig,
        rng: &mut R,
    ) -> TilemazeResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> TilemazeResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_creation() {
        let config = GenerationConfig::new(12345);
        assert_eq!(config.seed, 12345);
        assert_eq!(config.map_width, 100);
        assert_eq!(config.map_height, 100);
        assert_eq!(config.safety_bound, 5000);
        assert_eq!(config.roughness, 5);
        assert!(config.widening);
    }

    #[test]
    fn test_config_rejects_empty_grid() {
        let mut config = GenerationConfig::new(1);
        config.grid_width = 0;
        assert!(matches!(
            config.validate(),
            Err(TilemazeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_config_rejects_bad_chance() {
        let mut config = GenerationConfig::new(1);
        config.sand_chance = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config: GenerationConfig =
            serde_json::from_str(r#"{ "seed": 9, "roughness": 3 }"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.roughness, 3);
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.floor_prop_chance, 0.27);
    }

    #[test]
    fn test_utils_rng_creation() {
        use rand::Rng;

        let config = GenerationConfig::new(12345);
        let a: u64 = utils::create_rng(&config).gen();
        let b: u64 = utils::create_rng(&config).gen();
        assert_eq!(a, b);
    }
}
