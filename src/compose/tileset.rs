//! # Tile Set
//!
//! Tile IDs and offsets the compositor keys on. These describe one authored
//! tile sheet and are kept as data so a different sheet can be described in
//! JSON without touching the passes.

use crate::TilemazeResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tile IDs and tuning values for one tile sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSet {
    /// Background floor
    pub floor: u32,
    /// Solid wall the wall layer starts as
    pub fill: u32,
    /// Shadow drawn on the background under walls
    pub shadow: u32,

    /// Wall faces seen from below: left end, middle, right end
    pub edge_facing_left: u32,
    pub edge_facing_middle: u32,
    pub edge_facing_right: u32,
    /// Wall whose right side borders floor
    pub right_edge_wall: u32,
    /// Bottom-right outer corner
    pub bottom_right_corner: u32,
    /// Top-right outer corner, marks a tall pillar
    pub top_right_corner: u32,

    /// Pillar signature directly above a right edge face, nearest first
    pub pillar_signature: [u32; 3],
    /// Rows above the face where the top-right corner marker sits
    pub pillar_marker_offset: usize,
    /// Rows above the face restored to floor when the marker matches
    pub pillar_floor_rows: std::ops::RangeInclusive<usize>,

    /// Decoration dropped along wall faces
    pub poop: u32,
    /// Single rocks dropped along wall faces
    pub rocks: Vec<u32>,
    /// Multi-tile rock clusters, row-major, zeros clear the prop layer
    pub rock_clusters: Vec<Vec<Vec<u32>>>,
    /// Rows above the trigger tile where a cluster's first row lands
    pub rock_cluster_lift: usize,

    /// Floor decoration: sand
    pub sand: u32,
    /// Floor decoration: pebble variations
    pub ground: Vec<u32>,

    /// Face tiles between poop drops
    pub poop_spacing: u32,
    /// Face tiles between single rocks
    pub rock_spacing: u32,
    /// Middle-face runs between rock clusters
    pub cluster_spacing: u32,
}

impl TileSet {
    /// Loads a tile set from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> TilemazeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Whether `tile` is one of the three wall faces.
    pub fn is_edge_facing(&self, tile: u32) -> bool {
        tile == self.edge_facing_left
            || tile == self.edge_facing_middle
            || tile == self.edge_facing_right
    }
}

impl Default for TileSet {
    fn default() -> Self {
        Self {
            floor: 74,
            fill: 855,
            shadow: 1135,

            edge_facing_left: 25,
            edge_facing_middle: 26,
            edge_facing_right: 27,
            right_edge_wall: 856,
            bottom_right_corner: 868,
            top_right_corner: 844,

            pillar_signature: [15, 3, 3],
            pillar_marker_offset: 7,
            pillar_floor_rows: 3..=6,

            poop: 574,
            rocks: vec![571],
            rock_clusters: vec![vec![
                vec![0, 622, 623],
                vec![0, 634, 635],
                vec![645, 646, 647],
                vec![657, 658, 659],
            ]],
            rock_cluster_lift: 2,

            sand: 129,
            ground: vec![636, 624, 612, 600],

            poop_spacing: 4,
            rock_spacing: 7,
            cluster_spacing: 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_faces() {
        let tiles = TileSet::default();
        assert!(tiles.is_edge_facing(25));
        assert!(tiles.is_edge_facing(26));
        assert!(tiles.is_edge_facing(27));
        assert!(!tiles.is_edge_facing(856));
        assert!(!tiles.is_edge_facing(0));
    }

    #[test]
    fn test_json_override_keeps_other_defaults() {
        let tiles: TileSet = serde_json::from_str(r#"{ "shadow": 9, "rocks": [1, 2] }"#).unwrap();
        assert_eq!(tiles.shadow, 9);
        assert_eq!(tiles.rocks, vec![1, 2]);
        assert_eq!(tiles.floor, 74);
        assert_eq!(tiles.poop_spacing, 4);
    }

    #[test]
    fn test_round_trips_through_json() {
        let tiles = TileSet::default();
        let json = serde_json::to_string(&tiles).unwrap();
        assert_eq!(serde_json::from_str::<TileSet>(&json).unwrap(), tiles);
    }
}
