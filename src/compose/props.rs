//! Decorative props scattered along walls and across the floor.

use crate::codec::{TileGrid, EMPTY_TILE};
use crate::compose::tileset::TileSet;
use crate::compose::WalkableMap;
use crate::utils::RandomSource;

/// Spacing counters for decorations dropped along wall faces.
///
/// Each counter advances once per qualifying face tile in scan order and
/// resets when its decoration is placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropCounters {
    pub poop: u32,
    pub rock: u32,
    pub cluster: u32,
}

impl PropCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the poop and single rock counters for an end face at
    /// `index` and drops whichever decoration is due.
    pub fn end_face<R: RandomSource + ?Sized>(
        &mut self,
        props: &mut TileGrid,
        index: i64,
        tiles: &TileSet,
        rng: &mut R,
    ) {
        self.poop += 1;
        self.rock += 1;

        if self.poop == tiles.poop_spacing {
            props.set_index(index, tiles.poop);
            self.poop = 0;
        }

        if self.rock == tiles.rock_spacing {
            if let Some(&rock) = tiles.rocks.get(rng.index(tiles.rocks.len())) {
                props.set_index(index, rock);
            }
            self.rock = 0;
        }
    }

    /// Advances the cluster counter for a run of three middle faces starting
    /// at `index` and stamps a rock cluster when one is due.
    ///
    /// The cluster's first row lands `rock_cluster_lift` rows above the
    /// trigger; rows are written bottom-up and zero cells are written too.
    pub fn middle_run<R: RandomSource + ?Sized>(
        &mut self,
        props: &mut TileGrid,
        index: i64,
        tiles: &TileSet,
        rng: &mut R,
    ) {
        self.cluster += 1;
        if self.cluster != tiles.cluster_spacing {
            return;
        }
        self.cluster = 0;

        let Some(cluster) = tiles.rock_clusters.get(rng.index(tiles.rock_clusters.len())) else {
            return;
        };

        let row = props.width() as i64;
        let lift = tiles.rock_cluster_lift as i64;
        for (r, cells) in cluster.iter().enumerate().rev() {
            for (c, &tile) in cells.iter().enumerate() {
                props.set_index(index + (r as i64 - lift) * row + c as i64, tile);
            }
        }
    }
}

/// Sprinkles sand and pebbles over free walkable tiles.
///
/// Each walkable tile rolls `floor_chance`; a hit on a tile with no prop yet
/// places sand with probability `sand_chance`, otherwise a random ground
/// variation. Returns the number of decorations placed.
pub fn scatter_floor_props<R: RandomSource + ?Sized>(
    walkable: &WalkableMap,
    props: &mut TileGrid,
    tiles: &TileSet,
    floor_chance: f64,
    sand_chance: f64,
    rng: &mut R,
) -> usize {
    let mut placed = 0;

    for (index, cell) in walkable.cells().iter().enumerate() {
        if !cell.is_walkable() {
            continue;
        }
        let index = index as i64;
        if !rng.chance(floor_chance) || props.get_index(index) != Some(EMPTY_TILE) {
            continue;
        }

        let tile = if rng.chance(sand_chance) {
            tiles.sand
        } else {
            match tiles.ground.get(rng.index(tiles.ground.len())) {
                Some(&tile) => tile,
                None => continue,
            }
        };

        props.set_index(index, tile);
        placed += 1;
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::Walkability;
    use crate::utils::ScriptedRandom;

    #[test]
    fn test_poop_every_fourth_end_face() {
        let tiles = TileSet::default();
        let mut props = TileGrid::new(10, 1);
        let mut counters = PropCounters::new();
        let mut rng = ScriptedRandom::lowest();

        for i in 0..8 {
            counters.end_face(&mut props, i, &tiles, &mut rng);
        }

        assert_eq!(props.get(3, 0), Some(tiles.poop));
        assert_eq!(props.get(7, 0), Some(tiles.poop));
        assert_eq!(props.get(6, 0), Some(tiles.rocks[0]));
        assert_eq!(props.count(tiles.poop), 2);
        assert_eq!(counters.poop, 0);
        assert_eq!(counters.rock, 1);
    }

    #[test]
    fn test_cluster_on_seventh_run() {
        let tiles = TileSet::default();
        let mut props = TileGrid::filled(10, 10, 1);
        let mut counters = PropCounters::new();
        let mut rng = ScriptedRandom::lowest();
        let trigger = 5 * 10 + 4;

        for _ in 0..6 {
            counters.middle_run(&mut props, trigger, &tiles, &mut rng);
        }
        assert_eq!(props.count(1), 100);

        counters.middle_run(&mut props, trigger, &tiles, &mut rng);
        assert_eq!(counters.cluster, 0);
        // First cluster row sits two rows above the trigger.
        assert_eq!(props.get(4, 3), Some(0));
        assert_eq!(props.get(5, 3), Some(622));
        assert_eq!(props.get(6, 3), Some(623));
        assert_eq!(props.get(4, 5), Some(645));
        assert_eq!(props.get(6, 6), Some(659));
        assert_eq!(props.get(4, 7), Some(1));
    }

    #[test]
    fn test_scatter_only_on_free_walkable_tiles() {
        let tiles = TileSet::default();
        let walkable = WalkableMap::from_cells(vec![
            Walkability::Walkable,
            Walkability::Blocked,
            Walkability::Walkable,
        ]);
        let mut props = TileGrid::from_tiles(3, 1, vec![0, 0, 574]);
        let mut rng = ScriptedRandom::new(vec![0], vec![0.0]);

        let placed = scatter_floor_props(&walkable, &mut props, &tiles, 0.27, 0.15, &mut rng);

        assert_eq!(placed, 1);
        assert_eq!(props.tiles(), &[tiles.sand, 0, 574]);
    }

    #[test]
    fn test_scatter_picks_ground_when_not_sand() {
        let tiles = TileSet::default();
        let walkable = WalkableMap::from_cells(vec![Walkability::Walkable; 2]);
        let mut props = TileGrid::new(2, 1);
        // Hit, not sand, ground[2]; then miss.
        let mut rng = ScriptedRandom::new(vec![2], vec![0.1, 0.9, 0.5]);

        scatter_floor_props(&walkable, &mut props, &tiles, 0.27, 0.15, &mut rng);

        assert_eq!(props.tiles(), &[612, 0]);
    }

    #[test]
    fn test_scatter_never_with_zero_chance() {
        let tiles = TileSet::default();
        let walkable = WalkableMap::from_cells(vec![Walkability::Walkable; 50]);
        let mut props = TileGrid::new(50, 1);
        let mut rng = ScriptedRandom::new(vec![0], vec![0.5]);

        assert_eq!(
            scatter_floor_props(&walkable, &mut props, &tiles, 0.0, 0.15, &mut rng),
            0
        );
    }
}
