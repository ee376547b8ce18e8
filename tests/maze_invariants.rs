//! Structural checks on generated mazes across seeds and grid shapes.

use proptest::prelude::*;
use tilemaze::generation::utils::create_rng;
use tilemaze::{
    Direction, GenerationConfig, Generator, MazeGenerator, MazeGrid, PieceRole, TilemazeResult,
};

fn assert_sound(grid: &MazeGrid) {
    for room in grid.rooms() {
        let doors = room.door_count();
        assert!((1..=4).contains(&doors), "room ({}, {}) has {} doors", room.x, room.y, doors);
        assert_eq!(room.piece.map(|p| p.role), PieceRole::resolve(room.doors));

        for direction in Direction::ALL {
            let Some((nx, ny)) = grid.neighbor(room.x, room.y, direction) else {
                assert!(!room.doors.is_open(direction), "door opens off the grid");
                continue;
            };
            let other = grid.room(nx, ny).unwrap();
            assert_eq!(
                room.doors.is_open(direction),
                other.doors.is_open(direction.opposite())
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_seed_gives_a_sound_maze(seed in any::<u64>(), widening in any::<bool>()) {
        let config = GenerationConfig { widening, ..GenerationConfig::new(seed) };
        let mut rng = create_rng(&config);

        let grid = MazeGenerator::default().generate(&config, &mut rng).unwrap();

        assert_sound(&grid);
        prop_assert!(grid.is_connected());
    }

    #[test]
    fn any_grid_shape_is_sound(w in 1usize..10, h in 1usize..10, seed in 0u64..1000) {
        let config = GenerationConfig {
            grid_width: w,
            grid_height: h,
            ..GenerationConfig::for_testing(seed)
        };
        let mut rng = create_rng(&config);

        let grid = MazeGenerator::default().generate(&config, &mut rng).unwrap();

        if w * h > 1 {
            assert_sound(&grid);
            prop_assert!(grid.is_connected());
        }
    }
}

#[test]
fn test_default_maze_is_a_spanning_tree_before_widening() -> TilemazeResult<()> {
    let config = GenerationConfig {
        widening: false,
        ..GenerationConfig::new(2024)
    };
    let mut rng = create_rng(&config);
    let maze = MazeGenerator::default().generate_maze(&config, &mut rng)?;

    let doors: usize = maze.grid.rooms().map(|r| r.door_count()).sum();
    assert_eq!(doors / 2, 12 * 9 - 1);
    assert_eq!(maze.report.rooms_filled, 108);
    assert!(!maze.report.exhausted);
    assert_eq!(maze.report.healed, 0);

    Ok(())
}

#[test]
fn test_safety_bound_of_one_is_healed() -> TilemazeResult<()> {
    let config = GenerationConfig {
        safety_bound: 1,
        ..GenerationConfig::new(77)
    };
    let mut rng = create_rng(&config);
    let maze = MazeGenerator::default().generate_maze(&config, &mut rng)?;

    assert!(maze.report.exhausted);
    assert_eq!(maze.report.iterations, 1);
    assert!(maze.report.healed > 0);
    assert!(maze.grid.rooms().all(|r| r.door_count() >= 1));
    assert!(maze.grid.doors_are_reciprocal());
    assert!(!maze.grid.is_connected());

    Ok(())
}

#[test]
fn test_single_room_grid_completes() -> TilemazeResult<()> {
    let config = GenerationConfig {
        grid_width: 1,
        grid_height: 1,
        ..GenerationConfig::new(3)
    };
    let mut rng = create_rng(&config);
    let generator = MazeGenerator::default();

    let maze = generator.generate_maze(&config, &mut rng)?;
    assert_eq!(maze.report.unhealable, 1);
    assert_eq!(maze.grid.room(0, 0).map(|r| r.door_count()), Some(0));

    let grid = generator.generate(&config, &mut create_rng(&config))?;
    assert_eq!(grid.len(), 1);

    Ok(())
}

#[test]
fn test_same_seed_same_doors() {
    let config = GenerationConfig::new(555);
    let generator = MazeGenerator::default();

    let a = generator.generate(&config, &mut create_rng(&config)).unwrap();
    let b = generator.generate(&config, &mut create_rng(&config)).unwrap();

    assert_eq!(a, b);
}
