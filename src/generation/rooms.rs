//! # Rooms and Doors
//!
//! Per-cell connectivity state for the maze grid.
//!
//! A [`Room`] is a plain value: changing a door never silently recomputes
//! anything. The [`MazeGrid`] API is the only place doors are opened, and it
//! re-resolves the piece of every room it touches in the same call, so a
//! room's resolved piece always matches its doors.

use crate::generation::pieces::{PieceLibrary, PieceRole, ResolvedPiece};
use crate::utils::RandomSource;
use serde::{Deserialize, Serialize};

/// Cardinal directions, in door-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All four directions in door-index order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Healing and widening try neighbors in this order: +X, -X, +Y, -Y.
    pub const REPAIR_PRIORITY: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Index of this direction's door flag.
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// The direction pointing back the other way.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilemaze::Direction;
    ///
    /// assert_eq!(Direction::North.opposite(), Direction::South);
    /// assert_eq!(Direction::West.opposite(), Direction::East);
    /// ```
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Grid delta; rows grow downward so North is `(0, -1)`.
    pub fn to_delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Open/closed flag for each of the four doors of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DoorState([bool; 4]);

impl DoorState {
    /// Builds a door state from `[north, east, south, west]`.
    pub fn new(doors: [bool; 4]) -> Self {
        Self(doors)
    }

    /// All doors closed.
    pub fn closed() -> Self {
        Self::default()
    }

    pub fn is_open(self, direction: Direction) -> bool {
        self.0[direction.index()]
    }

    pub fn open(&mut self, direction: Direction) {
        self.0[direction.index()] = true;
    }

    /// Number of open doors.
    pub fn open_count(self) -> usize {
        self.0.iter().filter(|&&open| open).count()
    }

    /// Open directions in door-index order.
    pub fn open_directions(self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&d| self.is_open(d))
            .collect()
    }

    pub fn as_array(self) -> [bool; 4] {
        self.0
    }
}

/// One cell of the maze grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Column in the room grid
    pub x: usize,
    /// Row in the room grid
    pub y: usize,
    /// Door flags
    pub doors: DoorState,
    /// Piece matching `doors`; `None` while no door is open
    pub piece: Option<ResolvedPiece>,
    /// Visited by the carver
    pub used: bool,
    /// Exactly one door open, or backtracked by the carver since the last
    /// door change
    pub dead_end: bool,
    /// Carve start marker
    pub first: bool,
}

impl Room {
    /// Creates a room with every door closed.
    pub fn new(x: usize, y: usize) -> Self {
        Self {
            x,
            y,
            doors: DoorState::closed(),
            piece: None,
            used: false,
            dead_end: false,
            first: false,
        }
    }

    pub fn door_count(&self) -> usize {
        self.doors.open_count()
    }

    /// Role implied by the current doors.
    pub fn role(&self) -> Option<PieceRole> {
        PieceRole::resolve(self.doors)
    }

    /// Re-rolls the visual variant for the current doors and refreshes the
    /// dead-end flag. Must run after every door change.
    pub fn resolve_piece<R: RandomSource + ?Sized>(&mut self, library: &PieceLibrary, rng: &mut R) {
        self.piece = PieceRole::resolve(self.doors).map(|role| library.choose(role, rng));
        self.dead_end = self.door_count() == 1;
    }
}

/// Fixed-size grid of rooms, addressed by `(x, y)` with `x` the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    width: usize,
    height: usize,
    rooms: Vec<Room>,
}

impl MazeGrid {
    /// Creates a `width` x `height` grid of closed rooms.
    pub fn new(width: usize, height: usize) -> Self {
        let mut rooms = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                rooms.push(Room::new(x, y));
            }
        }
        Self {
            width,
            height,
            rooms,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn room(&self, x: usize, y: usize) -> Option<&Room> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.rooms.get(y * self.width + x)
    }

    pub fn room_mut(&mut self, x: usize, y: usize) -> Option<&mut Room> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.rooms.get_mut(y * self.width + x)
    }

    /// All rooms, row by row.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter()
    }

    /// All rooms in compositing order: column by column, top to bottom.
    pub fn rooms_by_column(&self) -> impl Iterator<Item = &Room> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).filter_map(move |y| self.room(x, y)))
    }

    /// Coordinates of the neighbor in `direction`, if it is on the grid.
    pub fn neighbor(&self, x: usize, y: usize, direction: Direction) -> Option<(usize, usize)> {
        let (dx, dy) = direction.to_delta();
        let nx = x as i64 + dx as i64;
        let ny = y as i64 + dy as i64;
        self.contains(nx, ny).then(|| (nx as usize, ny as usize))
    }

    /// Opens the door from `(x, y)` toward `direction` and the reciprocal door
    /// on the neighbor, re-resolving both pieces.
    ///
    /// Returns the neighbor's coordinates, or `None` (and changes nothing)
    /// when the neighbor would be off the grid.
    pub fn connect<R: RandomSource + ?Sized>(
        &mut self,
        x: usize,
        y: usize,
        direction: Direction,
        library: &PieceLibrary,
        rng: &mut R,
    ) -> Option<(usize, usize)> {
        let (nx, ny) = self.neighbor(x, y, direction)?;

        if let Some(room) = self.room_mut(x, y) {
            room.doors.open(direction);
            room.resolve_piece(library, rng);
        }
        if let Some(other) = self.room_mut(nx, ny) {
            other.doors.open(direction.opposite());
            other.resolve_piece(library, rng);
        }

        Some((nx, ny))
    }

    /// Rooms reachable from `(x, y)` through open doors, including itself.
    pub fn reachable_from(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        if self.room(x, y).is_none() {
            return Vec::new();
        }
        pathfinding::directed::bfs::bfs_reach((x, y), |&(cx, cy)| {
            self.room(cx, cy)
                .map(|room| room.doors.open_directions())
                .unwrap_or_default()
                .into_iter()
                .filter_map(move |d| self.neighbor(cx, cy, d))
        })
        .collect()
    }

    /// Whether every room can reach every other room.
    pub fn is_connected(&self) -> bool {
        self.is_empty() || self.reachable_from(0, 0).len() == self.len()
    }

    /// Whether every open door has a matching open door on the other side and
    /// no door leads off the grid.
    pub fn doors_are_reciprocal(&self) -> bool {
        self.rooms.iter().all(|room| {
            Direction::ALL.into_iter().all(|d| {
                match self.neighbor(room.x, room.y, d).and_then(|(nx, ny)| self.room(nx, ny)) {
                    Some(other) => room.doors.is_open(d) == other.doors.is_open(d.opposite()),
                    None => !room.doors.is_open(d),
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_opposites_are_involutions() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            assert_ne!(d.opposite(), d);
            let (dx, dy) = d.to_delta();
            let (ox, oy) = d.opposite().to_delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_door_state_counts() {
        let mut doors = DoorState::closed();
        assert_eq!(doors.open_count(), 0);
        doors.open(Direction::East);
        doors.open(Direction::East);
        doors.open(Direction::South);
        assert_eq!(doors.open_count(), 2);
        assert_eq!(doors.open_directions(), vec![Direction::East, Direction::South]);
    }

    #[test]
    fn test_new_room_is_unresolved() {
        let room = Room::new(3, 4);
        assert_eq!(room.door_count(), 0);
        assert!(room.piece.is_none());
        assert!(room.role().is_none());
        assert!(!room.used && !room.dead_end && !room.first);
    }

    #[test]
    fn test_connect_is_reciprocal_and_resolves() {
        let library = PieceLibrary::builtin();
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = MazeGrid::new(3, 3);

        let next = grid.connect(1, 1, Direction::North, &library, &mut rng);
        assert_eq!(next, Some((1, 0)));

        let here = grid.room(1, 1).unwrap();
        let there = grid.room(1, 0).unwrap();
        assert!(here.doors.is_open(Direction::North));
        assert!(there.doors.is_open(Direction::South));
        assert_eq!(here.piece.map(|p| p.role), Some(PieceRole::EndNorth));
        assert_eq!(there.piece.map(|p| p.role), Some(PieceRole::EndSouth));
        assert!(here.dead_end && there.dead_end);
        assert!(grid.doors_are_reciprocal());
    }

    #[test]
    fn test_connect_off_grid_changes_nothing() {
        let library = PieceLibrary::builtin();
        let mut rng = StdRng::seed_from_u64(5);
        let mut grid = MazeGrid::new(2, 2);
        let before = grid.clone();

        assert_eq!(grid.connect(0, 0, Direction::West, &library, &mut rng), None);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_piece_tracks_door_changes() {
        let library = PieceLibrary::builtin();
        let mut rng = StdRng::seed_from_u64(11);
        let mut grid = MazeGrid::new(3, 3);

        grid.connect(1, 1, Direction::East, &library, &mut rng);
        grid.connect(1, 1, Direction::West, &library, &mut rng);
        assert_eq!(grid.room(1, 1).unwrap().piece.map(|p| p.role), Some(PieceRole::Horizontal));

        grid.connect(1, 1, Direction::North, &library, &mut rng);
        assert_eq!(grid.room(1, 1).unwrap().piece.map(|p| p.role), Some(PieceRole::TeeNoSouth));
        assert!(!grid.room(1, 1).unwrap().dead_end);
    }

    #[test]
    fn test_variant_rerolled_on_every_connect() {
        let library = PieceLibrary::builtin();
        let mut rng = StdRng::seed_from_u64(21);
        let mut grid = MazeGrid::new(2, 1);
        let mut seen = std::collections::BTreeSet::new();

        for _ in 0..50 {
            grid.connect(0, 0, Direction::East, &library, &mut rng);
            let piece = grid.room(0, 0).and_then(|r| r.piece).unwrap();
            assert_eq!(piece.role, PieceRole::EndEast);
            seen.insert(piece.variant);
        }

        assert!(seen.len() > 1, "variants seen: {:?}", seen);
    }

    #[test]
    fn test_role_independent_of_seed() {
        let library = PieceLibrary::builtin();
        let mut seen = std::collections::BTreeSet::new();

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut grid = MazeGrid::new(2, 1);
            grid.connect(0, 0, Direction::East, &library, &mut rng);

            let here = grid.room(0, 0).and_then(|r| r.piece).unwrap();
            let there = grid.room(1, 0).and_then(|r| r.piece).unwrap();
            assert_eq!(here.role, PieceRole::EndEast);
            assert_eq!(there.role, PieceRole::EndWest);
            seen.insert(here.variant);
        }

        assert_eq!(seen.len(), library.variants(PieceRole::EndEast).len());
    }

    #[test]
    fn test_connectivity_check() {
        let library = PieceLibrary::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        let mut grid = MazeGrid::new(2, 1);
        assert!(!grid.is_connected());

        grid.connect(0, 0, Direction::East, &library, &mut rng);
        assert!(grid.is_connected());
        assert_eq!(grid.reachable_from(1, 0).len(), 2);
    }

    #[test]
    fn test_column_order() {
        let grid = MazeGrid::new(2, 3);
        let order: Vec<_> = grid.rooms_by_column().map(|r| (r.x, r.y)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }
}
