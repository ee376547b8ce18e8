//! Built-in piece set.
//!
//! Each piece is drawn from a floor mask: a chamber in the middle of the
//! 8x11 block plus one corridor per open door running to the block edge.
//! Walls around the floor then get the tile that faces it, using the same
//! IDs the default [`crate::compose::TileSet`] keys its shadows on.

use crate::codec::{TileGrid, EMPTY_TILE};
use crate::config::{PIECE_HEIGHT, PIECE_WIDTH};
use crate::generation::pieces::PieceRole;
use crate::generation::rooms::Direction;

const FILL: u32 = 855;
const FACE_LEFT: u32 = 25;
const FACE_MIDDLE: u32 = 26;
const FACE_RIGHT: u32 = 27;
const EDGE_RIGHT: u32 = 856;
const EDGE_LEFT: u32 = 854;
const EDGE_TOP: u32 = 843;
const CORNER_BOTTOM_RIGHT: u32 = 868;

/// Floor rectangle as inclusive `(col0, row0, col1, row1)`.
type Span = (usize, usize, usize, usize);

struct Layout {
    chamber: Span,
    north: Span,
    south: Span,
    east: Span,
    west: Span,
}

const LAYOUTS: [Layout; 2] = [
    // Wide hall
    Layout {
        chamber: (1, 3, 6, 8),
        north: (3, 0, 4, 2),
        south: (3, 9, 4, 10),
        east: (7, 5, 7, 7),
        west: (0, 5, 0, 7),
    },
    // Narrow cell
    Layout {
        chamber: (2, 4, 5, 8),
        north: (3, 0, 4, 3),
        south: (3, 9, 4, 10),
        east: (6, 5, 7, 7),
        west: (0, 5, 1, 7),
    },
];

/// Every built-in variant of `role`.
pub(crate) fn variants(role: PieceRole) -> Vec<TileGrid> {
    LAYOUTS.iter().map(|layout| draw(role, layout)).collect()
}

fn draw(role: PieceRole, layout: &Layout) -> TileGrid {
    let mut floor = [[false; PIECE_WIDTH]; PIECE_HEIGHT];
    let mut carve = |(c0, r0, c1, r1): Span| {
        for row in floor.iter_mut().take(r1 + 1).skip(r0) {
            for cell in row.iter_mut().take(c1 + 1).skip(c0) {
                *cell = true;
            }
        }
    };

    carve(layout.chamber);
    let doors = role.doors();
    for direction in doors.open_directions() {
        carve(match direction {
            Direction::North => layout.north,
            Direction::South => layout.south,
            Direction::East => layout.east,
            Direction::West => layout.west,
        });
    }

    let is_floor = |col: i64, row: i64| -> bool {
        if col < 0 || row < 0 || col >= PIECE_WIDTH as i64 || row >= PIECE_HEIGHT as i64 {
            return false;
        }
        floor[row as usize][col as usize]
    };
    let is_face = |col: i64, row: i64| -> bool {
        col >= 0 && col < PIECE_WIDTH as i64 && !is_floor(col, row) && is_floor(col, row + 1)
    };

    let mut tiles = Vec::with_capacity(PIECE_WIDTH * PIECE_HEIGHT);
    for row in 0..PIECE_HEIGHT as i64 {
        for col in 0..PIECE_WIDTH as i64 {
            let tile = if is_floor(col, row) {
                EMPTY_TILE
            } else if is_face(col, row) {
                match (is_face(col - 1, row), is_face(col + 1, row)) {
                    (false, true) => FACE_LEFT,
                    (true, false) => FACE_RIGHT,
                    _ => FACE_MIDDLE,
                }
            } else if is_floor(col + 1, row) {
                if is_floor(col + 1, row + 1) {
                    EDGE_RIGHT
                } else {
                    CORNER_BOTTOM_RIGHT
                }
            } else if is_floor(col - 1, row) {
                EDGE_LEFT
            } else if is_floor(col, row - 1) {
                EDGE_TOP
            } else {
                FILL
            };
            tiles.push(tile);
        }
    }

    TileGrid::from_tiles(PIECE_WIDTH, PIECE_HEIGHT, tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openings_reach_the_block_edge() {
        for layout in &LAYOUTS {
            let piece = draw(PieceRole::Intersection, layout);
            assert_eq!(piece.get(3, 0), Some(EMPTY_TILE));
            assert_eq!(piece.get(3, PIECE_HEIGHT - 1), Some(EMPTY_TILE));
            assert_eq!(piece.get(0, 6), Some(EMPTY_TILE));
            assert_eq!(piece.get(PIECE_WIDTH - 1, 6), Some(EMPTY_TILE));
        }
    }

    #[test]
    fn test_closed_sides_are_walled() {
        for layout in &LAYOUTS {
            let piece = draw(PieceRole::EndSouth, layout);
            assert_ne!(piece.get(3, 0), Some(EMPTY_TILE));
            assert_ne!(piece.get(0, 6), Some(EMPTY_TILE));
            assert_ne!(piece.get(PIECE_WIDTH - 1, 6), Some(EMPTY_TILE));
            assert_eq!(piece.get(3, PIECE_HEIGHT - 1), Some(EMPTY_TILE));
        }
    }

    #[test]
    fn test_wall_above_chamber_faces_down() {
        let piece = draw(PieceRole::EndSouth, &LAYOUTS[0]);
        // Row 2 sits directly above the chamber's first row.
        assert_eq!(piece.get(1, 2), Some(FACE_LEFT));
        assert_eq!(piece.get(3, 2), Some(FACE_MIDDLE));
        assert_eq!(piece.get(6, 2), Some(FACE_RIGHT));
    }
}
