//! # Piece Library
//!
//! Authored 8x11 tile patterns, grouped by the structural role they play in
//! the maze, plus the pure function that picks a role for a door state.

use crate::codec::TileGrid;
use crate::config::{PIECE_HEIGHT, PIECE_WIDTH};
use crate::generation::builtin;
use crate::generation::rooms::DoorState;
use crate::utils::RandomSource;
use crate::{TilemazeError, TilemazeResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Structural role of a piece, derived from which doors are open.
///
/// Tees are named by their closed side, ends by their single open side and
/// corners by their two open sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceRole {
    Intersection,
    TeeNoNorth,
    TeeNoEast,
    TeeNoSouth,
    TeeNoWest,
    EndNorth,
    EndEast,
    EndSouth,
    EndWest,
    Horizontal,
    Vertical,
    CornerNorthEast,
    CornerEastSouth,
    CornerSouthWest,
    CornerWestNorth,
}

impl PieceRole {
    pub const ALL: [PieceRole; 15] = [
        PieceRole::Intersection,
        PieceRole::TeeNoNorth,
        PieceRole::TeeNoEast,
        PieceRole::TeeNoSouth,
        PieceRole::TeeNoWest,
        PieceRole::EndNorth,
        PieceRole::EndEast,
        PieceRole::EndSouth,
        PieceRole::EndWest,
        PieceRole::Horizontal,
        PieceRole::Vertical,
        PieceRole::CornerNorthEast,
        PieceRole::CornerEastSouth,
        PieceRole::CornerSouthWest,
        PieceRole::CornerWestNorth,
    ];

    /// Maps a door state to its role. No open doors has no role.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilemaze::{DoorState, PieceRole};
    ///
    /// let all_open = DoorState::new([true, true, true, true]);
    /// assert_eq!(PieceRole::resolve(all_open), Some(PieceRole::Intersection));
    /// assert_eq!(PieceRole::resolve(DoorState::closed()), None);
    /// ```
    pub fn resolve(doors: DoorState) -> Option<PieceRole> {
        let role = match doors.as_array() {
            [true, true, true, true] => PieceRole::Intersection,

            [false, true, true, true] => PieceRole::TeeNoNorth,
            [true, false, true, true] => PieceRole::TeeNoEast,
            [true, true, false, true] => PieceRole::TeeNoSouth,
            [true, true, true, false] => PieceRole::TeeNoWest,

            [true, false, false, false] => PieceRole::EndNorth,
            [false, true, false, false] => PieceRole::EndEast,
            [false, false, true, false] => PieceRole::EndSouth,
            [false, false, false, true] => PieceRole::EndWest,

            [false, true, false, true] => PieceRole::Horizontal,
            [true, false, true, false] => PieceRole::Vertical,

            [true, true, false, false] => PieceRole::CornerNorthEast,
            [false, true, true, false] => PieceRole::CornerEastSouth,
            [false, false, true, true] => PieceRole::CornerSouthWest,
            [true, false, false, true] => PieceRole::CornerWestNorth,

            [false, false, false, false] => return None,
        };

        Some(role)
    }

    /// The door state this role is drawn for.
    pub fn doors(self) -> DoorState {
        let open = match self {
            PieceRole::Intersection => [true, true, true, true],
            PieceRole::TeeNoNorth => [false, true, true, true],
            PieceRole::TeeNoEast => [true, false, true, true],
            PieceRole::TeeNoSouth => [true, true, false, true],
            PieceRole::TeeNoWest => [true, true, true, false],
            PieceRole::EndNorth => [true, false, false, false],
            PieceRole::EndEast => [false, true, false, false],
            PieceRole::EndSouth => [false, false, true, false],
            PieceRole::EndWest => [false, false, false, true],
            PieceRole::Horizontal => [false, true, false, true],
            PieceRole::Vertical => [true, false, true, false],
            PieceRole::CornerNorthEast => [true, true, false, false],
            PieceRole::CornerEastSouth => [false, true, true, false],
            PieceRole::CornerSouthWest => [false, false, true, true],
            PieceRole::CornerWestNorth => [true, false, false, true],
        };
        DoorState::new(open)
    }
}

/// A role plus the index of the variant picked for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedPiece {
    pub role: PieceRole,
    pub variant: usize,
}

/// On-disk piece catalog: every variant as a base64 + zlib payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceCatalog {
    #[serde(default = "default_piece_width")]
    pub width: usize,
    #[serde(default = "default_piece_height")]
    pub height: usize,
    pub pieces: BTreeMap<PieceRole, Vec<String>>,
}

fn default_piece_width() -> usize {
    PIECE_WIDTH
}

fn default_piece_height() -> usize {
    PIECE_HEIGHT
}

impl PieceCatalog {
    /// Reads a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> TilemazeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Encodes every piece of `library` into a catalog.
    pub fn from_library(library: &PieceLibrary) -> TilemazeResult<Self> {
        let mut pieces = BTreeMap::new();
        for (role, variants) in &library.pieces {
            let encoded = variants
                .iter()
                .map(TileGrid::encode)
                .collect::<TilemazeResult<Vec<_>>>()?;
            pieces.insert(*role, encoded);
        }
        Ok(Self {
            width: library.width,
            height: library.height,
            pieces,
        })
    }
}

/// Every role's visual variants, decoded and ready to stamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceLibrary {
    width: usize,
    height: usize,
    pieces: BTreeMap<PieceRole, Vec<TileGrid>>,
}

impl PieceLibrary {
    /// Builds a library from decoded pieces.
    ///
    /// # Errors
    ///
    /// [`TilemazeError::InvalidConfig`] when a role has no variants or a
    /// piece does not measure `width` x `height`.
    pub fn new(
        width: usize,
        height: usize,
        pieces: BTreeMap<PieceRole, Vec<TileGrid>>,
    ) -> TilemazeResult<Self> {
        for role in PieceRole::ALL {
            let variants = pieces.get(&role).map(Vec::as_slice).unwrap_or_default();
            if variants.is_empty() {
                return Err(TilemazeError::InvalidConfig(format!(
                    "piece catalog has no variants for {:?}",
                    role
                )));
            }
            if let Some(bad) = variants
                .iter()
                .find(|p| p.width() != width || p.height() != height)
            {
                return Err(TilemazeError::InvalidConfig(format!(
                    "{:?} piece is {}x{}, expected {}x{}",
                    role,
                    bad.width(),
                    bad.height(),
                    width,
                    height
                )));
            }
        }

        Ok(Self {
            width,
            height,
            pieces,
        })
    }

    /// The authored default tile set, two variants per role.
    pub fn builtin() -> Self {
        let pieces = PieceRole::ALL
            .into_iter()
            .map(|role| (role, builtin::variants(role)))
            .collect();
        Self {
            width: PIECE_WIDTH,
            height: PIECE_HEIGHT,
            pieces,
        }
    }

    /// Decodes every payload of `catalog`.
    pub fn from_catalog(catalog: &PieceCatalog) -> TilemazeResult<Self> {
        let mut pieces = BTreeMap::new();
        for (role, payloads) in &catalog.pieces {
            let decoded = payloads
                .iter()
                .map(|p| TileGrid::decode(p, catalog.width, catalog.height))
                .collect::<TilemazeResult<Vec<_>>>()?;
            pieces.insert(*role, decoded);
        }
        Self::new(catalog.width, catalog.height, pieces)
    }

    /// Loads and decodes a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> TilemazeResult<Self> {
        let path = path.as_ref();
        log::info!("Loading piece catalog from {}", path.display());
        Self::from_catalog(&PieceCatalog::load(path)?)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn variants(&self, role: PieceRole) -> &[TileGrid] {
        self.pieces.get(&role).map(Vec::as_slice).unwrap_or_default()
    }

    /// Picks a variant of `role` uniformly at random.
    pub fn choose<R: RandomSource + ?Sized>(&self, role: PieceRole, rng: &mut R) -> ResolvedPiece {
        let count = self.variants(role).len();
        ResolvedPiece {
            role,
            variant: rng.index(count),
        }
    }

    /// The tiles of a resolved piece.
    pub fn piece(&self, resolved: &ResolvedPiece) -> Option<&TileGrid> {
        self.variants(resolved.role).get(resolved.variant)
    }
}
