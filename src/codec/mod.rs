//! # Grid Codec
//!
//! In-memory tile grids and their compressed transport form.
//!
//! A [`TileGrid`] is a row-major array of 32-bit tile IDs. On the wire a grid
//! travels as the TMX "base64 + zlib" layer encoding: tiles packed as
//! little-endian `u32`, deflated into a zlib stream, then base64 encoded.
//!
//! All writes are clipped. Pieces stamped near a border legitimately hang off
//! the edge of the map, so an out-of-range write is dropped rather than
//! reported.

pub mod payload;

use crate::TilemazeResult;

/// Size in bytes of a single packed tile ID.
pub const TILE_BYTES: usize = 4;

/// Tile ID reserved for "nothing here".
pub const EMPTY_TILE: u32 = 0;

/// A fixed-size, row-major grid of tile IDs.
///
/// # Examples
///
/// ```
/// use tilemaze::TileGrid;
///
/// let mut grid = TileGrid::filled(4, 3, 855);
/// grid.set(1, 2, 0);
/// assert_eq!(grid.get(1, 2), Some(0));
/// assert_eq!(grid.get(4, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<u32>,
}

impl TileGrid {
    /// Creates a grid where every cell holds [`EMPTY_TILE`].
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, EMPTY_TILE)
    }

    /// Creates a grid where every cell holds `id`.
    pub fn filled(width: usize, height: usize, id: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![id; width * height],
        }
    }

    /// Builds a grid from row-major tiles.
    ///
    /// Missing trailing cells are left empty and surplus tiles are ignored,
    /// so the length invariant always holds.
    pub fn from_tiles(width: usize, height: usize, mut tiles: Vec<u32>) -> Self {
        tiles.resize(width * height, EMPTY_TILE);
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Decodes a base64 + zlib payload into a `width` x `height` grid.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TilemazeError::Decode`] when the payload is not valid
    /// base64 or not a valid zlib stream.
    pub fn decode(payload: &str, width: usize, height: usize) -> TilemazeResult<Self> {
        let bytes = payload::decompress(payload)?;
        Ok(Self::from_le_bytes(&bytes, width, height))
    }

    /// Encodes the grid as a base64 + zlib payload.
    pub fn encode(&self) -> TilemazeResult<String> {
        payload::compress(&self.to_le_bytes())
    }

    /// Unpacks little-endian tile IDs. A trailing partial tile is ignored.
    pub fn from_le_bytes(bytes: &[u8], width: usize, height: usize) -> Self {
        let tiles = bytes
            .chunks_exact(TILE_BYTES)
            .take(width * height)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();
        Self::from_tiles(width, height, tiles)
    }

    /// Packs the tile IDs as little-endian bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.tiles.iter().flat_map(|tile| tile.to_le_bytes()).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (`width * height`).
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Row-major view of every tile.
    pub fn tiles(&self) -> &[u32] {
        &self.tiles
    }

    /// Overwrites every cell with `id`.
    pub fn fill(&mut self, id: u32) {
        self.tiles.iter_mut().for_each(|tile| *tile = id);
    }

    /// Reads the tile at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y * self.width + x).copied()
    }

    /// Writes the tile at `(x, y)`. Writes outside the grid are dropped.
    pub fn set(&mut self, x: usize, y: usize, id: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.set_index((y * self.width + x) as i64, id);
    }

    /// Reads by flat row-major index; negative or past-the-end gives `None`.
    pub fn get_index(&self, index: i64) -> Option<u32> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.tiles.get(i).copied())
    }

    /// Writes by flat row-major index; negative or past-the-end is dropped.
    ///
    /// Flat indices wrap across rows, so `index + 1` at the end of a row is
    /// the first cell of the next row.
    pub fn set_index(&mut self, index: i64, id: u32) {
        if let Some(tile) = usize::try_from(index)
            .ok()
            .and_then(|i| self.tiles.get_mut(i))
        {
            *tile = id;
        }
    }

    /// Copies every cell of `piece` into this grid with its top-left corner at
    /// `(origin_x, origin_y)`.
    ///
    /// The destination index is computed in flat space: the piece row index
    /// wraps every `piece.width()` cells and each row lands one grid row
    /// further down. Destination indices outside the grid are skipped, so a
    /// piece partially off the grid is clipped rather than rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilemaze::TileGrid;
    ///
    /// let mut map = TileGrid::new(4, 4);
    /// let piece = TileGrid::filled(2, 2, 7);
    /// map.patch_region(&piece, 3, 3);
    /// assert_eq!(map.get(3, 3), Some(7));
    /// assert_eq!(map.tiles().iter().filter(|&&t| t == 7).count(), 1);
    /// ```
    pub fn patch_region(&mut self, piece: &TileGrid, origin_x: i64, origin_y: i64) {
        if piece.width == 0 {
            return;
        }
        let width = self.width as i64;
        for (i, &tile) in piece.tiles.iter().enumerate() {
            let row = (i / piece.width) as i64;
            let col = (i % piece.width) as i64;
            let index = (origin_y + row) * width + origin_x + col;
            self.set_index(index, tile);
        }
    }

    /// Number of cells holding `id`.
    pub fn count(&self, id: u32) -> usize {
        self.tiles.iter().filter(|&&tile| tile == id).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = TileGrid::filled(100, 100, 855);
        assert_eq!(grid.len(), 10_000);
        assert_eq!(grid.width(), 100);
        assert_eq!(grid.height(), 100);
        assert_eq!(grid.count(855), 10_000);
    }

    #[test]
    fn test_fill_overwrites_every_cell() {
        let mut grid = TileGrid::from_tiles(3, 2, vec![1, 2, 3, 4, 5, 6]);
        grid.fill(74);
        assert!(grid.tiles().iter().all(|&t| t == 74));
    }

    #[test]
    fn test_from_tiles_pads_and_truncates() {
        let short = TileGrid::from_tiles(2, 2, vec![9]);
        assert_eq!(short.tiles(), &[9, 0, 0, 0]);

        let long = TileGrid::from_tiles(2, 1, vec![1, 2, 3]);
        assert_eq!(long.tiles(), &[1, 2]);
    }

    #[test]
    fn test_out_of_range_writes_are_dropped() {
        let mut grid = TileGrid::new(3, 3);
        grid.set(3, 0, 5);
        grid.set(0, 3, 5);
        grid.set_index(-1, 5);
        grid.set_index(9, 5);
        grid.set_index(i64::MAX, 5);
        grid.set_index(i64::MIN, 5);
        assert_eq!(grid.count(5), 0);
        assert_eq!(grid.len(), 9);
    }

    #[test]
    fn test_flat_index_wraps_rows() {
        let mut grid = TileGrid::new(3, 2);
        grid.set_index(3, 8);
        assert_eq!(grid.get(0, 1), Some(8));
        assert_eq!(grid.get_index(-4), None);
    }

    #[test]
    fn test_le_byte_layout() {
        let grid = TileGrid::from_tiles(2, 1, vec![0x0102_0304, 855]);
        let bytes = grid.to_le_bytes();
        assert_eq!(&bytes[0..4], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(TileGrid::from_le_bytes(&bytes, 2, 1), grid);
    }

    #[test]
    fn test_patch_region_places_piece_rows() {
        let mut map = TileGrid::new(10, 10);
        let piece = TileGrid::from_tiles(2, 3, vec![1, 2, 3, 4, 5, 6]);
        map.patch_region(&piece, 4, 2);

        assert_eq!(map.get(4, 2), Some(1));
        assert_eq!(map.get(5, 2), Some(2));
        assert_eq!(map.get(4, 3), Some(3));
        assert_eq!(map.get(5, 4), Some(6));
        assert_eq!(map.get(6, 2), Some(0));
    }

    #[test]
    fn test_patch_region_clips_past_the_end() {
        let mut map = TileGrid::new(4, 4);
        let piece = TileGrid::filled(3, 3, 7);
        map.patch_region(&piece, 0, 2);

        // Rows 2 and 3 land, row 4 is past the end of the buffer.
        assert_eq!(map.count(7), 6);
    }

    #[test]
    fn test_patch_region_negative_origin() {
        let mut map = TileGrid::new(4, 4);
        let piece = TileGrid::filled(2, 2, 7);
        map.patch_region(&piece, 0, -1);
        assert_eq!(map.get(0, 0), Some(7));
        assert_eq!(map.get(1, 0), Some(7));
        assert_eq!(map.count(7), 2);
    }
}
