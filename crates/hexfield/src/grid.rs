//! Dense tile-ownership storage.
//!
//! [`OwnerGrid`] maps every in-bounds [`HexCoord`] to a [`Side`]. The grid
//! is sized once at construction and never grows or shrinks; a game board
//! has a fixed tile count for its whole life.
//!
//! # Snapshot / Restore
//!
//! Move-search callers need to try a mutation and roll it back. The cell
//! array is small (a few hundred bytes at the standard 30×14 board), so
//! [`OwnerGrid::snapshot`] simply clones it and [`OwnerGrid::restore`]
//! copies it back:
//!
//! ```
//! use hexfield::{HexCoord, OwnerGrid, Side};
//!
//! let mut grid = OwnerGrid::new(8, 6);
//! let before = grid.snapshot();
//! grid.set(HexCoord::new(1, 1), Side::new(2));
//! grid.restore(&before);
//! assert_eq!(grid.owner(HexCoord::new(1, 1)), Side::NEUTRAL);
//! ```

use serde::{Deserialize, Serialize};

use crate::coord::HexCoord;
use crate::Side;

/// A saved copy of a grid's ownership cells.
///
/// Produced by [`OwnerGrid::snapshot`] and consumed by
/// [`OwnerGrid::restore`]. Only valid for grids of the same dimensions it
/// was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSnapshot {
    cells: Vec<Side>,
}

/// Fixed-size dense grid of tile owners.
///
/// Out-of-bounds coordinates are not an error for reads ([`OwnerGrid::get`]
/// returns `None`, [`OwnerGrid::owner`] returns neutral); writing out of
/// bounds is a programmer error and panics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerGrid {
    width: i32,
    height: i32,
    cells: Vec<Side>,
}

impl OwnerGrid {
    /// Creates a grid of the given dimensions, entirely neutral.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        let len = usize::try_from(width).unwrap() * usize::try_from(height).unwrap();
        Self {
            width,
            height,
            cells: vec![Side::NEUTRAL; len],
        }
    }

    /// Grid width in tiles.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Grid height in tiles.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Returns true if `coord` addresses a tile of this grid.
    #[must_use]
    pub const fn in_bounds(&self, coord: HexCoord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    #[allow(clippy::cast_sign_loss)]
    const fn index(&self, coord: HexCoord) -> usize {
        // Callers check bounds first; both components are non-negative here.
        coord.y as usize * self.width as usize + coord.x as usize
    }

    /// Returns the owner of `coord`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, coord: HexCoord) -> Option<Side> {
        if self.in_bounds(coord) {
            Some(self.cells[self.index(coord)])
        } else {
            None
        }
    }

    /// Returns the owner of `coord`, treating out-of-bounds as neutral.
    #[must_use]
    pub fn owner(&self, coord: HexCoord) -> Side {
        self.get(coord).unwrap_or(Side::NEUTRAL)
    }

    /// Sets the owner of `coord`.
    ///
    /// # Panics
    ///
    /// Panics when `coord` is out of bounds.
    pub fn set(&mut self, coord: HexCoord, side: Side) {
        assert!(self.in_bounds(coord), "set out of bounds at {coord}");
        let idx = self.index(coord);
        self.cells[idx] = side;
    }

    /// Resets every tile to the given owner.
    pub fn fill(&mut self, side: Side) {
        self.cells.fill(side);
    }

    /// Iterates every coordinate of the grid in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = HexCoord> + '_ {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| HexCoord::new(x, y)))
    }

    /// Iterates every `(coordinate, owner)` pair in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (HexCoord, Side)> + '_ {
        self.coords().map(|c| (c, self.cells[self.index(c)]))
    }

    /// Counts the tiles owned by `side`.
    #[must_use]
    pub fn count(&self, side: Side) -> usize {
        self.cells.iter().filter(|&&s| s == side).count()
    }

    /// Counts the tiles owned by any player side.
    #[must_use]
    pub fn owned_area(&self) -> usize {
        self.cells.iter().filter(|s| !s.is_neutral()).count()
    }

    /// Total tile count of the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the grid has zero tiles. Grids are constructed with
    /// positive dimensions, so this is always false; provided for
    /// `len`/`is_empty` symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Takes a copy of the ownership cells for later [`restore`].
    ///
    /// [`restore`]: OwnerGrid::restore
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            cells: self.cells.clone(),
        }
    }

    /// Reinstates a snapshot taken from this grid.
    ///
    /// # Panics
    ///
    /// Panics when the snapshot's size does not match this grid; that means
    /// it came from a differently-shaped grid.
    pub fn restore(&mut self, snapshot: &GridSnapshot) {
        assert_eq!(
            snapshot.cells.len(),
            self.cells.len(),
            "snapshot taken from a grid of different size"
        );
        self.cells.clone_from(&snapshot.cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_neutral() {
        let grid = OwnerGrid::new(30, 14);
        assert_eq!(grid.len(), 420);
        assert_eq!(grid.owned_area(), 0);
        assert!(grid.coords().all(|c| grid.owner(c).is_neutral()));
    }

    #[test]
    fn set_and_get() {
        let mut grid = OwnerGrid::new(4, 4);
        grid.set(HexCoord::new(2, 3), Side::new(5));
        assert_eq!(grid.get(HexCoord::new(2, 3)), Some(Side::new(5)));
        assert_eq!(grid.count(Side::new(5)), 1);
        assert_eq!(grid.owned_area(), 1);
    }

    #[test]
    fn out_of_bounds_reads_are_neutral() {
        let grid = OwnerGrid::new(4, 4);
        assert_eq!(grid.get(HexCoord::new(-1, 0)), None);
        assert_eq!(grid.get(HexCoord::new(4, 0)), None);
        assert_eq!(grid.owner(HexCoord::new(0, 99)), Side::NEUTRAL);
        assert!(!grid.in_bounds(HexCoord::new(0, -1)));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn out_of_bounds_write_panics() {
        let mut grid = OwnerGrid::new(4, 4);
        grid.set(HexCoord::new(4, 0), Side::new(1));
    }

    #[test]
    fn coords_cover_grid_in_row_major_order() {
        let grid = OwnerGrid::new(3, 2);
        let coords: Vec<HexCoord> = grid.coords().collect();
        assert_eq!(coords.len(), 6);
        assert_eq!(coords[0], HexCoord::new(0, 0));
        assert_eq!(coords[2], HexCoord::new(2, 0));
        assert_eq!(coords[3], HexCoord::new(0, 1));
        assert_eq!(coords[5], HexCoord::new(2, 1));
    }

    #[test]
    fn snapshot_restore_roundtrip() {
        let mut grid = OwnerGrid::new(6, 6);
        grid.set(HexCoord::new(1, 1), Side::new(1));
        let saved = grid.snapshot();

        grid.set(HexCoord::new(1, 1), Side::new(2));
        grid.set(HexCoord::new(5, 5), Side::new(3));
        grid.restore(&saved);

        assert_eq!(grid.owner(HexCoord::new(1, 1)), Side::new(1));
        assert_eq!(grid.owner(HexCoord::new(5, 5)), Side::NEUTRAL);
    }

    #[test]
    #[should_panic(expected = "different size")]
    fn restore_rejects_foreign_snapshot() {
        let other = OwnerGrid::new(2, 2);
        let mut grid = OwnerGrid::new(4, 4);
        grid.restore(&other.snapshot());
    }

    #[test]
    fn fill_overwrites_everything() {
        let mut grid = OwnerGrid::new(3, 3);
        grid.set(HexCoord::new(0, 0), Side::new(4));
        grid.fill(Side::NEUTRAL);
        assert_eq!(grid.owned_area(), 0);
    }

    #[test]
    fn serialization_roundtrip() {
        let mut grid = OwnerGrid::new(5, 3);
        grid.set(HexCoord::new(4, 2), Side::new(6));
        let json = serde_json::to_string(&grid).unwrap();
        let back: OwnerGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
