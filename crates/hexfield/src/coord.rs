//! Offset hex coordinates and their neighbor tables.
//!
//! The grid uses "odd-row shifted" offset coordinates: tiles are addressed
//! by `(x, y)` integer pairs, and the six hex neighbors of a tile depend on
//! the parity of its row. Two static offset tables encode the layout; all
//! adjacency in the crate goes through [`HexCoord::neighbors`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Neighbor offsets for tiles on even rows (`y % 2 == 0`).
pub const EVEN_ROW_NEIGHBORS: [(i32, i32); 6] = [
    (1, 0),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
];

/// Neighbor offsets for tiles on odd rows (`y % 2 != 0`).
pub const ODD_ROW_NEIGHBORS: [(i32, i32); 6] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, -1),
];

/// A tile address on the offset hex grid.
///
/// Coordinates may be negative or out of bounds; bounds checking is the
/// grid's job, not the coordinate's. `HexCoord` is `Ord` so collections of
/// coordinates iterate in a stable, platform-independent order.
///
/// # Example
///
/// ```
/// use hexfield::HexCoord;
///
/// let c = HexCoord::new(4, 3);
/// assert_eq!(c.neighbors().count(), 6);
/// // Odd rows shift right: (x+1, y+1) is a neighbor, (x-1, y+1) is not.
/// assert!(c.neighbors().any(|n| n == HexCoord::new(5, 4)));
/// assert!(!c.neighbors().any(|n| n == HexCoord::new(3, 4)));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    /// Column index.
    pub x: i32,
    /// Row index; parity selects the neighbor table.
    pub y: i32,
}

impl HexCoord {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbor offset table for this tile's row parity.
    #[must_use]
    pub const fn row_offsets(self) -> &'static [(i32, i32); 6] {
        if self.y % 2 == 0 {
            &EVEN_ROW_NEIGHBORS
        } else {
            &ODD_ROW_NEIGHBORS
        }
    }

    /// Iterates the six hex neighbors of this tile.
    ///
    /// Neighbors are yielded in table order and are not bounds checked.
    pub fn neighbors(self) -> impl Iterator<Item = Self> {
        self.row_offsets()
            .iter()
            .map(move |&(dx, dy)| Self::new(self.x + dx, self.y + dy))
    }

    /// Returns true if `other` is one of this tile's six neighbors.
    #[must_use]
    pub fn is_adjacent(self, other: Self) -> bool {
        self.neighbors().any(|n| n == other)
    }
}

impl fmt::Debug for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for HexCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn even_row_uses_even_table() {
        let c = HexCoord::new(5, 2);
        let expected: BTreeSet<HexCoord> = EVEN_ROW_NEIGHBORS
            .iter()
            .map(|&(dx, dy)| HexCoord::new(5 + dx, 2 + dy))
            .collect();
        let actual: BTreeSet<HexCoord> = c.neighbors().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn odd_row_uses_odd_table() {
        let c = HexCoord::new(5, 3);
        let expected: BTreeSet<HexCoord> = ODD_ROW_NEIGHBORS
            .iter()
            .map(|&(dx, dy)| HexCoord::new(5 + dx, 3 + dy))
            .collect();
        let actual: BTreeSet<HexCoord> = c.neighbors().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn negative_odd_rows_still_use_odd_table() {
        // -1 % 2 == -1 in Rust; the parity test must not treat it as even.
        let c = HexCoord::new(0, -1);
        assert!(c.neighbors().any(|n| n == HexCoord::new(1, 0)));
        assert!(!c.neighbors().any(|n| n == HexCoord::new(-1, 0)));
    }

    #[test]
    fn adjacency_is_symmetric() {
        // The two tables must agree: if b neighbors a, then a neighbors b,
        // across both row parities.
        for y in 0..4 {
            let a = HexCoord::new(5, y);
            for b in a.neighbors() {
                assert!(b.is_adjacent(a), "{b} does not list {a} back");
            }
        }
    }

    #[test]
    fn six_distinct_neighbors() {
        for y in 0..2 {
            let set: BTreeSet<HexCoord> = HexCoord::new(3, y).neighbors().collect();
            assert_eq!(set.len(), 6);
            assert!(!set.contains(&HexCoord::new(3, y)));
        }
    }

    #[test]
    fn serialization_roundtrip() {
        let c = HexCoord::new(-2, 7);
        let json = serde_json::to_string(&c).unwrap();
        let back: HexCoord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
