//! Iterative flood fill over the ownership grid.
//!
//! The crawl is the primitive every connectivity question reduces to: which
//! tiles are reachable from a start tile through owners admitted by a
//! [`SideMask`]. It is implemented with an explicit stack rather than
//! recursion; an island can span the whole board, and the board bounds the
//! memory the crawl may use.
//!
//! # Start invariance
//!
//! For any two tiles in the same connected region, crawling from either
//! yields the identical set. Callers rely on this to treat "the island of a
//! tile" as a well-defined value.

use std::collections::BTreeSet;

use crate::coord::HexCoord;
use crate::grid::OwnerGrid;
use crate::SideMask;

/// Collects the connected region of `start` over owners admitted by `mask`.
///
/// Returns the empty set when `start` is out of bounds or its owner is not
/// in `mask`. The result is ordered (`BTreeSet`) so iteration over a region
/// is deterministic.
///
/// # Example
///
/// ```
/// use hexfield::{flood_fill, HexCoord, OwnerGrid, Side, SideMask};
///
/// let mut grid = OwnerGrid::new(8, 4);
/// for x in 0..3 {
///     grid.set(HexCoord::new(x, 0), Side::new(1));
/// }
/// grid.set(HexCoord::new(6, 0), Side::new(1)); // separate island
///
/// let island = flood_fill(&grid, HexCoord::new(0, 0), SideMask::of(Side::new(1)));
/// assert_eq!(island.len(), 3);
/// assert!(!island.contains(&HexCoord::new(6, 0)));
/// ```
#[must_use]
pub fn flood_fill(grid: &OwnerGrid, start: HexCoord, mask: SideMask) -> BTreeSet<HexCoord> {
    let mut region = BTreeSet::new();
    let Some(owner) = grid.get(start) else {
        return region;
    };
    if !mask.admits(owner) {
        return region;
    }

    let mut stack = vec![start];
    region.insert(start);
    while let Some(tile) = stack.pop() {
        for next in tile.neighbors() {
            if region.contains(&next) {
                continue;
            }
            match grid.get(next) {
                Some(side) if mask.admits(side) => {
                    region.insert(next);
                    stack.push(next);
                }
                _ => {}
            }
        }
    }
    region
}

/// Returns true if every owned tile on the grid belongs to one connected
/// landmass.
///
/// A grid with no owned tiles is not a landmass and reports `false`. Used
/// by map generation to reject disconnected layouts.
#[must_use]
pub fn is_single_landmass(grid: &OwnerGrid) -> bool {
    let Some(start) = grid.tiles().find(|(_, s)| !s.is_neutral()).map(|(c, _)| c) else {
        return false;
    };
    flood_fill(grid, start, SideMask::all_players()).len() == grid.owned_area()
}
