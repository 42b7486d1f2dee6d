//! # Hexfield
//!
//! Offset-hex grid substrate for territory simulation.
//!
//! Hexfield models a rectangular board of hexagonal tiles addressed by
//! offset coordinates, where each tile is owned by a numeric side. It
//! provides:
//!
//! - **Coordinates**: [`HexCoord`] with the parity-dependent six-neighbor
//!   tables of an offset hex layout
//! - **Storage**: [`OwnerGrid`], a fixed-size dense grid of [`Side`] values
//!   with cheap snapshot/restore for trial-and-rollback callers
//! - **Connectivity**: [`flood_fill`], an iterative region crawl filtered by
//!   a [`SideMask`] of owners
//!
//! No game rules live here; this crate only answers "who owns what, and
//! which tiles hang together".
//!
//! ## Quick Start
//!
//! ```
//! use hexfield::{flood_fill, HexCoord, OwnerGrid, Side, SideMask};
//!
//! let mut grid = OwnerGrid::new(8, 6);
//! grid.set(HexCoord::new(2, 2), Side::new(1));
//! grid.set(HexCoord::new(3, 2), Side::new(1));
//!
//! let island = flood_fill(&grid, HexCoord::new(2, 2), SideMask::of(Side::new(1)));
//! assert_eq!(island.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod coord;
pub mod flood;
pub mod grid;

// Re-exports for convenience
pub use coord::{HexCoord, EVEN_ROW_NEIGHBORS, ODD_ROW_NEIGHBORS};
pub use flood::{flood_fill, is_single_landmass};
pub use grid::{GridSnapshot, OwnerGrid};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The owner of a tile.
///
/// `Side` is a newtype over `u8`. Side `0` is the neutral (unowned) value;
/// sides `1..=6` are player identifiers. The numeric value doubles as the
/// player id in the engine built on top of this crate.
///
/// # Example
///
/// ```
/// use hexfield::Side;
///
/// assert!(Side::NEUTRAL.is_neutral());
/// assert!(!Side::new(3).is_neutral());
/// assert_eq!(Side::new(3).as_u8(), 3);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Side(u8);

impl Side {
    /// The unowned side (empty space).
    pub const NEUTRAL: Self = Self(0);

    /// The largest side id supported by the board format.
    pub const MAX_PLAYERS: u8 = 6;

    /// Creates a side from its raw id.
    ///
    /// # Panics
    ///
    /// Panics if `id` exceeds [`Side::MAX_PLAYERS`]; owner values outside
    /// `0..=6` have no meaning in the grid format.
    #[must_use]
    pub fn new(id: u8) -> Self {
        assert!(
            id <= Self::MAX_PLAYERS,
            "side id {id} out of range 0..={}",
            Self::MAX_PLAYERS
        );
        Self(id)
    }

    /// Returns the raw side id.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Returns true if this is the neutral (unowned) side.
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        self.0 == 0
    }

    /// Iterates over every player side (`1..=6`).
    pub fn players() -> impl Iterator<Item = Self> {
        (1..=Self::MAX_PLAYERS).map(Self)
    }
}

impl fmt::Debug for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Side({})", self.0)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags::bitflags! {
    /// A set of sides, used to filter which owners a flood fill may visit.
    ///
    /// Bit `i` corresponds to side `i`, so the mask covers neutral space
    /// (bit 0) and the six player sides (bits 1..=6).
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SideMask: u8 {
        /// Neutral (unowned) space.
        const NEUTRAL = 1;
        /// Player side 1.
        const P1 = 1 << 1;
        /// Player side 2.
        const P2 = 1 << 2;
        /// Player side 3.
        const P3 = 1 << 3;
        /// Player side 4.
        const P4 = 1 << 4;
        /// Player side 5.
        const P5 = 1 << 5;
        /// Player side 6.
        const P6 = 1 << 6;
    }
}

impl SideMask {
    /// The mask of exactly one side.
    #[must_use]
    pub fn of(side: Side) -> Self {
        Self::from_bits_truncate(1 << side.as_u8())
    }

    /// The mask of every player side, excluding neutral space.
    #[must_use]
    pub fn all_players() -> Self {
        Self::all().difference(Self::NEUTRAL)
    }

    /// Returns true if `side` is in the mask.
    #[must_use]
    pub fn admits(self, side: Side) -> bool {
        self.contains(Self::from_bits_truncate(1 << side.as_u8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_side_is_zero() {
        assert_eq!(Side::NEUTRAL.as_u8(), 0);
        assert!(Side::NEUTRAL.is_neutral());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn side_rejects_out_of_range_ids() {
        let _ = Side::new(7);
    }

    #[test]
    fn players_iterates_one_through_six() {
        let ids: Vec<u8> = Side::players().map(Side::as_u8).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn mask_of_single_side() {
        let mask = SideMask::of(Side::new(3));
        assert!(mask.admits(Side::new(3)));
        assert!(!mask.admits(Side::new(2)));
        assert!(!mask.admits(Side::NEUTRAL));
    }

    #[test]
    fn all_players_excludes_neutral() {
        let mask = SideMask::all_players();
        for side in Side::players() {
            assert!(mask.admits(side));
        }
        assert!(!mask.admits(Side::NEUTRAL));
    }

    #[test]
    fn side_serialization_roundtrip() {
        let json = serde_json::to_string(&Side::new(4)).unwrap();
        let side: Side = serde_json::from_str(&json).unwrap();
        assert_eq!(side, Side::new(4));
    }
}
