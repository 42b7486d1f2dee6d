//! Actors: the soldiers and supply dumps that live on the board.
//!
//! An actor is one unit occupying one tile. There are two kinds:
//!
//! - **Soldiers** fight. They have a level (`1..=max_level` per the active
//!   ruleset) and a once-per-turn moved flag.
//! - **Dumps** bank an island's supplies and carry the last-computed
//!   revenue/expense ledger for it.
//!
//! Actors are identified by [`ActorId`], a stable integer assigned by the
//! roster. Identity never depends on position; an actor keeps its id when
//! it relocates, and a removed id is never reused for lookups.

use hexfield::{HexCoord, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an actor.
///
/// Newtype over `u64`, assigned monotonically by the roster. Ordered by
/// numeric value so collections of ids iterate deterministically.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates an `ActorId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId({})", self.0)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Combat state of a soldier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoldierState {
    /// Strength, `1..=max_level` of the active ruleset.
    pub level: u8,
    /// Set after the soldier has moved this turn; cleared once per full
    /// turn cycle.
    pub moved: bool,
}

/// Ledger state of a supply dump.
///
/// `revenue` and `expenses` are the last-computed per-turn figures for the
/// dump's island; `supplies` is the banked balance and never goes negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DumpState {
    /// Banked supply balance.
    pub supplies: i32,
    /// Last-computed island revenue (one per tile).
    pub revenue: i32,
    /// Last-computed island upkeep total.
    pub expenses: i32,
}

impl DumpState {
    /// Net income of the island per turn at the last ledger refresh.
    #[must_use]
    pub const fn net_income(&self) -> i32 {
        self.revenue - self.expenses
    }
}

/// Kind-specific actor state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// A combat unit.
    Soldier(SoldierState),
    /// An island's supply depot.
    Dump(DumpState),
}

/// One unit on the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Stable identifier, assigned by the roster.
    pub id: ActorId,
    /// Owning side.
    pub side: Side,
    /// Occupied tile. Exactly one actor may occupy a tile.
    pub pos: HexCoord,
    /// Soldier or dump state.
    pub kind: ActorKind,
}

impl Actor {
    /// Returns true if this actor is a supply dump.
    #[must_use]
    pub const fn is_dump(&self) -> bool {
        matches!(self.kind, ActorKind::Dump(_))
    }

    /// Returns true if this actor is a soldier.
    #[must_use]
    pub const fn is_soldier(&self) -> bool {
        matches!(self.kind, ActorKind::Soldier(_))
    }

    /// Soldier state, if this actor is a soldier.
    #[must_use]
    pub const fn as_soldier(&self) -> Option<&SoldierState> {
        match &self.kind {
            ActorKind::Soldier(state) => Some(state),
            ActorKind::Dump(_) => None,
        }
    }

    /// Mutable soldier state, if this actor is a soldier.
    pub fn as_soldier_mut(&mut self) -> Option<&mut SoldierState> {
        match &mut self.kind {
            ActorKind::Soldier(state) => Some(state),
            ActorKind::Dump(_) => None,
        }
    }

    /// Dump state, if this actor is a dump.
    #[must_use]
    pub const fn as_dump(&self) -> Option<&DumpState> {
        match &self.kind {
            ActorKind::Dump(state) => Some(state),
            ActorKind::Soldier(_) => None,
        }
    }

    /// Mutable dump state, if this actor is a dump.
    pub fn as_dump_mut(&mut self) -> Option<&mut DumpState> {
        match &mut self.kind {
            ActorKind::Dump(state) => Some(state),
            ActorKind::Soldier(_) => None,
        }
    }

    /// Soldier level, or 0 for dumps.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.as_soldier().map_or(0, |s| s.level)
    }

    /// Whether this actor has moved this turn. Dumps never move.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.as_soldier().is_some_and(|s| s.moved)
    }
}

/// Convenience constructor for a fresh soldier's kind state.
#[must_use]
pub fn soldier(level: u8) -> ActorKind {
    ActorKind::Soldier(SoldierState {
        level,
        moved: false,
    })
}

/// Convenience constructor for a dump's kind state with a starting balance.
#[must_use]
pub fn dump(supplies: i32) -> ActorKind {
    ActorKind::Dump(DumpState {
        supplies,
        revenue: 0,
        expenses: 0,
    })
}
