//! Observable game events.
//!
//! The board records an event for every externally interesting state
//! change — unit deaths, upgrades, dump maintenance, eliminations, victory.
//! The embedding surface (renderer, audio sink, test harness) drains them
//! with [`crate::board::Board::take_events`]; the engine itself never
//! renders or plays anything.

use hexfield::{HexCoord, Side};
use serde::{Deserialize, Serialize};

/// Why an actor left the board.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    /// Lost a takeover, or was defeated defending.
    Combat,
    /// Absorbed into a same-side soldier.
    Merged,
    /// No adjacent same-side tile at end of turn.
    Isolation,
    /// The island's dump ran out of supplies.
    Starvation,
    /// Stale bookkeeping purged during an island survey.
    Stale,
}

/// One externally observable state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new level-1 soldier entered the board.
    SoldierDrafted {
        /// Owning side.
        side: Side,
        /// Where it was placed.
        at: HexCoord,
    },
    /// An existing soldier gained a level.
    SoldierUpgraded {
        /// Owning side.
        side: Side,
        /// The soldier's tile.
        at: HexCoord,
        /// New level after the upgrade.
        level: u8,
    },
    /// An actor was removed from play.
    ActorDestroyed {
        /// Side the actor belonged to.
        side: Side,
        /// Tile it occupied.
        at: HexCoord,
        /// True when the actor was a dump.
        was_dump: bool,
        /// What removed it.
        cause: DestroyCause,
    },
    /// An island without a dump received one.
    DumpPlaced {
        /// Island owner.
        side: Side,
        /// Chosen tile.
        at: HexCoord,
    },
    /// Multiple dumps on one island were merged into one.
    DumpsMerged {
        /// Island owner.
        side: Side,
        /// Surviving dump tile.
        at: HexCoord,
        /// Number of dumps merged away.
        merged: usize,
        /// Combined supply balance.
        supplies: i32,
    },
    /// A player lost their last dump.
    PlayerLost {
        /// The eliminated side.
        side: Side,
    },
    /// A player is the unique survivor; the round is over.
    PlayerWon {
        /// The victorious side.
        side: Side,
    },
}
