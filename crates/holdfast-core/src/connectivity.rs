//! Connectivity queries over the board.
//!
//! Everything here reduces to [`hexfield::flood_fill`] over the board's
//! ownership grid: which tiles form an island, which enemy tiles border
//! it, where an island's dumps are, and whether the whole map is one
//! landmass. These are the queries the ruleset, the economy, and the AI
//! ask many times per turn.

use std::collections::BTreeSet;

use hexfield::{flood_fill, is_single_landmass, HexCoord, SideMask};
use tracing::warn;

use crate::board::Board;
use crate::event::{DestroyCause, GameEvent};

/// The tiles of the island containing `tile`.
///
/// An island is the maximal connected set of tiles sharing `tile`'s owner.
/// Crawling from any member tile yields the identical set. The empty set
/// is returned for out-of-bounds tiles.
#[must_use]
pub fn island_of(board: &Board, tile: HexCoord) -> BTreeSet<HexCoord> {
    flood_fill(board.grid(), tile, SideMask::of(board.owner(tile)))
}

/// Enemy tiles adjacent to the island containing `tile`.
///
/// These are the candidate attack targets for a soldier on the island:
/// tiles owned by a *different nonzero* side that touch any island tile.
/// Same-side and neutral neighbors are excluded here; whether an attack is
/// actually legal is the ruleset's call.
#[must_use]
pub fn border_tiles(board: &Board, tile: HexCoord) -> BTreeSet<HexCoord> {
    let owner = board.owner(tile);
    let island = island_of(board, tile);
    let mut border = BTreeSet::new();
    for &member in &island {
        for neighbor in member.neighbors() {
            let side = board.owner(neighbor);
            if board.grid().in_bounds(neighbor) && !side.is_neutral() && side != owner {
                border.insert(neighbor);
            }
        }
    }
    border
}

/// Result of surveying one island for its dumps.
#[derive(Debug, Clone)]
pub struct IslandSurvey {
    /// Tiles of same-side dumps found on the island, in coordinate order.
    pub dumps: Vec<HexCoord>,
    /// Every tile of the island.
    pub area: BTreeSet<HexCoord>,
}

/// Surveys the island containing `tile`, locating its dumps.
///
/// Any actor found on the island whose side differs from the island's
/// owner is stale bookkeeping left behind by an upstream bug; it is purged
/// on sight (with an [`GameEvent::ActorDestroyed`] event) rather than
/// allowed to corrupt the economy.
pub fn dumps_on_island(board: &mut Board, tile: HexCoord) -> IslandSurvey {
    let owner = board.owner(tile);
    let area = island_of(board, tile);
    let mut dumps = Vec::new();
    let mut stale = Vec::new();

    for &member in &area {
        let Some(actor) = board.roster().actor_at(member) else {
            continue;
        };
        if actor.side != owner {
            stale.push(actor.id);
        } else if actor.is_dump() {
            dumps.push(member);
        }
    }

    for id in stale {
        let actor = board.roster_mut().remove(id).expect("stale id just seen");
        warn!(%actor.id, %actor.pos, "purged stale actor from island survey");
        board.push_event(GameEvent::ActorDestroyed {
            side: actor.side,
            at: actor.pos,
            was_dump: actor.is_dump(),
            cause: DestroyCause::Stale,
        });
    }

    IslandSurvey { dumps, area }
}

/// Returns true when every owned tile on the board is part of one
/// connected landmass. Used by random map generation to reject
/// disconnected layouts.
#[must_use]
pub fn is_fully_connected(board: &Board) -> bool {
    is_single_landmass(board.grid())
}
