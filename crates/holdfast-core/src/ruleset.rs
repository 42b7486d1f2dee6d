//! Rule constants and the move-legality / takeover policy.
//!
//! All three rule variants share one algorithm; a [`Ruleset`] is nothing
//! but the plain data that parameterizes it (level cap, upkeep table,
//! draft cost, merge flag). There is no dispatch: pick the record at game
//! start and pass it around.
//!
//! Legality is answered by [`Ruleset::is_blocked`], which returns a
//! [`Verdict`] value; an illegal move is an expected outcome, never an
//! error. Takeover resolution lives in [`Ruleset::takeover_attempt`] and
//! is deterministic except for the level-cap mirror match, which is a fair
//! coin flip from the board's RNG.

use hexfield::HexCoord;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::actor::{Actor, ActorId};
use crate::board::Board;
use crate::connectivity;

/// Why a move is not allowed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockReason {
    /// The target is the mover's own tile.
    NullMove,
    /// The target holds a same-side actor and no merge is possible.
    SameSide,
    /// A defender (on the target or supporting it) is too strong.
    TooWeak,
    /// The soldier has already moved this turn.
    AlreadyMoved,
    /// The target tile is unowned space.
    EmptySpace,
    /// No tile of the mover's island is adjacent to the target.
    OutOfIsland,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::NullMove => "nullmove",
            Self::SameSide => "sameside",
            Self::TooWeak => "tooweak",
            Self::AlreadyMoved => "alreadymoved",
            Self::EmptySpace => "spaceisnotlegal",
            Self::OutOfIsland => "outofisland",
        };
        f.write_str(code)
    }
}

/// Outcome of a legality check.
///
/// A blocked verdict names the tile that caused the block — the target
/// itself for most reasons, or the supporting defender's tile for a
/// support block — so a UI can point at it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The move may proceed.
    Legal,
    /// The move is not allowed.
    Blocked {
        /// Why the move is blocked.
        reason: BlockReason,
        /// The tile responsible for the block.
        at: HexCoord,
    },
}

impl Verdict {
    /// Returns true when the move may proceed.
    #[must_use]
    pub const fn is_legal(self) -> bool {
        matches!(self, Self::Legal)
    }

    /// The block reason, if blocked.
    #[must_use]
    pub const fn reason(self) -> Option<BlockReason> {
        match self {
            Self::Legal => None,
            Self::Blocked { reason, .. } => Some(reason),
        }
    }
}

/// Which named rule variant to play under.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulesetKind {
    /// The modern default rules.
    Standard,
    /// Conquer-like rules: no merging, cheap drafts.
    Classic,
    /// Slay-like rules: low level cap, steep upkeep.
    Slay,
}

impl RulesetKind {
    /// The parameter record for this variant.
    #[must_use]
    pub fn rules(self) -> Ruleset {
        match self {
            Self::Standard => Ruleset::standard(),
            Self::Classic => Ruleset::classic(),
            Self::Slay => Ruleset::slay(),
        }
    }
}

/// Immutable rule constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    /// Highest soldier level.
    pub max_level: u8,
    /// Supply cost of one draft or upgrade.
    pub draft_cost: i32,
    /// Whether same-side soldiers may merge.
    pub allow_merge: bool,
    /// Per-turn upkeep by level; index `level - 1`.
    upkeep: Vec<i32>,
}

impl Ruleset {
    /// The modern default rules: levels to 6, merging on, upkeep 2..=7.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            max_level: 6,
            draft_cost: 2,
            allow_merge: true,
            upkeep: vec![2, 3, 4, 5, 6, 7],
        }
    }

    /// Conquer-like rules: merging off, drafts cost 1.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            allow_merge: false,
            draft_cost: 1,
            ..Self::standard()
        }
    }

    /// Slay-like rules: levels to 4, expensive drafts, steep upkeep.
    #[must_use]
    pub fn slay() -> Self {
        Self {
            max_level: 4,
            draft_cost: 10,
            allow_merge: true,
            upkeep: vec![2, 6, 18, 54],
        }
    }

    /// Per-turn upkeep of a soldier at `level`.
    ///
    /// # Panics
    ///
    /// Panics when `level` is outside `1..=max_level`; such a soldier
    /// should never exist.
    #[must_use]
    pub fn upkeep_cost(&self, level: u8) -> i32 {
        assert!(
            (1..=self.max_level).contains(&level),
            "no upkeep defined for level {level}"
        );
        self.upkeep[usize::from(level) - 1]
    }

    /// Checks whether `actor` may move onto `target`.
    ///
    /// Pure with respect to the board: repeated calls without a board
    /// mutation in between return identical verdicts. Checks are applied
    /// in a fixed precedence:
    ///
    /// 1. target is the mover's own tile (`nullmove`);
    /// 2. target holds a same-side actor — legal only as a merge between
    ///    soldiers whose combined level fits under the cap (`sameside`);
    /// 3. an enemy soldier on the target outranks a below-cap attacker, or
    ///    an enemy dump faces a level-1 attacker (`tooweak`);
    /// 4. the mover already moved this turn (`alreadymoved`);
    /// 5. the target is unowned or off the board (`spaceisnotlegal`);
    /// 6. no tile of the mover's island borders the target
    ///    (`outofisland`);
    /// 7. a supporting defender — an enemy actor on a neighbor of the
    ///    target sharing the target's owner — outranks the attacker, or is
    ///    a dump against a level-1 attacker (`tooweak`, citing the
    ///    supporter's tile). The scan covers the target's six neighbors
    ///    only, never the target itself.
    ///
    /// # Panics
    ///
    /// Panics when `actor_id` does not resolve; legality questions about
    /// dead actors are a caller bug.
    #[must_use]
    pub fn is_blocked(&self, board: &Board, actor_id: ActorId, target: HexCoord) -> Verdict {
        let actor = board
            .roster()
            .get(actor_id)
            .unwrap_or_else(|| panic!("legality check for unknown actor {actor_id}"));
        let blocked = |reason, at| Verdict::Blocked { reason, at };

        if let Some(defender) = board.roster().actor_at(target) {
            if defender.id == actor.id {
                // Without this case a low soldier could "merge" with itself.
                return blocked(BlockReason::NullMove, target);
            }
            if defender.side == actor.side {
                let merge_fits = self.allow_merge
                    && defender.is_soldier()
                    && actor.is_soldier()
                    && defender.level() + actor.level() <= self.max_level;
                if merge_fits {
                    return Verdict::Legal;
                }
                return blocked(BlockReason::SameSide, target);
            }
            if actor.level() < self.max_level
                && defender.is_soldier()
                && defender.level() >= actor.level()
            {
                return blocked(BlockReason::TooWeak, target);
            }
            if defender.is_dump() && actor.level() < 2 {
                return blocked(BlockReason::TooWeak, target);
            }
        }

        if actor.has_moved() {
            return blocked(BlockReason::AlreadyMoved, target);
        }

        let target_owner = match board.grid().get(target) {
            Some(owner) if !owner.is_neutral() => owner,
            // Empty space can't be conquered; off-board doubly so.
            _ => return blocked(BlockReason::EmptySpace, target),
        };

        let island = connectivity::island_of(board, actor.pos);
        let reaches = target
            .neighbors()
            .any(|n| board.grid().in_bounds(n) && island.contains(&n));
        if !reaches {
            return blocked(BlockReason::OutOfIsland, target);
        }

        // Support check: defenders standing on the target's same-owner
        // neighbors protect the approach.
        for neighbor in target.neighbors() {
            if board.grid().get(neighbor) != Some(target_owner) {
                continue;
            }
            let Some(supporter) = board.roster().actor_at(neighbor) else {
                continue;
            };
            if supporter.side == actor.side {
                continue;
            }
            if supporter.is_dump() && actor.level() == 1 {
                // A dump holds off level-1 attackers.
                return blocked(BlockReason::TooWeak, neighbor);
            }
            // Level-cap attackers ignore soldier supporters.
            if actor.level() < self.max_level
                && supporter.is_soldier()
                && supporter.level() >= actor.level()
            {
                return blocked(BlockReason::TooWeak, neighbor);
            }
        }

        Verdict::Legal
    }

    /// Resolves whether `attacker` takes over `defender`'s tile.
    ///
    /// Dumps fall to any attacker of level 2 or higher. Two soldiers at
    /// the level cap resolve by fair coin flip; otherwise the attacker
    /// wins exactly when its level is strictly greater.
    pub fn takeover_attempt<R: Rng>(&self, rng: &mut R, attacker: &Actor, defender: &Actor) -> bool {
        if defender.is_dump() {
            attacker.level() >= 2
        } else if attacker.level() == self.max_level && defender.level() == self.max_level {
            rng.gen_bool(0.5)
        } else {
            attacker.level() > defender.level()
        }
    }
}
