//! The heuristic AI controller.
//!
//! Runs once per AI-controlled turn in two phases:
//!
//! - **Economy**: per owned dump, either draft new soldiers onto the
//!   island (when it has far more vacant tiles than soldiers) or upgrade
//!   the garrison, in both cases only while the dump can afford the draft
//!   cost and the island's income exceeds its upkeep.
//! - **Move search**: for each unmoved soldier, shuffle its island's
//!   border tiles, simulate legal candidates against the board
//!   (snapshotting and restoring the ownership grid around every trial),
//!   score them, and commit the best once enough candidates have been
//!   scored.
//!
//! All randomness — target shuffling, vacant-tile sampling, the combat
//! coin flip inside simulations — draws from the board's own RNG, so an
//! AI turn is a pure function of the board state and its seed.
//!
//! The number of search passes over the pending soldiers is a fixed
//! engine constant; the per-soldier candidate budget (`breadth`) comes
//! from [`GameConfig`] at game start.

use std::collections::BTreeSet;

use hexfield::HexCoord;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::actor::ActorId;
use crate::board::{Board, MoveOutcome};
use crate::config::GameConfig;
use crate::connectivity;

/// Passes the move search makes over the pending soldier set. Soldiers
/// that found no legal candidate get another look each pass.
pub const SEARCH_PASSES: usize = 3;

/// Attempt budget for sampling a vacant island tile to draft on. Running
/// out means the island is effectively full; drafting stops cleanly.
const VACANT_SAMPLING_ATTEMPTS: usize = 100;

/// One committed move, for the caller to visualize if it wants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDecision {
    /// Tile the soldier stood on when the decision was made.
    pub from: HexCoord,
    /// Tile it attacked.
    pub to: HexCoord,
}

/// Per-turn decision maker for one AI side.
///
/// Stateless between turns; everything it knows it reads from the board.
#[derive(Debug, Clone)]
pub struct AiController {
    breadth: usize,
}

impl AiController {
    /// Creates a controller that scores up to `breadth` candidates per
    /// soldier before committing.
    ///
    /// # Panics
    ///
    /// Panics when `breadth` is zero; a searcher that may score nothing
    /// would never move.
    #[must_use]
    pub fn new(breadth: usize) -> Self {
        assert!(breadth > 0, "search breadth must be positive");
        Self { breadth }
    }

    /// Creates a controller from a game configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.search_breadth)
    }

    /// Plays one full turn for the board's current side: economy first,
    /// then the move search. Returns the committed moves in order.
    pub fn take_turn(&self, board: &mut Board) -> Vec<MoveDecision> {
        let side = board.turn();
        debug!(%side, "ai turn");
        // Decisions below read the dumps' ledgers; make sure they are
        // current even if the caller skipped the usual end-turn refresh.
        board.refresh_ledgers(&[side]);
        self.manage_economy(board);
        self.search_moves(board)
    }

    // -------------------------------------------------------------------
    // Phase A: economy
    // -------------------------------------------------------------------

    fn manage_economy(&self, board: &mut Board) {
        let side = board.turn();
        for dump_id in board.roster().dump_ids_of(side) {
            let affordable = board
                .roster()
                .get(dump_id)
                .and_then(|d| d.as_dump())
                .is_some_and(|state| state.supplies >= board.ruleset().draft_cost);
            if affordable {
                self.manage_island(board, dump_id);
            }
        }
    }

    /// Decides between growing and strengthening one island's garrison.
    fn manage_island(&self, board: &mut Board, dump_id: ActorId) {
        let Some(dump) = board.roster().get(dump_id).copied() else {
            return;
        };
        let island = connectivity::island_of(board, dump.pos);
        let soldiers: Vec<ActorId> = island
            .iter()
            .filter_map(|&tile| board.roster().actor_at(tile))
            .filter(|a| a.is_soldier() && a.side == dump.side)
            .map(|a| a.id)
            .collect();
        let vacant = island
            .iter()
            .filter(|&&tile| board.roster().actor_at(tile).is_none())
            .count();

        // Plenty of empty ground per soldier means the island is
        // underdefended: claim it with fresh drafts. Otherwise put the
        // supplies into stronger units.
        if vacant > 3 * soldiers.len() {
            self.draft_new_soldiers(board, dump_id, &island);
        } else {
            self.upgrade_garrison(board, dump_id, &soldiers);
        }
    }

    fn draft_new_soldiers(&self, board: &mut Board, dump_id: ActorId, island: &BTreeSet<HexCoord>) {
        loop {
            let Some(state) = board.roster().get(dump_id).and_then(|d| d.as_dump().copied())
            else {
                return;
            };
            if state.supplies < board.ruleset().draft_cost || state.net_income() <= 0 {
                return;
            }
            let Some(tile) = Self::random_vacant_tile(board, island) else {
                return;
            };
            if board.draft_soldier(tile).is_none() {
                return;
            }
            trace!(at = %tile, "ai drafted soldier");
        }
    }

    fn upgrade_garrison(&self, board: &mut Board, dump_id: ActorId, soldiers: &[ActorId]) {
        loop {
            let mut progressed = false;
            for &soldier_id in soldiers {
                let Some(state) = board.roster().get(dump_id).and_then(|d| d.as_dump().copied())
                else {
                    return;
                };
                if state.supplies < board.ruleset().draft_cost || state.net_income() <= 0 {
                    return;
                }
                let Some(soldier) = board.roster().get(soldier_id) else {
                    continue;
                };
                if soldier.level() >= board.ruleset().max_level {
                    continue;
                }
                let pos = soldier.pos;
                if board.draft_soldier(pos).is_some() {
                    trace!(at = %pos, "ai upgraded soldier");
                    progressed = true;
                }
            }
            if !progressed {
                return;
            }
        }
    }

    /// Samples a vacant tile of the island, bounded attempts.
    fn random_vacant_tile(board: &mut Board, island: &BTreeSet<HexCoord>) -> Option<HexCoord> {
        let tiles: Vec<HexCoord> = island.iter().copied().collect();
        if tiles.is_empty() {
            return None;
        }
        for _ in 0..VACANT_SAMPLING_ATTEMPTS {
            let tile = tiles[board.rng_mut().gen_range(0..tiles.len())];
            if board.roster().actor_at(tile).is_none() {
                return Some(tile);
            }
        }
        None
    }

    // -------------------------------------------------------------------
    // Phase B: move search
    // -------------------------------------------------------------------

    fn search_moves(&self, board: &mut Board) -> Vec<MoveDecision> {
        let side = board.turn();
        let mut pending: BTreeSet<ActorId> = board
            .roster()
            .soldier_ids_of(side)
            .into_iter()
            .filter(|&id| !board.roster().get(id).expect("id just listed").has_moved())
            .collect();
        let mut decisions = Vec::new();

        for _pass in 0..SEARCH_PASSES {
            for soldier_id in pending.clone() {
                if !pending.contains(&soldier_id) {
                    continue;
                }
                if let Some(decision) = self.settle_soldier(board, soldier_id) {
                    decisions.push(decision);
                    pending.remove(&soldier_id);
                } else if board.roster().get(soldier_id).is_none() {
                    // The soldier died in a failed simulated takeover.
                    pending.remove(&soldier_id);
                }
            }
        }

        decisions
    }

    /// Searches candidates for one soldier; commits and returns the move
    /// if one was found.
    fn settle_soldier(&self, board: &mut Board, soldier_id: ActorId) -> Option<MoveDecision> {
        let actor = board.roster().get(soldier_id).copied()?;
        if actor.has_moved() {
            return None;
        }
        let origin = actor.pos;

        let mut candidates: Vec<HexCoord> =
            connectivity::border_tiles(board, origin).into_iter().collect();
        candidates.shuffle(board.rng_mut());

        let mut best: Option<(f64, HexCoord)> = None;
        let mut scored = 0usize;

        for target in candidates {
            if !board.is_blocked(soldier_id, target).is_legal() {
                continue;
            }

            // Read the prize before the trial disturbs the grid: the
            // target island's size and dump, and any defender's value.
            let target_island = connectivity::island_of(board, target);
            let target_has_dump = target_island
                .iter()
                .any(|&t| board.roster().actor_at(t).is_some_and(|a| a.is_dump()));
            let defender_bonus = board.roster().actor_at(target).map_or(0.0, |d| {
                d.as_dump().map_or_else(
                    || f64::from(d.level()) * 2.0,
                    |state| f64::from(state.supplies) / 2.0 + f64::from(state.net_income()),
                )
            });

            let snapshot = board.snapshot_grid();
            let outcome = board.attempt_move(soldier_id, target, true);
            match outcome {
                MoveOutcome::Combat { success: true } => {}
                MoveOutcome::Combat { success: false } => {
                    // The trial consumed the soldier; nothing to commit.
                    board.restore_grid(&snapshot);
                    return None;
                }
                // Border tiles are enemy land, so merges and blocks
                // cannot appear here; bail out defensively if they do.
                MoveOutcome::Merged { .. } | MoveOutcome::Blocked { .. } => {
                    board.restore_grid(&snapshot);
                    continue;
                }
            }

            #[allow(clippy::cast_precision_loss)]
            let mut score = connectivity::island_of(board, origin).len() as f64;
            board.restore_grid(&snapshot);

            if !target_has_dump {
                // Favor carving into large islands that cannot strike back.
                #[allow(clippy::cast_precision_loss)]
                {
                    score += target_island.len() as f64 / 5.0;
                }
            }
            score += defender_bonus;
            scored += 1;

            if best.map_or(true, |(top, _)| score > top) {
                best = Some((score, target));
            }
            if scored >= self.breadth {
                break;
            }
        }

        let (score, destination) = best?;
        trace!(from = %origin, to = %destination, score, "ai committed move");
        board.attempt_move(soldier_id, destination, false);
        Some(MoveDecision {
            from: origin,
            to: destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::{board_with_players, place_dump, place_soldier};
    use hexfield::Side;

    #[test]
    fn breadth_must_be_positive() {
        let controller = AiController::new(4);
        assert_eq!(controller.breadth, 4);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn zero_breadth_panics() {
        let _ = AiController::new(0);
    }

    #[test]
    fn economy_drafts_on_an_underdefended_island() {
        let mut board = board_with_players(&["111111", "111111"], 2);
        place_dump(&mut board, (0, 0), 1, 20);

        let controller = AiController::new(5);
        controller.take_turn(&mut board);

        let drafted = board.roster().soldier_ids_of(Side::new(1)).len();
        assert!(drafted > 0, "expected at least one draft");
        let supplies = board
            .roster()
            .iter()
            .find(|a| a.is_dump())
            .and_then(|a| a.as_dump())
            .unwrap()
            .supplies;
        assert!(supplies >= 0);
    }

    #[test]
    fn economy_upgrades_a_crowded_island() {
        // Five tiles, one soldier: vacant (3) does not exceed 3 * soldiers
        // (3), so the supplies go into upgrades instead of drafts.
        let mut board = board_with_players(&["111110", "000000"], 2);
        place_dump(&mut board, (0, 0), 1, 9);
        let veteran = place_soldier(&mut board, (1, 0), 1, 1);

        let controller = AiController::new(5);
        controller.take_turn(&mut board);

        assert!(board.roster().get(veteran).unwrap().level() > 1);
    }

    #[test]
    fn search_commits_a_conquest() {
        let mut board = board_with_players(&["112200", "000000"], 2);
        place_dump(&mut board, (0, 0), 1, 0);
        place_dump(&mut board, (3, 0), 2, 0);
        let raider = place_soldier(&mut board, (1, 0), 1, 3);

        let controller = AiController::new(5);
        let decisions = controller.take_turn(&mut board);

        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].from, HexCoord::new(1, 0));
        assert_eq!(board.owner(decisions[0].to), Side::new(1));
        assert!(board.roster().get(raider).unwrap().has_moved());
    }

    #[test]
    fn soldier_with_no_legal_candidate_stays_put() {
        // The only border tile is guarded by a stronger defender.
        let mut board = board_with_players(&["112200", "000000"], 2);
        place_dump(&mut board, (0, 0), 1, 0);
        place_dump(&mut board, (3, 0), 2, 0);
        let timid = place_soldier(&mut board, (1, 0), 1, 1);
        place_soldier(&mut board, (2, 0), 2, 3);

        let controller = AiController::new(5);
        let decisions = controller.take_turn(&mut board);

        assert!(decisions.is_empty());
        assert!(!board.roster().get(timid).unwrap().has_moved());
        assert_eq!(board.roster().get(timid).unwrap().pos, HexCoord::new(1, 0));
    }

    #[test]
    fn ai_turn_is_reproducible_from_seed() {
        fn play(seed: u64) -> (Vec<MoveDecision>, u64) {
            let mut board = board_with_players_seeded(seed);
            let controller = AiController::new(5);
            let decisions = controller.take_turn(&mut board);
            (decisions, board.fingerprint())
        }
        fn board_with_players_seeded(seed: u64) -> crate::board::Board {
            let mut board = crate::board::Board::new(
                8,
                4,
                crate::ruleset::Ruleset::standard(),
                seed,
            );
            board.push_player("Player 1", crate::player::Controller::Ai);
            board.push_player("Player 2", crate::player::Controller::Ai);
            for x in 0..4 {
                board.set_owner(HexCoord::new(x, 0), Side::new(1));
                board.set_owner(HexCoord::new(x, 1), Side::new(2));
            }
            board.maintain_dumps();
            place_dump_supplies(&mut board, Side::new(1), 12);
            board.refresh_all_ledgers();
            board
        }
        fn place_dump_supplies(board: &mut crate::board::Board, side: Side, supplies: i32) {
            let id = board.roster().dump_ids_of(side)[0];
            board
                .roster_mut()
                .get_mut(id)
                .unwrap()
                .as_dump_mut()
                .unwrap()
                .supplies = supplies;
        }

        let (decisions_a, state_a) = play(1234);
        let (decisions_b, state_b) = play(1234);
        assert_eq!(decisions_a, decisions_b);
        assert_eq!(state_a, state_b);
    }
}
