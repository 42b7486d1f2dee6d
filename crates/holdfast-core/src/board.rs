//! The game board and its mutation API.
//!
//! `Board` owns the tile-ownership grid, the actor roster, the player
//! list, the turn pointer, and the RNG. Every state change in a game —
//! human or AI — goes through the three public operations:
//!
//! - [`Board::attempt_move`] — attack, merge, or simulate a move
//! - [`Board::draft_soldier`] — spend supplies on a new or upgraded unit
//! - [`Board::end_turn`] — cleanup, elimination/victory checks, rotation
//!
//! plus [`Board::maintain_dumps`], which the board invokes itself after
//! every ownership change to uphold the one-dump-per-island invariant.
//!
//! # Simulation contract
//!
//! `attempt_move` with `simulate = true` is the AI's scoring primitive.
//! Grid ownership mutates exactly as in a real move (a successful takeover
//! flips the target tile), but actor bookkeeping — relocation, the moved
//! flag, defender removal — happens only in real moves. The one exception
//! is the mover itself on a failed takeover: it is consumed either way.
//! Callers that simulate must bracket each trial with
//! [`Board::snapshot_grid`] / [`Board::restore_grid`].
//!
//! # Determinism
//!
//! All randomness (map generation, dump placement, combat coin flips, AI
//! shuffles) draws from one `ChaCha8Rng` seeded at construction. Identical
//! seeds and identical command sequences reproduce identical boards;
//! [`Board::fingerprint`] condenses the state for comparison in tests.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use hexfield::{GridSnapshot, HexCoord, OwnerGrid, Side};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::actor::{dump, soldier, ActorId};
use crate::config::GameConfig;
use crate::connectivity;
use crate::event::{DestroyCause, GameEvent};
use crate::player::{Controller, Player};
use crate::roster::ActorRoster;
use crate::ruleset::{BlockReason, Ruleset, Verdict};

/// Standard board width in tiles.
pub const STANDARD_WIDTH: i32 = 30;
/// Standard board height in tiles.
pub const STANDARD_HEIGHT: i32 = 14;

/// Attempt budget for the bounded random sampling that places a dump on a
/// vacant island tile. Running out is a clean no-op, not an error.
const DUMP_PLACEMENT_ATTEMPTS: usize = 100;

/// Result of [`Board::attempt_move`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The move was illegal; nothing changed.
    Blocked {
        /// Why the move is blocked.
        reason: BlockReason,
        /// The tile responsible for the block.
        at: HexCoord,
    },
    /// The mover was absorbed into a same-side soldier.
    Merged {
        /// Tile of the surviving soldier.
        into: HexCoord,
    },
    /// Combat was engaged; `success` tells whether the attacker took the
    /// tile (true) or was consumed (false).
    Combat {
        /// Attacker victory.
        success: bool,
    },
}

impl MoveOutcome {
    /// Returns true when the move was not blocked.
    #[must_use]
    pub const fn is_legal(&self) -> bool {
        !matches!(self, Self::Blocked { .. })
    }

    /// Returns true when the mover achieved something: a merge or a won
    /// takeover.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Merged { .. } | Self::Combat { success: true })
    }
}

/// The complete mutable state of one round.
#[derive(Debug)]
pub struct Board {
    pub(crate) grid: OwnerGrid,
    pub(crate) roster: ActorRoster,
    pub(crate) players: Vec<Player>,
    pub(crate) turn: Side,
    pub(crate) ruleset: Ruleset,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) events: Vec<GameEvent>,
}

impl Board {
    /// Creates an empty board of the given dimensions.
    ///
    /// The turn pointer starts at side 1; players are added with
    /// [`Board::push_player`] or by loading a scenario.
    #[must_use]
    pub fn new(width: i32, height: i32, ruleset: Ruleset, seed: u64) -> Self {
        Self {
            grid: OwnerGrid::new(width, height),
            roster: ActorRoster::new(),
            players: Vec::new(),
            turn: Side::new(1),
            ruleset,
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Creates a standard-size board from a game configuration.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            STANDARD_WIDTH,
            STANDARD_HEIGHT,
            config.ruleset.rules(),
            config.seed,
        )
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// The ownership grid.
    #[must_use]
    pub fn grid(&self) -> &OwnerGrid {
        &self.grid
    }

    /// The actor roster.
    #[must_use]
    pub fn roster(&self) -> &ActorRoster {
        &self.roster
    }

    pub(crate) fn roster_mut(&mut self) -> &mut ActorRoster {
        &mut self.roster
    }

    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// The side whose turn it is. [`Side::NEUTRAL`] once a round has
    /// ended.
    #[must_use]
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// The active rule constants.
    #[must_use]
    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// All players, in side order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// The player owning `side`, if any.
    #[must_use]
    pub fn player(&self, side: Side) -> Option<&Player> {
        self.players.iter().find(|p| p.side == side)
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.player(self.turn)
    }

    /// Owner of `coord`, neutral when out of bounds.
    #[must_use]
    pub fn owner(&self, coord: HexCoord) -> Side {
        self.grid.owner(coord)
    }

    /// Sets the owner of a tile. Scenario loading and map editing go
    /// through this; it performs no rule checks.
    ///
    /// # Panics
    ///
    /// Panics when `coord` is out of bounds.
    pub fn set_owner(&mut self, coord: HexCoord, side: Side) {
        self.grid.set(coord, side);
    }

    /// Registers a new player and returns its side id.
    ///
    /// # Panics
    ///
    /// Panics when a seventh player is added; the board format supports
    /// sides `1..=6`.
    pub fn push_player(&mut self, name: impl Into<String>, controller: Controller) -> Side {
        let side = Side::new(u8::try_from(self.players.len() + 1).expect("player count fits u8"));
        self.players.push(Player::new(side, name, controller));
        side
    }

    /// Drains the queued observable events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Takes a copy of the ownership grid for later [`Board::restore_grid`].
    #[must_use]
    pub fn snapshot_grid(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    /// Reinstates a grid snapshot taken from this board.
    pub fn restore_grid(&mut self, snapshot: &GridSnapshot) {
        self.grid.restore(snapshot);
    }

    /// Count of tiles owned by any player.
    #[must_use]
    pub fn world_area(&self) -> usize {
        self.grid.owned_area()
    }

    /// Count of dumps belonging to `side`.
    #[must_use]
    pub fn count_dumps(&self, side: Side) -> usize {
        self.roster.count_dumps(side)
    }

    /// Condenses grid, actors, players, and turn into one hash for state
    /// comparison in tests and replay checks.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.grid.hash(&mut hasher);
        self.turn.hash(&mut hasher);
        for actor in self.roster.iter() {
            actor.hash(&mut hasher);
        }
        for player in &self.players {
            player.hash(&mut hasher);
        }
        hasher.finish()
    }

    // -------------------------------------------------------------------
    // Moves
    // -------------------------------------------------------------------

    /// Checks move legality without mutating anything.
    ///
    /// Pure: calling it twice without a board mutation in between yields
    /// identical verdicts.
    #[must_use]
    pub fn is_blocked(&self, actor_id: ActorId, target: HexCoord) -> Verdict {
        self.ruleset.is_blocked(self, actor_id, target)
    }

    /// Attempts to move `actor_id` onto `target`.
    ///
    /// Blocked moves return the verdict untouched and mutate nothing. A
    /// legal move onto a same-side soldier is a merge: the mover's levels
    /// are added to the target and the mover leaves the board, simulated
    /// or not. A legal move onto enemy land engages combat:
    ///
    /// - on success the tile's owner flips to the mover's side regardless
    ///   of `simulate`; relocation, the moved flag, defender removal, and
    ///   dump maintenance additionally happen when `simulate` is false;
    /// - on failure the mover is consumed regardless of `simulate`.
    ///
    /// Simulating callers must restore the grid between trials; see the
    /// module docs.
    ///
    /// # Panics
    ///
    /// Panics when `actor_id` does not resolve.
    pub fn attempt_move(&mut self, actor_id: ActorId, target: HexCoord, simulate: bool) -> MoveOutcome {
        let actor = *self
            .roster
            .get(actor_id)
            .unwrap_or_else(|| panic!("move of unknown actor {actor_id}"));

        // Checked up front so the merge path cannot bypass it.
        if actor.has_moved() {
            return MoveOutcome::Blocked {
                reason: BlockReason::AlreadyMoved,
                at: target,
            };
        }
        if let Verdict::Blocked { reason, at } = self.is_blocked(actor_id, target) {
            return MoveOutcome::Blocked { reason, at };
        }

        let defender = self.roster.actor_at(target).copied();

        if let Some(ally) = defender.filter(|d| d.side == actor.side) {
            // Legality already implies a soldier-to-soldier merge that
            // fits under the level cap. The target's moved flag does not
            // change.
            self.roster
                .get_mut(ally.id)
                .expect("merge target resolved above")
                .as_soldier_mut()
                .expect("merge target is a soldier")
                .level += actor.level();
            self.roster.remove(actor_id);
            self.push_event(GameEvent::ActorDestroyed {
                side: actor.side,
                at: actor.pos,
                was_dump: false,
                cause: DestroyCause::Merged,
            });
            trace!(from = %actor.pos, into = %target, "merged soldiers");
            self.maintain_dumps();
            return MoveOutcome::Merged { into: target };
        }

        let success = match &defender {
            Some(enemy) => self.ruleset.takeover_attempt(&mut self.rng, &actor, enemy),
            None => true,
        };

        if success {
            self.grid.set(target, actor.side);
            trace!(from = %actor.pos, to = %target, simulate, "takeover succeeded");
            if !simulate {
                if let Some(enemy) = defender {
                    self.roster.remove(enemy.id);
                    self.push_event(GameEvent::ActorDestroyed {
                        side: enemy.side,
                        at: target,
                        was_dump: enemy.is_dump(),
                        cause: DestroyCause::Combat,
                    });
                }
                self.roster.relocate(actor_id, target);
                if let Some(state) = self
                    .roster
                    .get_mut(actor_id)
                    .expect("mover resolved above")
                    .as_soldier_mut()
                {
                    state.moved = true;
                }
                self.maintain_dumps();
            }
        } else {
            // The defense held; the attacker is consumed even in a
            // simulation.
            self.roster.remove(actor_id);
            self.push_event(GameEvent::ActorDestroyed {
                side: actor.side,
                at: actor.pos,
                was_dump: false,
                cause: DestroyCause::Combat,
            });
            trace!(from = %actor.pos, to = %target, simulate, "takeover failed");
            self.maintain_dumps();
        }

        MoveOutcome::Combat { success }
    }

    // -------------------------------------------------------------------
    // Drafting
    // -------------------------------------------------------------------

    /// Drafts a level-1 soldier at `tile`, or upgrades the soldier already
    /// there, paying from the island's dump.
    ///
    /// A no-op (`None`) unless the tile belongs to the current turn's
    /// side, holds nothing or an upgradeable soldier, the island has a
    /// dump, and that dump can afford the draft cost. On success the cost
    /// is deducted exactly once and the side's ledgers are refreshed.
    ///
    /// # Panics
    ///
    /// Panics when the island turns out to hold more than one dump; the
    /// economy invariant guarantees exactly one, so finding several means
    /// upstream maintenance was skipped.
    pub fn draft_soldier(&mut self, tile: HexCoord) -> Option<ActorId> {
        if self.grid.get(tile) != Some(self.turn) {
            return None;
        }
        let existing = self.roster.actor_at(tile).copied();
        if let Some(actor) = existing {
            if actor.is_dump() || actor.level() >= self.ruleset.max_level {
                return None;
            }
        }

        let survey = connectivity::dumps_on_island(self, tile);
        if survey.dumps.is_empty() {
            // A one-tile island legitimately has no dump to pay from.
            return None;
        }
        assert!(
            survey.dumps.len() == 1,
            "island at {tile} has {} dumps, expected exactly one",
            survey.dumps.len()
        );

        let dump_id = self.roster.fetch_at(survey.dumps[0]).id;
        let cost = self.ruleset.draft_cost;
        {
            let state = self
                .roster
                .get_mut(dump_id)
                .expect("dump resolved above")
                .as_dump_mut()
                .expect("surveyed as dump");
            if state.supplies < cost {
                return None;
            }
            state.supplies -= cost;
        }

        let id = match existing {
            None => {
                let side = self.turn;
                let id = self.roster.spawn(side, tile, soldier(1));
                self.push_event(GameEvent::SoldierDrafted { side, at: tile });
                id
            }
            Some(actor) => {
                let state = self
                    .roster
                    .get_mut(actor.id)
                    .expect("soldier resolved above")
                    .as_soldier_mut()
                    .expect("checked upgradeable above");
                state.level += 1;
                let level = state.level;
                self.push_event(GameEvent::SoldierUpgraded {
                    side: actor.side,
                    at: tile,
                    level,
                });
                actor.id
            }
        };

        self.refresh_ledgers(&[self.turn]);
        Some(id)
    }

    // -------------------------------------------------------------------
    // Dump maintenance
    // -------------------------------------------------------------------

    /// Re-establishes the one-dump-per-island invariant.
    ///
    /// Sweeps every island owned by a non-lost player once: an island of
    /// two or more tiles without a dump receives one on a random vacant
    /// tile (bounded sampling; a fully occupied island is skipped
    /// cleanly); an island with several dumps has them merged, keeping the
    /// richest dump's tile and the summed supplies.
    pub fn maintain_dumps(&mut self) {
        let active: BTreeSet<Side> = self
            .players
            .iter()
            .filter(|p| !p.lost)
            .map(|p| p.side)
            .collect();
        let mut visited: BTreeSet<HexCoord> = BTreeSet::new();

        let coords: Vec<HexCoord> = self.grid.coords().collect();
        for coord in coords {
            if visited.contains(&coord) {
                continue;
            }
            let owner = self.grid.owner(coord);
            if owner.is_neutral() || !active.contains(&owner) {
                continue;
            }
            let survey = connectivity::dumps_on_island(self, coord);
            visited.extend(survey.area.iter().copied());

            if survey.dumps.is_empty() && survey.area.len() > 1 {
                self.place_island_dump(&survey.area, owner);
            } else if survey.dumps.len() > 1 {
                self.merge_island_dumps(&survey.dumps);
            }
        }
    }

    /// Places a fresh dump on a random vacant tile of an island.
    fn place_island_dump(&mut self, area: &BTreeSet<HexCoord>, side: Side) {
        let tiles: Vec<HexCoord> = area.iter().copied().collect();
        for _ in 0..DUMP_PLACEMENT_ATTEMPTS {
            let tile = tiles[self.rng.gen_range(0..tiles.len())];
            if self.roster.actor_at(tile).is_none() {
                self.roster.spawn(side, tile, dump(0));
                self.push_event(GameEvent::DumpPlaced { side, at: tile });
                debug!(%side, at = %tile, "placed island dump");
                return;
            }
        }
        // Every sampled tile was occupied; give up until the next sweep.
    }

    /// Merges an island's dumps into the one holding the most supplies.
    fn merge_island_dumps(&mut self, dumps: &[HexCoord]) {
        let side = self.roster.fetch_at(dumps[0]).side;
        let mut total = 0;
        let mut best_tile = dumps[0];
        let mut best_supplies = i32::MIN;
        for &tile in dumps {
            let state = *self
                .roster
                .fetch_at(tile)
                .as_dump()
                .expect("surveyed as dump");
            total += state.supplies;
            if state.supplies > best_supplies {
                best_supplies = state.supplies;
                best_tile = tile;
            }
        }
        for &tile in dumps {
            let id = self.roster.fetch_at(tile).id;
            self.roster.remove(id);
        }
        self.roster.spawn(side, best_tile, dump(total));
        self.push_event(GameEvent::DumpsMerged {
            side,
            at: best_tile,
            merged: dumps.len() - 1,
            supplies: total,
        });
        debug!(%side, at = %best_tile, supplies = total, "merged island dumps");
    }

    // -------------------------------------------------------------------
    // Turn rotation
    // -------------------------------------------------------------------

    /// Ends the current turn.
    ///
    /// Destroys isolated actors, flags players without dumps as lost, and
    /// checks for a winner. If a unique survivor remains it is marked won
    /// and the board resets to empty — the terminal state of the round.
    /// Otherwise the turn pointer advances to the next non-lost side,
    /// wrapping to the first and clearing every soldier's moved flag once
    /// per full cycle; the new side's supplies are then settled (killing
    /// unsupplied soldiers) and everyone's ledgers refreshed.
    pub fn end_turn(&mut self) {
        if self.players.iter().any(|p| p.won) {
            // Round already over.
            return;
        }

        self.destroy_isolated_actors();
        self.flag_losers();
        if self.check_winner() {
            self.reset_round();
            return;
        }
        if self.players.iter().all(|p| p.lost) {
            // Nobody left to take a turn; nothing to rotate to.
            return;
        }

        let count = u8::try_from(self.players.len()).expect("player count fits u8");
        loop {
            let mut next = self.turn.as_u8() + 1;
            if next > count {
                next = 1;
                self.clear_moved_flags();
            }
            self.turn = Side::new(next);
            if !self.player(self.turn).is_some_and(|p| p.lost) {
                break;
            }
        }
        debug!(side = %self.turn, "turn started");

        // Settle the side coming up (this applies upkeep kills), then give
        // everyone fresh ledger numbers for display and AI decisions.
        self.settle_supplies(&[self.turn]);
        self.refresh_all_ledgers();
    }

    /// Destroys every actor with no adjacent same-side tile.
    fn destroy_isolated_actors(&mut self) {
        let doomed: Vec<ActorId> = self
            .roster
            .iter()
            .filter(|a| !a.pos.neighbors().any(|n| self.grid.get(n) == Some(a.side)))
            .map(|a| a.id)
            .collect();
        for id in doomed {
            let actor = self.roster.remove(id).expect("collected above");
            self.push_event(GameEvent::ActorDestroyed {
                side: actor.side,
                at: actor.pos,
                was_dump: actor.is_dump(),
                cause: DestroyCause::Isolation,
            });
        }
    }

    /// Marks players holding zero dumps as lost.
    fn flag_losers(&mut self) {
        let fallen: Vec<Side> = self
            .players
            .iter()
            .filter(|p| !p.lost)
            .map(|p| p.side)
            .filter(|&side| self.roster.count_dumps(side) == 0)
            .collect();
        for side in fallen {
            if let Some(player) = self.players.iter_mut().find(|p| p.side == side) {
                player.lost = true;
            }
            debug!(%side, "player lost");
            self.push_event(GameEvent::PlayerLost { side });
        }
    }

    /// Marks the unique survivor as winner. Returns true when the round is
    /// decided.
    fn check_winner(&mut self) -> bool {
        let mut survivors = self.players.iter_mut().filter(|p| !p.lost);
        let (Some(winner), None) = (survivors.next(), survivors.next()) else {
            return false;
        };
        winner.won = true;
        let side = winner.side;
        debug!(%side, "player won");
        self.push_event(GameEvent::PlayerWon { side });
        true
    }

    /// Clears the board to the terminal empty state.
    fn reset_round(&mut self) {
        self.grid.fill(Side::NEUTRAL);
        self.roster.clear();
        self.turn = Side::NEUTRAL;
    }

    fn clear_moved_flags(&mut self) {
        for actor in self.roster.iter_mut() {
            if let Some(state) = actor.as_soldier_mut() {
                state.moved = false;
            }
        }
    }

    // -------------------------------------------------------------------
    // Game setup
    // -------------------------------------------------------------------

    /// Starts a fresh randomly generated game.
    ///
    /// Seeds the configured players (humans first, then CPUs, sides
    /// `1..=N`), grows a connected random map of at least
    /// `config.min_map_area` tiles, places initial dumps, banks side 1's
    /// first income, and refreshes everyone's ledgers.
    ///
    /// # Panics
    ///
    /// Panics when the configuration names no players or asks for more
    /// area than the board has.
    pub fn new_game(&mut self, config: &GameConfig) {
        self.turn = Side::new(1);
        self.players.clear();
        self.grid.fill(Side::NEUTRAL);
        self.roster.clear();
        self.events.clear();

        for i in 0..config.humans {
            self.push_player(format!("Player {}", i + 1), Controller::Human);
        }
        for i in 0..config.cpus {
            self.push_player(format!("CPU {}", i + 1), Controller::Ai);
        }

        self.generate_map(config.min_map_area);
        self.maintain_dumps();
        self.settle_supplies(&[Side::new(1)]);
        self.refresh_all_ledgers();
        debug!(
            players = self.players.len(),
            area = self.world_area(),
            "new game ready"
        );
    }

    /// Grows a random map until it is one connected landmass of at least
    /// `min_area` tiles.
    ///
    /// # Panics
    ///
    /// Panics when no players are registered or `min_area` exceeds the
    /// board size; either would make the growth loop unsatisfiable.
    pub fn generate_map(&mut self, min_area: usize) {
        assert!(
            !self.players.is_empty(),
            "map generation requires registered players"
        );
        assert!(
            min_area <= self.grid.len(),
            "min_area {min_area} exceeds board size {}",
            self.grid.len()
        );
        self.grid.fill(Side::NEUTRAL);
        loop {
            self.stamp_random_cluster();
            if self.world_area() >= min_area && connectivity::is_fully_connected(self) {
                break;
            }
        }
    }

    /// Stamps the neighborhood of one random tile with random player
    /// sides. The building block of map growth.
    fn stamp_random_cluster(&mut self) {
        let sides: Vec<Side> = self.players.iter().map(|p| p.side).collect();
        let x = self.rng.gen_range(2..self.grid.width());
        let y = self.rng.gen_range(2..self.grid.height());
        for neighbor in HexCoord::new(x, y).neighbors() {
            if self.grid.in_bounds(neighbor) {
                let side = sides[self.rng.gen_range(0..sides.len())];
                self.grid.set(neighbor, side);
            }
        }
    }
}
