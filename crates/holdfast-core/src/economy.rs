//! Per-island supply accounting.
//!
//! Every dump keeps a ledger for its island: revenue is one supply per
//! island tile, expenses are the summed upkeep of the island's soldiers.
//! Two sweeps exist over the same arithmetic:
//!
//! - **refresh** recomputes the ledgers only, for display and AI
//!   decisions;
//! - **settle** additionally banks the margin into the dump's supplies.
//!   A negative balance culls every soldier on the island and pins the
//!   balance at zero; losing the army is punishment enough, debt is not
//!   carried.
//!
//! The board settles exactly one side per turn (the side coming up) and
//! refreshes everyone afterwards; see [`Board::end_turn`].

use hexfield::{flood_fill, SideMask};
use tracing::debug;

use crate::actor::ActorId;
use crate::board::Board;
use crate::event::{DestroyCause, GameEvent};

impl Board {
    /// Recomputes ledgers for the given sides' dumps and banks the margin
    /// into supplies, culling islands that cannot pay their soldiers.
    pub fn settle_supplies(&mut self, sides: &[hexfield::Side]) {
        self.update_dump_ledgers(sides, true);
    }

    /// Recomputes ledgers for the given sides' dumps without touching
    /// supplies.
    pub fn refresh_ledgers(&mut self, sides: &[hexfield::Side]) {
        self.update_dump_ledgers(sides, false);
    }

    /// Refreshes the ledgers of every registered player.
    pub fn refresh_all_ledgers(&mut self) {
        let sides: Vec<hexfield::Side> = self.players.iter().map(|p| p.side).collect();
        self.update_dump_ledgers(&sides, false);
    }

    fn update_dump_ledgers(&mut self, sides: &[hexfield::Side], settle: bool) {
        let mut starving: Vec<ActorId> = Vec::new();

        let dump_ids: Vec<ActorId> = sides
            .iter()
            .flat_map(|&side| self.roster.dump_ids_of(side))
            .collect();

        for dump_id in dump_ids {
            let (side, pos) = {
                let dump = self.roster.get(dump_id).expect("dump id collected above");
                (dump.side, dump.pos)
            };
            let island = flood_fill(&self.grid, pos, SideMask::of(side));

            let mut expenses = 0;
            let mut garrison: Vec<ActorId> = Vec::new();
            for &tile in &island {
                let Some(actor) = self.roster.actor_at(tile) else {
                    continue;
                };
                if actor.is_soldier() {
                    expenses += self.ruleset.upkeep_cost(actor.level());
                    garrison.push(actor.id);
                }
            }
            let revenue = i32::try_from(island.len()).expect("island area fits i32");

            let state = self
                .roster
                .get_mut(dump_id)
                .expect("dump id collected above")
                .as_dump_mut()
                .expect("dump ids are dumps");
            state.revenue = revenue;
            state.expenses = expenses;
            if settle {
                state.supplies += revenue - expenses;
                if state.supplies < 0 {
                    // The island cannot pay its soldiers: the whole
                    // garrison starves, and the balance stops at zero.
                    state.supplies = 0;
                    debug!(%side, at = %pos, "island garrison starved");
                    starving.extend(garrison);
                }
            }
        }

        for id in starving {
            if let Some(actor) = self.roster.remove(id) {
                self.push_event(GameEvent::ActorDestroyed {
                    side: actor.side,
                    at: actor.pos,
                    was_dump: false,
                    cause: DestroyCause::Starvation,
                });
            }
        }
    }
}
