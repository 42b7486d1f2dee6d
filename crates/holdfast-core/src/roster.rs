//! The actor roster: arena-style storage for every live actor.
//!
//! The roster owns all [`Actor`]s and enforces the one-actor-per-tile
//! invariant through a position index. Storage is a `BTreeMap` so that
//! iteration over actors is always in id order, which keeps everything
//! downstream (economy sweeps, AI candidate order) deterministic across
//! platforms.
//!
//! # Position Index
//!
//! The `HexCoord -> ActorId` index is updated by `spawn`, `remove`, and
//! `relocate`; positions are never mutated directly on an actor from
//! outside this module. A `HashMap` is acceptable for the index because it
//! is only queried by key, never iterated.
//!
//! # Removal
//!
//! `remove` takes the actor out of both maps. There are no tombstones: a
//! removed id simply stops resolving, and the infallible lookups panic on
//! it, which is the loud failure the engine wants for stale-id bugs.

use std::collections::{BTreeMap, HashMap};

use hexfield::{HexCoord, Side};

use crate::actor::{Actor, ActorId, ActorKind};

/// Arena of live actors with stable ids and a tile-occupancy index.
#[derive(Debug, Clone, Default)]
pub struct ActorRoster {
    next_id: u64,
    actors: BTreeMap<ActorId, Actor>,
    by_pos: HashMap<HexCoord, ActorId>,
}

impl ActorRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new actor at `pos` and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is already occupied; two actors on one tile is an
    /// invariant violation, not a recoverable condition.
    pub fn spawn(&mut self, side: Side, pos: HexCoord, kind: ActorKind) -> ActorId {
        assert!(
            !self.by_pos.contains_key(&pos),
            "spawn at occupied tile {pos}"
        );
        let id = ActorId::new(self.next_id);
        self.next_id += 1;
        self.actors.insert(
            id,
            Actor {
                id,
                side,
                pos,
                kind,
            },
        );
        self.by_pos.insert(pos, id);
        id
    }

    /// Removes an actor, returning it if it existed.
    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(&id)?;
        self.by_pos.remove(&actor.pos);
        Some(actor)
    }

    /// Returns the actor with the given id.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Returns the actor with the given id, mutably.
    #[must_use]
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    /// Returns the actor occupying `pos`, if any.
    #[must_use]
    pub fn actor_at(&self, pos: HexCoord) -> Option<&Actor> {
        self.by_pos.get(&pos).map(|id| &self.actors[id])
    }

    /// Returns the actor occupying `pos`, mutably, if any.
    #[must_use]
    pub fn actor_at_mut(&mut self, pos: HexCoord) -> Option<&mut Actor> {
        let id = *self.by_pos.get(&pos)?;
        self.actors.get_mut(&id)
    }

    /// Returns the actor occupying `pos`.
    ///
    /// # Panics
    ///
    /// Panics when the tile holds no actor. Use this only where an actor's
    /// presence is an invariant established upstream.
    #[must_use]
    pub fn fetch_at(&self, pos: HexCoord) -> &Actor {
        self.actor_at(pos)
            .unwrap_or_else(|| panic!("no actor registered at {pos}"))
    }

    /// Moves an actor to a new tile, keeping the index in sync.
    ///
    /// # Panics
    ///
    /// Panics if the id does not resolve or the target tile is occupied by
    /// a different actor.
    pub fn relocate(&mut self, id: ActorId, to: HexCoord) {
        let actor = self
            .actors
            .get_mut(&id)
            .unwrap_or_else(|| panic!("relocate of unknown actor {id}"));
        if actor.pos == to {
            return;
        }
        if let Some(&occupant) = self.by_pos.get(&to) {
            assert!(occupant == id, "relocate of {id} onto occupied tile {to}");
        }
        self.by_pos.remove(&actor.pos);
        actor.pos = to;
        self.by_pos.insert(to, id);
    }

    /// Iterates all actors in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> + '_ {
        self.actors.values()
    }

    /// Iterates all actors mutably, in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> + '_ {
        self.actors.values_mut()
    }

    /// Iterates all actor ids in order.
    pub fn ids(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors.keys().copied()
    }

    /// Ids of every dump belonging to `side`, in id order.
    #[must_use]
    pub fn dump_ids_of(&self, side: Side) -> Vec<ActorId> {
        self.actors
            .values()
            .filter(|a| a.is_dump() && a.side == side)
            .map(|a| a.id)
            .collect()
    }

    /// Ids of every soldier belonging to `side`, in id order.
    #[must_use]
    pub fn soldier_ids_of(&self, side: Side) -> Vec<ActorId> {
        self.actors
            .values()
            .filter(|a| a.is_soldier() && a.side == side)
            .map(|a| a.id)
            .collect()
    }

    /// Counts the dumps belonging to `side`.
    #[must_use]
    pub fn count_dumps(&self, side: Side) -> usize {
        self.actors
            .values()
            .filter(|a| a.is_dump() && a.side == side)
            .count()
    }

    /// Number of live actors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Returns true if no actors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Removes every actor.
    pub fn clear(&mut self) {
        self.actors.clear();
        self.by_pos.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{dump, soldier};

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut roster = ActorRoster::new();
        let a = roster.spawn(Side::new(1), HexCoord::new(0, 0), soldier(1));
        let b = roster.spawn(Side::new(1), HexCoord::new(1, 0), soldier(1));
        assert_eq!(a, ActorId::new(0));
        assert_eq!(b, ActorId::new(1));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    #[should_panic(expected = "occupied tile")]
    fn spawn_on_occupied_tile_panics() {
        let mut roster = ActorRoster::new();
        roster.spawn(Side::new(1), HexCoord::new(0, 0), soldier(1));
        roster.spawn(Side::new(2), HexCoord::new(0, 0), soldier(1));
    }

    #[test]
    fn remove_clears_both_maps() {
        let mut roster = ActorRoster::new();
        let id = roster.spawn(Side::new(1), HexCoord::new(2, 2), dump(5));
        let removed = roster.remove(id).unwrap();
        assert_eq!(removed.as_dump().unwrap().supplies, 5);
        assert!(roster.get(id).is_none());
        assert!(roster.actor_at(HexCoord::new(2, 2)).is_none());
        assert!(roster.is_empty());
    }

    #[test]
    fn remove_unknown_id_is_none() {
        let mut roster = ActorRoster::new();
        assert!(roster.remove(ActorId::new(99)).is_none());
    }

    #[test]
    fn actor_at_resolves_position() {
        let mut roster = ActorRoster::new();
        let id = roster.spawn(Side::new(3), HexCoord::new(4, 1), soldier(2));
        assert_eq!(roster.actor_at(HexCoord::new(4, 1)).unwrap().id, id);
        assert!(roster.actor_at(HexCoord::new(4, 2)).is_none());
    }

    #[test]
    #[should_panic(expected = "no actor registered")]
    fn fetch_at_empty_tile_panics() {
        let roster = ActorRoster::new();
        let _ = roster.fetch_at(HexCoord::new(0, 0));
    }

    #[test]
    fn relocate_updates_index() {
        let mut roster = ActorRoster::new();
        let id = roster.spawn(Side::new(1), HexCoord::new(0, 0), soldier(1));
        roster.relocate(id, HexCoord::new(1, 0));
        assert!(roster.actor_at(HexCoord::new(0, 0)).is_none());
        assert_eq!(roster.actor_at(HexCoord::new(1, 0)).unwrap().id, id);
        assert_eq!(roster.get(id).unwrap().pos, HexCoord::new(1, 0));
    }

    #[test]
    #[should_panic(expected = "occupied tile")]
    fn relocate_onto_other_actor_panics() {
        let mut roster = ActorRoster::new();
        let id = roster.spawn(Side::new(1), HexCoord::new(0, 0), soldier(1));
        roster.spawn(Side::new(2), HexCoord::new(1, 0), soldier(1));
        roster.relocate(id, HexCoord::new(1, 0));
    }

    #[test]
    fn relocate_to_same_tile_is_noop() {
        let mut roster = ActorRoster::new();
        let id = roster.spawn(Side::new(1), HexCoord::new(0, 0), soldier(1));
        roster.relocate(id, HexCoord::new(0, 0));
        assert_eq!(roster.actor_at(HexCoord::new(0, 0)).unwrap().id, id);
    }

    #[test]
    fn side_filters() {
        let mut roster = ActorRoster::new();
        roster.spawn(Side::new(1), HexCoord::new(0, 0), soldier(1));
        roster.spawn(Side::new(1), HexCoord::new(1, 0), dump(0));
        roster.spawn(Side::new(2), HexCoord::new(2, 0), dump(0));

        assert_eq!(roster.soldier_ids_of(Side::new(1)).len(), 1);
        assert_eq!(roster.dump_ids_of(Side::new(1)).len(), 1);
        assert_eq!(roster.count_dumps(Side::new(2)), 1);
        assert_eq!(roster.count_dumps(Side::new(3)), 0);
    }

    #[test]
    fn iteration_is_in_id_order() {
        let mut roster = ActorRoster::new();
        for x in 0..5 {
            roster.spawn(Side::new(1), HexCoord::new(x, 0), soldier(1));
        }
        let ids: Vec<ActorId> = roster.iter().map(|a| a.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn ids_continue_after_clear_free_reuse_is_impossible() {
        let mut roster = ActorRoster::new();
        let a = roster.spawn(Side::new(1), HexCoord::new(0, 0), soldier(1));
        roster.remove(a);
        let b = roster.spawn(Side::new(1), HexCoord::new(0, 0), soldier(1));
        assert!(b > a);
    }
}
