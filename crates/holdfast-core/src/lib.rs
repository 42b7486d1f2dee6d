//! # Holdfast Core
//!
//! Turn-based territorial-conquest engine over a hexagonal grid.
//!
//! Players own contiguous islands of tiles, field soldiers of escalating
//! strength, and sustain them through a per-island economy of supply
//! dumps. This crate is the complete simulation engine; rendering, input,
//! and audio live with the embedder, which drives the board through three
//! operations and observes it through events.
//!
//! ## Architecture
//!
//! - [`board::Board`] — ownership grid, actor roster, turn state machine;
//!   the single mutation API (`attempt_move`, `draft_soldier`, `end_turn`)
//! - [`ruleset::Ruleset`] — plain-data rule constants and the pure
//!   legality/takeover policy, in three named variants
//! - [`connectivity`] — island, border, and dump queries built on the
//!   [`hexfield`] flood fill
//! - [`ai::AiController`] — the heuristic computer player, economy phase
//!   plus simulate-and-rollback move search
//! - [`scenario::Scenario`] — the JSON map format at the file boundary
//!
//! ## Determinism
//!
//! One `ChaCha8Rng`, seeded at board construction, feeds every random
//! choice: map growth, dump placement, combat coin flips, AI shuffles.
//! The same seed and command sequence reproduce the same game.
//!
//! ## Usage
//!
//! ```
//! use holdfast_core::ai::AiController;
//! use holdfast_core::board::Board;
//! use holdfast_core::config::GameConfig;
//!
//! let config = GameConfig { seed: 42, ..GameConfig::default() };
//! let mut board = Board::from_config(&config);
//! board.new_game(&config);
//!
//! let ai = AiController::from_config(&config);
//! if board.current_player().is_some_and(|p| p.is_ai()) {
//!     let moves = ai.take_turn(&mut board);
//!     println!("cpu committed {} moves", moves.len());
//! }
//! board.end_turn();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actor;
pub mod ai;
pub mod board;
pub mod config;
pub mod connectivity;
mod economy;
pub mod event;
pub mod player;
pub mod roster;
pub mod ruleset;
pub mod scenario;

// Re-exports for convenience
pub use actor::{Actor, ActorId, ActorKind};
pub use ai::{AiController, MoveDecision};
pub use board::{Board, MoveOutcome};
pub use config::GameConfig;
pub use event::GameEvent;
pub use hexfield::{HexCoord, Side};
pub use player::{Controller, Player};
pub use ruleset::{BlockReason, Ruleset, RulesetKind, Verdict};
pub use scenario::{Scenario, ScenarioError};

#[cfg(test)]
mod tests;
