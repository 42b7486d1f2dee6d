//! Game-start configuration.
//!
//! Everything here is consumed once, when a game is created: ruleset
//! choice, AI search breadth, map-generation parameters, and the RNG seed.
//! Nothing in this module is consulted mid-game.

use serde::{Deserialize, Serialize};

use crate::ruleset::RulesetKind;

/// Parameters for starting a new game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Which rule constants to play under.
    pub ruleset: RulesetKind,
    /// How many candidate moves the AI scores before committing. Larger is
    /// stronger and slower.
    pub search_breadth: usize,
    /// Minimum owned-tile count for a generated map.
    pub min_map_area: usize,
    /// Number of human players seeded into a generated map.
    pub humans: usize,
    /// Number of AI players seeded into a generated map.
    pub cpus: usize,
    /// Seed for the board's RNG; identical seeds reproduce identical games.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ruleset: RulesetKind::Standard,
            search_breadth: 5,
            min_map_area: 50,
            humans: 3,
            cpus: 3,
            seed: 0,
        }
    }
}
