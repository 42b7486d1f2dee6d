//! Players and their controllers.

use hexfield::Side;
use serde::{Deserialize, Serialize};

/// Who issues commands for a player.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Controller {
    /// Moves come from an external input surface.
    Human,
    /// Moves come from the built-in AI controller.
    Ai,
}

/// One participant in a round.
///
/// Players are created at game setup and never removed; elimination and
/// victory are flags, and the `side` doubles as the tile owner id on the
/// grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Owner id on the grid, `1..=6`.
    pub side: Side,
    /// Display name.
    pub name: String,
    /// Command source for this player.
    pub controller: Controller,
    /// Set when the player's last dump is gone.
    pub lost: bool,
    /// Set on the unique survivor when the round ends.
    pub won: bool,
}

impl Player {
    /// Creates an active player.
    #[must_use]
    pub fn new(side: Side, name: impl Into<String>, controller: Controller) -> Self {
        Self {
            side,
            name: name.into(),
            controller,
            lost: false,
            won: false,
        }
    }

    /// Returns true for AI-controlled players.
    #[must_use]
    pub const fn is_ai(&self) -> bool {
        matches!(self.controller, Controller::Ai)
    }
}
