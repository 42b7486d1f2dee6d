//! Scenario persistence.
//!
//! A scenario is the JSON record the engine owns at its file boundary:
//!
//! ```json
//! {
//!     "width": 30,
//!     "height": 14,
//!     "players": ["human", "ai", "ai"],
//!     "data": { "4 2": 1, "5 2": 2 }
//! }
//! ```
//!
//! `players` is ordered; loading assigns sides `1..=N` in that order.
//! `data` maps `"x y"` string keys to owner ids and only needs to name
//! owned tiles. `width`/`height` default to the engine's standard board
//! size when absent.
//!
//! Loading validates everything before touching the board: a malformed
//! scenario fails with a [`ScenarioError`] and leaves the board exactly as
//! it was.

use std::collections::BTreeMap;

use hexfield::{HexCoord, OwnerGrid, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::board::{Board, STANDARD_HEIGHT, STANDARD_WIDTH};
use crate::player::Controller;

/// What went wrong while reading a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The document is not valid JSON for the scenario schema.
    #[error("malformed scenario document: {0}")]
    Parse(#[from] serde_json::Error),
    /// A `data` key is not an `"x y"` integer pair.
    #[error("bad coordinate key {key:?}")]
    BadCoordinate {
        /// The offending key.
        key: String,
    },
    /// A tile names an owner outside `0..=6`.
    #[error("bad owner {owner} at key {key:?}")]
    BadOwner {
        /// The offending key.
        key: String,
        /// The out-of-range owner value.
        owner: u8,
    },
    /// A tile lies outside the scenario's dimensions.
    #[error("coordinate {key:?} outside {width}x{height} board")]
    OutOfBounds {
        /// The offending key.
        key: String,
        /// Scenario width.
        width: i32,
        /// Scenario height.
        height: i32,
    },
    /// The board supports at most six players.
    #[error("scenario names {count} players, at most 6 supported")]
    TooManyPlayers {
        /// Number of players named.
        count: usize,
    },
    /// The scenario has non-positive dimensions.
    #[error("bad dimensions {width}x{height}")]
    BadDimensions {
        /// Scenario width.
        width: i32,
        /// Scenario height.
        height: i32,
    },
}

/// Controller choice as persisted in the `players` list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSlot {
    /// A human-controlled seat.
    Human,
    /// An AI-controlled seat.
    Ai,
}

impl From<PlayerSlot> for Controller {
    fn from(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::Human => Self::Human,
            PlayerSlot::Ai => Self::Ai,
        }
    }
}

/// The serializable scenario record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Board width; the engine standard when absent.
    #[serde(default = "default_width")]
    pub width: i32,
    /// Board height; the engine standard when absent.
    #[serde(default = "default_height")]
    pub height: i32,
    /// Seats in side order; loading assigns sides `1..=N`.
    pub players: Vec<PlayerSlot>,
    /// Owned tiles as `"x y"` keys to owner ids.
    pub data: BTreeMap<String, u8>,
}

const fn default_width() -> i32 {
    STANDARD_WIDTH
}

const fn default_height() -> i32 {
    STANDARD_HEIGHT
}

impl Scenario {
    /// Parses a scenario document.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Parse`] when the document is not valid
    /// JSON for the schema. Field-level validation happens at load time.
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the scenario to JSON.
    ///
    /// # Errors
    ///
    /// Propagates the underlying serializer error; with this schema that
    /// does not happen in practice.
    pub fn to_json(&self) -> Result<String, ScenarioError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Captures a board's ownership grid and player list as a scenario.
    ///
    /// Only owned tiles are stored; neutral space is implicit.
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let data = board
            .grid()
            .tiles()
            .filter(|(_, side)| !side.is_neutral())
            .map(|(coord, side)| (format!("{} {}", coord.x, coord.y), side.as_u8()))
            .collect();
        let players = board
            .players()
            .iter()
            .map(|p| match p.controller {
                Controller::Human => PlayerSlot::Human,
                Controller::Ai => PlayerSlot::Ai,
            })
            .collect();
        Self {
            width: board.grid().width(),
            height: board.grid().height(),
            players,
            data,
        }
    }

    /// Validates the tile map into a fresh grid.
    fn build_grid(&self) -> Result<OwnerGrid, ScenarioError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ScenarioError::BadDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let mut grid = OwnerGrid::new(self.width, self.height);
        for (key, &owner) in &self.data {
            let coord = parse_key(key)?;
            if !grid.in_bounds(coord) {
                return Err(ScenarioError::OutOfBounds {
                    key: key.clone(),
                    width: self.width,
                    height: self.height,
                });
            }
            if owner > Side::MAX_PLAYERS {
                return Err(ScenarioError::BadOwner {
                    key: key.clone(),
                    owner,
                });
            }
            grid.set(coord, Side::new(owner));
        }
        Ok(grid)
    }
}

fn parse_key(key: &str) -> Result<HexCoord, ScenarioError> {
    let bad = || ScenarioError::BadCoordinate {
        key: key.to_owned(),
    };
    let mut parts = key.split_whitespace();
    let x = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let y = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    if parts.next().is_some() {
        return Err(bad());
    }
    Ok(HexCoord::new(x, y))
}

impl Board {
    /// Replaces this board's state with a scenario.
    ///
    /// Reconstructs the player list in order (sides `1..=N`), installs the
    /// ownership grid, resets the turn to side 1, places initial dumps,
    /// banks side 1's first income, and refreshes everyone's ledgers.
    ///
    /// # Errors
    ///
    /// Any invalid coordinate, owner, or player count fails the load and
    /// leaves the board untouched.
    pub fn load_scenario(&mut self, scenario: &Scenario) -> Result<(), ScenarioError> {
        if scenario.players.len() > usize::from(Side::MAX_PLAYERS) {
            return Err(ScenarioError::TooManyPlayers {
                count: scenario.players.len(),
            });
        }
        // Validate fully before the first mutation.
        let grid = scenario.build_grid()?;

        self.grid = grid;
        self.roster.clear();
        self.players.clear();
        self.events.clear();
        self.turn = Side::new(1);
        for (i, &slot) in scenario.players.iter().enumerate() {
            let name = match slot {
                PlayerSlot::Human => format!("Player {}", i + 1),
                PlayerSlot::Ai => format!("CPU {}", i + 1),
            };
            self.push_player(name, slot.into());
        }

        self.maintain_dumps();
        self.settle_supplies(&[Side::new(1)]);
        self.refresh_all_ledgers();
        debug!(
            players = self.players.len(),
            area = self.world_area(),
            "scenario loaded"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::ruleset::Ruleset;

    fn loaded_board(json: &str) -> Result<Board, ScenarioError> {
        let scenario = Scenario::from_json(json)?;
        let mut board = Board::new(STANDARD_WIDTH, STANDARD_HEIGHT, Ruleset::standard(), 0);
        board.load_scenario(&scenario)?;
        Ok(board)
    }

    #[test]
    fn load_reconstructs_grid_and_players() {
        let board = loaded_board(
            r#"{
                "width": 10,
                "height": 6,
                "players": ["human", "ai"],
                "data": {"0 0": 1, "1 0": 1, "2 0": 2, "3 0": 2}
            }"#,
        )
        .unwrap();

        assert_eq!(board.grid().width(), 10);
        assert_eq!(board.grid().height(), 6);
        assert_eq!(board.owner(HexCoord::new(1, 0)), Side::new(1));
        assert_eq!(board.owner(HexCoord::new(3, 0)), Side::new(2));
        assert_eq!(board.players().len(), 2);
        assert!(!board.players()[0].is_ai());
        assert!(board.players()[1].is_ai());
        assert_eq!(board.turn(), Side::new(1));
        // Initial dumps were placed for both two-tile islands.
        assert_eq!(board.count_dumps(Side::new(1)), 1);
        assert_eq!(board.count_dumps(Side::new(2)), 1);
    }

    #[test]
    fn dimensions_default_to_standard() {
        let board = loaded_board(r#"{"players": ["human"], "data": {"5 5": 1}}"#).unwrap();
        assert_eq!(board.grid().width(), STANDARD_WIDTH);
        assert_eq!(board.grid().height(), STANDARD_HEIGHT);
    }

    #[test]
    fn roundtrip_preserves_grid_and_players() {
        let config = GameConfig {
            humans: 1,
            cpus: 2,
            seed: 5,
            ..GameConfig::default()
        };
        let mut board = Board::from_config(&config);
        board.new_game(&config);

        let json = Scenario::from_board(&board).to_json().unwrap();
        let scenario = Scenario::from_json(&json).unwrap();
        let mut reloaded = Board::from_config(&config);
        reloaded.load_scenario(&scenario).unwrap();

        assert_eq!(reloaded.grid(), board.grid());
        assert_eq!(
            reloaded.players().iter().map(|p| p.controller).collect::<Vec<_>>(),
            board.players().iter().map(|p| p.controller).collect::<Vec<_>>()
        );
    }

    #[test]
    fn bad_coordinate_key_fails() {
        let err = loaded_board(r#"{"players": ["human"], "data": {"oops": 1}}"#).unwrap_err();
        assert!(matches!(err, ScenarioError::BadCoordinate { .. }));
    }

    #[test]
    fn out_of_range_owner_fails() {
        let err = loaded_board(r#"{"players": ["human"], "data": {"0 0": 9}}"#).unwrap_err();
        assert!(matches!(err, ScenarioError::BadOwner { owner: 9, .. }));
    }

    #[test]
    fn out_of_bounds_tile_fails() {
        let err = loaded_board(
            r#"{"width": 4, "height": 4, "players": ["human"], "data": {"9 9": 1}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ScenarioError::OutOfBounds { .. }));
    }

    #[test]
    fn failed_load_leaves_board_untouched() {
        let mut board = Board::new(6, 4, Ruleset::standard(), 0);
        board.push_player("Player 1", Controller::Human);
        board.set_owner(HexCoord::new(2, 2), Side::new(1));
        let before = board.fingerprint();

        let scenario = Scenario::from_json(
            r#"{"width": 4, "height": 4, "players": ["ai"], "data": {"0 0": 7}}"#,
        )
        .unwrap();
        assert!(board.load_scenario(&scenario).is_err());
        assert_eq!(board.fingerprint(), before);
    }

    #[test]
    fn too_many_players_fails() {
        let scenario = Scenario {
            width: 8,
            height: 8,
            players: vec![PlayerSlot::Ai; 7],
            data: BTreeMap::new(),
        };
        let mut board = Board::new(8, 8, Ruleset::standard(), 0);
        let err = board.load_scenario(&scenario).unwrap_err();
        assert!(matches!(err, ScenarioError::TooManyPlayers { count: 7 }));
    }

    #[test]
    fn negative_coordinates_are_rejected() {
        let err = loaded_board(r#"{"players": ["human"], "data": {"-1 0": 1}}"#).unwrap_err();
        assert!(matches!(err, ScenarioError::OutOfBounds { .. }));
    }

    proptest::proptest! {
        /// Every coordinate the writer can emit parses back to itself.
        #[test]
        fn key_format_roundtrips(x in 0..STANDARD_WIDTH, y in 0..STANDARD_HEIGHT) {
            let coord = parse_key(&format!("{x} {y}")).unwrap();
            proptest::prop_assert_eq!(coord, HexCoord::new(x, y));
        }
    }
}
