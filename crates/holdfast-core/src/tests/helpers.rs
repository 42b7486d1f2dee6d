//! Test helper functions for building small boards.
//!
//! Boards are described as ASCII rows of owner digits, one character per
//! tile, `'0'` for neutral space:
//!
//! ```text
//! board_with_rows(&[
//!     "1120",
//!     "0000",
//! ])
//! ```
//!
//! Actors are placed directly through the roster, bypassing draft rules,
//! so tests can set up exactly the states they need.

use hexfield::{HexCoord, Side};

use crate::actor::{dump, soldier, ActorId, DumpState};
use crate::board::Board;
use crate::player::Controller;
use crate::ruleset::Ruleset;

/// Builds a board from ASCII rows under the standard ruleset, seed 0.
///
/// No players are registered; add them with [`board_with_players`] or
/// [`Board::push_player`] when the test needs turn or elimination logic.
pub fn board_with_rows(rows: &[&str]) -> Board {
    board_with_rows_seeded(rows, 0)
}

/// [`board_with_rows`] with an explicit RNG seed.
pub fn board_with_rows_seeded(rows: &[&str], seed: u64) -> Board {
    let width = i32::try_from(rows[0].len()).unwrap();
    let height = i32::try_from(rows.len()).unwrap();
    let mut board = Board::new(width, height, Ruleset::standard(), seed);
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), rows[0].len(), "ragged rows");
        for (x, ch) in row.chars().enumerate() {
            let owner = u8::try_from(ch.to_digit(10).expect("owner digit")).unwrap();
            board.set_owner(
                HexCoord::new(i32::try_from(x).unwrap(), i32::try_from(y).unwrap()),
                Side::new(owner),
            );
        }
    }
    board
}

/// Builds a board from ASCII rows and registers `players` human players.
pub fn board_with_players(rows: &[&str], players: usize) -> Board {
    let mut board = board_with_rows(rows);
    for i in 0..players {
        board.push_player(format!("Player {}", i + 1), Controller::Human);
    }
    board
}

/// Places a soldier directly, bypassing draft checks.
pub fn place_soldier(board: &mut Board, at: (i32, i32), side: u8, level: u8) -> ActorId {
    board
        .roster_mut()
        .spawn(Side::new(side), HexCoord::new(at.0, at.1), soldier(level))
}

/// Places a dump with a starting balance directly.
pub fn place_dump(board: &mut Board, at: (i32, i32), side: u8, supplies: i32) -> ActorId {
    board
        .roster_mut()
        .spawn(Side::new(side), HexCoord::new(at.0, at.1), dump(supplies))
}

/// Reads the dump state at a tile.
///
/// # Panics
///
/// Panics when the tile holds no dump.
pub fn dump_at(board: &Board, at: (i32, i32)) -> DumpState {
    *board
        .roster()
        .fetch_at(HexCoord::new(at.0, at.1))
        .as_dump()
        .expect("tile holds a dump")
}
