//! Error types for text parsing and move submission.
//!
//! The rule engine itself never fails: empty squares give empty move lists and
//! impossible positions simply have no legal moves. Errors only appear where
//! text is decoded or where a [`Game`](crate::game::Game) refuses a move.

use thiserror::Error;

use crate::board::Side;

/// Malformed square, move, FEN or storage text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid square `{0}`, expected a file a-i and a rank 0-9")]
    Square(String),

    #[error("invalid move `{0}`, expected two squares such as h2e2")]
    Move(String),

    #[error("unknown piece `{piece}` in row {row}")]
    Piece { piece: String, row: usize },

    #[error("row {row} covers {files} files, expected 9")]
    RowWidth { row: usize, files: usize },

    #[error("expected 10 rows, found {0}")]
    RowCount(usize),

    #[error("invalid active color `{0}`")]
    ActiveColor(String),

    #[error("empty position")]
    Empty,
}

/// Why a [`Game`](crate::game::Game) refused a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,

    #[error("no piece on {0}")]
    EmptySquare(String),

    #[error("it is {0}'s turn")]
    NotYourTurn(Side),

    #[error("illegal move {0}")]
    Illegal(String),
}
