//! Game adjudication on top of the stateless rule engine.
//!
//! A [`Game`] is one concrete caller of the engine: it owns the board, the side
//! to move and the move history, and after every move it asks the engine
//! whether the game has ended. The engine functions themselves keep no state.

use std::fmt;

use log::info;

use crate::board::{Board, Coord, Move, Side};
use crate::constants::REPETITION_LIMIT;
use crate::error::MoveError;
use crate::history::{
    HistoryEntry, board_hash, is_perpetual_chase, is_perpetual_check, is_repetition_with_limit,
};
use crate::notation::{board_to_fen, coord_name, move_name};
use crate::rules::{has_legal_move, in_check, is_legal, legal_move_list, legal_moves};

/// Which end-of-game detectors run, and with what thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    /// Total occurrences of a position that draw the game.
    pub repetition_limit: usize,
    pub detect_perpetual_check: bool,
    pub detect_perpetual_chase: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            repetition_limit: REPETITION_LIMIT,
            detect_perpetual_check: true,
            detect_perpetual_chase: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinReason {
    Checkmate,
    /// The loser had no legal move while not in check.
    Stalemate,
    PerpetualCheck,
    PerpetualChase,
    Resignation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawReason {
    Repetition,
    Agreement,
}

/// Game status as seen by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    Won { winner: Side, reason: WinReason },
    Drawn { reason: DrawReason },
}

impl Status {
    pub fn is_over(&self) -> bool {
        !matches!(self, Status::Playing)
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            Status::Won { winner, .. } => Some(*winner),
            _ => None,
        }
    }
}

impl fmt::Display for WinReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WinReason::Checkmate => "checkmate",
            WinReason::Stalemate => "stalemate",
            WinReason::PerpetualCheck => "perpetual check",
            WinReason::PerpetualChase => "perpetual chase",
            WinReason::Resignation => "resignation",
        };
        f.write_str(s)
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawReason::Repetition => f.write_str("repetition"),
            DrawReason::Agreement => f.write_str("agreement"),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Playing => write!(f, "playing"),
            Status::Won { winner, reason } => write!(f, "{winner} wins by {reason}"),
            Status::Drawn { reason } => write!(f, "draw by {reason}"),
        }
    }
}

/// A game in progress: board, side to move, history and status.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    turn: Side,
    history: Vec<HistoryEntry>,
    status: Status,
    rules: Rules,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl Game {
    /// A new game from the starting layout, Red to move.
    pub fn new(rules: Rules) -> Self {
        Self::from_position(Board::initial(), Side::Red, rules)
    }

    /// A game starting from an arbitrary position with an empty history.
    ///
    /// The status is evaluated immediately, so a position where `turn` is
    /// already mated starts out finished.
    pub fn from_position(board: Board, turn: Side, rules: Rules) -> Self {
        let mut game = Self {
            board,
            turn,
            history: Vec::new(),
            status: Status::Playing,
            rules,
        };
        game.status = game.terminal_status(turn.opponent());
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Side to move.
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn fen(&self) -> String {
        board_to_fen(&self.board, self.turn)
    }

    pub fn hash(&self) -> String {
        board_hash(&self.board)
    }

    /// Whether the side to move is in check.
    pub fn in_check(&self) -> bool {
        in_check(&self.board, self.turn)
    }

    /// Legal destinations of the piece on `from`, whichever side owns it.
    pub fn moves_from(&self, from: Coord) -> Vec<Coord> {
        legal_moves(&self.board, from)
    }

    /// Every legal move of the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.status.is_over() {
            return Vec::new();
        }
        legal_move_list(&self.board, self.turn)
    }

    /// Play `mv` for the side to move and return the resulting status.
    pub fn play(&mut self, mv: Move) -> Result<&Status, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }
        let piece = self
            .board
            .get(mv.from)
            .ok_or_else(|| MoveError::EmptySquare(coord_name(mv.from)))?;
        if piece.side != self.turn {
            return Err(MoveError::NotYourTurn(self.turn));
        }
        if !is_legal(&self.board, mv) {
            return Err(MoveError::Illegal(move_name(mv)));
        }

        let mover = self.turn;
        self.board.make_move(mv);
        self.turn = mover.opponent();

        let gives_check = in_check(&self.board, self.turn);
        self.history
            .push(HistoryEntry::new(board_hash(&self.board), mover, gives_check));

        self.status = self.terminal_status(mover);
        if self.status.is_over() {
            info!("game over after {}: {}", move_name(mv), self.status);
        }
        Ok(&self.status)
    }

    /// `side` resigns; the opponent wins.
    pub fn resign(&mut self, side: Side) -> Result<&Status, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }
        self.status = Status::Won {
            winner: side.opponent(),
            reason: WinReason::Resignation,
        };
        Ok(&self.status)
    }

    /// Both sides agree to a draw.
    pub fn agree_draw(&mut self) -> Result<&Status, MoveError> {
        if self.status.is_over() {
            return Err(MoveError::GameOver);
        }
        self.status = Status::Drawn {
            reason: DrawReason::Agreement,
        };
        Ok(&self.status)
    }

    /// Status after `mover` has moved, or `Playing` if nothing ended the game.
    ///
    /// Order: no legal reply (checkmate or stalemate), perpetual check,
    /// perpetual chase, repetition.
    fn terminal_status(&self, mover: Side) -> Status {
        let defender = mover.opponent();
        if !has_legal_move(&self.board, defender) {
            let reason = if in_check(&self.board, defender) {
                WinReason::Checkmate
            } else {
                WinReason::Stalemate
            };
            return Status::Won {
                winner: mover,
                reason,
            };
        }

        if self.rules.detect_perpetual_check {
            if let Some(loser) = is_perpetual_check(&self.history) {
                return Status::Won {
                    winner: loser.opponent(),
                    reason: WinReason::PerpetualCheck,
                };
            }
        }

        if self.rules.detect_perpetual_chase {
            if let Some(loser) = is_perpetual_chase(&self.history) {
                return Status::Won {
                    winner: loser.opponent(),
                    reason: WinReason::PerpetualChase,
                };
            }
        }

        if let Some((current, earlier)) = self.history.split_last() {
            let hashes: Vec<&str> = earlier.iter().map(|e| e.board_hash.as_str()).collect();
            if is_repetition_with_limit(&hashes, &current.board_hash, self.rules.repetition_limit)
            {
                return Status::Drawn {
                    reason: DrawReason::Repetition,
                };
            }
        }

        Status::Playing
    }
}
