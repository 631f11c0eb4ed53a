//! xiangqi-rules: a move-legality and game-termination engine for Xiangqi
//! (Chinese Chess).
//!
//! The engine is a set of pure functions over a [`Board`](board::Board): it
//! generates legal moves, detects check, checkmate and stalemate, hashes
//! positions, and recognises repetition, perpetual check and perpetual chase
//! from a caller-supplied history. It keeps no state between calls.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry and detector thresholds
//! - [`board`] - Board, pieces, coordinates and moves
//! - [`rules`] - Move generation, attack detection, check/mate/stalemate
//! - [`history`] - Position hashing and repetition/perpetual detection
//! - [`notation`] - Squares, moves, FEN and the flat storage encoding
//! - [`game`] - A game adjudicator built on the engine
//! - [`perft`] - Move-path enumeration for validating move generation
//! - [`playout`] - Seeded random playouts
//! - [`protocol`] - Line-based text protocol for driving the engine
//! - [`error`] - Error types for parsing and move submission
//!
//! ## Example
//!
//! ```
//! use xiangqi_rules::board::{Board, Coord, Side};
//! use xiangqi_rules::rules::{in_check, legal_moves};
//!
//! let board = Board::initial();
//! // Red's right cannon
//! let moves = legal_moves(&board, Coord::new(7, 7));
//! assert_eq!(moves.len(), 12);
//! assert!(!in_check(&board, Side::Red));
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod history;
pub mod notation;
pub mod perft;
pub mod playout;
pub mod protocol;
pub mod rules;
