//! Random playouts (uniformly random legal moves until the game ends).
//!
//! The random generator is always passed in, so a seed reproduces a game
//! exactly. Used by the `selfplay` command and by the property tests, which
//! need a steady supply of varied, reachable positions.

use crate::board::Move;
use crate::game::{Game, Status};

/// Outcome of a single playout.
#[derive(Clone, Debug)]
pub struct PlayoutReport {
    /// Plies actually played.
    pub plies: usize,
    /// Status when the playout stopped. `Playing` if the ply cap was hit.
    pub status: Status,
    /// FEN of the final position.
    pub fen: String,
    /// Moves in the order they were played.
    pub moves: Vec<Move>,
}

/// Pick one legal move of the side to move, or `None` if there is none.
pub fn choose_random_move(game: &Game, rng: &mut fastrand::Rng) -> Option<Move> {
    let moves = game.legal_moves();
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.usize(..moves.len())])
}

/// Play random legal moves on `game` until it ends or `max_plies` is reached.
pub fn random_playout(game: &mut Game, max_plies: usize, rng: &mut fastrand::Rng) -> PlayoutReport {
    let mut moves = Vec::new();

    while moves.len() < max_plies && !game.status().is_over() {
        let Some(mv) = choose_random_move(game, rng) else {
            break;
        };
        // Moves come from the legal list, so this cannot be refused.
        if game.play(mv).is_err() {
            break;
        }
        moves.push(mv);
    }

    PlayoutReport {
        plies: moves.len(),
        status: *game.status(),
        fen: game.fen(),
        moves,
    }
}
