//! Move-path enumeration (perft), used to validate move generation.
//!
//! Counts follow the legal-move tree only. Games are not adjudicated, so a
//! position with no legal moves simply contributes zero leaves.

use crate::board::{Board, Move, Side};
use crate::rules::legal_move_list;

/// Number of leaf nodes `depth` plies below `board` with `side` to move.
///
/// Uses bulk counting: at depth 1 the legal moves are counted, not made.
pub fn perft(board: &Board, side: Side, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_move_list(board, side);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves.into_iter().fold(0, |nodes, mv| {
        nodes + perft(&board.with_move_made(mv), side.opponent(), depth - 1)
    })
}

/// Like [`perft`], but returns the node count under each root move as well.
pub fn split_perft(board: &Board, side: Side, depth: usize) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    legal_move_list(board, side)
        .into_iter()
        .map(|mv| {
            let nodes = perft(&board.with_move_made(mv), side.opponent(), depth - 1);
            (mv, nodes)
        })
        .collect()
}
