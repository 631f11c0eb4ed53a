//! Invariants checked over positions reached by seeded random playouts.

use xiangqi_rules::board::{Board, Coord, Kind, Move, Piece, Side};
use xiangqi_rules::game::Game;
use xiangqi_rules::history::board_hash;
use xiangqi_rules::playout::choose_random_move;
use xiangqi_rules::rules::{
    all_legal_moves, can_attack, has_legal_move, in_check, is_checkmate, is_stalemate,
    would_be_in_check,
};

const SEEDS: u64 = 8;
const PLIES: usize = 120;

/// Every position of a seeded random game, with the side to move.
fn positions(seed: u64) -> Vec<(Board, Side)> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut game = Game::default();
    let mut seen = vec![(*game.board(), game.turn())];
    for _ in 0..PLIES {
        let Some(mv) = choose_random_move(&game, &mut rng) else {
            break;
        };
        game.play(mv).unwrap();
        seen.push((*game.board(), game.turn()));
        if game.status().is_over() {
            break;
        }
    }
    seen
}

fn for_each_position(mut check: impl FnMut(&Board, Side)) {
    for seed in 0..SEEDS {
        for (board, side) in positions(seed) {
            check(&board, side);
        }
    }
}

#[test]
fn test_moves_land_on_empty_or_enemy() {
    for_each_position(|board, side| {
        for (from, tos) in all_legal_moves(board, side) {
            assert_eq!(board.get(from).map(|p| p.side), Some(side));
            for to in tos {
                assert!(to.is_on_board());
                assert!(board.get(to).is_none_or(|p| p.side != side));
            }
        }
    });
}

#[test]
fn test_moves_never_leave_own_king_in_check() {
    for_each_position(|board, side| {
        for (from, tos) in all_legal_moves(board, side) {
            for to in tos {
                let mv = Move::new(from, to);
                assert!(!would_be_in_check(board, mv, side));
                assert!(!in_check(&board.with_move_made(mv), side));
            }
        }
    });
}

#[test]
fn test_in_check_agrees_with_can_attack() {
    for_each_position(|board, side| {
        for who in Side::ALL {
            let Some(king) = board.find_king(who) else {
                continue;
            };
            let attacked = board
                .pieces_of(!who)
                .any(|(at, _)| can_attack(board, at, king));
            assert_eq!(attacked, in_check(board, who), "side {who} to move {side}");
        }
    });
}

#[test]
fn test_checkmate_and_stalemate_are_exclusive() {
    for_each_position(|board, side| {
        let mate = is_checkmate(board, side);
        let stale = is_stalemate(board, side);
        assert!(!(mate && stale));
        if mate || stale {
            assert!(!has_legal_move(board, side));
        }
        if !has_legal_move(board, side) {
            assert!(mate || stale);
        }
    });
}

#[test]
fn test_hash_changes_with_any_cell() {
    for_each_position(|board, _| {
        let hash = board_hash(board);
        assert_eq!(hash, board_hash(&Board::from_rows(*board.rows())));

        // Toggle one empty cell and one occupied cell.
        let empty = (0..9)
            .flat_map(|x| (0..10).map(move |y| Coord::new(x, y)))
            .find(|&c| board.is_empty_at(c));
        if let Some(at) = empty {
            let changed = board.with_piece(at, Piece::red(Kind::Pawn));
            assert_ne!(hash, board_hash(&changed));
        }
        if let Some((at, _)) = board.pieces().next() {
            let mut cleared = *board;
            cleared.set(at, None);
            assert_ne!(hash, board_hash(&cleared));
        }
    });
}

#[test]
fn test_playouts_are_reproducible() {
    assert_eq!(positions(3), positions(3));
}
