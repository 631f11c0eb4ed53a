//! Move legality: movement generation, attack detection and terminal-state
//! predicates.
//!
//! Every function here is pure. Trial moves are made on a copy of the board,
//! so callers may share one board across threads.
//!
//! Generation happens in two stages. Pseudo-legal generation follows piece
//! geometry only; [`legal_moves`] then drops every destination that would leave
//! the mover's own King attacked. Only the filtered list is public.

use log::{debug, trace};

use crate::board::{Board, Coord, Kind, Move, Side};
use crate::constants::{
    BLACK_HALF_MAX_Y, BLACK_PALACE_MAX_Y, PALACE_MAX_X, PALACE_MIN_X, RED_HALF_MIN_Y,
    RED_PALACE_MIN_Y,
};

const ORTHOGONAL: [(isize, isize); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
const DIAGONAL: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const HORSE_JUMPS: [(isize, isize); 8] = [
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
];
const ELEPHANT_JUMPS: [(isize, isize); 4] = [(2, 2), (2, -2), (-2, 2), (-2, -2)];

/// Whether `at` lies inside `side`'s palace.
fn in_palace(at: Coord, side: Side) -> bool {
    let file_ok = (PALACE_MIN_X..=PALACE_MAX_X).contains(&at.x);
    match side {
        Side::Red => file_ok && at.y >= RED_PALACE_MIN_Y,
        Side::Black => file_ok && at.y <= BLACK_PALACE_MAX_Y,
    }
}

/// Whether row `y` is on `side`'s own half of the river.
fn on_own_half(y: usize, side: Side) -> bool {
    match side {
        Side::Red => y >= RED_HALF_MIN_Y,
        Side::Black => y <= BLACK_HALF_MAX_Y,
    }
}

/// Collects destinations for one piece, enforcing the
/// "on-board and empty-or-enemy" rule.
struct Targets<'a> {
    board: &'a Board,
    side: Side,
    out: Vec<Coord>,
}

impl<'a> Targets<'a> {
    fn new(board: &'a Board, side: Side) -> Self {
        Self {
            board,
            side,
            out: Vec::new(),
        }
    }

    fn is_enemy(&self, at: Coord) -> bool {
        self.board.get(at).is_some_and(|p| p.side != self.side)
    }

    fn add(&mut self, at: Option<Coord>) {
        if let Some(at) = at {
            if self.board.is_empty_at(at) || self.is_enemy(at) {
                self.out.push(at);
            }
        }
    }
}

/// Destinations for the piece on `from` by geometry alone, without the
/// self-check filter. Empty cell gives an empty list.
fn pseudo_legal_moves(board: &Board, from: Coord) -> Vec<Coord> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    let side = piece.side;
    let mut t = Targets::new(board, side);

    match piece.kind {
        Kind::Rook => {
            for (dx, dy) in ORTHOGONAL {
                let mut at = from;
                while let Some(next) = at.offset(dx, dy) {
                    t.add(Some(next));
                    if !board.is_empty_at(next) {
                        break;
                    }
                    at = next;
                }
            }
        }

        Kind::Horse => {
            for (dx, dy) in HORSE_JUMPS {
                let leg = if dx.abs() == 2 {
                    from.offset(dx / 2, 0)
                } else {
                    from.offset(0, dy / 2)
                };
                if leg.is_some_and(|leg| board.is_empty_at(leg)) {
                    t.add(from.offset(dx, dy));
                }
            }
        }

        Kind::Cannon => {
            for (dx, dy) in ORTHOGONAL {
                let mut screened = false;
                let mut at = from;
                while let Some(next) = at.offset(dx, dy) {
                    at = next;
                    let occupied = !board.is_empty_at(next);
                    if !screened {
                        if occupied {
                            screened = true;
                        } else {
                            t.out.push(next);
                        }
                    } else if occupied {
                        if t.is_enemy(next) {
                            t.out.push(next);
                        }
                        break;
                    }
                }
            }
        }

        Kind::Pawn => {
            t.add(from.offset(0, side.forward()));
            if !on_own_half(from.y, side) {
                t.add(from.offset(1, 0));
                t.add(from.offset(-1, 0));
            }
        }

        Kind::King => {
            for (dx, dy) in ORTHOGONAL {
                t.add(from.offset(dx, dy).filter(|&to| in_palace(to, side)));
            }
        }

        Kind::Advisor => {
            for (dx, dy) in DIAGONAL {
                t.add(from.offset(dx, dy).filter(|&to| in_palace(to, side)));
            }
        }

        Kind::Elephant => {
            for (dx, dy) in ELEPHANT_JUMPS {
                let Some(to) = from.offset(dx, dy) else {
                    continue;
                };
                let eye = Coord::new(
                    (from.x as isize + dx / 2) as usize,
                    (from.y as isize + dy / 2) as usize,
                );
                if board.is_empty_at(eye) && on_own_half(to.y, side) {
                    t.add(Some(to));
                }
            }
        }
    }

    t.out
}

/// Legal destinations for the piece on `from`.
///
/// Returns an empty list if `from` is empty. The piece's side is taken from the
/// occupant, not from whose turn it is.
pub fn legal_moves(board: &Board, from: Coord) -> Vec<Coord> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };

    let candidates = pseudo_legal_moves(board, from);
    let total = candidates.len();
    let legal: Vec<Coord> = candidates
        .into_iter()
        .filter(|&to| {
            let exposed = would_be_in_check(board, Move::new(from, to), piece.side);
            if exposed {
                debug!(
                    "rejected {} {:?} -> {:?}: leaves own king in check",
                    piece.letter(),
                    from,
                    to
                );
            }
            !exposed
        })
        .collect();

    trace!(
        "{} at {:?}: {} legal of {} candidates",
        piece.letter(),
        from,
        legal.len(),
        total
    );
    legal
}

/// Count pieces strictly between two cells on the same file or row.
fn pieces_between(board: &Board, from: Coord, to: Coord) -> usize {
    let dx = (to.x as isize - from.x as isize).signum();
    let dy = (to.y as isize - from.y as isize).signum();
    let mut count = 0;
    let mut at = from;
    while let Some(next) = at.offset(dx, dy) {
        if next == to {
            break;
        }
        if !board.is_empty_at(next) {
            count += 1;
        }
        at = next;
    }
    count
}

/// Whether the piece on `from` could capture the piece on `to` this ply.
///
/// Ignores whose turn it is and does not apply the self-check filter. False if
/// either cell is empty or both pieces belong to the same side. A King also
/// attacks the enemy King along an open file at any distance (flying general).
pub fn can_attack(board: &Board, from: Coord, to: Coord) -> bool {
    let (Some(piece), Some(target)) = (board.get(from), board.get(to)) else {
        return false;
    };
    if piece.side == target.side {
        return false;
    }

    let dx = to.x as isize - from.x as isize;
    let dy = to.y as isize - from.y as isize;
    let straight = (dx == 0) != (dy == 0);

    match piece.kind {
        Kind::Rook => straight && pieces_between(board, from, to) == 0,

        Kind::Cannon => straight && pieces_between(board, from, to) == 1,

        Kind::Horse => {
            if !((dx.abs() == 1 && dy.abs() == 2) || (dx.abs() == 2 && dy.abs() == 1)) {
                return false;
            }
            let leg = if dx.abs() == 2 {
                from.offset(dx / 2, 0)
            } else {
                from.offset(0, dy / 2)
            };
            leg.is_some_and(|leg| board.is_empty_at(leg))
        }

        Kind::Pawn => {
            let side = piece.side;
            (dx == 0 && dy == side.forward())
                || (!on_own_half(from.y, side) && dy == 0 && dx.abs() == 1)
        }

        Kind::King => {
            if dx == 0 && target.kind == Kind::King {
                return pieces_between(board, from, to) == 0;
            }
            dx.abs() + dy.abs() == 1
        }

        Kind::Advisor => dx.abs() == 1 && dy.abs() == 1,

        Kind::Elephant => {
            dx.abs() == 2
                && dy.abs() == 2
                && board.is_empty_at(Coord::new(
                    (from.x as isize + dx / 2) as usize,
                    (from.y as isize + dy / 2) as usize,
                ))
        }
    }
}

/// Enemy pieces currently attacking `side`'s King.
pub fn checkers(board: &Board, side: Side) -> Vec<Coord> {
    let Some(king) = board.find_king(side) else {
        return Vec::new();
    };
    board
        .pieces_of(side.opponent())
        .filter(|&(at, _)| can_attack(board, at, king))
        .map(|(at, _)| at)
        .collect()
}

/// Whether `side`'s King is attacked. A side without a King is not in check.
pub fn in_check(board: &Board, side: Side) -> bool {
    let Some(king) = board.find_king(side) else {
        return false;
    };
    board
        .pieces_of(side.opponent())
        .any(|(at, _)| can_attack(board, at, king))
}

/// Whether `side` would be in check after `mv`, tried on a copy of `board`.
///
/// A result with no King for `side` counts as check, so such moves are rejected.
pub fn would_be_in_check(board: &Board, mv: Move, side: Side) -> bool {
    let trial = board.with_move_made(mv);
    if trial.find_king(side).is_none() {
        return true;
    }
    in_check(&trial, side)
}

/// Every piece of `side` that can move, with its legal destinations.
pub fn all_legal_moves(board: &Board, side: Side) -> Vec<(Coord, Vec<Coord>)> {
    board
        .pieces_of(side)
        .filter_map(|(from, _)| {
            let moves = legal_moves(board, from);
            (!moves.is_empty()).then_some((from, moves))
        })
        .collect()
}

/// [`all_legal_moves`] flattened to a list of [`Move`]s.
pub fn legal_move_list(board: &Board, side: Side) -> Vec<Move> {
    all_legal_moves(board, side)
        .into_iter()
        .flat_map(|(from, tos)| tos.into_iter().map(move |to| Move::new(from, to)))
        .collect()
}

/// Whether `side` has at least one legal move. Stops at the first one found.
pub fn has_legal_move(board: &Board, side: Side) -> bool {
    board
        .pieces_of(side)
        .any(|(from, _)| !legal_moves(board, from).is_empty())
}

/// Whether `mv` is legal for the piece standing on `mv.from`.
pub fn is_legal(board: &Board, mv: Move) -> bool {
    legal_moves(board, mv.from).contains(&mv.to)
}

/// In check with no legal move.
pub fn is_checkmate(board: &Board, side: Side) -> bool {
    in_check(board, side) && !has_legal_move(board, side)
}

/// Not in check, yet no legal move.
pub fn is_stalemate(board: &Board, side: Side) -> bool {
    !in_check(board, side) && !has_legal_move(board, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn kings() -> Board {
        Board::empty()
            .with_piece(Coord::new(4, 9), Piece::red(Kind::King))
            .with_piece(Coord::new(3, 0), Piece::black(Kind::King))
    }

    fn sorted(mut v: Vec<Coord>) -> Vec<Coord> {
        v.sort();
        v
    }

    #[test]
    fn test_empty_square_has_no_moves() {
        assert!(legal_moves(&Board::initial(), Coord::new(4, 4)).is_empty());
    }

    #[test]
    fn test_rook_slides_and_captures() {
        let board = kings()
            .with_piece(Coord::new(0, 5), Piece::red(Kind::Rook))
            .with_piece(Coord::new(0, 2), Piece::black(Kind::Pawn))
            .with_piece(Coord::new(2, 5), Piece::red(Kind::Pawn));
        let moves = legal_moves(&board, Coord::new(0, 5));
        assert!(moves.contains(&Coord::new(0, 2)));
        assert!(!moves.contains(&Coord::new(0, 1)));
        assert!(moves.contains(&Coord::new(1, 5)));
        assert!(!moves.contains(&Coord::new(2, 5)));
        assert!(moves.contains(&Coord::new(0, 9)));
        // Up 3 (incl. capture), down 4, right 1.
        assert_eq!(moves.len(), 8);
    }

    #[test]
    fn test_horse_leg_blocks() {
        let board = kings()
            .with_piece(Coord::new(4, 5), Piece::red(Kind::Horse))
            .with_piece(Coord::new(4, 4), Piece::red(Kind::Pawn));
        let moves = legal_moves(&board, Coord::new(4, 5));
        // Upward jumps share the blocked leg.
        assert!(!moves.contains(&Coord::new(3, 3)));
        assert!(!moves.contains(&Coord::new(5, 3)));
        assert!(moves.contains(&Coord::new(2, 4)));
        assert!(moves.contains(&Coord::new(3, 7)));
        assert_eq!(moves.len(), 6);
    }

    #[test]
    fn test_cannon_needs_exactly_one_screen() {
        let board = kings()
            .with_piece(Coord::new(0, 9), Piece::red(Kind::Cannon))
            .with_piece(Coord::new(0, 6), Piece::red(Kind::Pawn))
            .with_piece(Coord::new(0, 4), Piece::black(Kind::Pawn))
            .with_piece(Coord::new(0, 0), Piece::black(Kind::Rook));
        let moves = legal_moves(&board, Coord::new(0, 9));
        assert!(moves.contains(&Coord::new(0, 7)));
        assert!(!moves.contains(&Coord::new(0, 6)));
        assert!(!moves.contains(&Coord::new(0, 5)));
        assert!(moves.contains(&Coord::new(0, 4)));
        assert!(!moves.contains(&Coord::new(0, 0)));
    }

    #[test]
    fn test_cannon_cannot_capture_own_piece_beyond_screen() {
        let board = kings()
            .with_piece(Coord::new(0, 9), Piece::red(Kind::Cannon))
            .with_piece(Coord::new(0, 6), Piece::black(Kind::Pawn))
            .with_piece(Coord::new(0, 3), Piece::red(Kind::Pawn));
        let moves = legal_moves(&board, Coord::new(0, 9));
        assert!(!moves.contains(&Coord::new(0, 6)));
        assert!(!moves.contains(&Coord::new(0, 3)));
        assert!(!moves.contains(&Coord::new(0, 4)));
    }

    #[test]
    fn test_pawn_sideways_only_after_river() {
        let board = kings()
            .with_piece(Coord::new(2, 6), Piece::red(Kind::Pawn))
            .with_piece(Coord::new(6, 4), Piece::red(Kind::Pawn))
            .with_piece(Coord::new(0, 5), Piece::black(Kind::Pawn));
        assert_eq!(legal_moves(&board, Coord::new(2, 6)), vec![Coord::new(2, 5)]);
        assert_eq!(
            sorted(legal_moves(&board, Coord::new(6, 4))),
            sorted(vec![Coord::new(6, 3), Coord::new(7, 4), Coord::new(5, 4)])
        );
        // Black pawn at row 5 has crossed; it steps down, left is off-board.
        assert_eq!(
            sorted(legal_moves(&board, Coord::new(0, 5))),
            sorted(vec![Coord::new(0, 6), Coord::new(1, 5)])
        );
    }

    #[test]
    fn test_pawn_never_moves_backward() {
        let board = kings().with_piece(Coord::new(4, 2), Piece::red(Kind::Pawn));
        let moves = legal_moves(&board, Coord::new(4, 2));
        assert!(!moves.contains(&Coord::new(4, 3)));
    }

    #[test]
    fn test_king_confined_to_palace() {
        let board = Board::empty()
            .with_piece(Coord::new(3, 7), Piece::red(Kind::King))
            .with_piece(Coord::new(5, 0), Piece::black(Kind::King));
        assert_eq!(
            sorted(legal_moves(&board, Coord::new(3, 7))),
            sorted(vec![Coord::new(4, 7), Coord::new(3, 8)])
        );
    }

    #[test]
    fn test_advisor_confined_to_palace() {
        let board = kings().with_piece(Coord::new(3, 9), Piece::red(Kind::Advisor));
        assert_eq!(legal_moves(&board, Coord::new(3, 9)), vec![Coord::new(4, 8)]);
    }

    #[test]
    fn test_elephant_eye_and_river() {
        let board = kings()
            .with_piece(Coord::new(2, 5), Piece::red(Kind::Elephant))
            .with_piece(Coord::new(3, 6), Piece::red(Kind::Pawn));
        let moves = sorted(legal_moves(&board, Coord::new(2, 5)));
        // Cannot cross the river; the (4,7) jump has its eye blocked.
        assert_eq!(moves, vec![Coord::new(0, 7)]);
    }

    #[test]
    fn test_flying_general_is_attack() {
        let board = Board::empty()
            .with_piece(Coord::new(4, 9), Piece::red(Kind::King))
            .with_piece(Coord::new(4, 0), Piece::black(Kind::King));
        assert!(can_attack(&board, Coord::new(4, 9), Coord::new(4, 0)));
        assert!(in_check(&board, Side::Red));
        assert!(in_check(&board, Side::Black));

        let blocked = board.with_piece(Coord::new(4, 5), Piece::red(Kind::Pawn));
        assert!(!can_attack(&blocked, Coord::new(4, 9), Coord::new(4, 0)));
    }

    #[test]
    fn test_king_cannot_step_onto_open_file() {
        let board = Board::empty()
            .with_piece(Coord::new(3, 9), Piece::red(Kind::King))
            .with_piece(Coord::new(4, 0), Piece::black(Kind::King));
        let moves = legal_moves(&board, Coord::new(3, 9));
        assert!(!moves.contains(&Coord::new(4, 9)));
        assert!(moves.contains(&Coord::new(3, 8)));
    }

    #[test]
    fn test_pinned_screen_cannot_leave_file() {
        let board = Board::empty()
            .with_piece(Coord::new(4, 9), Piece::red(Kind::King))
            .with_piece(Coord::new(4, 5), Piece::red(Kind::Rook))
            .with_piece(Coord::new(4, 0), Piece::black(Kind::King));
        let moves = legal_moves(&board, Coord::new(4, 5));
        assert!(moves.iter().all(|to| to.x == 4));
        assert!(moves.contains(&Coord::new(4, 0)));
    }

    #[test]
    fn test_can_attack_same_side_or_empty_is_false() {
        let board = Board::initial();
        assert!(!can_attack(&board, Coord::new(0, 9), Coord::new(0, 6)));
        assert!(!can_attack(&board, Coord::new(0, 9), Coord::new(0, 8)));
        assert!(!can_attack(&board, Coord::new(4, 4), Coord::new(4, 0)));
    }

    #[test]
    fn test_cannon_attack_counts_screens() {
        let bare = kings().with_piece(Coord::new(3, 5), Piece::red(Kind::Cannon));
        assert!(!can_attack(&bare, Coord::new(3, 5), Coord::new(3, 0)));

        let one_screen = bare.with_piece(Coord::new(3, 2), Piece::black(Kind::Advisor));
        assert!(can_attack(&one_screen, Coord::new(3, 5), Coord::new(3, 0)));
        assert!(in_check(&one_screen, Side::Black));
        assert_eq!(checkers(&one_screen, Side::Black), vec![Coord::new(3, 5)]);

        let two_screens = one_screen.with_piece(Coord::new(3, 3), Piece::red(Kind::Pawn));
        assert!(!can_attack(&two_screens, Coord::new(3, 5), Coord::new(3, 0)));
        assert!(!in_check(&two_screens, Side::Black));
    }

    #[test]
    fn test_missing_king_trial_counts_as_check() {
        let board = Board::empty()
            .with_piece(Coord::new(0, 0), Piece::red(Kind::Rook))
            .with_piece(Coord::new(4, 0), Piece::black(Kind::King));
        assert!(would_be_in_check(
            &board,
            Move::new(Coord::new(0, 0), Coord::new(1, 0)),
            Side::Red
        ));
        assert!(legal_moves(&board, Coord::new(0, 0)).is_empty());
        assert!(!in_check(&board, Side::Red));
    }

    #[test]
    fn test_off_board_trial_does_not_panic() {
        let board = Board::initial();
        let mv = Move::new(Coord::new(9, 0), Coord::new(4, 4));
        assert!(!would_be_in_check(&board, mv, Side::Red));
        assert!(!is_legal(&board, mv));
        assert!(legal_moves(&board, Coord::new(9, 0)).is_empty());
    }

    #[test]
    fn test_initial_position_has_44_moves() {
        let board = Board::initial();
        assert_eq!(legal_move_list(&board, Side::Red).len(), 44);
        assert_eq!(legal_move_list(&board, Side::Black).len(), 44);
        assert!(!in_check(&board, Side::Red));
    }

    #[test]
    fn test_stalemate_without_check() {
        // Red king on (3,9) cannot step to (4,9) or (3,8): the black rook on
        // file 4 and the pawn at (2,8) cover them. No other red piece.
        let board = Board::empty()
            .with_piece(Coord::new(3, 9), Piece::red(Kind::King))
            .with_piece(Coord::new(5, 0), Piece::black(Kind::King))
            .with_piece(Coord::new(4, 2), Piece::black(Kind::Rook))
            .with_piece(Coord::new(2, 8), Piece::black(Kind::Pawn))
            .with_piece(Coord::new(2, 7), Piece::black(Kind::Pawn));
        assert!(!in_check(&board, Side::Red));
        assert!(is_stalemate(&board, Side::Red));
        assert!(!is_checkmate(&board, Side::Red));
    }
}
