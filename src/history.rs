//! Position hashing and the draw/loss detectors that work over a move history.
//!
//! The history is owned by the caller and passed in on every call; nothing is
//! remembered here between calls.

use log::info;

use crate::board::{Board, Side};
use crate::constants::{
    HASH_EMPTY, HASH_ROW_SEP, PERPETUAL_CHASE_MIN_PATTERNS, PERPETUAL_CHASE_WINDOW,
    PERPETUAL_CHECK_MIN_HISTORY, PERPETUAL_CHECK_PLIES, REPETITION_LIMIT,
};

/// One ply of history, recorded after the move was made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    /// [`board_hash`] of the position after the move.
    pub board_hash: String,
    /// Side that made the move.
    pub moved_by: Side,
    /// Whether the move left the opponent in check.
    pub is_check: bool,
}

impl HistoryEntry {
    pub fn new(board_hash: impl Into<String>, moved_by: Side, is_check: bool) -> Self {
        Self {
            board_hash: board_hash.into(),
            moved_by,
            is_check,
        }
    }
}

/// Canonical string for a piece placement.
///
/// Cells are written row by row, top to bottom: the piece letter for an
/// occupied cell, `_` for an empty one. Rows are separated by `|`. Equal
/// placements give equal strings and any single differing cell changes it.
pub fn board_hash(board: &Board) -> String {
    let mut out = String::with_capacity(board.rows().len() * 10);
    for (y, row) in board.rows().iter().enumerate() {
        if y > 0 {
            out.push(HASH_ROW_SEP);
        }
        out.extend(row.iter().map(|cell| cell.map_or(HASH_EMPTY, |p| p.letter())));
    }
    out
}

/// Whether `current` has now occurred [`REPETITION_LIMIT`] times, counting
/// itself once and every equal hash in `history`.
pub fn is_repetition<S: AsRef<str>>(history: &[S], current: &str) -> bool {
    is_repetition_with_limit(history, current, REPETITION_LIMIT)
}

/// [`is_repetition`] with an explicit occurrence limit.
pub fn is_repetition_with_limit<S: AsRef<str>>(history: &[S], current: &str, limit: usize) -> bool {
    // The current position needs `limit - 1` earlier copies.
    if history.len() + 1 < limit {
        return false;
    }
    let count = 1 + history.iter().filter(|h| h.as_ref() == current).count();
    if count >= limit {
        info!("position repeated {count} times");
        return true;
    }
    false
}

/// Perpetual check: the last three plies all gave check.
///
/// Returns the side that made the most recent move, which is the one that
/// loses. Nothing is reported until the history holds six plies.
///
/// The three plies necessarily alternate between the two sides; only the
/// latest mover is blamed.
pub fn is_perpetual_check(history: &[HistoryEntry]) -> Option<Side> {
    if history.len() < PERPETUAL_CHECK_MIN_HISTORY {
        return None;
    }
    let recent = &history[history.len() - PERPETUAL_CHECK_PLIES..];
    if !recent.iter().all(|e| e.is_check) {
        return None;
    }
    let loser = recent.last()?.moved_by;
    info!("perpetual check detected, {loser} loses");
    Some(loser)
}

/// Perpetual chase, approximated by positions alternating A,B,A,B.
///
/// Looks at the last eight plies and checks offsets 0, 2 and 4 for
/// `h[i] == h[i + 2] && h[i + 1] == h[i + 3]`. Two or more matches make a
/// chase, and the most recent mover loses. This does not look at which
/// pieces are actually threatened.
pub fn is_perpetual_chase(history: &[HistoryEntry]) -> Option<Side> {
    if history.len() < PERPETUAL_CHASE_WINDOW {
        return None;
    }
    let recent = &history[history.len() - PERPETUAL_CHASE_WINDOW..];
    let hashes: Vec<&str> = recent.iter().map(|e| e.board_hash.as_str()).collect();

    let patterns = (0..hashes.len() - 3)
        .step_by(2)
        .filter(|&i| hashes[i] == hashes[i + 2] && hashes[i + 1] == hashes[i + 3])
        .count();

    if patterns < PERPETUAL_CHASE_MIN_PATTERNS {
        return None;
    }
    let loser = recent.last()?.moved_by;
    info!("perpetual chase detected, {loser} loses");
    Some(loser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coord, Kind, Piece};

    fn entry(hash: &str, moved_by: Side, is_check: bool) -> HistoryEntry {
        HistoryEntry::new(hash, moved_by, is_check)
    }

    /// Alternating movers, starting with Red.
    fn plies(hashes: &[&str], checks: &[bool]) -> Vec<HistoryEntry> {
        hashes
            .iter()
            .zip(checks)
            .enumerate()
            .map(|(i, (h, &c))| {
                let side = if i % 2 == 0 { Side::Red } else { Side::Black };
                entry(h, side, c)
            })
            .collect()
    }

    #[test]
    fn test_board_hash_shape() {
        let hash = board_hash(&Board::initial());
        let rows: Vec<&str> = hash.split('|').collect();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0], "rneakaenr");
        assert_eq!(rows[1], "_________");
        assert_eq!(rows[7], "_C_____C_");
        assert_eq!(rows[9], "RNEAKAENR");
    }

    #[test]
    fn test_board_hash_single_cell_difference() {
        let a = Board::initial();
        let b = a.with_piece(Coord::new(4, 4), Piece::red(Kind::Pawn));
        assert_ne!(board_hash(&a), board_hash(&b));
        assert_eq!(board_hash(&a), board_hash(&Board::initial()));
    }

    #[test]
    fn test_repetition_threshold() {
        let five = vec!["A"; 5];
        assert!(is_repetition(&five, "A"));
        let four = vec!["A"; 4];
        assert!(!is_repetition(&four, "A"));
        let mixed = vec!["A", "B", "A", "B", "A", "B", "A", "B"];
        assert!(!is_repetition(&mixed, "A"));
        assert!(!is_repetition::<&str>(&[], "A"));
    }

    #[test]
    fn test_repetition_custom_limit() {
        assert!(is_repetition_with_limit(&["A", "B", "A"], "A", 3));
        assert!(!is_repetition_with_limit(&["A", "B"], "A", 3));
    }

    #[test]
    fn test_perpetual_check_needs_three_checks() {
        let history = plies(
            &["1", "2", "3", "4", "5", "6"],
            &[false, false, false, true, true, true],
        );
        // Ply index 5 was Black's.
        assert_eq!(is_perpetual_check(&history), Some(Side::Black));

        let broken = plies(
            &["1", "2", "3", "4", "5", "6"],
            &[true, true, true, false, true, true],
        );
        assert_eq!(is_perpetual_check(&broken), None);
    }

    #[test]
    fn test_perpetual_check_short_history() {
        let history = plies(&["1", "2", "3", "4", "5"], &[true; 5]);
        assert_eq!(is_perpetual_check(&history), None);
    }

    #[test]
    fn test_perpetual_chase_abab() {
        let history = plies(
            &["A", "B", "A", "B", "A", "B", "A", "B"],
            &[false; 8],
        );
        assert_eq!(is_perpetual_chase(&history), Some(Side::Black));
    }

    #[test]
    fn test_perpetual_chase_one_pattern_is_not_enough() {
        // Offset 0 matches; offsets 2 and 4 do not.
        let history = plies(
            &["A", "B", "A", "B", "C", "D", "E", "F"],
            &[false; 8],
        );
        assert_eq!(is_perpetual_chase(&history), None);
    }

    #[test]
    fn test_perpetual_chase_only_last_window() {
        let mut history = plies(
            &["A", "B", "A", "B", "A", "B", "A", "B"],
            &[false; 8],
        );
        history.push(entry("Z", Side::Red, false));
        history.push(entry("Y", Side::Black, false));
        history.push(entry("X", Side::Red, false));
        assert_eq!(is_perpetual_chase(&history), None);
        assert_eq!(is_perpetual_chase(&history[..7]), None);
    }
}
