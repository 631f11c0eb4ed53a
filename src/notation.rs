//! Text forms of squares, moves and whole boards.
//!
//! - Squares use ICCS style: a file letter `a`-`i` followed by a rank digit
//!   `0`-`9` counted from Red's side, so `e0` is Red's King square.
//! - [`board_to_fen`] / [`board_from_fen`] handle FEN-style position strings.
//! - [`board_to_flat`] / [`board_from_flat`] handle the storage encoding: rows
//!   joined by `;`, cells by `,`, empty cells as the empty string.

use crate::board::{Board, Coord, Move, Piece, Side};
use crate::constants::{FILES, RANKS};
use crate::error::NotationError;

/// Suffix written after the active color. The counters are not tracked.
const FEN_COUNTERS: &str = "- - 0 1";

/// Parse a square such as `e0` or `h7`.
pub fn parse_coord(s: &str) -> Result<Coord, NotationError> {
    let bad = || NotationError::Square(s.to_string());
    let bytes = s.trim().as_bytes();
    if bytes.len() != 2 {
        return Err(bad());
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];
    if !(b'a'..b'a' + FILES as u8).contains(&file) || !rank.is_ascii_digit() {
        return Err(bad());
    }

    let x = (file - b'a') as usize;
    let y = RANKS - 1 - (rank - b'0') as usize;
    Ok(Coord::new(x, y))
}

/// Inverse of [`parse_coord`].
pub fn coord_name(c: Coord) -> String {
    let file = (b'a' + c.x as u8) as char;
    format!("{file}{}", RANKS - 1 - c.y)
}

/// Parse a move written as two squares, e.g. `h2e2`. A `-` between them is
/// accepted.
pub fn parse_move(s: &str) -> Result<Move, NotationError> {
    let compact: String = s.trim().chars().filter(|&c| c != '-').collect();
    if compact.len() != 4 || !compact.is_ascii() {
        return Err(NotationError::Move(s.to_string()));
    }
    let from = parse_coord(&compact[..2]).map_err(|_| NotationError::Move(s.to_string()))?;
    let to = parse_coord(&compact[2..]).map_err(|_| NotationError::Move(s.to_string()))?;
    Ok(Move::new(from, to))
}

/// Inverse of [`parse_move`].
pub fn move_name(mv: Move) -> String {
    format!("{}{}", coord_name(mv.from), coord_name(mv.to))
}

/// FEN-style string: rows top to bottom, runs of empty cells as digits, rows
/// separated by `/`, then `w` (Red) or `b` (Black) to move and fixed counters.
pub fn board_to_fen(board: &Board, turn: Side) -> String {
    let mut fen = String::new();

    for (y, row) in board.rows().iter().enumerate() {
        let mut empty = 0;
        for cell in row {
            match cell {
                None => empty += 1,
                Some(piece) => {
                    if empty > 0 {
                        fen.push_str(&empty.to_string());
                        empty = 0;
                    }
                    fen.push(piece.letter());
                }
            }
        }
        if empty > 0 {
            fen.push_str(&empty.to_string());
        }
        if y + 1 < RANKS {
            fen.push('/');
        }
    }

    let color = match turn {
        Side::Red => 'w',
        Side::Black => 'b',
    };
    format!("{fen} {color} {FEN_COUNTERS}")
}

/// Parse a FEN-style string.
///
/// Only the placement and the optional active color (`w`/`r` for Red, `b` for
/// Black; Red if absent) are read. Anything after them is ignored.
pub fn board_from_fen(text: &str) -> Result<(Board, Side), NotationError> {
    let mut fields = text.split_whitespace();
    let placement = fields.next().ok_or(NotationError::Empty)?;

    let turn = match fields.next() {
        None => Side::Red,
        Some(c) if c.eq_ignore_ascii_case("w") || c.eq_ignore_ascii_case("r") => Side::Red,
        Some(c) if c.eq_ignore_ascii_case("b") => Side::Black,
        Some(c) => return Err(NotationError::ActiveColor(c.to_string())),
    };

    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != RANKS {
        return Err(NotationError::RowCount(rows.len()));
    }

    let mut board = Board::empty();
    for (y, row) in rows.iter().enumerate() {
        let mut x = 0;
        for c in row.chars() {
            if let Some(run) = c.to_digit(10) {
                x += run as usize;
            } else {
                let piece = Piece::from_letter(c).ok_or_else(|| NotationError::Piece {
                    piece: c.to_string(),
                    row: y,
                })?;
                if x < FILES {
                    board.set(Coord::new(x, y), Some(piece));
                }
                x += 1;
            }
            if x > FILES {
                return Err(NotationError::RowWidth { row: y, files: x });
            }
        }
        if x != FILES {
            return Err(NotationError::RowWidth { row: y, files: x });
        }
    }

    Ok((board, turn))
}

/// Storage encoding: cells joined by `,`, rows by `;`, empty cells blank.
pub fn board_to_flat(board: &Board) -> String {
    board
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.map(|p| p.letter().to_string()).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Inverse of [`board_to_flat`]. `null` is accepted for an empty cell.
pub fn board_from_flat(text: &str) -> Result<Board, NotationError> {
    let rows: Vec<&str> = text.trim().split(';').collect();
    if rows.len() != RANKS {
        return Err(NotationError::RowCount(rows.len()));
    }

    let mut board = Board::empty();
    for (y, row) in rows.iter().enumerate() {
        let cells: Vec<&str> = row.split(',').collect();
        if cells.len() != FILES {
            return Err(NotationError::RowWidth {
                row: y,
                files: cells.len(),
            });
        }
        for (x, cell) in cells.iter().enumerate() {
            let cell = cell.trim();
            if cell.is_empty() || cell == "null" {
                continue;
            }
            let mut chars = cell.chars();
            let piece = match (chars.next(), chars.next()) {
                (Some(c), None) => Piece::from_letter(c),
                _ => None,
            }
            .ok_or_else(|| NotationError::Piece {
                piece: cell.to_string(),
                row: y,
            })?;
            board.set(Coord::new(x, y), Some(piece));
        }
    }
    Ok(board)
}
