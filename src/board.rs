//! Xiangqi board representation.
//!
//! The board is a plain 10x9 grid of optional pieces. It is a `Copy` value:
//! every trial move in the rule engine works on its own copy, so the caller's
//! board is never touched.

use std::fmt;
use std::ops::Not;

use crate::constants::{FILES, RANKS};

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Red,
    Black,
}

impl Side {
    /// Both sides, Red first.
    pub const ALL: [Side; 2] = [Side::Red, Side::Black];

    /// The other side.
    pub const fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Row delta of one step toward the opponent's back rank.
    pub const fn forward(self) -> isize {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Side::Red => "red",
            Side::Black => "black",
        }
    }

    /// Parse `red`/`black` (or `r`/`b`, `w` for Red as in FEN), case-insensitively.
    pub fn parse(s: &str) -> Option<Side> {
        match s.to_ascii_lowercase().as_str() {
            "red" | "r" | "w" => Some(Side::Red),
            "black" | "b" => Some(Side::Black),
            _ => None,
        }
    }
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Side {
        self.opponent()
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Piece kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Chariot.
    Rook,
    Horse,
    Elephant,
    Advisor,
    /// General.
    King,
    Cannon,
    /// Soldier.
    Pawn,
}

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::Rook,
        Kind::Horse,
        Kind::Elephant,
        Kind::Advisor,
        Kind::King,
        Kind::Cannon,
        Kind::Pawn,
    ];

    /// Lowercase piece letter.
    pub const fn letter(self) -> char {
        match self {
            Kind::Rook => 'r',
            Kind::Horse => 'n',
            Kind::Elephant => 'e',
            Kind::Advisor => 'a',
            Kind::King => 'k',
            Kind::Cannon => 'c',
            Kind::Pawn => 'p',
        }
    }

    /// Inverse of [`Kind::letter`], case-insensitive.
    ///
    /// `h` and `b` are accepted as aliases for Horse and Elephant, which is
    /// what most Xiangqi FEN producers write.
    pub fn from_letter(c: char) -> Option<Kind> {
        match c.to_ascii_lowercase() {
            'r' => Some(Kind::Rook),
            'n' | 'h' => Some(Kind::Horse),
            'e' | 'b' => Some(Kind::Elephant),
            'a' => Some(Kind::Advisor),
            'k' => Some(Kind::King),
            'c' => Some(Kind::Cannon),
            'p' => Some(Kind::Pawn),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

/// Display labels, indexed by [`Kind`] order.
const RED_LABELS: [char; 7] = ['车', '马', '相', '仕', '帅', '炮', '兵'];
const BLACK_LABELS: [char; 7] = ['车', '马', '象', '士', '将', '炮', '卒'];

/// A piece: kind plus owner. Position is implied by the cell holding it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: Kind,
    pub side: Side,
}

impl Piece {
    pub const fn new(kind: Kind, side: Side) -> Self {
        Self { kind, side }
    }

    pub const fn red(kind: Kind) -> Self {
        Self::new(kind, Side::Red)
    }

    pub const fn black(kind: Kind) -> Self {
        Self::new(kind, Side::Black)
    }

    /// Letter form: uppercase for Red, lowercase for Black.
    pub fn letter(self) -> char {
        match self.side {
            Side::Red => self.kind.letter().to_ascii_uppercase(),
            Side::Black => self.kind.letter(),
        }
    }

    /// Parse a piece letter; the case decides the side.
    pub fn from_letter(c: char) -> Option<Piece> {
        let kind = Kind::from_letter(c)?;
        let side = if c.is_ascii_uppercase() {
            Side::Red
        } else {
            Side::Black
        };
        Some(Piece::new(kind, side))
    }

    /// Chinese character shown on the piece.
    pub fn label(self) -> char {
        match self.side {
            Side::Red => RED_LABELS[self.kind.index()],
            Side::Black => BLACK_LABELS[self.kind.index()],
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A board cell. `x` is the file (0..9), `y` the row (0..10).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Build a coordinate, returning `None` if it is off the board.
    pub fn try_new(x: isize, y: isize) -> Option<Self> {
        if x < 0 || y < 0 || x >= FILES as isize || y >= RANKS as isize {
            return None;
        }
        Some(Self::new(x as usize, y as usize))
    }

    pub const fn is_on_board(self) -> bool {
        self.x < FILES && self.y < RANKS
    }

    /// The cell `(dx, dy)` away, if it is on the board.
    pub fn offset(self, dx: isize, dy: isize) -> Option<Self> {
        Self::try_new(self.x as isize + dx, self.y as isize + dy)
    }
}

/// A move from one cell to another. Captures are implied by the target cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
}

impl Move {
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }
}

/// A 9x10 Xiangqi board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; FILES]; RANKS],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Self {
            cells: [[None; FILES]; RANKS],
        }
    }

    /// The standard starting layout.
    pub fn initial() -> Self {
        const BACK: [Kind; FILES] = [
            Kind::Rook,
            Kind::Horse,
            Kind::Elephant,
            Kind::Advisor,
            Kind::King,
            Kind::Advisor,
            Kind::Elephant,
            Kind::Horse,
            Kind::Rook,
        ];

        let mut board = Self::empty();
        for (x, &kind) in BACK.iter().enumerate() {
            board.cells[0][x] = Some(Piece::black(kind));
            board.cells[9][x] = Some(Piece::red(kind));
        }
        for x in [1, 7] {
            board.cells[2][x] = Some(Piece::black(Kind::Cannon));
            board.cells[7][x] = Some(Piece::red(Kind::Cannon));
        }
        for x in (0..FILES).step_by(2) {
            board.cells[3][x] = Some(Piece::black(Kind::Pawn));
            board.cells[6][x] = Some(Piece::red(Kind::Pawn));
        }
        board
    }

    /// Build a board from its rows, top (row 0) to bottom.
    pub const fn from_rows(cells: [[Option<Piece>; FILES]; RANKS]) -> Self {
        Self { cells }
    }

    /// The rows of the board, top (row 0) to bottom.
    pub fn rows(&self) -> &[[Option<Piece>; FILES]; RANKS] {
        &self.cells
    }

    /// The piece on `at`, or `None` if the cell is empty or off the board.
    pub fn get(&self, at: Coord) -> Option<Piece> {
        if !at.is_on_board() {
            return None;
        }
        self.cells[at.y][at.x]
    }

    pub fn is_empty_at(&self, at: Coord) -> bool {
        self.get(at).is_none()
    }

    /// Put `piece` on `at` (or clear it with `None`), returning what was there.
    ///
    /// # Panics
    /// If `at` is off the board.
    pub fn set(&mut self, at: Coord, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.cells[at.y][at.x], piece)
    }

    /// Builder-style placement, handy for setting up positions.
    pub fn with_piece(mut self, at: Coord, piece: Piece) -> Self {
        self.set(at, Some(piece));
        self
    }

    /// Move whatever stands on `mv.from` to `mv.to`, returning the captured piece.
    ///
    /// No legality check is done here. A move with an off-board end leaves the
    /// board untouched.
    pub fn make_move(&mut self, mv: Move) -> Option<Piece> {
        if !mv.from.is_on_board() || !mv.to.is_on_board() {
            return None;
        }
        let moving = self.set(mv.from, None);
        self.set(mv.to, moving)
    }

    /// Copy `self` and return it with `mv` applied.
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = *self;
        copied.make_move(mv);
        copied
    }

    /// All occupied cells in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(x, cell)| cell.map(|p| (Coord::new(x, y), p)))
        })
    }

    /// Occupied cells of one side, row-major.
    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.side == side)
    }

    /// Where `side`'s King stands, if it is on the board.
    pub fn find_king(&self, side: Side) -> Option<Coord> {
        let king = Piece::new(Kind::King, side);
        self.pieces()
            .find(|&(_, p)| p == king)
            .map(|(at, _)| at)
    }

    /// Render the board with Chinese labels; `·` marks empty cells.
    pub fn to_labels(&self) -> String {
        let mut out = String::new();
        for row in &self.cells {
            for cell in row {
                out.push(cell.map_or('·', Piece::label));
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.iter().enumerate() {
            write!(f, "{} ", RANKS - 1 - y)?;
            for cell in row {
                let ch = cell.map_or('.', Piece::letter);
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  a b c d e f g h i")
    }
}
