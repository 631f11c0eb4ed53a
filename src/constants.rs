//! Constants for board geometry, palace and river bounds, and the
//! repetition/perpetual detectors.
//!
//! Coordinates are `(x, y)` with `x` the file (0 = leftmost from Red's side)
//! and `y` the row (0 = Black's back rank, 9 = Red's back rank).

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of files (columns).
pub const FILES: usize = 9;

/// Number of ranks (rows).
pub const RANKS: usize = 10;

/// Total number of cells on the board.
pub const CELLS: usize = FILES * RANKS;

// =============================================================================
// Palace and River
// =============================================================================

/// Leftmost palace file.
pub const PALACE_MIN_X: usize = 3;

/// Rightmost palace file.
pub const PALACE_MAX_X: usize = 5;

/// Lowest row of Red's palace (rows 7..=9).
pub const RED_PALACE_MIN_Y: usize = 7;

/// Highest row of Black's palace (rows 0..=2).
pub const BLACK_PALACE_MAX_Y: usize = 2;

/// Last row on Black's side of the river. Rows `0..=4` belong to Black,
/// rows `5..=9` to Red.
pub const BLACK_HALF_MAX_Y: usize = 4;

/// First row on Red's side of the river.
pub const RED_HALF_MIN_Y: usize = 5;

// =============================================================================
// Position Hashing
// =============================================================================

/// Placeholder for an empty cell in a board hash.
pub const HASH_EMPTY: char = '_';

/// Separator between rows in a board hash.
pub const HASH_ROW_SEP: char = '|';

// =============================================================================
// Draw / Loss Detection
// =============================================================================

/// Total occurrences of one position (history plus current) that end the
/// game as a draw.
pub const REPETITION_LIMIT: usize = 6;

/// Number of trailing plies that must all give check for a perpetual check.
pub const PERPETUAL_CHECK_PLIES: usize = 3;

/// Minimum history length before perpetual check is considered.
pub const PERPETUAL_CHECK_MIN_HISTORY: usize = 6;

/// Number of trailing plies inspected for a perpetual chase.
pub const PERPETUAL_CHASE_WINDOW: usize = 8;

/// ABAB matches within the chase window needed to call it a chase.
pub const PERPETUAL_CHASE_MIN_PATTERNS: usize = 2;

// =============================================================================
// Protocol / CLI Defaults
// =============================================================================

/// Default ply cap for random self-play.
pub const DEFAULT_MAX_PLIES: usize = 300;

/// Largest perft depth accepted from the text protocol.
pub const MAX_PROTOCOL_PERFT_DEPTH: usize = 5;
