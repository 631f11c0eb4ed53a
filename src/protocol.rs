//! Xiangqi text protocol (XQP).
//!
//! A small line protocol in the spirit of GTP, so a GUI or a script can drive
//! the rule engine over stdin/stdout.
//!
//! Each request is an optional numeric id, a command and its arguments. Each
//! response is `=` (success) or `?` (failure), the id if one was given, the
//! response text, and a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`, `quit`
//! - `clear_board` - Reset to the starting layout
//! - `setboard <fen>` - Load a FEN position
//! - `setflat <rows> [red|black]` - Load the storage encoding
//! - `fen`, `flat`, `hash` - Export the current position
//! - `showboard [labels]` - Draw the board
//! - `turn`, `status`, `incheck`
//! - `checkers` - Squares of the pieces giving check to the side to move
//! - `moves <square>` - Legal destinations of one piece
//! - `allmoves` - Legal moves of the side to move
//! - `play <move>` - Play a move such as `h2e2`
//! - `resign <red|black>`, `draw`
//! - `perft <depth>`
//!
//! ## Example
//!
//! ```ignore
//! use xiangqi_rules::protocol::XqpEngine;
//! let mut engine = XqpEngine::new(Default::default());
//! engine.run()?;
//! ```

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, anyhow, bail};
use log::debug;

use crate::board::Side;
use crate::constants::MAX_PROTOCOL_PERFT_DEPTH;
use crate::game::{Game, Rules};
use crate::notation::{
    board_from_fen, board_from_flat, board_to_flat, coord_name, move_name, parse_coord, parse_move,
};
use crate::perft::perft;
use crate::rules::checkers;

/// The list of known XQP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "allmoves",
    "checkers",
    "clear_board",
    "draw",
    "fen",
    "flat",
    "hash",
    "incheck",
    "known_command",
    "list_commands",
    "moves",
    "name",
    "perft",
    "play",
    "protocol_version",
    "quit",
    "resign",
    "setboard",
    "setflat",
    "showboard",
    "status",
    "turn",
    "version",
];

/// XQP engine state.
pub struct XqpEngine {
    /// Current game
    game: Game,
    /// Detector settings applied to every new game
    rules: Rules,
}

impl Default for XqpEngine {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

impl XqpEngine {
    pub fn new(rules: Rules) -> Self {
        Self {
            game: Game::new(rules),
            rules,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop on stdin/stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over any reader and writer, until `quit` or EOF.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!("xqp <- {command} {args:?}");

            let (prefix, message) = match self.execute(&command, args) {
                Ok(message) => ('=', message),
                Err(e) => ('?', e.to_string()),
            };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end == 0 {
            return (None, trimmed);
        }
        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Execute one command and return the response text.
    fn execute(&mut self, command: &str, args: &[&str]) -> Result<String> {
        match command {
            "name" => Ok(env!("CARGO_PKG_NAME").to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("1".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = args.first().context("missing argument")?;
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(known.to_string())
            }

            "quit" => Ok(String::new()),

            "clear_board" => {
                self.game = Game::new(self.rules);
                Ok(String::new())
            }

            "setboard" => {
                if args.is_empty() {
                    bail!("missing argument");
                }
                let (board, turn) = board_from_fen(&args.join(" "))?;
                self.game = Game::from_position(board, turn, self.rules);
                Ok(String::new())
            }

            "setflat" => {
                let flat = args.first().context("missing argument")?;
                let board = board_from_flat(flat)?;
                let turn = match args.get(1) {
                    Some(s) => Side::parse(s).ok_or_else(|| anyhow!("invalid side `{s}`"))?,
                    None => Side::Red,
                };
                self.game = Game::from_position(board, turn, self.rules);
                Ok(String::new())
            }

            "fen" => Ok(self.game.fen()),

            "flat" => Ok(board_to_flat(self.game.board())),

            "hash" => Ok(self.game.hash()),

            "showboard" => {
                let text = match args.first() {
                    Some(&"labels") => self.game.board().to_labels(),
                    _ => self.game.board().to_string(),
                };
                Ok(format!("\n{}", text.trim_end()))
            }

            "turn" => Ok(self.game.turn().to_string()),

            "status" => Ok(self.game.status().to_string()),

            "incheck" => Ok(self.game.in_check().to_string()),

            "checkers" => {
                let mut names: Vec<String> = checkers(self.game.board(), self.game.turn())
                    .into_iter()
                    .map(coord_name)
                    .collect();
                names.sort();
                Ok(names.join(" "))
            }

            "moves" => {
                let square = args.first().context("missing argument")?;
                let from = parse_coord(square)?;
                let mut targets = self.game.moves_from(from);
                targets.sort_by_key(|&c| coord_name(c));
                let names: Vec<String> = targets.into_iter().map(coord_name).collect();
                Ok(names.join(" "))
            }

            "allmoves" => {
                let mut names: Vec<String> =
                    self.game.legal_moves().into_iter().map(move_name).collect();
                names.sort();
                Ok(names.join(" "))
            }

            "play" => {
                let text = args.first().context("missing argument")?;
                let mv = parse_move(text)?;
                let status = self.game.play(mv)?;
                Ok(status.to_string())
            }

            "resign" => {
                let side = args.first().context("missing argument")?;
                let side = Side::parse(side).ok_or_else(|| anyhow!("invalid side `{side}`"))?;
                Ok(self.game.resign(side)?.to_string())
            }

            "draw" => Ok(self.game.agree_draw()?.to_string()),

            "perft" => {
                let depth = args.first().context("missing argument")?;
                let depth: usize = depth
                    .parse()
                    .with_context(|| format!("invalid depth `{depth}`"))?;
                if depth > MAX_PROTOCOL_PERFT_DEPTH {
                    bail!("depth {depth} too large, at most {MAX_PROTOCOL_PERFT_DEPTH}");
                }
                Ok(perft(self.game.board(), self.game.turn(), depth).to_string())
            }

            _ => bail!("unknown command: {command}"),
        }
    }
}
