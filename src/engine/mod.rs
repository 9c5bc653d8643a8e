//! The engine connects the board to a text stream: it reads commands line by
//! line, applies them and writes the responses. It is the "main loop" of the
//! interactive mode and the place where perft results are reported.
//!
//! Malformed commands, setup strings and illegal moves are reported to the
//! output and the loop continues. Only I/O errors stop it.

mod command;

use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::Context;
use itertools::Itertools;

use crate::chess::board::{Board, Outcome};
use crate::chess::core::{Color, Move, Position, Promotion};
use crate::chess::perft::{divide, perft};
use crate::engine::command::Command;

/// Writes the perft result for `board`. With `per_move`, the node count under
/// every root move is listed first (sorted by move text). Depth 0 has no root
/// moves and counts the position itself.
///
/// # Errors
///
/// Returns an error if the output can not be written.
pub fn report_perft<W: Write>(
    board: &mut Board,
    depth: u8,
    per_move: bool,
    output: &mut W,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let nodes = if per_move && depth > 0 {
        let divided = divide(board, depth);
        for (mv, nodes) in divided.iter().sorted_by_key(|(mv, _)| mv.to_string()) {
            writeln!(output, "{mv}: {nodes}")?;
        }
        divided.iter().map(|(_, nodes)| nodes).sum()
    } else {
        perft(board, depth)
    };
    let elapsed = start.elapsed();
    log::info!(
        "perft {depth}: {nodes} nodes in {elapsed:?} ({:.0} nps)",
        nodes as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    writeln!(output, "nodes {nodes}")?;
    Ok(())
}

fn promotion_requested(square: Position, color: Color) {
    log::info!("{} pawn on {square} waits for promotion", color.name());
}

fn with_promotion_handler(mut board: Board) -> Board {
    board.set_promotion_handler(Box::new(promotion_requested));
    board
}

/// Interactive session around a single [`Board`].
pub struct Engine<'a, R: BufRead, W: Write> {
    board: Board,
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> Engine<'a, R, W> {
    /// Creates a new session with the starting position and provided I/O.
    #[must_use]
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            board: with_promotion_handler(Board::starting()),
            input,
            output,
        }
    }

    /// Continuously reads the input stream and executes commands until `quit`
    /// is sent or the input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the input or writing the output fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("reading command from input")?;
            if read == 0 {
                break;
            }
            match Command::parse(&line) {
                Command::Quit => break,
                command => self.execute(command)?,
            }
            self.output.flush()?;
        }
        Ok(())
    }

    fn set_board(&mut self, board: Board) {
        self.board = with_promotion_handler(board);
    }

    fn execute(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::SetPosition { fen: None } => self.set_board(Board::starting()),
            Command::SetPosition { fen: Some(fen) } => match Board::try_from(fen.as_str()) {
                Ok(board) => self.set_board(board),
                Err(e) => writeln!(self.output, "error: {e}")?,
            },
            Command::Moves => {
                let moves = self.board.legal_moves().iter().map(Move::to_string).sorted().join(" ");
                writeln!(self.output, "{moves}")?;
            },
            Command::Move(input) => self.handle_move(&input)?,
            Command::Undo => match self.board.undo_last() {
                Some(mv) => writeln!(self.output, "undone {mv}")?,
                None => writeln!(self.output, "nothing to undo")?,
            },
            Command::Promote(input) => self.handle_promote(&input)?,
            Command::Perft { depth } => report_perft(&mut self.board, depth, false, self.output)?,
            Command::Divide { depth } => report_perft(&mut self.board, depth, true, self.output)?,
            Command::Display => write!(self.output, "{:?}", self.board)?,
            Command::Fen => writeln!(self.output, "{}", self.board)?,
            Command::Empty | Command::Quit => (),
            Command::Unknown(command) => {
                writeln!(self.output, "error: unsupported command: {command}")?;
            },
        }
        Ok(())
    }

    fn handle_move(&mut self, input: &str) -> anyhow::Result<()> {
        let mv = match Move::from_uci(input) {
            Ok(mv) => mv,
            Err(e) => {
                writeln!(self.output, "error: {e}")?;
                return Ok(());
            },
        };
        if !self.board.make_move(mv) {
            writeln!(self.output, "illegal move: {mv}")?;
            return Ok(());
        }
        writeln!(self.output, "ok")?;
        if self.board.pending_promotion().is_pending() {
            writeln!(self.output, "choose promotion: promote <q|r|b|n>")?;
        }
        self.report_outcome()
    }

    fn handle_promote(&mut self, input: &str) -> anyhow::Result<()> {
        let promotion = match input.chars().collect_tuple() {
            Some((symbol,)) => Promotion::try_from(symbol),
            None => {
                writeln!(self.output, "error: expected one of q, r, b, n")?;
                return Ok(());
            },
        };
        match promotion {
            Ok(promotion) if self.board.select_promotion(promotion) => {
                writeln!(self.output, "ok")?;
                self.report_outcome()?;
            },
            Ok(_) => writeln!(self.output, "error: no promotion is pending")?,
            Err(e) => writeln!(self.output, "error: {e}")?,
        }
        Ok(())
    }

    fn report_outcome(&mut self) -> anyhow::Result<()> {
        let outcome = self.board.outcome();
        if outcome != Outcome::Ongoing {
            log::info!("game over: {outcome}");
            writeln!(self.output, "game over: {outcome}")?;
        }
        Ok(())
    }
}
