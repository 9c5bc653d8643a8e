use std::io;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use pawnstorm::chess::board::Board;
use pawnstorm::engine::{report_perft, Engine};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Log verbosity: -v for info, -vv for debug, -vvv for trace.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Counts leaf nodes of the legal move tree and exits.
    Perft {
        depth: u8,
        /// Root position, the starting one by default.
        #[arg(long)]
        fen: Option<String>,
        /// Print the node count under every root move.
        #[arg(long)]
        divide: bool,
    },
}

/// Writes log records to stderr so that they never mix with the protocol
/// output.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    log::set_logger(&LOGGER).context("installing logger")?;
    log::set_max_level(match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Some(Command::Perft { depth, fen, divide }) => {
            let mut board = match fen {
                Some(fen) => Board::try_from(fen.as_str())
                    .with_context(|| format!("parsing position '{fen}'"))?,
                None => Board::starting(),
            };
            report_perft(&mut board, depth, divide, &mut io::stdout().lock())
        },
        None => {
            pawnstorm::print_engine_info();
            let mut input = io::stdin().lock();
            let mut output = io::stdout().lock();
            Engine::new(&mut input, &mut output).run()
        },
    }
}
