//! Chess rules engine built around a square-centric (mailbox) board where every
//! piece computes its own legal and controlled squares. Moves are applied and
//! reverted in place, which makes the engine usable both behind an interactive
//! front-end (with undo) and as a [perft] oracle.
//!
//! ```
//! use pawnstorm::chess::board::Board;
//! use pawnstorm::chess::perft::perft;
//!
//! let mut board = Board::starting();
//! assert_eq!(perft(&mut board, 2), 400);
//! ```
//!
//! [perft]: https://www.chessprogramming.org/Perft

// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]

pub mod chess;
pub mod engine;
pub mod util;

use shadow_rs::shadow;

shadow!(build);

/// Build type and assertions. Produced by `build.rs`.
const FEATURES: &str = include_str!(concat!(env!("OUT_DIR"), "/features"));

/// Returns the full version that can be used to identify how the binary was
/// built in the first place.
#[must_use]
pub fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the version and the build type on startup.
pub fn print_engine_info() {
    println!("Pawnstorm {}", engine_version());
    println!("Release build: {}", !shadow_rs::is_debug());
    println!("Features: {FEATURES}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
