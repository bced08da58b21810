//! Diagnostic command-line interface.
//!
//! Every command runs in-process against the in-memory window host, so the
//! engine can be inspected without a real windowing system.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::CasementResult;

/// Parses the process arguments and runs the selected command.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the command fails.
pub fn run() -> CasementResult<()> {
    let cli = Cli::parse();
    cli.execute()
}
