//! Config CLI commands.

use clap::Subcommand;

use crate::cli::output;
use crate::config::{config_paths, generate_schema_json, get_config, get_config_path};
use crate::error::CasementResult;

/// Configuration inspection commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum ConfigCommands {
    /// Show where Casement looks for its configuration file.
    ///
    /// Lists the search paths in priority order and marks the one in use.
    Path,

    /// Print the effective configuration, defaults included.
    Show,

    /// Print the JSON Schema of the configuration file.
    ///
    /// Redirect it to a file to get completion and validation in editors
    /// that understand JSON Schema.
    Schema,
}

/// Executes config subcommands.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cmd: &ConfigCommands) -> CasementResult<()> {
    match cmd {
        ConfigCommands::Path => show_config_path(),
        ConfigCommands::Show => {
            output::print_json(get_config());
            Ok(())
        }
        ConfigCommands::Schema => {
            println!("{}", generate_schema_json());
            Ok(())
        }
    }
}

#[allow(clippy::unnecessary_wraps)]
fn show_config_path() -> CasementResult<()> {
    if let Some(path) = crate::config::get_custom_config_path() {
        println!("Using configuration file from --config: {}", path.display());
        return Ok(());
    }

    // Loading resolves which candidate is active.
    let _ = get_config();
    let active = get_config_path();

    println!("Configuration file search paths (in priority order):\n");
    for (i, path) in config_paths().iter().enumerate() {
        let marker = if active == Some(path) {
            " (active)"
        } else if path.exists() {
            " (exists)"
        } else {
            ""
        };
        println!("  {}. {}{}", i + 1, path.display(), marker);
    }

    if active.is_none() {
        println!("\nNo configuration file found; using defaults.");
    }

    Ok(())
}
