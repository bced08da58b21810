//! CLI command definitions using Clap.
//!
//! - `config_cmd` - configuration inspection
//! - `ease` - easing curve sampling
//! - `simulate` - animation and fullscreen runs against the in-memory host
//! - `types` - argument types shared across commands

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::config;
use crate::error::{CasementError, CasementResult};

pub mod config_cmd;
pub mod ease;
pub mod simulate;
pub mod types;

pub use config_cmd::ConfigCommands;
pub use ease::EaseArgs;
pub use simulate::SimulateCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Casement - inspect the window geometry and animation engine.
#[derive(Parser, Debug)]
#[command(name = "casement")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Sample an easing curve.
    ///
    /// Prints the clamped value opacity animations use and the raw value
    /// geometric animations use, which may overshoot.
    Ease(EaseArgs),

    /// Run the engine against a simulated desktop.
    #[command(subcommand)]
    Simulate(SimulateCommands),

    /// Configuration file commands.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions.
    ///
    /// Usage:
    ///   eval "$(casement completions --shell zsh)"
    ///   casement completions --shell fish > ~/.config/fish/completions/casement.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Executes the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> CasementResult<()> {
        if let Some(path) = self.config_path() {
            if !path.exists() {
                return Err(CasementError::Config(config::ConfigError::NotFound));
            }
            config::set_custom_config_path(path);
        }

        match &self.command {
            Commands::Ease(args) => ease::execute(args),
            Commands::Simulate(cmd) => simulate::execute(cmd),
            Commands::Config(cmd) => config_cmd::execute(cmd),
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "casement", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::types::{EasingArg, PropertyArg};
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_ease_defaults() {
        let cli = Cli::try_parse_from(["casement", "ease"]).unwrap();
        match cli.command {
            Commands::Ease(args) => {
                assert_eq!(args.easing, None);
                assert_eq!(args.samples, 11);
                assert!(!args.json);
            }
            _ => panic!("Expected Ease command"),
        }
    }

    #[test]
    fn test_cli_parses_ease_spring() {
        let cli = Cli::try_parse_from([
            "casement",
            "ease",
            "--easing",
            "spring-bounce",
            "--damping",
            "0.4",
            "--stiffness",
            "250",
            "-n",
            "21",
        ])
        .unwrap();
        match cli.command {
            Commands::Ease(args) => {
                assert_eq!(args.easing, Some(EasingArg::SpringBounce));
                assert_eq!(args.damping, Some(0.4));
                assert_eq!(args.stiffness, Some(250.0));
                assert_eq!(args.samples, 21);
            }
            _ => panic!("Expected Ease command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_easing() {
        assert!(Cli::try_parse_from(["casement", "ease", "--easing", "bouncy"]).is_err());
    }

    #[test]
    fn test_cli_parses_simulate_animate() {
        let cli = Cli::try_parse_from([
            "casement",
            "simulate",
            "animate",
            "--property",
            "bounds",
            "--to",
            "-10,0,400,300",
            "--duration",
            "250",
            "--frame-ms",
            "8",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate(SimulateCommands::Animate { property, to, duration, frame_ms, easing, json }) => {
                assert_eq!(property, PropertyArg::Bounds);
                assert_eq!(to.as_slice(), &[-10.0, 0.0, 400.0, 300.0]);
                assert_eq!(duration, Some(250.0));
                assert!((frame_ms - 8.0).abs() < f64::EPSILON);
                assert_eq!(easing, None);
                assert!(!json);
            }
            _ => panic!("Expected Simulate Animate command"),
        }
    }

    #[test]
    fn test_cli_parses_simulate_fullscreen() {
        let cli = Cli::try_parse_from([
            "casement",
            "simulate",
            "fullscreen",
            "--shrink-work-area",
            "200",
            "--target-dpi",
            "144",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Simulate(SimulateCommands::Fullscreen { shrink_work_area, target_dpi, json }) => {
                assert_eq!(shrink_work_area, Some(200));
                assert_eq!(target_dpi, Some(144));
                assert!(json);
            }
            _ => panic!("Expected Simulate Fullscreen command"),
        }
    }

    #[test]
    fn test_cli_parses_config_subcommands() {
        let cli = Cli::try_parse_from(["casement", "config", "schema"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Schema)));
        let cli = Cli::try_parse_from(["casement", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }

    #[test]
    fn test_cli_parses_completions() {
        let cli = Cli::try_parse_from(["casement", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions { shell } => assert_eq!(shell, Shell::Zsh),
            _ => panic!("Expected Completions command"),
        }
    }

    #[test]
    fn test_cli_global_config_flag() {
        let cli = Cli::try_parse_from(["casement", "config", "path", "--config", "/tmp/casement.jsonc"])
            .unwrap();
        assert_eq!(cli.config_path(), Some(PathBuf::from("/tmp/casement.jsonc")));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from([
            "casement",
            "config",
            "path",
            "--config",
            "/nonexistent/casement/config.jsonc",
        ])
        .unwrap();
        assert!(matches!(cli.execute(), Err(CasementError::Config(config::ConfigError::NotFound))));
    }
}
