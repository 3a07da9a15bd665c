//! CLI module for Versioned Users
//!
//! Provides subcommands:
//! - `serve`: run the web server
//! - `init-db`: create the users table and exit

pub mod init_db;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::observability::init_tracing;

/// Versioned Users - user directory with optimistic concurrency on edits
#[derive(Parser)]
#[command(name = "versioned-users")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the web server
    Serve(serve::ServeArgs),

    /// Create the users table if it does not exist
    InitDb,
}

/// Load `.env` and layered config, then start logging.
///
/// A config file that fails to parse falls back to defaults with a warning.
pub(crate) fn load_config_and_init_logging() -> AppConfig {
    dotenvy::dotenv().ok();

    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_tracing(&config.logging, &config.observability.tracing);

    if let Some(e) = load_error {
        tracing::warn!(error = %e, "Failed to load configuration, using defaults");
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from([
            "versioned-users",
            "serve",
            "--port",
            "3000",
            "--update-delay-ms",
            "0",
            "--in-memory",
        ]);

        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(3000));
                assert_eq!(args.update_delay_ms, Some(0));
                assert!(args.in_memory);
            }
            Command::InitDb => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_init_db() {
        let cli = Cli::parse_from(["versioned-users", "init-db"]);
        assert!(matches!(cli.command, Command::InitDb));
    }
}
