//! Tracklist CLI - Command-line interface
//!
//! Runs the resolve API or performs a single resolve from the terminal.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use tracklist_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "tracklist")]
#[command(about = "Search SoundCloud, YouTube, Mixcloud and Spotify in one request")]
struct Cli {
    /// Console log level, overridden by RUST_LOG
    #[arg(long, global = true, default_value_t = CliLogLevel::Info)]
    log_level: CliLogLevel,

    /// Directory for a full trace of the last run
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    commands::run_command(cli.command).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Commands;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "tracklist",
            "resolve",
            "daft punk",
            "--log-level",
            "debug",
            "--logs-dir",
            "/tmp/tracklist",
        ])
        .unwrap();

        assert_eq!(cli.log_level, CliLogLevel::Debug);
        assert_eq!(cli.logs_dir, Some(PathBuf::from("/tmp/tracklist")));
        assert!(matches!(cli.command, Commands::Resolve(_)));
    }

    #[test]
    fn test_default_log_level() {
        let cli = Cli::try_parse_from(["tracklist", "serve"]).unwrap();

        assert_eq!(cli.log_level, CliLogLevel::Info);
        assert!(cli.logs_dir.is_none());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["tracklist"]).is_err());
    }
}
