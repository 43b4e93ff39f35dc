//! Run Log Viewer - Entry Point

use clap::Parser;
use runlog::config::{self, CliOverrides};
use runlog::model::RunId;
use runlog::source::HttpLogSource;
use std::path::PathBuf;
use tracing::info;

/// Run Log Viewer - TUI for streaming containerized task run logs
#[derive(Parser, Debug)]
#[command(name = "runlog")]
#[command(version)]
#[command(about = "Stream and inspect the logs of a containerized task run")]
pub struct Args {
    /// Identifier of the run to stream
    pub run_id: String,

    /// Base URL of the dashboard backend
    #[arg(short = 'u', long)]
    pub server: Option<String>,

    /// Start with autoscroll (follow) enabled
    #[arg(short, long)]
    pub follow: bool,

    /// Start with a search query active
    #[arg(short, long)]
    pub search: Option<String>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Resolve configuration with full precedence chain:
    // Defaults -> Config File -> Env Vars -> CLI Args
    let config = {
        let config_file = config::load_config_file(args.config.clone())?;
        let merged = config::merge_config(config_file);
        let with_env = config::apply_env_overrides(merged);
        config::apply_cli_overrides(
            with_env,
            CliOverrides {
                server_url: args.server.clone(),
                // Only override when the flag was actually given.
                follow: if args.follow { Some(true) } else { None },
            },
        )
    };

    runlog::logging::init(&config.log_file_path)?;
    info!(config = ?config, "configuration loaded and resolved");

    let run = RunId::new(&args.run_id)?;
    let source = HttpLogSource::new(config.server_url.clone())?;

    runlog::view::run_with_source(Box::new(source), run, args.search.clone(), &config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_is_required() {
        let result = Args::try_parse_from(["runlog"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_id_positional_parses() {
        let args = Args::parse_from(["runlog", "run-42"]);
        assert_eq!(args.run_id, "run-42");
        assert!(!args.follow);
        assert_eq!(args.server, None);
        assert_eq!(args.search, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn server_flag_parses() {
        let args = Args::parse_from(["runlog", "run-42", "--server", "http://dash:9000"]);
        assert_eq!(args.server, Some("http://dash:9000".to_string()));
    }

    #[test]
    fn follow_flag_short_and_long() {
        assert!(Args::parse_from(["runlog", "r", "-f"]).follow);
        assert!(Args::parse_from(["runlog", "r", "--follow"]).follow);
    }

    #[test]
    fn search_flag_parses() {
        let args = Args::parse_from(["runlog", "r", "--search", "error"]);
        assert_eq!(args.search, Some("error".to_string()));
    }

    #[test]
    fn config_path_parses() {
        let args = Args::parse_from(["runlog", "r", "--config", "/custom/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn combined_flags_parse() {
        let args = Args::parse_from([
            "runlog",
            "run-7",
            "-f",
            "-s",
            "panic",
            "--server",
            "http://dash:9000",
        ]);
        assert_eq!(args.run_id, "run-7");
        assert!(args.follow);
        assert_eq!(args.search, Some("panic".to_string()));
        assert_eq!(args.server, Some("http://dash:9000".to_string()));
    }

    #[test]
    fn help_does_not_error() {
        let result = Args::try_parse_from(["runlog", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_does_not_error() {
        let result = Args::try_parse_from(["runlog", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
