//! Warmup CLI - Command-line interface
//!
//! Preloads the images listed in a JSON manifest and shows a smooth,
//! never-regressing progress bar while doing so.

mod commands;
mod error;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::run::RunArgs;

#[derive(Parser)]
#[command(name = "warmup")]
#[command(version, about = "Warm up image assets with a calm progress bar", long_about = None)]
struct Cli {
    /// Path to config.ini (default: platform config dir, warmup/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every asset in a manifest
    Run(RunArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, config_path),
        Commands::Config(command) => commands::config::run(command, config_path),
    };

    if let Err(e) = result {
        e.exit();
    }
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
    fn test_parse_run() {
        let cli = Cli::parse_from([
            "warmup",
            "run",
            "site.json",
            "--section",
            "hero",
            "-s",
            "skills",
            "--chunk-size",
            "6",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.manifest, PathBuf::from("site.json"));
                assert_eq!(args.sections, vec!["hero", "skills"]);
                assert_eq!(args.chunk_size, Some(6));
                assert_eq!(args.delay_ms, None);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_global_config() {
        let cli = Cli::parse_from(["warmup", "config", "show", "--config", "/tmp/w.ini"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/w.ini")));
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }
}
