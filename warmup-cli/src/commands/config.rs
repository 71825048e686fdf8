//! Configuration management CLI commands.
//!
//! Provides `config init`, `config show`, and `config path`.

use std::path::Path;

use clap::Subcommand;
use warmup::config::{config_file_path, ConfigFile};

use super::load_config;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path);

    match command {
        ConfigCommands::Init { force } => run_init(&path, force),
        ConfigCommands::Show => run_show(config_path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if force {
        ConfigFile::default().save_to(path)?;
    } else if !ConfigFile::ensure_exists_at(path)? {
        println!("Config file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn run_show(config_path: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    print!("{}", config.to_ini_string());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");

        run(ConfigCommands::Init { force: false }, Some(&path)).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, ConfigFile::default());
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[loader]\nchunk_size = 9\n").unwrap();

        run(ConfigCommands::Init { force: false }, Some(&path)).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap().loader.chunk_size, 9);

        run(ConfigCommands::Init { force: true }, Some(&path)).unwrap();
        assert_eq!(
            ConfigFile::load_from(&path).unwrap().loader.chunk_size,
            ConfigFile::default().loader.chunk_size
        );
    }

    #[test]
    fn test_show_reports_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[loader]\nchunk_size = zero\n").unwrap();

        let result = run(ConfigCommands::Show, Some(&path));
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
