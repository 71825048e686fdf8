//! CLI subcommands.

pub mod config;
pub mod run;

use std::path::Path;

use warmup::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Load configuration from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<ConfigFile, CliError> {
    let config = match path {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load_from(&config_file_path())?,
    };
    Ok(config)
}
