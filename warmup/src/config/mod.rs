//! INI configuration for the warm-up pipeline.
//!
//! ```ignore
//! use warmup::config::ConfigFile;
//!
//! let config = ConfigFile::load()?;
//! let options = config.loader.chunk_options(Priority::High);
//! ```

pub mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, EstimatorSettings, LoaderSettings, LoggingSettings};
