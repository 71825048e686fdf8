//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::defaults::MAX_CHUNK_SIZE;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [loader] section
    if let Some(section) = ini.section(Some("loader")) {
        if let Some(v) = parse_value::<usize>(section, "loader", "chunk_size", "a positive integer")? {
            if v == 0 || v > MAX_CHUNK_SIZE {
                return Err(invalid(
                    "loader",
                    "chunk_size",
                    &v.to_string(),
                    &format!("must be between 1 and {}", MAX_CHUNK_SIZE),
                ));
            }
            config.loader.chunk_size = v;
        }
        if let Some(v) = parse_value(
            section,
            "loader",
            "inter_chunk_delay_ms",
            "a non-negative integer (milliseconds)",
        )? {
            config.loader.inter_chunk_delay_ms = v;
        }
        if let Some(v) = parse_value::<u64>(
            section,
            "loader",
            "timeout_secs",
            "a positive integer (seconds)",
        )? {
            if v == 0 {
                return Err(invalid("loader", "timeout_secs", "0", "must be at least 1"));
            }
            config.loader.timeout_secs = v;
        }
        if let Some(v) = parse_value(
            section,
            "loader",
            "size_probe_delay_ms",
            "a non-negative integer (milliseconds)",
        )? {
            config.loader.size_probe_delay_ms = v;
        }
        if let Some(v) = section.get("head_probe") {
            config.loader.head_probe = parse_bool(v).ok_or_else(|| {
                invalid("loader", "head_probe", v, "must be 'true' or 'false'")
            })?;
        }
    }

    // [estimator] section
    if let Some(section) = ini.section(Some("estimator")) {
        let milliseconds = "a positive number (milliseconds)";
        if let Some(v) = parse_positive(section, "default_duration_ms", milliseconds)? {
            config.estimator.default_duration_ms = v;
        }
        if let Some(v) = parse_positive(section, "min_duration_ms", milliseconds)? {
            config.estimator.min_duration_ms = v;
        }
        if let Some(v) = parse_positive(section, "max_duration_ms", milliseconds)? {
            config.estimator.max_duration_ms = v;
        }
        if let Some(v) = parse_positive(section, "safety_factor", "a positive number")? {
            config.estimator.safety_factor = v;
        }
        if let Some(v) = parse_value::<u64>(
            section,
            "estimator",
            "frame_interval_ms",
            "a positive integer (milliseconds)",
        )? {
            if v == 0 {
                return Err(invalid("estimator", "frame_interval_ms", "0", "must be at least 1"));
            }
            config.estimator.frame_interval_ms = v;
        }

        if config.estimator.min_duration_ms > config.estimator.max_duration_ms {
            return Err(invalid(
                "estimator",
                "min_duration_ms",
                &config.estimator.min_duration_ms.to_string(),
                "must not exceed max_duration_ms",
            ));
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse an optional key, reporting "must be {expected}" on failure.
fn parse_value<T: FromStr>(
    section: &Properties,
    section_name: &str,
    key: &str,
    expected: &str,
) -> Result<Option<T>, ConfigFileError> {
    match section.get(key) {
        None => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(section_name, key, v, &format!("must be {}", expected))),
    }
}

fn parse_positive(
    section: &Properties,
    key: &str,
    expected: &str,
) -> Result<Option<f64>, ConfigFileError> {
    let value = parse_value::<f64>(section, "estimator", key, expected)?;
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(invalid(
            "estimator",
            key,
            &v.to_string(),
            &format!("must be {}", expected),
        )),
        other => Ok(other),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
