//! INI serialization logic for converting `ConfigFile` → INI string.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let head_probe = if config.loader.head_probe {
        "true"
    } else {
        "false"
    };

    format!(
        r#"[loader]
; Assets loaded concurrently per chunk (default: 4, range: 1-64)
chunk_size = {}
; Pause between chunks in milliseconds, lets other work run (default: 50, 0 disables)
inter_chunk_delay_ms = {}
; HTTP request timeout in seconds (default: 30)
timeout_secs = {}
; Wait before re-checking timing records for an asset's size (default: 50)
size_probe_delay_ms = {}
; Issue a HEAD request when no timing record has the size (default: true)
head_probe = {}

[estimator]
; Duration assumed when no progress is seen while sampling (default: 6000)
default_duration_ms = {}
; Clamp for the estimated loading duration (default: 3000 - 10000)
min_duration_ms = {}
max_duration_ms = {}
; Multiplier applied to the estimate (default: 1.2)
safety_factor = {}
; Progress animation tick in milliseconds (default: 16)
frame_interval_ms = {}

[logging]
; Directory for the log file (default: platform cache dir, warmup/logs)
directory = {}
; Log file name, cleared at the start of each run (default: warmup.log)
file = {}
"#,
        config.loader.chunk_size,
        config.loader.inter_chunk_delay_ms,
        config.loader.timeout_secs,
        config.loader.size_probe_delay_ms,
        head_probe,
        config.estimator.default_duration_ms,
        config.estimator.min_duration_ms,
        config.estimator.max_duration_ms,
        config.estimator.safety_factor,
        config.estimator.frame_interval_ms,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sections_written() {
        let content = to_config_string(&ConfigFile::default());
        assert!(content.contains("[loader]"));
        assert!(content.contains("[estimator]"));
        assert!(content.contains("[logging]"));
        assert!(content.contains("chunk_size = 4"));
        assert!(content.contains("head_probe = true"));
        assert!(content.contains("safety_factor = 1.2"));
    }

    #[test]
    fn test_output_is_valid_ini() {
        let content = to_config_string(&ConfigFile::default());
        let ini = ini::Ini::load_from_str(&content).unwrap();
        assert_eq!(
            ini.section(Some("loader")).and_then(|s| s.get("timeout_secs")),
            Some("30")
        );
    }
}
