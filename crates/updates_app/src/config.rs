//! Application configuration, read from a RON file.
//!
//! A missing file means defaults. Fields left out of the file keep their defaults.
//! Loading runs before the logger exists, so it reports through its return value
//! and leaves logging to the caller.

use std::fs;
use std::path::Path;
use std::time::Duration;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use updates_core::{DedupPolicy, PaginationState, DEFAULT_PAGE_SIZE};
use updates_engine::FetchSettings;
use updates_logging::LogDestination;

pub const DEFAULT_CONFIG_FILE: &str = "updates.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DedupSetting {
    #[default]
    KeepAll,
    DropRepeatedChapters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogSetting {
    #[default]
    File,
    Terminal,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub page_size: u32,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub dedup: DedupSetting,
    pub log: LogSetting,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            base_url: fetch.base_url,
            page_size: DEFAULT_PAGE_SIZE,
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            dedup: DedupSetting::default(),
            log: LogSetting::default(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn initial_state(&self) -> PaginationState {
        let dedup = match self.dedup {
            DedupSetting::KeepAll => DedupPolicy::KeepAll,
            DedupSetting::DropRepeatedChapters => DedupPolicy::DropRepeatedChapters,
        };
        PaginationState::new()
            .with_page_size(self.page_size)
            .with_dedup(dedup)
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogSetting::File => LogDestination::File,
            LogSetting::Terminal => LogDestination::Terminal,
            LogSetting::Both => LogDestination::Both,
        }
    }

    /// Unknown level names fall back to `Info`.
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

/// Reads the config file. `Ok(None)` means there is no file at `path`.
pub fn load(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source: err,
            })
        }
    };

    let config = ron::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        source: err,
    })?;
    Ok(Some(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_reported_as_absent() {
        let temp = TempDir::new().unwrap();
        assert_eq!(load(&temp.path().join("absent.ron")).unwrap(), None);
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.dedup, DedupSetting::KeepAll);
        assert_eq!(config.log, LogSetting::File);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("updates.ron");
        fs::write(
            &path,
            r#"(base_url: "https://reader.example.com", page_size: 25, dedup: DropRepeatedChapters)"#,
        )
        .unwrap();

        let config = load(&path).unwrap().expect("config file present");
        assert_eq!(config.base_url, "https://reader.example.com");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.dedup, DedupSetting::DropRepeatedChapters);
        assert_eq!(config.log, LogSetting::File);

        let state = config.initial_state();
        assert_eq!(state.page_size(), 25);
        assert_eq!(state.dedup(), DedupPolicy::DropRepeatedChapters);
        assert_eq!(
            config.fetch_settings().request_timeout,
            Duration::from_secs(30)
        );
    }

    #[test]
    fn unparsable_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("updates.ron");
        fs::write(&path, "(page_size: \"ten\")").unwrap();

        assert!(matches!(load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn empty_tuple_file_is_all_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("updates.ron");
        fs::write(&path, "()").unwrap();

        assert_eq!(load(&path).unwrap(), Some(AppConfig::default()));
    }

    #[test]
    fn log_level_falls_back_to_info() {
        let config = AppConfig {
            log_level: "chatty".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.log_level(), LevelFilter::Info);

        let config = AppConfig {
            log_level: "debug".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.log_level(), LevelFilter::Debug);
    }
}
