//! Application settings read from `config.toml`.
//!
//! Every key is optional; a missing file means all defaults.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "french-study";

/// Longest allowed login session, ten years.
pub const MAX_SESSION_DAYS: i64 = 3650;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub session_days: i64,
    pub log_level: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            session_days: 30,
            log_level: "info".to_string(),
            window_width: 720.0,
            window_height: 780.0,
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("french-study.sqlite3")
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

impl AppConfig {
    /// Loads the file at `path`, or the default location when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(raw)?;
        config.session_days = config.session_days.clamp(1, MAX_SESSION_DAYS);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            database_path = "/tmp/study.sqlite3"
            session_days = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/study.sqlite3"));
        assert_eq!(config.session_days, 7);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_session_days_floor() {
        let config = AppConfig::from_toml("session_days = 0").unwrap();
        assert_eq!(config.session_days, 1);
    }

    #[test]
    fn test_session_days_ceiling() {
        let config = AppConfig::from_toml("session_days = 1000000000").unwrap();
        assert_eq!(config.session_days, MAX_SESSION_DAYS);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "session_days = \"many\"").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
