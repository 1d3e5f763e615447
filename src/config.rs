//! Process-level configuration
//!
//! Resolved once at startup from environment variables, then overridden by
//! CLI flags. Controls where settings are stored, which catalog defaults are
//! used and how verbose logging is.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{warn, Level};

use crate::constants::env as vars;
use crate::settings::{CatalogProfile, FileStorage};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub profile: CatalogProfile,
    pub storage_dir: PathBuf,
    pub log_level: Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: CatalogProfile::default(),
            storage_dir: FileStorage::default_dir(),
            log_level: Level::INFO,
        }
    }
}

/// Parse a log level name; unknown names fall back to info
pub fn parse_log_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

impl AppConfig {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|name| env::var(name).ok());
        config
    }

    /// Apply overrides from a variable lookup; invalid values are logged and ignored
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup(vars::LOG_LEVEL) {
            self.log_level = parse_log_level(&level);
        }

        if let Some(profile) = lookup(vars::PROFILE) {
            match CatalogProfile::from_str(&profile) {
                Ok(profile) => self.profile = profile,
                Err(e) => warn!(var = vars::PROFILE, error = %e, "Ignoring invalid profile"),
            }
        }

        if let Some(dir) = lookup(vars::STORAGE_DIR) {
            if dir.trim().is_empty() {
                warn!(var = vars::STORAGE_DIR, "Ignoring empty storage directory");
            } else {
                self.storage_dir = PathBuf::from(dir);
            }
        }
    }

    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.storage_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = AppConfig::default();
        config.apply_overrides(|name| vars.get(name).cloned());
        config
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = config_with(&[]);
        assert_eq!(config.profile, CatalogProfile::Standard);
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.storage_dir.ends_with("adlad-dummy"));
    }

    #[test]
    fn test_env_overrides() {
        let config = config_with(&[
            ("LOG_LEVEL", "DEBUG"),
            ("ADLAD_DUMMY_PROFILE", "development"),
            ("ADLAD_DUMMY_STORAGE_DIR", "/tmp/adlad"),
        ]);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.profile, CatalogProfile::Development);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/adlad"));
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let config = config_with(&[
            ("LOG_LEVEL", "chatty"),
            ("ADLAD_DUMMY_PROFILE", "turbo"),
            ("ADLAD_DUMMY_STORAGE_DIR", "  "),
        ]);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.profile, CatalogProfile::Standard);
        assert_eq!(config.storage_dir, FileStorage::default_dir());
    }
}
