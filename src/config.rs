use crate::types::LockMode;

pub const LOCK_MODE_ENV: &str = "READINESS_LOCK_MODE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub lock_mode: LockMode,
    pub log_level: String,
    pub file_logs: bool,
    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_mode: LockMode::Observe,
            log_level: "info".to_string(),
            file_logs: false,
            log_dir: "./logs".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; missing keys take defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lock_mode = lookup(LOCK_MODE_ENV)
            .map(|value| LockMode::parse(&value))
            .unwrap_or_default();

        let log_level = lookup("RUST_LOG")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());

        let file_logs = lookup("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let log_dir = lookup("LOG_DIR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "./logs".to_string());

        Self {
            lock_mode,
            log_level,
            file_logs,
            log_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_enforce_mode() {
        let config = Config::from_lookup(lookup_from(&[(LOCK_MODE_ENV, "Enforce")]));
        assert_eq!(config.lock_mode, LockMode::Enforce);
    }

    #[test]
    fn test_unknown_mode_falls_back_to_observe() {
        let config = Config::from_lookup(lookup_from(&[(LOCK_MODE_ENV, "block-everything")]));
        assert_eq!(config.lock_mode, LockMode::Observe);
    }

    #[test]
    fn test_log_level() {
        let config = Config::from_lookup(lookup_from(&[("RUST_LOG", "debug")]));
        assert_eq!(config.log_level, "debug");
        let config = Config::from_lookup(lookup_from(&[("RUST_LOG", "  ")]));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_file_logging_settings() {
        let config = Config::from_lookup(lookup_from(&[
            ("ENABLE_FILE_LOGS", "1"),
            ("LOG_DIR", "/var/log/prep"),
        ]));
        assert!(config.file_logs);
        assert_eq!(config.log_dir, "/var/log/prep");

        let config = Config::from_lookup(lookup_from(&[("ENABLE_FILE_LOGS", "yes")]));
        assert!(!config.file_logs);
        assert_eq!(config.log_dir, "./logs");
    }
}
