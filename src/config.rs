//! Runtime configuration for the planner.
//!
//! Defaults suit a single local user. A host can override the database
//! location, map size and backup name through environment variables.

use std::time::Duration;

use crate::error::ConfigError;

/// Storage key holding the serialized document.
pub const DOCUMENT_KEY: &str = "gong-gallery-planner-data";

/// Storage key holding the theme preference.
pub const THEME_KEY: &str = "theme";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannerConfig {
    /// LMDB environment path without the `.lmdb` suffix.
    pub db_path: String,
    pub map_size: usize,
    /// Prefix of exported backup file names.
    pub app_name: String,
    pub document_key: String,
    pub theme_key: String,
    /// How long a notification stays fully visible.
    pub notification_visible: Duration,
    /// When a notification is removed. Includes the exit transition.
    pub notification_dismiss: Duration,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            db_path: "study_planner".to_string(),
            map_size: 512 * 1024 * 1024,
            app_name: "gong-gallery-planner".to_string(),
            document_key: DOCUMENT_KEY.to_string(),
            theme_key: THEME_KEY.to_string(),
            notification_visible: Duration::from_millis(2500),
            notification_dismiss: Duration::from_millis(3000),
        }
    }
}

impl PlannerConfig {
    /// Defaults overridden by `STUDY_PLANNER_DB_PATH`,
    /// `STUDY_PLANNER_MAP_SIZE_MB` and `STUDY_PLANNER_APP_NAME`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("STUDY_PLANNER_DB_PATH") {
            if path.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "STUDY_PLANNER_DB_PATH".to_string(),
                    "path must not be empty".to_string(),
                ));
            }
            config.db_path = path;
        }

        if let Some(raw) = lookup("STUDY_PLANNER_MAP_SIZE_MB") {
            let mb = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|mb| *mb > 0)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "STUDY_PLANNER_MAP_SIZE_MB".to_string(),
                        format!("'{raw}' is not a positive number of megabytes"),
                    )
                })?;
            config.map_size = mb * 1024 * 1024;
        }

        if let Some(name) = lookup("STUDY_PLANNER_APP_NAME") {
            config.app_name = name;
        }

        Ok(config)
    }

    pub fn with_db_path(mut self, path: impl Into<String>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_map_size(mut self, bytes: usize) -> Self {
        self.map_size = bytes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        assert_eq!(PlannerConfig::from_lookup(lookup(&[])).unwrap(), PlannerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = PlannerConfig::from_lookup(lookup(&[
            ("STUDY_PLANNER_DB_PATH", "/tmp/planner"),
            ("STUDY_PLANNER_MAP_SIZE_MB", "64"),
            ("STUDY_PLANNER_APP_NAME", "my-planner"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, "/tmp/planner");
        assert_eq!(config.map_size, 64 * 1024 * 1024);
        assert_eq!(config.app_name, "my-planner");
    }

    #[test]
    fn test_bad_map_size() {
        let err = PlannerConfig::from_lookup(lookup(&[("STUDY_PLANNER_MAP_SIZE_MB", "lots")])).unwrap_err();
        assert!(err.to_string().contains("STUDY_PLANNER_MAP_SIZE_MB"));
        assert!(PlannerConfig::from_lookup(lookup(&[("STUDY_PLANNER_MAP_SIZE_MB", "0")])).is_err());
    }
}
