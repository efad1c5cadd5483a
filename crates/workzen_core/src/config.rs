//! Environment-driven store configuration.
//!
//! # Invariants
//! - Every setting has a default except the log directory; logging stays
//!   off until a directory is configured.
//! - Blank variables behave as unset.

use crate::logging::default_log_level;
use crate::model::attendance::CheckOutPolicy;
use std::path::PathBuf;

pub const DATA_FILE_ENV: &str = "WORKZEN_DATA_FILE";
pub const LOG_LEVEL_ENV: &str = "WORKZEN_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "WORKZEN_LOG_DIR";
pub const ATTENDANCE_POLICY_ENV: &str = "WORKZEN_ATTENDANCE_POLICY";

/// Location of the document when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "data/users.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_file: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub check_out_policy: CheckOutPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
            check_out_policy: CheckOutPolicy::default(),
        }
    }
}

impl StoreConfig {
    /// Reads configuration from process environment variables.
    ///
    /// # Errors
    /// Returns a human-readable message for an unsupported attendance policy.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(DATA_FILE_ENV) {
            config.data_file = PathBuf::from(path);
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        config.log_dir = read(LOG_DIR_ENV).map(PathBuf::from);
        if let Some(policy) = read(ATTENDANCE_POLICY_ENV) {
            config.check_out_policy = policy.parse()?;
        }
        Ok(config)
    }
}
