use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;

use crate::error::OptionsError;

pub const CONFIG_VAR: &str = "SFORGINFO_CONFIG";
pub const LOG_DIR_VAR: &str = "SFORGINFO_LOG_DIR";
pub const LOG_LEVEL_VAR: &str = "SFORGINFO_LOG_LEVEL";
pub const FETCH_USERINFO_VAR: &str = "SFORGINFO_FETCH_USERINFO";
pub const HTTP_TIMEOUT_VAR: &str = "SFORGINFO_HTTP_TIMEOUT_SECS";

const DEFAULT_CONFIG_FILE: &str = "sforginfo-sb.json";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for one run, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    config_path: PathBuf,
    log_dir: PathBuf,
    log_level: LevelFilter,
    fetch_user_info: bool,
    http_timeout: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            log_dir: PathBuf::from("."),
            log_level: LevelFilter::Debug,
            fetch_user_info: true,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl RunOptions {
    pub fn from_env() -> Result<Self, OptionsError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build options from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OptionsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(path) = lookup(CONFIG_VAR) {
            options.config_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup(LOG_DIR_VAR) {
            options.log_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            options.log_level = LevelFilter::from_str(level.trim())
                .map_err(|e| OptionsError::invalid(LOG_LEVEL_VAR, level.as_str(), e.to_string()))?;
        }
        if let Some(flag) = lookup(FETCH_USERINFO_VAR) {
            options.fetch_user_info = parse_flag(FETCH_USERINFO_VAR, &flag)?;
        }
        if let Some(secs) = lookup(HTTP_TIMEOUT_VAR) {
            let secs = secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    OptionsError::invalid(HTTP_TIMEOUT_VAR, secs.as_str(), "expected a positive number of seconds")
                })?;
            options.http_timeout = Duration::from_secs(secs);
        }

        Ok(options)
    }

    /// Override the config file path, e.g. from the command line.
    pub fn with_config_path(mut self, path: impl Into<OsString>) -> Self {
        self.config_path = PathBuf::from(path.into());
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn fetch_user_info(&self) -> bool {
        self.fetch_user_info
    }

    pub fn http_timeout(&self) -> Duration {
        self.http_timeout
    }
}

/// Load `.env` from the current directory or a parent; a missing file is fine.
pub fn load_dotenv() -> Result<Option<PathBuf>, OptionsError> {
    dotenv_outcome(dotenvy::dotenv())
}

fn dotenv_outcome(result: dotenvy::Result<PathBuf>) -> Result<Option<PathBuf>, OptionsError> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(OptionsError::env_file(err.to_string())),
    }
}

/// Accepts 'True'/'FALSE'/'yes'/'0' and friends, case-insensitively.
fn parse_flag(variable: &'static str, value: &str) -> Result<bool, OptionsError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(OptionsError::invalid(variable, value, "expected a boolean")),
    }
}
