use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::ErrorLocation;

/// Failures while reading the credentials file or deriving credentials from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Not Found Error: {path} {location}")]
    NotFound {
        path: PathBuf,
        location: ErrorLocation,
    },

    #[error("Config Parse Error: {path}: {reason} {location}")]
    Parse {
        path: PathBuf,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Config Unexpected Error: {path}: {source} {location}")]
    Unexpected {
        path: PathBuf,
        #[source]
        source: io::Error,
        location: ErrorLocation,
    },

    #[error("Config Missing Key Error: {key} {location}")]
    MissingKey {
        key: &'static str,
        location: ErrorLocation,
    },
}

impl ConfigError {
    #[track_caller]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ConfigError::NotFound {
            path: path.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn parse(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ConfigError::Parse {
            path: path.into(),
            reason: reason.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn unexpected(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ConfigError::Unexpected {
            path: path.into(),
            source,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn missing_key(key: &'static str) -> Self {
        ConfigError::MissingKey {
            key,
            location: ErrorLocation::caller(),
        }
    }
}

/// Invalid run option taken from the environment.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Invalid Option Error: {variable}={value:?}: {reason} {location}")]
    Invalid {
        variable: &'static str,
        value: String,
        reason: String,
        location: ErrorLocation,
    },

    #[error("Env File Error: {message} {location}")]
    EnvFile {
        message: String,
        location: ErrorLocation,
    },
}

impl OptionsError {
    #[track_caller]
    pub fn invalid(
        variable: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        OptionsError::Invalid {
            variable,
            value: value.into(),
            reason: reason.into(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn env_file(message: impl Into<String>) -> Self {
        OptionsError::EnvFile {
            message: message.into(),
            location: ErrorLocation::caller(),
        }
    }
}
