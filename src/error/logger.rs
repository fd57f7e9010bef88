use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::ErrorLocation;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("Log Directory Error: {path}: {source} {location}")]
    Directory {
        path: PathBuf,
        #[source]
        source: io::Error,
        location: ErrorLocation,
    },

    #[error("Log File Error: {path}: {source} {location}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
        location: ErrorLocation,
    },
}

impl LoggerError {
    #[track_caller]
    pub fn directory(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoggerError::Directory {
            path: path.into(),
            source,
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoggerError::File {
            path: path.into(),
            source,
            location: ErrorLocation::caller(),
        }
    }
}
