pub mod api;
pub mod auth;
pub mod config;
pub mod location;
pub mod logger;

pub use api::ApiCallError;
pub use auth::AuthenticationError;
pub use config::{ConfigError, OptionsError};
pub use location::ErrorLocation;
pub use logger::LoggerError;

use thiserror::Error;

/// Longest response body, in characters, that is kept inside an error.
pub const BODY_PREVIEW_LIMIT: usize = 512;

/// Any failure that aborts a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error(transparent)]
    Logger(#[from] LoggerError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    Api(#[from] ApiCallError),

    #[error("HTTP Client Error: {message} {location}")]
    HttpClient {
        message: String,
        location: ErrorLocation,
    },
}

impl RunError {
    #[track_caller]
    pub fn http_client(error: &reqwest::Error) -> Self {
        RunError::HttpClient {
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }
}

/// HTTP status code as reported by the remote side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpStatusCode(pub u16);

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cut a response body down to [`BODY_PREVIEW_LIMIT`] characters.
pub fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(BODY_PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}... ({} bytes total)", &body[..cut], body.len()),
        None => body.to_string(),
    }
}
