//! Token exchange failures.
//!
//! Each variant carries the token URL it was talking to, so a network
//! failure never has to be explained with a response from an earlier call.

use thiserror::Error;

use super::{truncate_body, ErrorLocation, HttpStatusCode};

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("Authentication Rejected: {url}: HTTP {status} - {body} {location}")]
    Rejected {
        url: String,
        status: HttpStatusCode,
        body: String,
        location: ErrorLocation,
    },

    #[error("Authentication Network Error: {url}: {message} {location}")]
    Transport {
        url: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Authentication Invalid Response: {url}: {reason} - {body} {location}")]
    InvalidResponse {
        url: String,
        reason: String,
        body: String,
        location: ErrorLocation,
    },

    #[error("Authentication Missing Instance URL: {url}: neither the token response nor the configuration provide one {location}")]
    MissingInstanceUrl { url: String, location: ErrorLocation },
}

impl AuthenticationError {
    #[track_caller]
    pub fn rejected(url: impl Into<String>, status: u16, body: &str) -> Self {
        AuthenticationError::Rejected {
            url: url.into(),
            status: HttpStatusCode(status),
            body: truncate_body(body),
            location: ErrorLocation::caller(),
        }
    }

    /// A reqwest failure that happened before any response arrived.
    #[track_caller]
    pub fn from_reqwest(url: impl Into<String>, error: &reqwest::Error) -> Self {
        AuthenticationError::Transport {
            url: url.into(),
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn invalid_response(url: impl Into<String>, reason: impl Into<String>, body: &str) -> Self {
        AuthenticationError::InvalidResponse {
            url: url.into(),
            reason: reason.into(),
            body: truncate_body(body),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn missing_instance_url(url: impl Into<String>) -> Self {
        AuthenticationError::MissingInstanceUrl {
            url: url.into(),
            location: ErrorLocation::caller(),
        }
    }

    /// HTTP status of the token endpoint, if it answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AuthenticationError::Rejected { status, .. } => Some(status.0),
            _ => None,
        }
    }
}
