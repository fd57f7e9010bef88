use thiserror::Error;

use super::{truncate_body, ErrorLocation, HttpStatusCode};
use crate::api::Resource;

/// Failures of an authenticated GET against one of the REST resources.
#[derive(Debug, Error)]
pub enum ApiCallError {
    #[error("{resource} Call Rejected: {url}: HTTP {status} - {body} {location}")]
    Rejected {
        resource: Resource,
        url: String,
        status: HttpStatusCode,
        body: String,
        location: ErrorLocation,
    },

    #[error("{resource} Network Error: {url}: {message} {location}")]
    Transport {
        resource: Resource,
        url: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("{resource} Invalid Body: {url}: {reason} - {body} {location}")]
    InvalidBody {
        resource: Resource,
        url: String,
        reason: String,
        body: String,
        location: ErrorLocation,
    },
}

impl ApiCallError {
    #[track_caller]
    pub fn rejected(resource: Resource, url: impl Into<String>, status: u16, body: &str) -> Self {
        ApiCallError::Rejected {
            resource,
            url: url.into(),
            status: HttpStatusCode(status),
            body: truncate_body(body),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn from_reqwest(resource: Resource, url: impl Into<String>, error: &reqwest::Error) -> Self {
        ApiCallError::Transport {
            resource,
            url: url.into(),
            message: error.to_string(),
            location: ErrorLocation::caller(),
        }
    }

    #[track_caller]
    pub fn invalid_body(
        resource: Resource,
        url: impl Into<String>,
        reason: impl Into<String>,
        body: &str,
    ) -> Self {
        ApiCallError::InvalidBody {
            resource,
            url: url.into(),
            reason: reason.into(),
            body: truncate_body(body),
            location: ErrorLocation::caller(),
        }
    }

    pub fn resource(&self) -> Resource {
        match self {
            ApiCallError::Rejected { resource, .. }
            | ApiCallError::Transport { resource, .. }
            | ApiCallError::InvalidBody { resource, .. } => *resource,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiCallError::Rejected { status, .. } => Some(status.0),
            _ => None,
        }
    }
}
