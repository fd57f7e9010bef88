use std::time::Duration;

use log::debug;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;

use crate::error::RunError;
use crate::logger::RunLogger;
use crate::secret::MASK;

/// Token fields that are masked before a token response is logged.
const TOKEN_BODY_FIELDS: [&str; 3] = ["access_token", "refresh_token", "id_token"];

/// HTTPS client for the CRM login and REST endpoints.
#[derive(Debug, Clone)]
pub struct CrmClient {
    pub(crate) http: Client,
}

impl CrmClient {
    pub fn new(timeout: Duration) -> Result<Self, RunError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RunError::http_client(&e))?;
        Ok(Self { http })
    }
}

/// Status, headers and raw body of a response that has been read to the end.
#[derive(Debug)]
pub(crate) struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Reply {
    pub async fn read(response: Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    pub fn log(&self, log: &RunLogger, label: &str) {
        self.log_with_body(log, label, &self.body);
    }

    /// Like [`Reply::log`] but with a caller-rendered body.
    pub fn log_with_body(&self, log: &RunLogger, label: &str, body: &str) {
        debug!(logger: log, "{label} Response Status Code: {}", self.status.as_u16());
        debug!(logger: log, "{label} Response Headers: {:?}", self.headers);
        debug!(logger: log, "{label} Response Body: {body}");
    }
}

/// `base` and `path` joined with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Token response body with every token value replaced by [`MASK`].
///
/// Bodies that are not a JSON object come back unchanged.
pub fn mask_token_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut fields)) => {
            for key in TOKEN_BODY_FIELDS {
                if let Some(value) = fields.get_mut(key) {
                    *value = Value::String(MASK.to_string());
                }
            }
            Value::Object(fields).to_string()
        }
        _ => body.to_string(),
    }
}
