use log::{debug, error, info};
use serde::Deserialize;

use crate::config::{Credentials, Grant};
use crate::error::AuthenticationError;
use crate::http::{join_url, mask_token_body, CrmClient, Reply};
use crate::logger::RunLogger;
use crate::secret::{Secret, MASK};

pub const TOKEN_ENDPOINT_PATH: &str = "/services/oauth2/token";

/// Form fields masked in the logged request payload.
const SECRET_FORM_FIELDS: [&str; 2] = ["client_secret", "password"];

const LOG_LABEL: &str = "Authentication";

/// Bearer token and the instance URL it is valid against, for the rest of the run.
#[derive(Debug, Clone)]
pub struct AccessToken {
    bearer: Secret,
    instance_url: String,
}

impl AccessToken {
    pub fn new(bearer: impl Into<String>, instance_url: impl Into<String>) -> Self {
        Self {
            bearer: Secret::new(bearer),
            instance_url: instance_url.into(),
        }
    }

    pub fn bearer_token(&self) -> &str {
        self.bearer.expose()
    }

    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// First ten characters of the token.
    pub fn preview(&self) -> String {
        let head: String = self.bearer.expose().chars().take(10).collect();
        format!("{head}...")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    instance_url: Option<String>,
}

impl CrmClient {
    /// Exchange the configured credentials for an access token.
    ///
    /// Failures are logged here; the caller only decides to stop the run.
    pub async fn exchange_token(
        &self,
        credentials: &Credentials,
        log: &RunLogger,
    ) -> Result<AccessToken, AuthenticationError> {
        let result = self.request_token(credentials, log).await;
        if let Err(err) = &result {
            error!(
                logger: log,
                "Error getting access token via {} grant: {err}",
                credentials.grant.grant_type()
            );
        }
        result
    }

    async fn request_token(
        &self,
        credentials: &Credentials,
        log: &RunLogger,
    ) -> Result<AccessToken, AuthenticationError> {
        let url = join_url(&credentials.login_url, TOKEN_ENDPOINT_PATH);
        debug!(logger: log, "{LOG_LABEL} URL: {url}");

        let form = token_form(credentials);
        debug!(
            logger: log,
            "{LOG_LABEL} Request Headers: {{\"Content-Type\": \"application/x-www-form-urlencoded\"}}"
        );
        debug!(logger: log, "{LOG_LABEL} Request Payload (masked): {:?}", masked_form(&form));

        info!(
            logger: log,
            "Attempting to get access token using {} grant...",
            credentials.grant.grant_type()
        );
        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AuthenticationError::from_reqwest(&url, &e))?;
        let reply = Reply::read(response)
            .await
            .map_err(|e| AuthenticationError::from_reqwest(&url, &e))?;

        let masked_body = mask_token_body(&reply.body);
        reply.log_with_body(log, LOG_LABEL, &masked_body);

        if !reply.status.is_success() {
            return Err(AuthenticationError::rejected(
                &url,
                reply.status.as_u16(),
                &masked_body,
            ));
        }

        let token: TokenResponse = serde_json::from_str(&reply.body)
            .map_err(|e| AuthenticationError::invalid_response(&url, e.to_string(), &masked_body))?;

        let access_token = token
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AuthenticationError::invalid_response(&url, "response has no access_token", &masked_body)
            })?;

        let instance_url = match token.instance_url.filter(|url| !url.is_empty()) {
            Some(instance_url) => instance_url,
            None => {
                debug!(logger: log, "Token response has no instance_url, using configured default");
                credentials
                    .default_instance_url
                    .clone()
                    .ok_or_else(|| AuthenticationError::missing_instance_url(&url))?
            }
        };

        info!(logger: log, "Access token obtained successfully.");
        Ok(AccessToken::new(access_token, instance_url))
    }
}

fn token_form(credentials: &Credentials) -> Vec<(&'static str, &str)> {
    let mut form = vec![
        ("grant_type", credentials.grant.grant_type()),
        ("client_id", credentials.consumer_key.as_str()),
        ("client_secret", credentials.consumer_secret.expose()),
    ];
    if let Grant::Password { username, password } = &credentials.grant {
        form.push(("username", username.as_str()));
        form.push(("password", password.expose()));
    }
    form
}

fn masked_form<'a>(form: &[(&'static str, &'a str)]) -> Vec<(&'static str, &'a str)> {
    form.iter()
        .map(|&(field, value)| {
            if SECRET_FORM_FIELDS.contains(&field) {
                (field, MASK)
            } else {
                (field, value)
            }
        })
        .collect()
}
