use std::fmt;

use log::{debug, error, info};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::auth::AccessToken;
use crate::error::ApiCallError;
use crate::http::{join_url, CrmClient, Reply};
use crate::logger::RunLogger;
use crate::secret::MASK;

/// REST resources read with the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    UserInfo,
    OrgInfo,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Resource::UserInfo => "/services/oauth2/userinfo",
            Resource::OrgInfo => "/services/apexrest/OrgInfoAPI",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resource::UserInfo => "UserInfo API",
            Resource::OrgInfo => "OrgInfoAPI",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl CrmClient {
    /// GET `resource` relative to the token's instance URL and parse the JSON body.
    pub async fn fetch_resource(
        &self,
        token: &AccessToken,
        resource: Resource,
        log: &RunLogger,
    ) -> Result<Value, ApiCallError> {
        let result = self.get_resource(token, resource, log).await;
        if let Err(err) = &result {
            error!(logger: log, "Error calling {resource}: {err}");
        }
        result
    }

    async fn get_resource(
        &self,
        token: &AccessToken,
        resource: Resource,
        log: &RunLogger,
    ) -> Result<Value, ApiCallError> {
        let url = join_url(token.instance_url(), resource.path());
        let label = format!("{resource} Call");
        debug!(logger: log, "{label} URL: {url}");
        debug!(
            logger: log,
            "{label} Request Headers: {{\"Authorization\": \"Bearer {MASK}\", \"Content-Type\": \"application/json\"}}"
        );

        info!(logger: log, "Calling {resource}: {url}");
        let response = self
            .http
            .get(&url)
            .bearer_auth(token.bearer_token())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ApiCallError::from_reqwest(resource, &url, &e))?;
        let reply = Reply::read(response)
            .await
            .map_err(|e| ApiCallError::from_reqwest(resource, &url, &e))?;
        reply.log(log, &label);

        if !reply.status.is_success() {
            return Err(ApiCallError::rejected(
                resource,
                &url,
                reply.status.as_u16(),
                &reply.body,
            ));
        }

        let document: Value = serde_json::from_str(&reply.body)
            .map_err(|e| ApiCallError::invalid_body(resource, &url, e.to_string(), &reply.body))?;
        info!(logger: log, "{resource} retrieved successfully.");
        debug!(logger: log, "Received {resource} Data: {document}");
        Ok(document)
    }
}
