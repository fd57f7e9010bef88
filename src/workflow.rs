//! One run: load config, authenticate, read user info (optional) and org info.

use std::path::Path;

use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::api::Resource;
use crate::config::{load_config, Credentials};
use crate::error::{ConfigError, RunError};
use crate::http::CrmClient;
use crate::logger::RunLogger;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Start,
    ConfigLoaded,
    Authenticated,
    UserInfoFetched,
    OrgInfoFetched,
    Done,
    Aborted,
}

/// What a completed run retrieved.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub user_info: Option<Value>,
    pub org_info: Value,
}

pub struct Workflow<'a> {
    client: &'a CrmClient,
    log: &'a RunLogger,
    fetch_user_info: bool,
    stage: RunStage,
}

impl<'a> Workflow<'a> {
    pub fn new(client: &'a CrmClient, log: &'a RunLogger, fetch_user_info: bool) -> Self {
        Self {
            client,
            log,
            fetch_user_info,
            stage: RunStage::Start,
        }
    }

    pub fn stage(&self) -> RunStage {
        self.stage
    }

    /// Run every stage against the config file at `config_path`.
    ///
    /// The first fatal failure moves the workflow to [`RunStage::Aborted`]
    /// and is returned; a failed user-info read only logs a warning.
    pub async fn run(&mut self, config_path: &Path) -> Result<RunReport, RunError> {
        let result = self.execute(config_path).await;
        if result.is_err() {
            self.advance(RunStage::Aborted);
        }
        result
    }

    async fn execute(&mut self, config_path: &Path) -> Result<RunReport, RunError> {
        let (client, log) = (self.client, self.log);

        let no_config = |err: ConfigError| {
            error!(logger: log, "Script cannot run without valid configuration.");
            err
        };
        let config = load_config(config_path, log).map_err(no_config)?;
        let credentials = Credentials::from_config(&config)
            .map_err(|err| {
                error!(logger: log, "{err}");
                err
            })
            .map_err(no_config)?;
        self.advance(RunStage::ConfigLoaded);

        let token = client
            .exchange_token(&credentials, log)
            .await
            .map_err(|err| {
                error!(logger: log, "Authentication failed. Cannot proceed with API calls.");
                err
            })?;
        debug!(logger: log, "Access Token (first 10 chars): {}", token.preview());
        debug!(logger: log, "Instance URL: {}", token.instance_url());
        self.advance(RunStage::Authenticated);

        let user_info = if self.fetch_user_info {
            match client.fetch_resource(&token, Resource::UserInfo, log).await {
                Ok(user_info) => {
                    info!(logger: log, "--- User Information ---");
                    info!(logger: log, "{}", pretty_json(&user_info));
                    self.advance(RunStage::UserInfoFetched);
                    Some(user_info)
                }
                Err(_) => {
                    warn!(logger: log, "Failed to retrieve User Information from UserInfo endpoint.");
                    None
                }
            }
        } else {
            None
        };

        let org_info = client
            .fetch_resource(&token, Resource::OrgInfo, log)
            .await
            .map_err(|err| {
                error!(logger: log, "Failed to retrieve Org Information.");
                err
            })?;
        info!(logger: log, "--- Org Information Retrieved Successfully ---");
        info!(logger: log, "{}", pretty_json(&org_info));
        self.advance(RunStage::OrgInfoFetched);

        self.advance(RunStage::Done);
        Ok(RunReport {
            user_info,
            org_info,
        })
    }

    fn advance(&mut self, next: RunStage) {
        debug!(logger: self.log, "Run stage: {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

/// JSON with four-space indentation.
fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => value.to_string(),
    }
}
