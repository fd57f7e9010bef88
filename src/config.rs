use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::logger::RunLogger;
use crate::secret::{Secret, MASK};

pub const LOGIN_URL_KEY: &str = "SALESFORCE_LOGIN_URL";
pub const CONSUMER_KEY_KEY: &str = "SALESFORCE_CONSUMER_KEY";
pub const CONSUMER_SECRET_KEY: &str = "SALESFORCE_CONSUMER_SECRET";
pub const USERNAME_KEY: &str = "SALESFORCE_USERNAME";
pub const PASSWORD_KEY: &str = "SALESFORCE_PASSWORD";
pub const INSTANCE_URL_KEY: &str = "SALESFORCE_INSTANCE_URL";

/// Keys whose values are masked in every diagnostic dump.
const SECRET_KEYS: [&str; 2] = [CONSUMER_SECRET_KEY, PASSWORD_KEY];

/// The credentials file exactly as it was read: a flat JSON object of strings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigMap(BTreeMap<String, String>);

impl ConfigMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Copy of the mapping with secret values replaced by [`MASK`].
    pub fn masked(&self) -> BTreeMap<&str, &str> {
        self.0
            .iter()
            .map(|(key, value)| {
                if SECRET_KEYS.contains(&key.as_str()) {
                    (key.as_str(), MASK)
                } else {
                    (key.as_str(), value.as_str())
                }
            })
            .collect()
    }

    /// The value as written, unless it is blank.
    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &'static str) -> Result<&str, ConfigError> {
        self.non_empty(key)
            .ok_or_else(|| ConfigError::missing_key(key))
    }
}

impl fmt::Debug for ConfigMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.masked()).finish()
    }
}

/// Read the credentials file at `path`.
pub fn load_config(path: &Path, log: &RunLogger) -> Result<ConfigMap, ConfigError> {
    debug!(logger: log, "Attempting to load configuration from: {}", path.display());

    let result = read_config(path);
    match &result {
        Ok(config) => {
            info!(logger: log, "Configuration loaded successfully from {}", path.display());
            debug!(logger: log, "Loaded config: {config:?}");
        }
        Err(ConfigError::NotFound { .. }) => {
            error!(logger: log, "Configuration file '{}' not found. Please create it.", path.display());
        }
        Err(ConfigError::Parse { reason, .. }) => {
            error!(
                logger: log,
                "Could not decode JSON from '{}'. Check file format. Error: {reason}",
                path.display()
            );
        }
        Err(err) => {
            error!(logger: log, "An unexpected error occurred while loading config: {err}");
        }
    }
    result
}

fn read_config(path: &Path) -> Result<ConfigMap, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(ConfigError::not_found(path)),
        Err(e) => return Err(ConfigError::unexpected(path, e)),
    };

    serde_json::from_str(&content).map_err(|e| ConfigError::parse(path, e.to_string()))
}

/// OAuth2 grant used against the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grant {
    /// Resource-owner password credentials.
    Password { username: String, password: Secret },
    ClientCredentials,
}

impl Grant {
    pub fn grant_type(&self) -> &'static str {
        match self {
            Grant::Password { .. } => "password",
            Grant::ClientCredentials => "client_credentials",
        }
    }
}

/// Typed view of the configuration needed to authenticate.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub login_url: String,
    pub consumer_key: String,
    pub consumer_secret: Secret,
    pub grant: Grant,
    pub default_instance_url: Option<String>,
}

impl Credentials {
    /// The password grant is chosen when both username and password are present.
    pub fn from_config(config: &ConfigMap) -> Result<Self, ConfigError> {
        let grant = match (config.non_empty(USERNAME_KEY), config.non_empty(PASSWORD_KEY)) {
            (Some(username), Some(password)) => Grant::Password {
                username: username.to_string(),
                password: Secret::new(password),
            },
            _ => Grant::ClientCredentials,
        };

        Ok(Credentials {
            login_url: config.required(LOGIN_URL_KEY)?.to_string(),
            consumer_key: config.required(CONSUMER_KEY_KEY)?.to_string(),
            consumer_secret: Secret::new(config.required(CONSUMER_SECRET_KEY)?),
            grant,
            default_instance_url: config.non_empty(INSTANCE_URL_KEY).map(str::to_string),
        })
    }
}
