use std::fmt;

use crate::utils::{EnvProvider, parse_bool};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("Required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("Environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),
    #[error("Invalid port {value:?} in {var}: {source}")]
    InvalidPort {
        var: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },
}

/// Connection settings for the Cloud Controller.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfiguration {
    pub api_address: String,
    pub username: String,
    pub password: String,
    pub skip_ssl_validation: bool,
}

// The password must never reach the logs
impl fmt::Debug for ClientConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfiguration")
            .field("api_address", &self.api_address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("skip_ssl_validation", &self.skip_ssl_validation)
            .finish()
    }
}

impl ClientConfiguration {
    pub fn from_env(env: &impl EnvProvider) -> Result<Self, ConfigurationError> {
        let skip_ssl_validation = match optional(env, "SKIP_SSL_VALIDATION")? {
            Some(value) => parse_bool(&value).unwrap_or_else(|| {
                log::warn!(
                    "Could not parse SKIP_SSL_VALIDATION={value:?} as a boolean. TLS validation stays enabled"
                );
                false
            }),
            None => false,
        };

        Ok(Self {
            api_address: required(env, "API_ADDRESS")?,
            username: required(env, "API_USERNAME")?,
            password: required(env, "API_PASSWORD")?,
            skip_ssl_validation,
        })
    }
}

/// Everything the service reads from its environment at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfiguration {
    /// Name this service is deployed under, if the platform told us.
    pub app_name: Option<String>,
    pub port: u16,
    pub client: ClientConfiguration,
}

impl ServiceConfiguration {
    pub fn from_env(env: &impl EnvProvider) -> Result<Self, ConfigurationError> {
        let port = match optional(env, "PORT")? {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigurationError::InvalidPort {
                    var: "PORT",
                    value,
                    source,
                })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            app_name: optional(env, "APP_NAME")?,
            port,
            client: ClientConfiguration::from_env(env)?,
        })
    }
}

/// Unset and empty are treated the same.
fn optional(env: &impl EnvProvider, key: &'static str) -> Result<Option<String>, ConfigurationError> {
    match env.var(key) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(ConfigurationError::NotUnicode(key)),
    }
}

fn required(env: &impl EnvProvider, key: &'static str) -> Result<String, ConfigurationError> {
    optional(env, key)?.ok_or(ConfigurationError::Missing(key))
}
