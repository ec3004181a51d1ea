use serde::Deserialize;
use std::env;

use super::validators::{validate_origin, validate_url};

pub const DEFAULT_GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub github_token: String,
    pub github_graphql_url: String,
    pub allowed_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("'{}' is not a port number", raw),
            })?,
            None => 3000,
        };

        let github_graphql_url = non_empty("GITHUB_GRAPHQL_URL")
            .unwrap_or_else(|| DEFAULT_GITHUB_GRAPHQL_URL.to_string());
        validate_url(&github_graphql_url).map_err(|e| ConfigError::Invalid {
            name: "GITHUB_GRAPHQL_URL",
            reason: e.to_string(),
        })?;

        // `*` is the same as leaving the origin unset
        let allowed_origin = match non_empty("ALLOWED_ORIGIN") {
            Some(raw) if raw.trim() == "*" => None,
            Some(raw) => Some(validate_origin(raw.trim()).map_err(|e| ConfigError::Invalid {
                name: "ALLOWED_ORIGIN",
                reason: e.to_string(),
            })?),
            None => None,
        };

        Ok(Config {
            host: non_empty("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            github_token: non_empty("GITHUB_TOKEN").ok_or(ConfigError::Missing("GITHUB_TOKEN"))?,
            github_graphql_url,
            allowed_origin,
        })
    }
}
