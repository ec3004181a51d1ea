pub mod client;
pub mod queries;
mod types;

pub use client::GitHubClient;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

/// Failure while talking to the GitHub GraphQL API
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("GitHub API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API request failed with status {status}")]
    Status { status: u16, details: JsonValue },

    #[error("GitHub GraphQL errors: {0}")]
    GraphQl(JsonValue),

    #[error("User not found")]
    UserNotFound,

    #[error("Unexpected GitHub response: {0}")]
    Malformed(String),
}

/// Issues one GraphQL document and returns the raw JSON response.
///
/// Implementations must turn non-2xx statuses and GraphQL `errors` into an
/// [`UpstreamError`]; an `Ok` value always carries a `data` member.
#[async_trait]
pub trait GraphQlClient: Send + Sync {
    async fn execute(&self, query: &str, variables: JsonValue) -> Result<JsonValue, UpstreamError>;
}
