use super::{GraphQlClient, UpstreamError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};

/// GraphQL client for api.github.com (or a compatible endpoint)
pub struct GitHubClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl GitHubClient {
    pub fn new(http: Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl GraphQlClient for GitHubClient {
    async fn execute(&self, query: &str, variables: JsonValue) -> Result<JsonValue, UpstreamError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::error!("GitHub API request failed with status {}: {}", status, body);
            let details = serde_json::from_str::<JsonValue>(&body)
                .map(|value| value.get("errors").cloned().unwrap_or(value))
                .unwrap_or(JsonValue::String(body));
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                details,
            });
        }

        let response_data: JsonValue = serde_json::from_str(&body)
            .map_err(|e| UpstreamError::Malformed(format!("Failed to parse GitHub response: {}", e)))?;

        if let Some(errors) = response_data.get("errors").filter(|e| !e.is_null()) {
            log::error!("GitHub GraphQL errors: {}", errors);
            return Err(UpstreamError::GraphQl(errors.clone()));
        }

        if response_data.get("data").is_none() {
            return Err(UpstreamError::Malformed("No data in GitHub response".to_string()));
        }

        Ok(response_data)
    }
}
