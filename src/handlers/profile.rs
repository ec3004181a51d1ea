use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::{cached, LoginQuery, PINNED_MAX_AGE, PROFILE_MAX_AGE};
use crate::error::ApiError;
use crate::services::github::{queries, GraphQlClient};
use crate::utils::validators::validate_page_size;

pub const DEFAULT_PINNED_COUNT: u32 = 6;

#[derive(Debug, Deserialize)]
pub struct PinnedQuery {
    pub login: Option<String>,
    pub first: Option<String>,
}

impl PinnedQuery {
    fn parse(&self) -> Result<(String, u32), ApiError> {
        let login = LoginQuery {
            login: self.login.clone(),
        }
        .parse()?;

        let first = match self.first.as_deref().filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ApiError::bad_request(format!("Invalid 'first' value '{}'", raw)))?,
            None => DEFAULT_PINNED_COUNT,
        };
        validate_page_size(first).map_err(|e| ApiError::bad_request(e.to_string()))?;

        Ok((login, first))
    }
}

/// GET /api/pinned
/// Most recently updated public repositories
pub async fn get_pinned_repos(
    client: web::Data<dyn GraphQlClient>,
    query: web::Query<PinnedQuery>,
) -> Result<HttpResponse, ApiError> {
    let (login, first) = query.parse()?;

    let repos = queries::fetch_popular_repos(client.get_ref(), &login, first).await?;

    Ok(HttpResponse::Ok()
        .insert_header(cached(PINNED_MAX_AGE))
        .json(json!({ "repos": repos })))
}

/// GET /api/profile
pub async fn get_profile(
    client: web::Data<dyn GraphQlClient>,
    query: web::Query<LoginQuery>,
) -> Result<HttpResponse, ApiError> {
    let login = query.parse()?;

    let profile = queries::fetch_profile(client.get_ref(), &login).await?;

    Ok(HttpResponse::Ok()
        .insert_header(cached(PROFILE_MAX_AGE))
        .json(json!({ "profile": profile })))
}

/// GET /api/profile-counts
pub async fn get_profile_counts(
    client: web::Data<dyn GraphQlClient>,
    query: web::Query<LoginQuery>,
) -> Result<HttpResponse, ApiError> {
    let login = query.parse()?;

    let counts = queries::fetch_profile_counts(client.get_ref(), &login).await?;

    Ok(HttpResponse::Ok()
        .insert_header(cached(PROFILE_MAX_AGE))
        .json(counts))
}
