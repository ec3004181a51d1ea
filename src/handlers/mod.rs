pub mod activity;
pub mod contributions;
pub mod profile;

use actix_cors::Cors;
use actix_web::http::header::{self, CacheControl, CacheDirective, HeaderName};
use actix_web::web;
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::contribution::DateRange;
use crate::utils::validators::{validate_date_range, validate_login, validate_year};

/// Six hours, for calendar and activity data
pub const CONTRIBUTIONS_MAX_AGE: u32 = 21600;
pub const PINNED_MAX_AGE: u32 = 3600;
pub const PROFILE_MAX_AGE: u32 = 1800;

pub const MISSING_RANGE_PARAMS: &str = "Missing login, from, or to parameter.";
pub const MISSING_LOGIN_PARAM: &str = "Missing login parameter.";
pub const MISSING_YEAR_PARAMS: &str = "Missing login or year parameter.";

/// Register every `/api` route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route(
                "/contributions",
                web::get().to(contributions::get_contributions),
            )
            .route(
                "/contributions/grid",
                web::get().to(contributions::get_calendar_grid),
            )
            .route(
                "/contributions/heatmap.{format}",
                web::get().to(contributions::get_heatmap),
            )
            .route("/activity-mix", web::get().to(activity::get_activity_mix))
            .route(
                "/activity-contribs",
                web::get().to(activity::get_activity_contribs),
            )
            .route("/pinned", web::get().to(profile::get_pinned_repos))
            .route("/profile", web::get().to(profile::get_profile))
            .route(
                "/profile-counts",
                web::get().to(profile::get_profile_counts),
            ),
    );
}

/// CORS policy for the API; any origin unless one is configured
pub fn cors(allowed_origin: Option<&str>) -> Cors {
    match allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    }
    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
    .allowed_headers(vec![
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        HeaderName::from_static("x-requested-with"),
    ])
    .max_age(3600)
}

pub fn cached(max_age: u32) -> CacheControl {
    CacheControl(vec![CacheDirective::Public, CacheDirective::MaxAge(max_age)])
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub login: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RangeQuery {
    pub fn parse(&self) -> Result<(String, DateRange), ApiError> {
        let (Some(login), Some(from), Some(to)) =
            (present(&self.login), present(&self.from), present(&self.to))
        else {
            return Err(ApiError::bad_request(MISSING_RANGE_PARAMS));
        };

        validate_login(login).map_err(|e| ApiError::bad_request(e.to_string()))?;
        let range = validate_date_range(from, to).map_err(|e| ApiError::bad_request(e.to_string()))?;

        Ok((login.to_string(), range))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub login: Option<String>,
}

impl LoginQuery {
    pub fn parse(&self) -> Result<String, ApiError> {
        let login = present(&self.login).ok_or_else(|| ApiError::bad_request(MISSING_LOGIN_PARAM))?;
        validate_login(login).map_err(|e| ApiError::bad_request(e.to_string()))?;
        Ok(login.to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub login: Option<String>,
    pub year: Option<String>,
}

impl YearQuery {
    pub fn parse(&self) -> Result<(String, i32), ApiError> {
        let (Some(login), Some(year)) = (present(&self.login), present(&self.year)) else {
            return Err(ApiError::bad_request(MISSING_YEAR_PARAMS));
        };

        validate_login(login).map_err(|e| ApiError::bad_request(e.to_string()))?;
        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| ApiError::bad_request(format!("Invalid year '{}'", year)))?;
        validate_year(year).map_err(|e| ApiError::bad_request(e.to_string()))?;

        Ok((login.to_string(), year))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use actix_web::web;
    use std::sync::Arc;

    use crate::services::github::testing::StubClient;
    use crate::services::github::GraphQlClient;

    pub fn client_data(stub: &Arc<StubClient>) -> web::Data<dyn GraphQlClient> {
        let client: Arc<dyn GraphQlClient> = stub.clone();
        web::Data::from(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::github::testing::StubClient;
    use crate::utils::config::Config;
    use actix_web::http::{Method, StatusCode};
    use actix_web::{test, App};
    use std::sync::Arc;

    fn range_query(login: Option<&str>, from: Option<&str>, to: Option<&str>) -> RangeQuery {
        RangeQuery {
            login: login.map(String::from),
            from: from.map(String::from),
            to: to.map(String::from),
        }
    }

    async fn preflight_allow_origin(allowed_origin: &str, request_origin: &str) -> Option<String> {
        let config = Config::from_vars(|name| match name {
            "GITHUB_TOKEN" => Some("t".to_string()),
            "ALLOWED_ORIGIN" => Some(allowed_origin.to_string()),
            _ => None,
        })
        .unwrap();
        let stub = Arc::new(StubClient::with_user(serde_json::Value::Null));
        let app = test::init_service(
            App::new()
                .app_data(test_support::client_data(&stub))
                .wrap(cors(config.allowed_origin.as_deref()))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/profile?login=octocat")
            .insert_header((header::ORIGIN, request_origin))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|value| value.to_str().unwrap().to_string())
    }

    #[actix_web::test]
    async fn test_cors_with_configured_origins() {
        assert_eq!(
            preflight_allow_origin("*", "https://anywhere.example").await.as_deref(),
            Some("https://anywhere.example")
        );
        assert_eq!(
            preflight_allow_origin("https://profile.example.com/", "https://profile.example.com")
                .await
                .as_deref(),
            Some("https://profile.example.com")
        );
    }

    #[::core::prelude::v1::test]
    fn test_cached_header_value() {
        assert_eq!(cached(21600).to_string(), "public, max-age=21600");
    }

    #[::core::prelude::v1::test]
    fn test_range_query_requires_all_params() {
        let from = Some("2023-01-01T00:00:00Z");
        let to = Some("2023-12-31T23:59:59Z");

        assert!(range_query(Some("octocat"), from, to).parse().is_ok());
        for query in [
            range_query(None, from, to),
            range_query(Some("octocat"), None, to),
            range_query(Some("octocat"), from, None),
            range_query(Some(""), from, to),
        ] {
            let err = query.parse().unwrap_err();
            assert_eq!(err.to_string(), MISSING_RANGE_PARAMS);
        }
    }

    #[::core::prelude::v1::test]
    fn test_range_query_rejects_bad_values() {
        let err = range_query(Some("octo cat"), Some("2023-01-01T00:00:00Z"), Some("2023-12-31T23:59:59Z"))
            .parse()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = range_query(Some("octocat"), Some("yesterday"), Some("2023-12-31T23:59:59Z"))
            .parse()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[::core::prelude::v1::test]
    fn test_year_query() {
        let query = YearQuery {
            login: Some("octocat".into()),
            year: Some("2024".into()),
        };
        assert_eq!(query.parse().unwrap(), ("octocat".to_string(), 2024));

        let query = YearQuery {
            login: Some("octocat".into()),
            year: Some("twenty".into()),
        };
        assert!(matches!(query.parse(), Err(ApiError::BadRequest(_))));

        let query = YearQuery {
            login: Some("octocat".into()),
            year: Some("1999".into()),
        };
        assert!(matches!(query.parse(), Err(ApiError::BadRequest(_))));
    }
}
