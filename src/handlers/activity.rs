use actix_web::{web, HttpResponse};

use super::{cached, RangeQuery, CONTRIBUTIONS_MAX_AGE};
use crate::error::ApiError;
use crate::services::activity_aggregation::{aggregate_activity_repos, summarize_activity_mix};
use crate::services::github::{queries, GraphQlClient};

/// GET /api/activity-mix
/// Share of commits, issues, pull requests and reviews in a time window
pub async fn get_activity_mix(
    client: web::Data<dyn GraphQlClient>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let (login, range) = query.parse()?;

    let totals = queries::fetch_activity_totals(client.get_ref(), &login, &range).await?;
    let mix = summarize_activity_mix(totals);

    log::debug!("Activity mix for {}: {:?}", login, mix.percentages);

    Ok(HttpResponse::Ok()
        .insert_header(cached(CONTRIBUTIONS_MAX_AGE))
        .json(mix))
}

/// GET /api/activity-contribs
/// Most recently touched repositories across every contribution kind
pub async fn get_activity_contribs(
    client: web::Data<dyn GraphQlClient>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let (login, range) = query.parse()?;

    let sources = queries::fetch_contribution_sources(client.get_ref(), &login, &range).await?;
    let repos = aggregate_activity_repos(&sources);

    log::info!(
        "📦 {} contributed to {} repositories ({} shown)",
        login,
        repos.total,
        repos.top.len()
    );

    Ok(HttpResponse::Ok()
        .insert_header(cached(CONTRIBUTIONS_MAX_AGE))
        .json(repos))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::client_data;
    use crate::services::github::testing::StubClient;
    use actix_web::http::{header, StatusCode};
    use actix_web::{test, App};
    use serde_json::{json, Value as JsonValue};
    use std::sync::Arc;

    const RANGE: &str = "login=octocat&from=2024-01-01T00:00:00Z&to=2024-12-31T23:59:59Z";

    fn by_repo(name: &str, occurred_at: &str) -> JsonValue {
        json!({
            "repository": { "nameWithOwner": name, "url": format!("https://github.com/{}", name) },
            "contributions": { "nodes": [{ "occurredAt": occurred_at }] }
        })
    }

    #[actix_web::test]
    async fn test_get_activity_mix() {
        let stub = Arc::new(StubClient::with_user(json!({
            "contributionsCollection": {
                "totalCommitContributions": 3,
                "totalIssueContributions": 1,
                "totalPullRequestContributions": 0,
                "totalPullRequestReviewContributions": 0
            }
        })));
        let app = test::init_service(
            App::new()
                .app_data(client_data(&stub))
                .configure(crate::handlers::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/activity-mix?{}", RANGE))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=21600"
        );
        let body: JsonValue = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "totals": { "commits": 3, "issues": 1, "prs": 0, "reviews": 0 },
                "percentages": { "commits": 75, "issues": 25, "prs": 0, "reviews": 0 }
            })
        );
    }

    #[actix_web::test]
    async fn test_get_activity_contribs() {
        let stub = Arc::new(StubClient::with_user(json!({
            "contributionsCollection": {
                "commitContributionsByRepository": [
                    by_repo("octo/alpha", "2024-03-01T00:00:00Z"),
                    by_repo("octo/beta", "2024-05-01T00:00:00Z")
                ],
                "pullRequestContributionsByRepository": [
                    by_repo("octo/alpha", "2024-06-01T00:00:00Z")
                ],
                "issueContributionsByRepository": [
                    by_repo("octo/gamma", "2024-02-01T00:00:00Z")
                ],
                "pullRequestReviewContributionsByRepository": [],
                "repositoryContributions": {
                    "nodes": [{
                        "repository": { "nameWithOwner": "octo/delta", "url": "https://github.com/octo/delta" },
                        "occurredAt": "2024-01-15T00:00:00Z"
                    }]
                }
            }
        })));
        let app = test::init_service(
            App::new()
                .app_data(client_data(&stub))
                .configure(crate::handlers::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/activity-contribs?{}", RANGE))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: JsonValue = test::read_body_json(resp).await;
        assert_eq!(
            body,
            json!({
                "top": [
                    { "nameWithOwner": "octo/alpha", "url": "https://github.com/octo/alpha" },
                    { "nameWithOwner": "octo/beta", "url": "https://github.com/octo/beta" },
                    { "nameWithOwner": "octo/gamma", "url": "https://github.com/octo/gamma" }
                ],
                "extraCount": 1,
                "total": 4
            })
        );
    }

    #[actix_web::test]
    async fn test_activity_mix_for_unknown_user() {
        let stub = Arc::new(StubClient::with_user(JsonValue::Null));
        let app = test::init_service(
            App::new()
                .app_data(client_data(&stub))
                .configure(crate::handlers::configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/activity-mix?{}", RANGE))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: JsonValue = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "User not found" }));
    }
}
