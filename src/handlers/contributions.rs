use actix_web::http::header::{ETag, EntityTag};
use actix_web::{web, HttpResponse};
use serde::Serialize;

use super::{cached, RangeQuery, YearQuery, CONTRIBUTIONS_MAX_AGE};
use crate::error::ApiError;
use crate::models::contribution::{CalendarGrid, GridWeek};
use crate::services::calendar_grid::{build_calendar_grid, year_range};
use crate::services::github::{queries, GraphQlClient};
use crate::services::heatmap_generator::{
    content_hash, HeatmapFormat, HeatmapGenerator, HeatmapRequest,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarGridResponse {
    pub year: i32,
    pub total_contributions: u32,
    pub weeks: Vec<GridWeek>,
}

/// GET /api/contributions
/// Daily contribution calendar for a login and time window
pub async fn get_contributions(
    client: web::Data<dyn GraphQlClient>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let (login, range) = query.parse()?;

    let calendar = queries::fetch_contribution_calendar(client.get_ref(), &login, &range).await?;

    Ok(HttpResponse::Ok()
        .insert_header(cached(CONTRIBUTIONS_MAX_AGE))
        .json(calendar))
}

/// Fetch a calendar year and lay it out as the 53 x 7 grid
async fn fetch_grid(
    client: &dyn GraphQlClient,
    login: &str,
    year: i32,
) -> Result<CalendarGridResponse, ApiError> {
    let range = year_range(year)
        .ok_or_else(|| ApiError::bad_request(format!("Year {} is out of range", year)))?;

    let calendar = queries::fetch_contribution_calendar(client, login, &range).await?;
    let grid = build_calendar_grid(year, &calendar.contributions).ok_or_else(|| {
        log::error!("Calendar grid for {} could not be built", year);
        ApiError::Internal(format!("Calendar grid for {} could not be built", year))
    })?;

    Ok(CalendarGridResponse {
        year,
        total_contributions: calendar.total_contributions,
        weeks: grid.weeks,
    })
}

/// GET /api/contributions/grid
pub async fn get_calendar_grid(
    client: web::Data<dyn GraphQlClient>,
    query: web::Query<YearQuery>,
) -> Result<HttpResponse, ApiError> {
    let (login, year) = query.parse()?;

    let response = fetch_grid(client.get_ref(), &login, year).await?;

    Ok(HttpResponse::Ok()
        .insert_header(cached(CONTRIBUTIONS_MAX_AGE))
        .json(response))
}

/// GET /api/contributions/heatmap.{svg|png}
/// Render a year of contributions as an image
pub async fn get_heatmap(
    client: web::Data<dyn GraphQlClient>,
    format: web::Path<String>,
    query: web::Query<YearQuery>,
) -> Result<HttpResponse, ApiError> {
    let format = HeatmapFormat::from_extension(&format)
        .map_err(|e| ApiError::bad_request(e.to_string()))?;
    let (login, year) = query.parse()?;

    let response = fetch_grid(client.get_ref(), &login, year).await?;

    log::info!("🎨 Rendering {:?} heatmap for {} ({})", format, login, year);

    // PNG rasterization is CPU bound, keep it off the async workers
    let content = web::block(move || {
        let grid = CalendarGrid {
            weeks: response.weeks,
        };
        HeatmapGenerator::default().render(
            &HeatmapRequest {
                grid: &grid,
                year,
                total_contributions: response.total_contributions,
                login: &login,
            },
            format,
        )
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
    .map_err(|e| {
        log::error!("Failed to render heatmap: {:#}", e);
        e.context("Failed to render heatmap")
    })?;

    let etag = content_hash(&content);

    Ok(HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header(cached(CONTRIBUTIONS_MAX_AGE))
        .insert_header(ETag(EntityTag::new_strong(etag)))
        .body(content))
}
