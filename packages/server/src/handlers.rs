//! HTTP handler functions for the dashboard API.
//!
//! Queries read the data file synchronously, so they run on the blocking
//! thread pool rather than on the worker handling the request.

use std::sync::Arc;

use actix_web::error::BlockingError;
use actix_web::{HttpResponse, web};
use epi_dash_server_models::{ApiError, ApiHealth};
use epi_dash_stats::StatsError;
use serde::Serialize;

use crate::{AppState, queries};

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/daily_data`
///
/// Returns the all-region daily series as parallel arrays.
pub async fn daily_data(state: web::Data<AppState>) -> HttpResponse {
    let source = Arc::clone(&state.source);
    let result = web::block(move || queries::daily_data(source.as_ref())).await;
    respond("daily data", result)
}

/// `GET /api/region_data`
///
/// Returns per-region totals, most cases first.
pub async fn region_data(state: web::Data<AppState>) -> HttpResponse {
    let source = Arc::clone(&state.source);
    let result = web::block(move || queries::region_data(source.as_ref())).await;
    respond("region data", result)
}

/// `GET /api/summary_data`
///
/// Returns the headline figures.
pub async fn summary_data(state: web::Data<AppState>) -> HttpResponse {
    let source = Arc::clone(&state.source);
    let result = web::block(move || queries::summary_data(source.as_ref())).await;
    respond("summary data", result)
}

/// `GET /api/map_data`
///
/// Returns the map payload for the configured region table.
pub async fn map_data(state: web::Data<AppState>) -> HttpResponse {
    let source = Arc::clone(&state.source);
    let regions = Arc::clone(&state.regions);
    let result = web::block(move || queries::map_data(source.as_ref(), &regions)).await;
    respond("map data", result)
}

fn respond<T: Serialize>(
    what: &str,
    result: Result<Result<T, StatsError>, BlockingError>,
) -> HttpResponse {
    match result {
        Ok(Ok(body)) => HttpResponse::Ok().json(body),
        Ok(Err(e)) => {
            let body = ApiError {
                error: e.to_string(),
            };
            if matches!(e, StatsError::DataUnavailable) {
                log::warn!("No data for {what}: {e}");
                HttpResponse::ServiceUnavailable().json(body)
            } else {
                log::error!("Failed to compute {what}: {e}");
                HttpResponse::InternalServerError().json(body)
            }
        }
        Err(e) => {
            log::error!("Query for {what} did not complete: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: e.to_string(),
            })
        }
    }
}
