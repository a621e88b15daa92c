//! HTTP handlers for weather endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use shared::models::{AlertDisplay, WeatherReport};

use crate::services::AlertService;
use crate::AppState;

/// Query parameters for the weather report
#[derive(Debug, Deserialize)]
pub struct CoordinatesQuery {
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

/// Current conditions plus five-day forecast. Never fails: on upstream
/// trouble the fixed fallback dataset is returned with `offline` set.
pub async fn get_weather_report(
    State(state): State<AppState>,
    Query(query): Query<CoordinatesQuery>,
) -> Json<WeatherReport> {
    let report = state
        .weather
        .fetch_report(query.latitude, query.longitude)
        .await;
    Json(report)
}

/// The most recently completed report, without a new upstream fetch.
/// Empty until the first fetch finishes; overlapping fetches keep the
/// newest request's result here regardless of completion order.
pub async fn get_latest_weather_report(
    State(state): State<AppState>,
) -> Json<Option<WeatherReport>> {
    Json(state.weather.latest_report())
}

/// Active weather alerts, newest first. Never fails: serves the fixed
/// fallback alerts when the database is unreachable.
pub async fn list_weather_alerts(State(state): State<AppState>) -> Json<Vec<AlertDisplay>> {
    let service = AlertService::new(state.db.clone());
    Json(service.active_alerts().await)
}
