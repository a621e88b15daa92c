//! Weather API client for fetching forecast data
//!
//! Integrates with the AfriGIS 10-day hourly forecast API

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Fixed query parameters: one station, one-unit buffer radius, ten days
const STATION_COUNT: u32 = 1;
const LOCATION_BUFFER: u32 = 1;
const DAY_COUNT: u32 = 10;

/// Weather API client
#[derive(Clone)]
pub struct AfriGisClient {
    client: Client,
    api_endpoint: String,
}

/// One location entry in the AfriGIS response. Index in the outer array
/// encodes the day offset from today.
#[derive(Debug, Clone, Deserialize)]
pub struct AfriGisDay {
    pub date: Option<String>,
    #[serde(default)]
    pub hourly_data: Vec<AfriGisHour>,
}

/// One hourly sample. Every numeric field is optional on the wire; the
/// service layer substitutes fixed defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct AfriGisHour {
    pub temperature: Option<f64>,
    pub weather_description: Option<String>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub precipitation_probability: Option<f64>,
}

impl AfriGisClient {
    /// Create a new AfriGisClient
    pub fn new(api_endpoint: String) -> Self {
        Self {
            client: Client::new(),
            api_endpoint,
        }
    }

    /// Fetch the hourly forecast for the given coordinates. Returns one
    /// entry per day, each holding its hourly samples.
    pub async fn hourly_by_coords(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<Vec<AfriGisDay>> {
        let url = format!(
            "{}/getHourlyByCoords?latitude={}&longitude={}&station_count={}&location_buffer={}&day_count={}",
            self.api_endpoint, latitude, longitude, STATION_COUNT, LOCATION_BUFFER, DAY_COUNT
        );

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::WeatherApi(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherApi(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let days: Vec<AfriGisDay> = response
            .json()
            .await
            .map_err(|e| AppError::WeatherApi(format!("Failed to parse response: {}", e)))?;

        Ok(days)
    }
}
