//! Weather service: current conditions and five-day forecast
//!
//! Failure policy is degrade-silently: any error from the weather API is
//! logged and replaced wholesale by a fixed fallback dataset, and the
//! caller only sees the `offline` flag flip. This service never returns
//! an error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use shared::models::{ForecastDay, WeatherIcon, WeatherReport, WeatherSnapshot};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};
use crate::external::weather::{AfriGisClient, AfriGisDay, AfriGisHour};

/// Defaults substituted for missing numeric fields, before rounding
const DEFAULT_TEMPERATURE: f64 = 20.0;
const DEFAULT_HUMIDITY: f64 = 65.0;
const DEFAULT_WIND_SPEED: f64 = 10.0;
const DEFAULT_RAIN_PROBABILITY: f64 = 0.0;
const DEFAULT_CONDITION: &str = "Partly Cloudy";

/// The UI shows a five-day forecast
const FORECAST_DAYS: usize = 5;

/// Representative sample for a day is the midday hour, or the first
/// sample when the day has fewer than 13
const MIDDAY_SAMPLE_INDEX: usize = 12;

/// Weather service for fetching and shaping forecast data
#[derive(Clone)]
pub struct WeatherService {
    client: AfriGisClient,
    default_latitude: Decimal,
    default_longitude: Decimal,
    state: Arc<FetchState>,
}

/// Guard state for overlapping fetches: the cached report carries the id
/// of the request that produced it, and an older request can never
/// overwrite a newer one's result.
#[derive(Default)]
struct FetchState {
    next_request_id: AtomicU64,
    latest: Mutex<Option<(u64, WeatherReport)>>,
}

impl WeatherService {
    /// Create a new WeatherService instance
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            client: AfriGisClient::new(config.api_endpoint.clone()),
            default_latitude: Decimal::from_f64_retain(config.default_latitude)
                .unwrap_or_default(),
            default_longitude: Decimal::from_f64_retain(config.default_longitude)
                .unwrap_or_default(),
            state: Arc::new(FetchState::default()),
        }
    }

    /// Fetch current conditions and the five-day forecast. On any failure
    /// the fixed fallback dataset is returned with `offline` set; this
    /// method never errors.
    pub async fn fetch_report(
        &self,
        latitude: Option<Decimal>,
        longitude: Option<Decimal>,
    ) -> WeatherReport {
        let latitude = latitude.unwrap_or(self.default_latitude);
        let longitude = longitude.unwrap_or(self.default_longitude);

        let request_id = self.state.next_request_id.fetch_add(1, Ordering::Relaxed);

        let report = match self.fetch_live(latitude, longitude).await {
            Ok((current, forecast)) => WeatherReport {
                current,
                forecast,
                offline: false,
            },
            Err(err) => {
                tracing::warn!("Weather API unavailable, serving fallback data: {}", err);
                WeatherReport {
                    current: fallback_current(),
                    forecast: fallback_forecast(),
                    offline: true,
                }
            }
        };

        self.store_latest(request_id, report.clone());
        report
    }

    /// The most recent completed report, if any fetch has finished yet
    pub fn latest_report(&self) -> Option<WeatherReport> {
        let guard = match self.state.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.as_ref().map(|(_, report)| report.clone())
    }

    async fn fetch_live(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> AppResult<(WeatherSnapshot, Vec<ForecastDay>)> {
        let days = self.client.hourly_by_coords(latitude, longitude).await?;
        map_days(&days)
    }

    fn store_latest(&self, request_id: u64, report: WeatherReport) {
        let mut guard = match self.state.latest.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let stale = guard
            .as_ref()
            .is_some_and(|(stored_id, _)| *stored_id > request_id);
        if !stale {
            *guard = Some((request_id, report));
        }
    }
}

/// Shape the provider's day entries into the UI dataset
fn map_days(days: &[AfriGisDay]) -> AppResult<(WeatherSnapshot, Vec<ForecastDay>)> {
    let first = days
        .first()
        .ok_or_else(|| AppError::WeatherApi("No weather data available".to_string()))?;
    let current_hour = first
        .hourly_data
        .first()
        .ok_or_else(|| AppError::WeatherApi("No hourly data available".to_string()))?;

    let current = snapshot_from_sample(current_hour);

    let forecast = days
        .iter()
        .take(FORECAST_DAYS)
        .enumerate()
        .map(|(index, day)| forecast_day(index, day))
        .collect();

    Ok((current, forecast))
}

fn snapshot_from_sample(sample: &AfriGisHour) -> WeatherSnapshot {
    let description = sample.weather_description.as_deref();
    let condition = description.unwrap_or(DEFAULT_CONDITION).to_string();

    WeatherSnapshot {
        temperature: sample.temperature.unwrap_or(DEFAULT_TEMPERATURE).round() as i32,
        humidity: sample.humidity.unwrap_or(DEFAULT_HUMIDITY).round() as i32,
        wind_speed: sample.wind_speed.unwrap_or(DEFAULT_WIND_SPEED).round() as i32,
        icon: WeatherIcon::classify(description.unwrap_or("cloudy")),
        description: condition.clone(),
        condition,
    }
}

fn forecast_day(index: usize, day: &AfriGisDay) -> ForecastDay {
    let sample = day
        .hourly_data
        .get(MIDDAY_SAMPLE_INDEX)
        .or_else(|| day.hourly_data.first());

    let description = sample.and_then(|s| s.weather_description.as_deref());
    let condition = description.unwrap_or(DEFAULT_CONDITION).to_string();

    ForecastDay {
        day: day_label(index, day.date.as_deref()),
        temperature: sample
            .and_then(|s| s.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE)
            .round() as i32,
        icon: WeatherIcon::classify(description.unwrap_or("cloudy")),
        rain_probability: sample
            .and_then(|s| s.precipitation_probability)
            .unwrap_or(DEFAULT_RAIN_PROBABILITY)
            .round() as i32,
        description: condition.clone(),
        condition,
    }
}

/// Index 0 is today, index 1 tomorrow, later days use the short weekday
/// name. An unparseable date falls back to the raw date string.
fn day_label(index: usize, date: Option<&str>) -> String {
    match index {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(|d| d.format("%a").to_string())
            .unwrap_or_else(|| date.unwrap_or_default().to_string()),
    }
}

/// Fixed current conditions served when the weather API fails
pub fn fallback_current() -> WeatherSnapshot {
    WeatherSnapshot {
        temperature: 24,
        condition: "Partly Cloudy".to_string(),
        humidity: 65,
        wind_speed: 12,
        icon: WeatherIcon::Cloud,
        description: "Partly Cloudy".to_string(),
    }
}

/// Fixed five-day forecast served when the weather API fails
pub fn fallback_forecast() -> Vec<ForecastDay> {
    vec![
        ForecastDay {
            day: "Today".to_string(),
            temperature: 24,
            condition: "Partly Cloudy".to_string(),
            icon: WeatherIcon::Cloud,
            rain_probability: 20,
            description: "Partly Cloudy".to_string(),
        },
        ForecastDay {
            day: "Tomorrow".to_string(),
            temperature: 22,
            condition: "Rainy".to_string(),
            icon: WeatherIcon::Rain,
            rain_probability: 80,
            description: "Light Rain".to_string(),
        },
        ForecastDay {
            day: "Wednesday".to_string(),
            temperature: 26,
            condition: "Sunny".to_string(),
            icon: WeatherIcon::Sun,
            rain_probability: 5,
            description: "Clear Skies".to_string(),
        },
        ForecastDay {
            day: "Thursday".to_string(),
            temperature: 23,
            condition: "Cloudy".to_string(),
            icon: WeatherIcon::Cloud,
            rain_probability: 40,
            description: "Overcast".to_string(),
        },
        ForecastDay {
            day: "Friday".to_string(),
            temperature: 25,
            condition: "Sunny".to_string(),
            icon: WeatherIcon::Sun,
            rain_probability: 10,
            description: "Mostly Sunny".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(
        temperature: Option<f64>,
        description: Option<&str>,
        humidity: Option<f64>,
        wind: Option<f64>,
        rain: Option<f64>,
    ) -> AfriGisHour {
        AfriGisHour {
            temperature,
            weather_description: description.map(String::from),
            humidity,
            wind_speed: wind,
            precipitation_probability: rain,
        }
    }

    fn service() -> WeatherService {
        WeatherService::new(&WeatherConfig {
            api_endpoint: "http://localhost:9".to_string(),
            default_latitude: -25.8167,
            default_longitude: 28.2411,
        })
    }

    #[test]
    fn test_map_days_current_from_first_sample() {
        let days = vec![AfriGisDay {
            date: Some("2024-11-04".to_string()),
            hourly_data: vec![hour(Some(23.6), Some("Light Rain"), Some(71.0), Some(14.4), Some(80.0))],
        }];

        let (current, forecast) = map_days(&days).unwrap();
        assert_eq!(current.temperature, 24);
        assert_eq!(current.condition, "Light Rain");
        assert_eq!(current.humidity, 71);
        assert_eq!(current.wind_speed, 14);
        assert_eq!(current.icon, WeatherIcon::Rain);
        assert_eq!(forecast.len(), 1);
        assert_eq!(forecast[0].day, "Today");
    }

    #[test]
    fn test_map_days_missing_numerics_use_defaults() {
        let days = vec![AfriGisDay {
            date: None,
            hourly_data: vec![hour(None, None, None, None, None)],
        }];

        let (current, forecast) = map_days(&days).unwrap();
        assert_eq!(current.temperature, 20);
        assert_eq!(current.humidity, 65);
        assert_eq!(current.wind_speed, 10);
        assert_eq!(current.condition, "Partly Cloudy");
        assert_eq!(current.icon, WeatherIcon::Cloud);
        assert_eq!(forecast[0].rain_probability, 0);
    }

    #[test]
    fn test_map_days_empty_response_is_an_error() {
        assert!(map_days(&[]).is_err());
        let no_hours = vec![AfriGisDay {
            date: None,
            hourly_data: vec![],
        }];
        assert!(map_days(&no_hours).is_err());
    }

    #[test]
    fn test_forecast_prefers_midday_sample() {
        let mut hours: Vec<AfriGisHour> = (0..24)
            .map(|i| hour(Some(f64::from(i)), Some("Sunny"), None, None, None))
            .collect();
        hours[12] = hour(Some(30.0), Some("Sunny"), None, None, Some(5.0));

        let day = AfriGisDay {
            date: Some("2024-11-06".to_string()),
            hourly_data: hours,
        };
        let mapped = forecast_day(2, &day);
        assert_eq!(mapped.temperature, 30);
        assert_eq!(mapped.rain_probability, 5);
    }

    #[test]
    fn test_forecast_falls_back_to_first_sample() {
        let day = AfriGisDay {
            date: Some("2024-11-06".to_string()),
            hourly_data: vec![hour(Some(18.0), Some("Cloudy"), None, None, Some(40.0))],
        };
        let mapped = forecast_day(3, &day);
        assert_eq!(mapped.temperature, 18);
        assert_eq!(mapped.rain_probability, 40);
    }

    #[test]
    fn test_forecast_is_capped_at_five_days() {
        let days: Vec<AfriGisDay> = (0..10)
            .map(|i| AfriGisDay {
                date: Some(format!("2024-11-{:02}", i + 4)),
                hourly_data: vec![hour(Some(20.0), Some("Sunny"), None, None, None)],
            })
            .collect();

        let (_, forecast) = map_days(&days).unwrap();
        assert_eq!(forecast.len(), 5);
    }

    #[test]
    fn test_day_labels() {
        assert_eq!(day_label(0, Some("2024-11-04")), "Today");
        assert_eq!(day_label(1, Some("2024-11-05")), "Tomorrow");
        // 2024-11-06 is a Wednesday
        assert_eq!(day_label(2, Some("2024-11-06")), "Wed");
        assert_eq!(day_label(3, Some("not-a-date")), "not-a-date");
        assert_eq!(day_label(4, None), "");
    }

    #[test]
    fn test_fallback_dataset_is_fixed() {
        let current = fallback_current();
        assert_eq!(current.temperature, 24);
        assert_eq!(current.condition, "Partly Cloudy");
        assert_eq!(current.humidity, 65);
        assert_eq!(current.wind_speed, 12);

        let forecast = fallback_forecast();
        assert_eq!(forecast.len(), 5);
        assert_eq!(forecast[0].day, "Today");
        assert_eq!(forecast[0].temperature, 24);
        assert_eq!(forecast[0].rain_probability, 20);
        assert_eq!(forecast[1].icon, WeatherIcon::Rain);
        assert_eq!(forecast[2].description, "Clear Skies");
    }

    #[test]
    fn test_stale_completion_never_overwrites_newer_result() {
        let service = service();

        let mut newer = WeatherReport {
            current: fallback_current(),
            forecast: fallback_forecast(),
            offline: false,
        };
        newer.current.temperature = 31;

        let older = WeatherReport {
            current: fallback_current(),
            forecast: fallback_forecast(),
            offline: true,
        };

        // Request 5 completes first, then request 2 (slow) completes late
        service.store_latest(5, newer);
        service.store_latest(2, older);

        let latest = service.latest_report().unwrap();
        assert_eq!(latest.current.temperature, 31);
        assert!(!latest.offline);
    }

    #[test]
    fn test_equal_request_id_overwrites() {
        let service = service();
        let mut first = WeatherReport {
            current: fallback_current(),
            forecast: vec![],
            offline: true,
        };
        service.store_latest(1, first.clone());
        first.offline = false;
        service.store_latest(1, first);
        assert!(!service.latest_report().unwrap().offline);
    }
}
