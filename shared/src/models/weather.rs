//! Weather data models

use serde::{Deserialize, Serialize};

/// Current weather conditions as shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Temperature in whole degrees Celsius
    pub temperature: i32,
    pub condition: String,
    /// Relative humidity percent
    pub humidity: i32,
    /// Wind speed in km/h
    pub wind_speed: i32,
    pub icon: WeatherIcon,
    pub description: String,
}

/// One day of the forecast. Position in the sequence encodes the day
/// offset, so the containing Vec is index-significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub temperature: i32,
    pub condition: String,
    pub icon: WeatherIcon,
    /// Rain probability percent
    pub rain_probability: i32,
    pub description: String,
}

/// The weather dataset handed to the UI: current conditions plus up to
/// five forecast days, with a flag telling the UI whether it is looking
/// at live or fallback data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: WeatherSnapshot,
    pub forecast: Vec<ForecastDay>,
    pub offline: bool,
}

/// Display icon for a weather condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherIcon {
    Sun,
    Cloud,
    Rain,
}

impl WeatherIcon {
    /// Classify a free-text condition into an icon.
    ///
    /// Rain wins over cloud: "rainy with clouds" must show the rain icon.
    pub fn classify(condition: &str) -> Self {
        let condition = condition.to_lowercase();
        if condition.contains("rain") || condition.contains("shower") {
            WeatherIcon::Rain
        } else if condition.contains("cloud") {
            WeatherIcon::Cloud
        } else if condition.contains("sun") || condition.contains("clear") {
            WeatherIcon::Sun
        } else {
            WeatherIcon::Cloud
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rain_conditions() {
        assert_eq!(WeatherIcon::classify("Light Rain"), WeatherIcon::Rain);
        assert_eq!(WeatherIcon::classify("Scattered Showers"), WeatherIcon::Rain);
        assert_eq!(WeatherIcon::classify("rainy"), WeatherIcon::Rain);
    }

    #[test]
    fn test_classify_cloud_conditions() {
        assert_eq!(WeatherIcon::classify("Partly Cloudy"), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::classify("Overcast clouds"), WeatherIcon::Cloud);
    }

    #[test]
    fn test_classify_sun_conditions() {
        assert_eq!(WeatherIcon::classify("Sunny"), WeatherIcon::Sun);
        assert_eq!(WeatherIcon::classify("Clear Skies"), WeatherIcon::Sun);
    }

    #[test]
    fn test_rain_wins_over_cloud() {
        assert_eq!(
            WeatherIcon::classify("Cloudy with rain showers"),
            WeatherIcon::Rain
        );
    }

    #[test]
    fn test_unknown_condition_defaults_to_cloud() {
        assert_eq!(WeatherIcon::classify("Haze"), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::classify(""), WeatherIcon::Cloud);
    }
}
