//! Weather display integration tests
//!
//! Covers the condition-to-icon classifier and the shape of the fallback
//! dataset contract the UI relies on.

use proptest::prelude::*;

use shared::models::{AlertKind, AlertSeverity, WeatherIcon};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Conditions mentioning rain or showers always get the rain icon
    #[test]
    fn test_rain_conditions() {
        for condition in [
            "rain",
            "Light Rain",
            "Heavy rain showers",
            "Scattered Showers",
            "RAINY",
        ] {
            assert_eq!(WeatherIcon::classify(condition), WeatherIcon::Rain, "{}", condition);
        }
    }

    /// Cloudy conditions without rain get the cloud icon
    #[test]
    fn test_cloud_conditions() {
        for condition in ["cloudy", "Partly Cloudy", "Overcast clouds"] {
            assert_eq!(WeatherIcon::classify(condition), WeatherIcon::Cloud, "{}", condition);
        }
    }

    /// Clear or sunny conditions get the sun icon
    #[test]
    fn test_sun_conditions() {
        for condition in ["Sunny", "clear", "Clear Skies", "sunshine"] {
            assert_eq!(WeatherIcon::classify(condition), WeatherIcon::Sun, "{}", condition);
        }
    }

    /// Anything unrecognized falls back to the cloud icon
    #[test]
    fn test_default_condition() {
        for condition in ["Haze", "Fog", "Dust", ""] {
            assert_eq!(WeatherIcon::classify(condition), WeatherIcon::Cloud, "{}", condition);
        }
    }

    /// Mixed descriptions: rain beats cloud, cloud beats sun
    #[test]
    fn test_classifier_precedence() {
        assert_eq!(
            WeatherIcon::classify("cloudy with rain"),
            WeatherIcon::Rain
        );
        assert_eq!(
            WeatherIcon::classify("sunny spells between clouds"),
            WeatherIcon::Cloud
        );
    }

    /// Severity-to-display mapping: only high severity warns
    #[test]
    fn test_alert_kind_mapping() {
        assert_eq!(AlertKind::from_severity(AlertSeverity::High), AlertKind::Warning);
        assert_eq!(AlertKind::from_severity(AlertSeverity::Medium), AlertKind::Info);
        assert_eq!(AlertKind::from_severity(AlertSeverity::Low), AlertKind::Info);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn condition_strategy() -> impl Strategy<Value = String> {
        "[ -~]{0,60}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The classifier is total and case-insensitive
        #[test]
        fn prop_classifier_total_and_case_insensitive(condition in condition_strategy()) {
            let icon = WeatherIcon::classify(&condition);
            prop_assert_eq!(icon, WeatherIcon::classify(&condition.to_uppercase()));
            prop_assert_eq!(icon, WeatherIcon::classify(&condition.to_lowercase()));
        }

        /// Any condition containing "rain" classifies as rain regardless
        /// of surrounding text
        #[test]
        fn prop_rain_substring_always_rain(
            prefix in "[a-z ]{0,20}",
            suffix in "[a-z ]{0,20}",
        ) {
            let condition = format!("{}rain{}", prefix, suffix);
            prop_assert_eq!(WeatherIcon::classify(&condition), WeatherIcon::Rain);
        }

        /// Conditions containing "cloud" and no rain words classify as cloud
        #[test]
        fn prop_cloud_without_rain_is_cloud(
            prefix in "[bcdefgjklmpqtvxyz ]{0,12}",
            suffix in "[bcdefgjklmpqtvxyz ]{0,12}",
        ) {
            let condition = format!("{}cloud{}", prefix, suffix);
            prop_assert!(!condition.contains("rain"));
            prop_assert!(!condition.contains("shower"));
            prop_assert_eq!(WeatherIcon::classify(&condition), WeatherIcon::Cloud);
        }
    }
}
