//! WebAssembly module for the AgriAssist Platform
//!
//! Provides client-side computation for:
//! - Chat category detection
//! - Farming-term emoji annotation
//! - Short-reply expansion
//! - Weather icon classification
//! - Offline input validation
//!
//! The browser UI calls these so its text handling matches the backend
//! exactly.

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Detect the farming category of a free-text message
#[wasm_bindgen]
pub fn detect_category(message: &str) -> String {
    shared::text::detect_category(message).as_str().to_string()
}

/// Prefix farming terms with their emoji, preserving the original text
#[wasm_bindgen]
pub fn annotate_farming_terms(text: &str) -> String {
    shared::text::annotate_farming_terms(text)
}

/// Expand a too-short reply with the canned sentence for the category
/// detected from the user's message
#[wasm_bindgen]
pub fn expand_short_reply(text: &str, user_message: &str) -> String {
    let category = shared::text::detect_category(user_message);
    shared::text::expand_short_reply(text, category)
}

/// Classify a weather condition string into an icon name
/// ("sun", "cloud" or "rain")
#[wasm_bindgen]
pub fn classify_weather_icon(condition: &str) -> String {
    match WeatherIcon::classify(condition) {
        WeatherIcon::Sun => "sun".to_string(),
        WeatherIcon::Cloud => "cloud".to_string(),
        WeatherIcon::Rain => "rain".to_string(),
    }
}

/// Validate an email address before submitting a sign-up form
#[wasm_bindgen]
pub fn is_valid_email(email: &str) -> bool {
    shared::validation::validate_email(email).is_ok()
}

/// Validate a password before submitting a sign-up form
#[wasm_bindgen]
pub fn is_valid_password(password: &str) -> bool {
    shared::validation::validate_password(password).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_category() {
        assert_eq!(detect_category("best price for wheat"), "crop");
        assert_eq!(detect_category("hello"), "general");
    }

    #[test]
    fn test_annotate_farming_terms() {
        assert_eq!(annotate_farming_terms("feed the sheep"), "feed the 🐑 sheep");
    }

    #[test]
    fn test_expand_short_reply() {
        let out = expand_short_reply("Yes.", "how do I treat blight?");
        assert!(out.starts_with("Yes. "));
        assert!(out.len() > 50);
    }

    #[test]
    fn test_classify_weather_icon() {
        assert_eq!(classify_weather_icon("Light showers"), "rain");
        assert_eq!(classify_weather_icon("Sunny"), "sun");
        assert_eq!(classify_weather_icon("anything else"), "cloud");
    }

    #[test]
    fn test_validation_helpers() {
        assert!(is_valid_email("farmer@example.com"));
        assert!(!is_valid_password("short"));
    }
}
