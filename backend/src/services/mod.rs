//! Business logic services for the AgriAssist Platform

pub mod alerts;
pub mod auth;
pub mod chat;
pub mod preferences;
pub mod weather;

pub use alerts::AlertService;
pub use auth::AuthService;
pub use chat::ChatService;
pub use preferences::PreferencesService;
pub use weather::WeatherService;
