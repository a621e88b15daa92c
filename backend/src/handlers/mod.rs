//! HTTP handlers for the AgriAssist Platform

pub mod auth;
pub mod chat;
pub mod health;
pub mod preferences;
pub mod weather;

pub use auth::*;
pub use chat::*;
pub use health::*;
pub use preferences::*;
pub use weather::*;
