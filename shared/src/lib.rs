//! Shared types and models for the AgriAssist Platform
//!
//! This crate contains types shared between the backend, the browser UI
//! (via WASM), and other components of the system, along with the pure
//! text-processing logic behind the chat assistant.

pub mod models;
pub mod text;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
