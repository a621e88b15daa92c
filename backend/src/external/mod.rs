//! External API integrations

pub mod ai;
pub mod weather;

pub use ai::ChatCompletionClient;
pub use weather::AfriGisClient;
