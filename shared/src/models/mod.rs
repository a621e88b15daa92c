//! Domain models for the AgriAssist Platform

mod alert;
mod chat;
mod preferences;
mod user;
mod weather;

pub use alert::*;
pub use chat::*;
pub use preferences::*;
pub use user::*;
pub use weather::*;
