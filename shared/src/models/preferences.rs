//! User preference models

use serde::{Deserialize, Serialize};

/// Partial update for a user's preferences; absent fields are left as-is
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreferencesUpdate {
    pub language: Option<String>,
    pub location: Option<String>,
    pub farm_size: Option<String>,
    pub primary_crops: Option<Vec<String>>,
}
