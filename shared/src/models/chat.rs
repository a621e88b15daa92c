//! Chat assistant models

use serde::{Deserialize, Serialize};

/// Farming topic assigned to a free-text message by keyword lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatCategory {
    Crop,
    Livestock,
    Pest,
    Weather,
    Market,
    Soil,
    General,
}

impl ChatCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatCategory::Crop => "crop",
            ChatCategory::Livestock => "livestock",
            ChatCategory::Pest => "pest",
            ChatCategory::Weather => "weather",
            ChatCategory::Market => "market",
            ChatCategory::Soil => "soil",
            ChatCategory::General => "general",
        }
    }
}

impl std::fmt::Display for ChatCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChatCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "crop" => Ok(ChatCategory::Crop),
            "livestock" => Ok(ChatCategory::Livestock),
            "pest" => Ok(ChatCategory::Pest),
            "weather" => Ok(ChatCategory::Weather),
            "market" => Ok(ChatCategory::Market),
            "soil" => Ok(ChatCategory::Soil),
            "general" => Ok(ChatCategory::General),
            _ => Err(()),
        }
    }
}

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Bot,
}

impl MessageSender {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageSender::User => "user",
            MessageSender::Bot => "bot",
        }
    }
}

/// A generated assistant reply
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    /// Fixed per code path: 0.9 on the primary model, 0.7 when the
    /// secondary fallback model produced the text.
    pub confidence: f32,
    pub category: ChatCategory,
}
