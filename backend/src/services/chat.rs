//! AI chat assistant service
//!
//! Generates farming advice replies: gates on provider availability,
//! builds the assistant prompt, calls the completion endpoint, then runs
//! the raw model output through the post-processing pipeline. Unlike the
//! weather and alert feeds, generation failures surface to the caller;
//! only the persistence of the exchange degrades silently.

use chrono::Utc;
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{ChatCategory, ChatReply, MessageSender};
use shared::text::{
    annotate_farming_terms, collapse_blank_lines, detect_category, expand_short_reply,
    minimum_reply, strip_role_prefix, MIN_ACCEPTABLE_CHARS,
};
use shared::types::Pagination;

use crate::config::AiConfig;
use crate::error::{AppError, AppResult};
use crate::external::ai::{ChatCompletionClient, ChatTurn};

/// Confidence reported with a reply from the primary model
const CONFIDENCE_PRIMARY: f32 = 0.9;

/// Confidence reported when the secondary fallback model produced the text
const CONFIDENCE_FALLBACK: f32 = 0.7;

/// Chat assistant service. Constructed once at startup and shared through
/// application state.
#[derive(Clone)]
pub struct ChatService {
    client: Option<ChatCompletionClient>,
    db: Option<PgPool>,
}

/// Advisory context for prompt construction. Nothing here is validated;
/// it only adds lines to the system prompt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatContext {
    pub category: Option<ChatCategory>,
    pub farm_records: Option<Vec<serde_json::Value>>,
    pub preferences: Option<ChatPreferences>,
}

/// The slice of user preferences relevant to prompt construction
#[derive(Debug, Clone, Deserialize)]
pub struct ChatPreferences {
    pub location: Option<String>,
    pub farm_size: Option<String>,
    pub primary_crops: Option<Vec<String>>,
}

/// Row model for the chat_messages table
#[derive(Debug, Clone, serde::Serialize, FromRow)]
pub struct ChatMessageRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub sender: String,
    pub category: Option<String>,
    pub timestamp: chrono::DateTime<Utc>,
    pub created_at: chrono::DateTime<Utc>,
}

impl ChatService {
    /// Create a new ChatService. Provider availability is decided here,
    /// once, from the configuration.
    pub fn new(ai: &AiConfig, db: Option<PgPool>) -> Self {
        let client = ai
            .resolve()
            .map(|provider| ChatCompletionClient::new(provider, ai.api_key.clone()));
        Self { client, db }
    }

    /// Whether the assistant can answer at all
    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    /// Generate a reply to a user message.
    ///
    /// Callers must expect errors here: no provider configured, the
    /// provider rejecting the call, or an empty generation all surface.
    pub async fn generate_reply(
        &self,
        user_id: Option<Uuid>,
        message: &str,
        context: &ChatContext,
    ) -> AppResult<ChatReply> {
        let client = self
            .client
            .as_ref()
            .ok_or(AppError::ServiceNotAvailable("AI assistant"))?;

        let turns = [
            ChatTurn::system(build_system_prompt(context)),
            ChatTurn::user(message),
        ];

        let completion = client.complete(&turns).await?;
        let (text, category) = polish(&completion.text, message, completion.used_fallback_model);

        let reply = ChatReply {
            text,
            confidence: if completion.used_fallback_model {
                CONFIDENCE_FALLBACK
            } else {
                CONFIDENCE_PRIMARY
            },
            category,
        };

        if let (Some(db), Some(user_id)) = (&self.db, user_id) {
            if let Err(err) = self.save_exchange(db, user_id, message, &reply).await {
                tracing::warn!("Failed to persist chat exchange: {}", err);
            }
        }

        Ok(reply)
    }

    /// Recent messages for a user, newest first
    pub async fn history(
        &self,
        user_id: Uuid,
        pagination: &Pagination,
    ) -> AppResult<Vec<ChatMessageRow>> {
        let db = self.db.as_ref().ok_or(AppError::NotConfigured("Database"))?;

        let rows = sqlx::query_as::<_, ChatMessageRow>(
            r#"
            SELECT id, user_id, message, sender, category, timestamp, created_at
            FROM chat_messages
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(rows)
    }

    /// Store both turns of an exchange
    async fn save_exchange(
        &self,
        db: &PgPool,
        user_id: Uuid,
        message: &str,
        reply: &ChatReply,
    ) -> AppResult<()> {
        let now = Utc::now();
        let mut tx = db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO chat_messages (user_id, message, sender, category, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(message)
        .bind(MessageSender::User.as_str())
        .bind(reply.category.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO chat_messages (user_id, message, sender, category, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(&reply.text)
        .bind(MessageSender::Bot.as_str())
        .bind(reply.category.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

/// Run raw model output through the post-processing pipeline. The order
/// is fixed: strip role prefix, collapse blank lines, expand short
/// replies, annotate farming terms. On the secondary-model path a reply
/// still under the acceptable minimum after expansion is discarded for
/// the category template.
fn polish(raw: &str, user_message: &str, used_fallback_model: bool) -> (String, ChatCategory) {
    let category = detect_category(user_message);

    let stripped = strip_role_prefix(raw);
    let collapsed = collapse_blank_lines(&stripped);
    let expanded = expand_short_reply(&collapsed, category);

    if used_fallback_model {
        if let Some(template) = substitute_if_too_short(&expanded, category) {
            return (template.to_string(), category);
        }
    }

    (annotate_farming_terms(&expanded), category)
}

/// Secondary-model output under the acceptable minimum is not worth
/// showing; hand back the category template instead.
fn substitute_if_too_short(expanded: &str, category: ChatCategory) -> Option<&'static str> {
    (expanded.chars().count() < MIN_ACCEPTABLE_CHARS).then(|| minimum_reply(category))
}

/// The fixed assistant instruction, plus advisory context lines
fn build_system_prompt(context: &ChatContext) -> String {
    let mut prompt = String::from(
        "You are AgriAssist, an expert AI agricultural assistant specializing in South African \
         farming. You provide practical, actionable advice for farmers in a conversational and \
         helpful manner.\n\n\
         Your expertise includes:\n\
         - Crop management and cultivation (maize, wheat, tomatoes, potatoes, etc.)\n\
         - Livestock health and breeding (cattle, sheep, goats, chickens)\n\
         - Pest and disease control using IPM approaches\n\
         - Soil management and fertilization for South African conditions\n\
         - Weather-based farming decisions and climate adaptation\n\
         - Market prices and agricultural economics in South Africa\n\
         - Government schemes and funding opportunities\n\
         - Sustainable farming practices and water conservation\n\n\
         Response Guidelines:\n\
         - Provide specific, actionable advice tailored to South African conditions\n\
         - Use local context (climate zones, seasonal patterns, local suppliers)\n\
         - Include practical tips with specific measurements and timings\n\
         - Mention relevant products, suppliers, or contacts when helpful\n\
         - Be concise but comprehensive (aim for 150-250 words)\n\
         - Use appropriate farming terminology\n\
         - Consider local seasons (summer: Dec-Feb, winter: Jun-Aug)\n\
         - Be encouraging and supportive\n\
         - Include relevant emojis for better readability\n\
         - Focus on cost-effective solutions for small to medium farmers\n",
    );

    if let Some(category) = context.category {
        prompt.push_str(&format!("\nPrimary focus area: {}\n", category));
    }
    if context.farm_records.as_ref().is_some_and(|r| !r.is_empty()) {
        prompt.push_str("\nReference data available from similar farms\n");
    }
    if let Some(preferences) = &context.preferences {
        if let Some(location) = &preferences.location {
            prompt.push_str(&format!("\nThe farmer is located in {}\n", location));
        }
        if let Some(farm_size) = &preferences.farm_size {
            prompt.push_str(&format!("Farm size: {}\n", farm_size));
        }
        if let Some(crops) = &preferences.primary_crops {
            if !crops.is_empty() {
                prompt.push_str(&format!("Primary crops: {}\n", crops.join(", ")));
            }
        }
    }

    prompt.push_str(
        "\nAlways respond as a knowledgeable South African farming expert would, with practical \
         solutions that farmers can implement immediately.",
    );

    prompt
}
