//! User preference management

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::PreferencesUpdate;

use crate::error::{AppError, AppResult};

/// User preferences service
#[derive(Clone)]
pub struct PreferencesService {
    db: Option<PgPool>,
}

/// Row model for the user_preferences table
#[derive(Debug, Clone, serde::Serialize, FromRow)]
pub struct UserPreferencesRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub language: String,
    pub location: Option<String>,
    pub farm_size: Option<String>,
    pub primary_crops: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PreferencesService {
    /// Create a new PreferencesService instance
    pub fn new(db: Option<PgPool>) -> Self {
        Self { db }
    }

    fn require_db(&self) -> AppResult<&PgPool> {
        self.db.as_ref().ok_or(AppError::NotConfigured("Database"))
    }

    /// Get a user's preferences, if any have been stored
    pub async fn get(&self, user_id: Uuid) -> AppResult<Option<UserPreferencesRow>> {
        let db = self.require_db()?;

        let row = sqlx::query_as::<_, UserPreferencesRow>(
            r#"
            SELECT id, user_id, language, location, farm_size, primary_crops,
                   created_at, updated_at
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }

    /// Create or partially update a user's preferences. Absent fields in
    /// the update keep their stored value.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        update: PreferencesUpdate,
    ) -> AppResult<UserPreferencesRow> {
        let db = self.require_db()?;

        let row = sqlx::query_as::<_, UserPreferencesRow>(
            r#"
            INSERT INTO user_preferences (user_id, language, location, farm_size, primary_crops)
            VALUES ($1, COALESCE($2, 'en'), $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE SET
                language = COALESCE($2, user_preferences.language),
                location = COALESCE($3, user_preferences.location),
                farm_size = COALESCE($4, user_preferences.farm_size),
                primary_crops = COALESCE($5, user_preferences.primary_crops),
                updated_at = NOW()
            RETURNING id, user_id, language, location, farm_size, primary_crops,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&update.language)
        .bind(&update.location)
        .bind(&update.farm_size)
        .bind(&update.primary_crops)
        .fetch_one(db)
        .await?;

        Ok(row)
    }
}
