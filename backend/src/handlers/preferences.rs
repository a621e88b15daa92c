//! HTTP handlers for user preferences

use axum::{extract::State, Json};

use shared::models::PreferencesUpdate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::preferences::{PreferencesService, UserPreferencesRow};
use crate::AppState;

/// Get the signed-in user's preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Option<UserPreferencesRow>>> {
    let service = PreferencesService::new(state.db.clone());
    let preferences = service.get(current_user.0.user_id).await?;
    Ok(Json(preferences))
}

/// Create or update the signed-in user's preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(update): Json<PreferencesUpdate>,
) -> AppResult<Json<UserPreferencesRow>> {
    let service = PreferencesService::new(state.db.clone());
    let preferences = service.upsert(current_user.0.user_id, update).await?;
    Ok(Json(preferences))
}
