//! HTTP handlers for authentication endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use shared::models::AccountInfo;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthService, AuthTokens, SignInInput, SignUpInput};
use crate::AppState;

/// Response after successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: AccountInfo,
    pub tokens: AuthTokens,
}

/// Input carrying a refresh token
#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<SignUpInput>,
) -> AppResult<Json<RegisterResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let (user, tokens) = service.sign_up(input).await?;
    Ok(Json(RegisterResponse { user, tokens }))
}

/// Sign in with email and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<SignInInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.sign_in(input).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a fresh token pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let tokens = service.refresh(&input.refresh_token).await?;
    Ok(Json(tokens))
}

/// Sign out by revoking the refresh token
pub async fn logout(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<Json<()>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    service.sign_out(&input.refresh_token).await?;
    Ok(Json(()))
}

/// The signed-in account
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<AccountInfo>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let user = service.current_user(current_user.0.user_id).await?;
    Ok(Json(user))
}
