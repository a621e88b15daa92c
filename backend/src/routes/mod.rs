//! Route definitions for the AgriAssist Platform

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check and availability status (public)
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::service_status))
        // Auth routes (public + protected /me)
        .nest("/auth", auth_routes())
        // Weather report and alerts (public, degrade-silently)
        .nest("/weather", weather_routes())
        // Chat assistant (protected)
        .nest("/chat", chat_routes())
        // User preferences (protected)
        .nest("/preferences", preferences_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/logout", post(handlers::logout))
        .merge(
            Router::new()
                .route("/me", get(handlers::me))
                .route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// Weather routes (public)
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/report", get(handlers::get_weather_report))
        .route("/latest", get(handlers::get_latest_weather_report))
        .route("/alerts", get(handlers::list_weather_alerts))
}

/// Chat assistant routes (protected)
fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::send_message))
        .route("/history", get(handlers::get_chat_history))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Preference routes (protected)
fn preferences_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_preferences).put(handlers::update_preferences),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}
