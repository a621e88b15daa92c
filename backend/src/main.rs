//! AgriAssist Platform - Backend Server
//!
//! Weather forecasts, weather alerts, and an AI chat assistant for South
//! African farmers. The server always starts: a missing database or AI
//! credential puts the affected feature into offline mode instead of
//! failing the boot.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod middleware;
mod routes;
mod services;

pub use config::Config;

use services::{ChatService, WeatherService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Option<sqlx::PgPool>,
    pub config: Arc<Config>,
    pub weather: WeatherService,
    pub chat: ChatService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agri_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting AgriAssist Platform Server");
    tracing::info!("Environment: {}", config.environment);

    // Connect to the database, or run in offline mode
    let db = connect_database(&config).await;

    // One-time AI provider diagnostic
    match config.ai.resolve() {
        Some(provider) => {
            tracing::info!(
                "AI assistant enabled: {} via {}",
                provider.model,
                provider.base_url
            );
        }
        None => {
            tracing::warn!(
                "AI assistant disabled: no valid API key found, chat runs in offline mode"
            );
        }
    }

    // Services constructed once and shared through state
    let weather = WeatherService::new(&config.weather);
    let chat = ChatService::new(&config.ai, db.clone());

    let state = AppState {
        db,
        config: Arc::new(config.clone()),
        weather,
        chat,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connect the pool when the database is configured and reachable. Any
/// problem downgrades to offline mode; it never aborts startup.
async fn connect_database(config: &Config) -> Option<sqlx::PgPool> {
    if !config.database.is_configured() {
        tracing::warn!(
            "Database not configured, running in offline mode with fallback data. \
             Add your database credentials to enable persistence"
        );
        return None;
    }

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await;

    match pool {
        Ok(pool) => {
            tracing::info!("Database connection established");

            // Run migrations in development
            if config.environment == "development" {
                tracing::info!("Running database migrations...");
                if let Err(err) = sqlx::migrate!("./migrations").run(&pool).await {
                    tracing::warn!("Migrations failed: {}", err);
                } else {
                    tracing::info!("Migrations completed");
                }
            }

            Some(pool)
        }
        Err(err) => {
            tracing::warn!("Database unreachable ({}), running in offline mode", err);
            None
        }
    }
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "AgriAssist Platform API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
