//! Configuration management for the AgriAssist Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with AGRI_ prefix
//!
//! Availability of the two remote dependencies (database, AI provider) is
//! decided here, once, from the loaded values. Nothing re-checks at call
//! time.

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Placeholder literals that mean "the operator never filled this in"
const DATABASE_URL_PLACEHOLDER: &str = "your_database_url_here";
const API_KEY_PLACEHOLDERS: [&str; 2] = ["your_openai_api_key_here", "your_ai_api_key_here"];

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// AI chat provider configuration
    pub ai: AiConfig,

    /// Weather API configuration
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

impl DatabaseConfig {
    /// Whether the database is usable at all. Checked once at startup;
    /// services degrade to their fallback behavior when this is false.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
            && self.url != DATABASE_URL_PLACEHOLDER
            && (self.url.starts_with("postgres://") || self.url.starts_with("postgresql://"))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,
}

/// Which hosted model endpoint the chat assistant talks to
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAi,
    Together,
    Groq,
    HuggingFace,
}

impl AiProvider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "https://api.openai.com/v1",
            AiProvider::Together => "https://api.together.xyz/v1",
            AiProvider::Groq => "https://api.groq.com/openai/v1",
            AiProvider::HuggingFace => "https://api-inference.huggingface.co/models",
        }
    }

    pub fn model_name(&self) -> &'static str {
        match self {
            AiProvider::OpenAi => "gpt-3.5-turbo",
            AiProvider::Together => "meta-llama/Llama-2-7b-chat-hf",
            AiProvider::Groq => "llama2-70b-4096",
            AiProvider::HuggingFace => "mistralai/Mistral-7B-Instruct-v0.2",
        }
    }

    /// Simpler model used for the single fallback attempt. Only the
    /// Hugging Face path retries.
    pub fn fallback_model_name(&self) -> Option<&'static str> {
        match self {
            AiProvider::HuggingFace => Some("google/flan-t5-large"),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Which provider to use
    pub provider: AiProvider,

    /// API key for the provider
    pub api_key: String,

    /// Optional base URL override (self-hosted gateways, proxies)
    pub base_url: Option<String>,
}

/// Provider settings resolved once at startup: model name and endpoint
/// are fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct ResolvedAiProvider {
    pub provider: AiProvider,
    pub model: String,
    pub base_url: String,
}

impl AiConfig {
    /// Whether a usable API key is present
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
            && self.api_key.len() > 10
            && !API_KEY_PLACEHOLDERS.contains(&self.api_key.as_str())
    }

    /// Resolve the provider configuration, or None when the assistant
    /// must run in offline mode.
    pub fn resolve(&self) -> Option<ResolvedAiProvider> {
        if !self.is_configured() {
            return None;
        }
        Some(ResolvedAiProvider {
            provider: self.provider,
            model: self.provider.model_name().to_string(),
            base_url: self
                .base_url
                .clone()
                .unwrap_or_else(|| self.provider.default_base_url().to_string()),
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    /// Weather API endpoint
    pub api_endpoint: String,

    /// Default latitude when the caller supplies none (Pretoria)
    pub default_latitude: f64,

    /// Default longitude when the caller supplies none (Pretoria)
    pub default_longitude: f64,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("AGRI_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.secret", "development-secret-key")?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            .set_default("ai.provider", "openai")?
            .set_default("ai.api_key", "")?
            .set_default(
                "weather.api_endpoint",
                "https://afrigis.services/weather-10-day-forecast/v1",
            )?
            .set_default("weather.default_latitude", -25.81606774487145)?
            .set_default("weather.default_longitude", 28.24244434919649)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (AGRI_ prefix)
            .add_source(
                Environment::with_prefix("AGRI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.to_string(),
            max_connections: 10,
            min_connections: 2,
        }
    }

    fn ai(provider: AiProvider, api_key: &str, base_url: Option<&str>) -> AiConfig {
        AiConfig {
            provider,
            api_key: api_key.to_string(),
            base_url: base_url.map(String::from),
        }
    }

    #[test]
    fn test_database_availability() {
        assert!(database("postgres://localhost/agri").is_configured());
        assert!(database("postgresql://localhost/agri").is_configured());
        assert!(!database("").is_configured());
        assert!(!database("your_database_url_here").is_configured());
        assert!(!database("mysql://localhost/agri").is_configured());
    }

    #[test]
    fn test_ai_availability() {
        assert!(ai(AiProvider::OpenAi, "sk-abcdef123456", None).is_configured());
        assert!(!ai(AiProvider::OpenAi, "", None).is_configured());
        assert!(!ai(AiProvider::OpenAi, "short", None).is_configured());
        assert!(!ai(AiProvider::OpenAi, "your_openai_api_key_here", None).is_configured());
        assert!(!ai(AiProvider::Together, "your_ai_api_key_here", None).is_configured());
    }

    #[test]
    fn test_provider_resolution_defaults() {
        let resolved = ai(AiProvider::Together, "sk-abcdef123456", None)
            .resolve()
            .unwrap();
        assert_eq!(resolved.model, "meta-llama/Llama-2-7b-chat-hf");
        assert_eq!(resolved.base_url, "https://api.together.xyz/v1");
    }

    #[test]
    fn test_provider_resolution_base_url_override() {
        let resolved = ai(
            AiProvider::OpenAi,
            "sk-abcdef123456",
            Some("http://localhost:8080/v1"),
        )
        .resolve()
        .unwrap();
        assert_eq!(resolved.base_url, "http://localhost:8080/v1");
        assert_eq!(resolved.model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_unconfigured_provider_does_not_resolve() {
        assert!(ai(AiProvider::Groq, "", None).resolve().is_none());
    }

    #[test]
    fn test_only_hugging_face_has_fallback_model() {
        assert!(AiProvider::HuggingFace.fallback_model_name().is_some());
        assert!(AiProvider::OpenAi.fallback_model_name().is_none());
        assert!(AiProvider::Together.fallback_model_name().is_none());
        assert!(AiProvider::Groq.fallback_model_name().is_none());
    }
}
