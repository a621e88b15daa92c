//! Authentication service for account registration, login, and token
//! management
//!
//! When the database is not configured every mutating call returns the
//! uniform not-configured error before any I/O is attempted.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use shared::models::AccountInfo;
use shared::validation::{validate_email, validate_password};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: Option<PgPool>,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

/// Input for registering an account
#[derive(Debug, Deserialize)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

/// Input for signing in
#[derive(Debug, Deserialize)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User row from the database
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    created_at: chrono::DateTime<Utc>,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: Option<PgPool>, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
        }
    }

    fn require_db(&self) -> AppResult<&PgPool> {
        self.db.as_ref().ok_or(AppError::NotConfigured("Database"))
    }

    /// Register a new account and sign it in
    pub async fn sign_up(&self, input: SignUpInput) -> AppResult<(AccountInfo, AuthTokens)> {
        let db = self.require_db()?;

        if let Err(message) = validate_email(&input.email) {
            return Err(AppError::Validation {
                field: "email".to_string(),
                message: message.to_string(),
            });
        }
        if let Err(message) = validate_password(&input.password) {
            return Err(AppError::Validation {
                field: "password".to_string(),
                message: message.to_string(),
            });
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(&input.email)
        .fetch_one(db)
        .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES (LOWER($1), $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(&input.email)
        .bind(&password_hash)
        .fetch_one(db)
        .await?;

        let tokens = self.generate_tokens(user.id)?;
        self.store_refresh_token(db, user.id, &tokens.refresh_token)
            .await?;

        Ok((
            AccountInfo {
                id: user.id,
                email: user.email,
                created_at: user.created_at,
            },
            tokens,
        ))
    }

    /// Authenticate with email and password
    pub async fn sign_in(&self, input: SignInInput) -> AppResult<AuthTokens> {
        let db = self.require_db()?;

        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(&input.email)
        .fetch_optional(db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let tokens = self.generate_tokens(user.id)?;
        self.store_refresh_token(db, user.id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Exchange a refresh token for a fresh token pair. The old refresh
    /// token is revoked.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        let db = self.require_db()?;

        let claims = self.decode_token(refresh_token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        let deleted = sqlx::query(
            "DELETE FROM refresh_tokens WHERE user_id = $1 AND token = $2 AND expires_at > NOW()",
        )
        .bind(user_id)
        .bind(refresh_token)
        .execute(db)
        .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::InvalidToken);
        }

        let tokens = self.generate_tokens(user_id)?;
        self.store_refresh_token(db, user_id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Revoke a refresh token. Signing out without a configured database
    /// is a no-op, not an error: there is no session to end.
    pub async fn sign_out(&self, refresh_token: &str) -> AppResult<()> {
        let Some(db) = &self.db else {
            return Ok(());
        };

        sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(refresh_token)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Load the account behind an authenticated user id
    pub async fn current_user(&self, user_id: Uuid) -> AppResult<AccountInfo> {
        let db = self.require_db()?;

        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        Ok(AccountInfo {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        })
    }

    /// Generate an access/refresh token pair
    fn generate_tokens(&self, user_id: Uuid) -> AppResult<AuthTokens> {
        let now = Utc::now();

        let access_claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
        };
        let refresh_claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.refresh_token_expiry)).timestamp(),
        };

        let key = EncodingKey::from_secret(self.jwt_secret.as_bytes());
        let access_token = encode(&Header::default(), &access_claims, &key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    async fn store_refresh_token(&self, db: &PgPool, user_id: Uuid, token: &str) -> AppResult<()> {
        let expires_at = Utc::now() + Duration::seconds(self.refresh_token_expiry);

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(token)
        .bind(expires_at)
        .execute(db)
        .await?;

        Ok(())
    }

    fn decode_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AiConfig, AiProvider, DatabaseConfig, JwtConfig, ServerConfig,
        WeatherConfig};

    fn test_config() -> Config {
        Config {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                min_connections: 2,
            },
            jwt: JwtConfig {
                secret: "test-secret".to_string(),
                access_token_expiry: 3600,
                refresh_token_expiry: 604800,
            },
            ai: AiConfig {
                provider: AiProvider::OpenAi,
                api_key: String::new(),
                base_url: None,
            },
            weather: WeatherConfig {
                api_endpoint: "http://localhost:9".to_string(),
                default_latitude: -25.8167,
                default_longitude: 28.2411,
            },
        }
    }

    fn offline_service() -> AuthService {
        AuthService::new(None, &test_config())
    }

    #[test]
    fn test_token_round_trip() {
        let service = offline_service();
        let user_id = Uuid::new_v4();

        let tokens = service.generate_tokens(user_id).unwrap();
        assert_eq!(tokens.token_type, "Bearer");
        assert_eq!(tokens.expires_in, 3600);

        let claims = service.decode_token(&tokens.access_token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let service = offline_service();
        let tokens = service.generate_tokens(Uuid::new_v4()).unwrap();

        let mut tampered = tokens.access_token.clone();
        tampered.push('x');
        assert!(matches!(
            service.decode_token(&tampered),
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn test_sign_up_requires_database() {
        let service = offline_service();
        let result = service
            .sign_up(SignUpInput {
                email: "farmer@example.com".to_string(),
                password: "longenough".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_sign_in_requires_database() {
        let service = offline_service();
        let result = service
            .sign_in(SignInInput {
                email: "farmer@example.com".to_string(),
                password: "longenough".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AppError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_sign_out_without_database_is_a_no_op() {
        let service = offline_service();
        assert!(service.sign_out("any-token").await.is_ok());
    }
}
