use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config;
use crate::database::models::user::User;
use crate::database::tokens;
use crate::error::ApiError;

pub mod password;

/// Which half of the token pair a JWT represents. Only access tokens grant
/// bearer identity; refresh tokens exist so logout can revoke them too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub kind: TokenKind,
    pub jti: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, username: String, kind: TokenKind) -> Self {
        let now = Utc::now();
        let security = &config::config().security;
        let lifetime = match kind {
            TokenKind::Access => Duration::minutes(security.access_token_expiry_mins as i64),
            TokenKind::Refresh => Duration::hours(security.refresh_token_expiry_hours as i64),
        };

        Self {
            sub: user_id,
            username,
            kind,
            jti: Uuid::new_v4(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_else(Utc::now)
    }
}

/// The access + refresh pair issued at login.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug)]
pub enum AuthError {
    TokenGeneration(String),
    InvalidToken(String),
    InvalidSecret,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::TokenGeneration(msg) => write!(f, "JWT generation error: {}", msg),
            AuthError::InvalidToken(msg) => write!(f, "Invalid JWT token: {}", msg),
            AuthError::InvalidSecret => write!(f, "Invalid JWT secret"),
        }
    }
}

impl std::error::Error for AuthError {}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Validate a JWT signature and expiry and return its claims
pub fn validate_jwt(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err(AuthError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Issue an access + refresh pair for a user and record both in the
/// outstanding-token store so logout can blacklist them later.
pub async fn issue_token_pair(pool: &PgPool, user: &User) -> Result<TokenPair, ApiError> {
    let access_claims = Claims::new(user.id, user.username.clone(), TokenKind::Access);
    let refresh_claims = Claims::new(user.id, user.username.clone(), TokenKind::Refresh);

    let access = generate_jwt(&access_claims)?;
    let refresh = generate_jwt(&refresh_claims)?;

    for claims in [&access_claims, &refresh_claims] {
        tokens::record(pool, claims.jti, user.id, claims.kind, claims.expires_at())
            .await
            .map_err(|e| {
                tracing::error!("Failed to record outstanding token: {}", e);
                ApiError::internal_server_error("Failed to issue tokens")
            })?;
    }

    tracing::info!("Issued token pair for user '{}' (id {})", user.username, user.id);
    Ok(TokenPair { access, refresh })
}
