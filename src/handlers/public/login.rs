use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{self, password};
use crate::database::manager::DatabaseManager;
use crate::database::users;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

// One message for both unknown username and wrong password
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// POST /login/ - Authenticate and receive an access + refresh token pair
///
/// Both tokens are recorded as outstanding so a later logout can blacklist
/// them. Bad credentials return a generic 401 without revealing which field
/// was wrong.
#[utoipa::path(
    post,
    path = "/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPairResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<TokenPairResponse> {
    let pool = DatabaseManager::pool().await?;

    let user = users::find_by_username(&pool, &payload.username)
        .await
        .map_err(|e| {
            tracing::error!("Database error during login: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?
        .ok_or_else(|| ApiError::unauthorized(INVALID_CREDENTIALS))?;

    let valid = password::verify(&payload.password, &user.password_hash)?;
    if !valid {
        tracing::warn!("Failed login attempt for user '{}'", user.username);
        return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
    }

    let pair = auth::issue_token_pair(&pool, &user).await?;

    Ok(ApiResponse::success(TokenPairResponse {
        access: pair.access,
        refresh: pair.refresh,
    }))
}
