use axum::{extract::Extension, http::StatusCode};

use crate::database::manager::DatabaseManager;
use crate::database::tokens;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// POST /logout/ - Blacklist every outstanding token of the caller
///
/// Invalidates ALL of the user's sessions, not just the one making the
/// request. Idempotent: tokens already blacklisted stay as they are.
#[utoipa::path(
    post,
    path = "/logout/",
    responses(
        (status = 205, description = "All sessions invalidated"),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn logout(Extension(auth_user): Extension<AuthUser>) -> Result<StatusCode, ApiError> {
    let pool = DatabaseManager::pool().await?;

    let revoked = tokens::blacklist_all_for_user(&pool, auth_user.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to blacklist tokens: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?;

    tracing::info!(
        "Blacklisted {} token(s) for user '{}' (id {})",
        revoked,
        auth_user.username,
        auth_user.user_id
    );

    Ok(StatusCode::RESET_CONTENT)
}
