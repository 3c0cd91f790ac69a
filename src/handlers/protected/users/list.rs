use axum::extract::Extension;

use super::UserView;
use crate::database::manager::DatabaseManager;
use crate::database::users;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /users/ - List every registered user
///
/// Any authenticated caller can enumerate all users; there is no pagination
/// or filtering.
#[utoipa::path(
    get,
    path = "/users/",
    responses(
        (status = 200, description = "All users", body = [UserView]),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list(Extension(_auth_user): Extension<AuthUser>) -> ApiResult<Vec<UserView>> {
    let pool = DatabaseManager::pool().await?;

    let profiles = users::list_profiles(&pool).await.map_err(|e| {
        tracing::error!("Failed to list users: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request")
    })?;

    Ok(ApiResponse::success(
        profiles.into_iter().map(UserView::from).collect(),
    ))
}
