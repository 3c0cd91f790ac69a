use axum::{extract::Extension, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use super::DetailMessage;
use crate::database::manager::DatabaseManager;
use crate::database::users;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignMentorRequest {
    /// Id of the user to assign as the caller's mentor
    pub user_id: i64,
}

/// POST /users/ - Assign a mentor to the calling user
///
/// The caller's mentor reference is overwritten unconditionally; any prior
/// mentor is replaced without confirmation. Direct self-assignment is the
/// only rejected shape; longer cycles are allowed.
#[utoipa::path(
    post,
    path = "/users/",
    request_body = AssignMentorRequest,
    responses(
        (status = 200, description = "Mentor assigned", body = DetailMessage),
        (status = 400, description = "Self-assignment rejected"),
        (status = 404, description = "Referenced user does not exist")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn assign_mentor(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<AssignMentorRequest>,
) -> ApiResult<DetailMessage> {
    let pool = DatabaseManager::pool().await?;

    let mentor = users::find_by_id(&pool, payload.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up mentor candidate: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", payload.user_id)))?;

    if mentor.id == auth_user.user_id {
        return Err(ApiError::bad_request(
            "Вы не можете назначить себя своим наставником.",
        ));
    }

    users::set_mentor(&pool, auth_user.user_id, mentor.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to assign mentor: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?;

    tracing::info!(
        "User '{}' (id {}) assigned mentor '{}' (id {})",
        auth_user.username,
        auth_user.user_id,
        mentor.username,
        mentor.id
    );

    Ok(ApiResponse::success(DetailMessage {
        detail: format!("{} успешно назначен вашим наставником.", mentor.username),
    }))
}
