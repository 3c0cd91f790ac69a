use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;
use std::collections::HashMap;
use utoipa::ToSchema;

use super::UserView;
use crate::auth::password;
use crate::database::manager::DatabaseManager;
use crate::database::users::{self, UserChanges};
use crate::error::ApiError;
use crate::handlers::validation::{
    validate_email_format, validate_password, validate_phone_format, validate_username_format,
};
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserUpdateRequest {
    pub username: Option<String>,
    /// Write-only: re-hashed before storage when supplied
    pub password: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserUpdateRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();

        if let Some(username) = &self.username {
            if let Err(msg) = validate_username_format(username) {
                field_errors.insert("username".to_string(), msg);
            }
        }
        if let Some(email) = &self.email {
            if let Err(msg) = validate_email_format(email) {
                field_errors.insert("email".to_string(), msg);
            }
        }
        if let Some(password) = &self.password {
            if let Err(msg) = validate_password(password) {
                field_errors.insert("password".to_string(), msg);
            }
        }
        if let Some(phone) = &self.phone {
            if let Err(msg) = validate_phone_format(phone) {
                field_errors.insert("phone".to_string(), msg);
            }
        }

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Validation failed", Some(field_errors)))
        }
    }

    fn into_changes(self) -> Result<UserChanges, ApiError> {
        let password_hash = match self.password {
            Some(plain) => Some(password::hash(&plain)?),
            None => None,
        };

        Ok(UserChanges {
            username: self.username,
            email: self.email,
            phone: self.phone,
            password_hash,
        })
    }
}

/// GET /users/{id}/ - Show a single user
///
/// When the caller asks for their own record the response additionally
/// carries the stored password hash (see DESIGN.md).
#[utoipa::path(
    get,
    path = "/users/{id}/",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User detail", body = UserView),
        (status = 404, description = "No such user")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn detail(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<UserView> {
    let pool = DatabaseManager::pool().await?;

    let profile = users::profile_by_id(&pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user {}: {}", id, e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", id)))?;

    let is_self = auth_user.user_id == profile.id;
    let password_hash = profile.password_hash.clone();
    let mut view = UserView::from(profile);
    if is_self {
        view.password = Some(password_hash);
    }

    Ok(ApiResponse::success(view))
}

/// PATCH /users/{id}/ - Partially update a user
///
/// Self-only: any other caller gets a 403 and the target row is untouched.
/// Unspecified fields keep their prior values; a supplied password is
/// re-hashed before storage.
#[utoipa::path(
    patch,
    path = "/users/{id}/",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Updated user", body = UserView),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Caller is not the target user"),
        (status = 404, description = "No such user")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdateRequest>,
) -> ApiResult<UserView> {
    let pool = DatabaseManager::pool().await?;

    let mut user = users::find_by_id(&pool, id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to load user {}: {}", id, e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", id)))?;

    if auth_user.user_id != user.id {
        return Err(ApiError::forbidden("Вы можете изменять только свои данные."));
    }

    payload.validate()?;
    let changes = payload.into_changes()?;

    if !changes.is_empty() {
        changes.apply(&mut user);
        users::update(&pool, &user).await?;
        tracing::info!("User '{}' (id {}) updated their profile", user.username, user.id);
    }

    let profile = users::profile_by_id(&pool, user.id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to reload user {}: {}", user.id, e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", user.id)))?;

    Ok(ApiResponse::success(UserView::from(profile)))
}
