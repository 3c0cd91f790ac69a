use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::auth::password;
use crate::database::manager::DatabaseManager;
use crate::database::users::{self, NewUser};
use crate::error::ApiError;
use crate::handlers::validation::{
    validate_email_format, validate_password, validate_phone_format, validate_username_format,
};
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegistrationRequest {
    pub username: String,
    /// Write-only: accepted here, stored as a bcrypt hash, never echoed back
    pub password: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisteredUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
}

impl RegistrationRequest {
    fn validate(&self) -> Result<(), ApiError> {
        let mut field_errors = HashMap::new();

        if let Err(msg) = validate_username_format(&self.username) {
            field_errors.insert("username".to_string(), msg);
        }
        if let Err(msg) = validate_email_format(&self.email) {
            field_errors.insert("email".to_string(), msg);
        }
        if let Err(msg) = validate_password(&self.password) {
            field_errors.insert("password".to_string(), msg);
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
}

/// POST /registration/ - Create a new user account
///
/// Open to unauthenticated callers. Validation failures (including a
/// duplicate username) come back as 400 with field-level messages and no
/// record is created.
#[utoipa::path(
    post,
    path = "/registration/",
    request_body = RegistrationRequest,
    responses(
        (status = 201, description = "User created", body = RegisteredUser),
        (status = 400, description = "Validation failed")
    ),
    tag = "auth"
)]
pub async fn register(Json(payload): Json<RegistrationRequest>) -> ApiResult<RegisteredUser> {
    payload.validate()?;

    let password_hash = password::hash(&payload.password)?;
    let pool = DatabaseManager::pool().await?;

    let user = users::create(
        &pool,
        NewUser {
            username: payload.username,
            password_hash,
            email: payload.email,
            phone: payload.phone,
        },
    )
    .await?;

    tracing::info!("Registered user '{}' (id {})", user.username, user.id);

    Ok(ApiResponse::created(RegisteredUser {
        id: user.id,
        username: user.username,
        email: user.email,
        phone: user.phone,
    }))
}
