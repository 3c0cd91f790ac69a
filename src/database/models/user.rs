use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row as stored. `mentor_id` is a nullable self-reference; deleting
/// the referenced mentor clears it (ON DELETE SET NULL).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub phone: Option<String>,
    pub mentor_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user joined with its mentor's username and the usernames of its
/// mentees (the derived inverse of the mentor relation).
#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub phone: Option<String>,
    pub mentor: Option<String>,
    pub mentees: Vec<String>,
}
