use sqlx::PgPool;
use thiserror::Error;

use super::models::user::{User, UserProfile};

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Fields required to persist a new user. The password arrives here already
/// hashed; this layer never sees plaintext.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Partial-update payload for a user row. `None` means "keep the prior
/// value"; the password, when present, is already hashed.
#[derive(Debug, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.password_hash.is_none()
    }

    /// Merge the changes into an existing row, leaving unset fields alone
    pub fn apply(self, user: &mut User) {
        if let Some(username) = self.username {
            user.username = username;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
    }
}

const PROFILE_COLUMNS: &str = r#"
    u.id, u.username, u.password_hash, u.email, u.phone,
    m.username AS mentor,
    ARRAY(
        SELECT c.username FROM users c
        WHERE c.mentor_id = u.id
        ORDER BY c.username
    ) AS mentees
"#;

pub async fn create(pool: &PgPool, new_user: NewUser) -> Result<User, UserStoreError> {
    let result = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, email, phone)
        VALUES ($1, $2, $3, $4)
        RETURNING id, username, password_hash, email, phone, mentor_id, created_at, updated_at
        "#,
    )
    .bind(&new_user.username)
    .bind(&new_user.password_hash)
    .bind(&new_user.email)
    .bind(&new_user.phone)
    .fetch_one(pool)
    .await;

    result.map_err(|e| map_unique_violation(e, &new_user.username))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, email, phone, mentor_id, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, email, phone, mentor_id, created_at, updated_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// All users with their mentor's username and mentee usernames resolved
pub async fn list_profiles(pool: &PgPool) -> Result<Vec<UserProfile>, sqlx::Error> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM users u LEFT JOIN users m ON m.id = u.mentor_id ORDER BY u.id"
    );
    sqlx::query_as::<_, UserProfile>(&sql).fetch_all(pool).await
}

pub async fn profile_by_id(pool: &PgPool, id: i64) -> Result<Option<UserProfile>, sqlx::Error> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM users u LEFT JOIN users m ON m.id = u.mentor_id WHERE u.id = $1"
    );
    sqlx::query_as::<_, UserProfile>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Persist an already-merged user row (see [`UserChanges::apply`])
pub async fn update(pool: &PgPool, user: &User) -> Result<User, UserStoreError> {
    let result = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET username = $1, password_hash = $2, email = $3, phone = $4, updated_at = now()
        WHERE id = $5
        RETURNING id, username, password_hash, email, phone, mentor_id, created_at, updated_at
        "#,
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.email)
    .bind(&user.phone)
    .bind(user.id)
    .fetch_one(pool)
    .await;

    result.map_err(|e| map_unique_violation(e, &user.username))
}

/// Overwrite the mentor reference unconditionally; any prior mentor is
/// discarded. Last write wins under concurrent assignment.
pub async fn set_mentor(pool: &PgPool, user_id: i64, mentor_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET mentor_id = $1, updated_at = now() WHERE id = $2")
        .bind(mentor_id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

fn map_unique_violation(err: sqlx::Error, username: &str) -> UserStoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        // 23505 = unique_violation; the only unique constraint is username
        if db_err.code().as_deref() == Some("23505") {
            return UserStoreError::UsernameTaken(username.to_string());
        }
    }
    UserStoreError::Sqlx(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            password_hash: "$2b$06$hash".to_string(),
            email: "alice@example.com".to_string(),
            phone: None,
            mentor_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn changes_apply_only_supplied_fields() {
        let mut user = sample_user();
        let changes = UserChanges {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        changes.apply(&mut user);

        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.username, "alice");
        assert_eq!(user.phone, None);
        assert_eq!(user.password_hash, "$2b$06$hash");
    }

    #[test]
    fn changes_replace_password_hash() {
        let mut user = sample_user();
        let changes = UserChanges {
            password_hash: Some("$2b$06$other".to_string()),
            ..Default::default()
        };
        changes.apply(&mut user);
        assert_eq!(user.password_hash, "$2b$06$other");
    }

    #[test]
    fn empty_changes_detected() {
        assert!(UserChanges::default().is_empty());
        let changes = UserChanges {
            phone: Some("123".to_string()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
