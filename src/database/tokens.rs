use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::TokenKind;

/// Record a freshly issued token so it can be blacklisted later.
pub async fn record(
    pool: &PgPool,
    jti: Uuid,
    user_id: i64,
    kind: TokenKind,
    expires_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO outstanding_tokens (jti, user_id, kind, expires_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(jti)
    .bind(user_id)
    .bind(kind.as_str())
    .bind(expires_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// A token is active when it was issued by us and has not been blacklisted.
/// Unknown jtis are inactive: only recorded tokens grant identity.
pub async fn is_active(pool: &PgPool, jti: Uuid) -> Result<bool, sqlx::Error> {
    let row: Option<(Option<DateTime<Utc>>,)> =
        sqlx::query_as("SELECT blacklisted_at FROM outstanding_tokens WHERE jti = $1")
            .bind(jti)
            .fetch_optional(pool)
            .await?;

    Ok(matches!(row, Some((None,))))
}

/// Blacklist every outstanding token of a user. Already-blacklisted tokens
/// are left untouched, so repeated calls are no-ops.
pub async fn blacklist_all_for_user(pool: &PgPool, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE outstanding_tokens
        SET blacklisted_at = now()
        WHERE user_id = $1 AND blacklisted_at IS NULL
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
