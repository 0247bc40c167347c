// Maps a chat identity onto an internal user id.

use crate::core::library::Member;
use sqlx::SqliteConnection;

/// Look the member up by external id, inserting them on first sight.
///
/// The stored display name is whatever it was when the user was created.
/// Later calls never refresh it.
pub async fn resolve_user(conn: &mut SqliteConnection, member: &Member) -> Result<i64, sqlx::Error> {
    let existing: Option<i64> =
        sqlx::query_scalar("SELECT user_id FROM users WHERE discord_id = ?")
            .bind(member.external_id as i64)
            .fetch_optional(&mut *conn)
            .await?;

    if let Some(user_id) = existing {
        return Ok(user_id);
    }

    let result = sqlx::query("INSERT INTO users (discord_id, display_name) VALUES (?, ?)")
        .bind(member.external_id as i64)
        .bind(member.display_name.as_str())
        .execute(&mut *conn)
        .await?;

    let user_id = result.last_insert_rowid();
    tracing::debug!(
        user_id,
        external_id = member.external_id,
        "Created user record"
    );
    Ok(user_id)
}
