// Per-user library entries.
//
// `add` always appends. Rating and status updates hit every row the user has
// for a title, so duplicate adds stay in sync with each other.

use crate::core::library::{EntryStatus, MediaVariant, Rating};
use sqlx::SqliteConnection;

pub async fn add_entry(
    conn: &mut SqliteConnection,
    user_id: i64,
    variant: MediaVariant,
    media_id: i64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_library (user_id, media_type, media_id, status)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(variant.as_str())
    .bind(media_id)
    .bind(EntryStatus::default().as_str())
    .execute(&mut *conn)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn set_rating(
    conn: &mut SqliteConnection,
    user_id: i64,
    variant: MediaVariant,
    media_id: i64,
    rating: Rating,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE user_library
        SET rating = ?
        WHERE user_id = ? AND media_type = ? AND media_id = ?
        "#,
    )
    .bind(rating.value() as i64)
    .bind(user_id)
    .bind(variant.as_str())
    .bind(media_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}

pub async fn set_status(
    conn: &mut SqliteConnection,
    user_id: i64,
    variant: MediaVariant,
    media_id: i64,
    status: EntryStatus,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE user_library
        SET status = ?
        WHERE user_id = ? AND media_type = ? AND media_id = ?
        "#,
    )
    .bind(status.as_str())
    .bind(user_id)
    .bind(variant.as_str())
    .bind(media_id)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected())
}
