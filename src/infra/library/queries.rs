// Read-side aggregations: counts, in-progress lists and leaderboards.

use super::catalog::table_for;
use crate::core::library::{EntryStatus, LeaderboardRow, MediaVariant};
use sqlx::{Row, SqliteConnection};

pub async fn count_by_variant(
    conn: &mut SqliteConnection,
    user_id: i64,
    variant: MediaVariant,
) -> Result<u64, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM user_library WHERE user_id = ? AND media_type = ?")
            .bind(user_id)
            .bind(variant.as_str())
            .fetch_one(&mut *conn)
            .await?;

    Ok(count as u64)
}

/// Titles with status `reading`, oldest entry first.
pub async fn in_progress_titles(
    conn: &mut SqliteConnection,
    user_id: i64,
    variant: MediaVariant,
) -> Result<Vec<String>, sqlx::Error> {
    let (table, id_column) = table_for(variant);
    let sql = format!(
        r#"
        SELECT m.title
        FROM user_library l
        JOIN {table} m ON l.media_id = m.{id_column}
        WHERE l.user_id = ? AND l.media_type = ? AND l.status = ?
        ORDER BY l.entry_id
        "#
    );

    sqlx::query_scalar::<_, String>(&sql)
        .bind(user_id)
        .bind(variant.as_str())
        .bind(EntryStatus::Reading.as_str())
        .fetch_all(&mut *conn)
        .await
}

/// Users ranked by entry count for a variant, every status included.
/// Ties come back in whatever order SQLite groups them.
pub async fn leaderboard(
    conn: &mut SqliteConnection,
    variant: MediaVariant,
    limit: usize,
) -> Result<Vec<LeaderboardRow>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT u.display_name AS display_name, COUNT(*) AS count
        FROM user_library l
        JOIN users u ON l.user_id = u.user_id
        WHERE l.media_type = ?
        GROUP BY u.user_id
        ORDER BY count DESC
        LIMIT ?
        "#,
    )
    .bind(variant.as_str())
    .bind(limit as i64)
    .fetch_all(&mut *conn)
    .await?;

    let board = rows
        .iter()
        .map(|row| LeaderboardRow {
            display_name: row
                .get::<Option<String>, _>("display_name")
                .unwrap_or_else(|| "Unknown".to_string()),
            count: row.get::<i64, _>("count") as u64,
        })
        .collect();

    Ok(board)
}
