// Title catalog. Anime and manga live in separate tables, so the same title
// can exist once in each. Matching is exact and case-sensitive.

use crate::core::library::MediaVariant;
use sqlx::SqliteConnection;

/// Table and primary key column holding titles for a variant.
pub fn table_for(variant: MediaVariant) -> (&'static str, &'static str) {
    match variant {
        MediaVariant::Anime => ("anime", "anime_id"),
        MediaVariant::Manga => ("manga", "manga_id"),
    }
}

pub async fn find_media(
    conn: &mut SqliteConnection,
    variant: MediaVariant,
    title: &str,
) -> Result<Option<i64>, sqlx::Error> {
    let (table, id_column) = table_for(variant);
    let sql = format!("SELECT {id_column} FROM {table} WHERE title = ?");

    sqlx::query_scalar::<_, i64>(&sql)
        .bind(title)
        .fetch_optional(&mut *conn)
        .await
}

/// Id of `title`, inserting it first if it isn't catalogued.
///
/// The insert is `OR IGNORE`: if someone else got there first we just read
/// back their row.
pub async fn ensure_media(
    conn: &mut SqliteConnection,
    variant: MediaVariant,
    title: &str,
) -> Result<i64, sqlx::Error> {
    let (table, _) = table_for(variant);
    let sql = format!("INSERT OR IGNORE INTO {table} (title) VALUES (?)");

    let inserted = sqlx::query(&sql)
        .bind(title)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    if inserted > 0 {
        tracing::debug!(variant = variant.as_str(), title, "Catalogued new title");
    }

    find_media(conn, variant, title)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}
