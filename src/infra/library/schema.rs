// Table definitions for the library database.
//
// Tables:
// - users: one row per chat identity, created on first interaction
// - anime / manga: deduplicated title catalogs, one namespace per media type
// - user_library: one row per `add`, carrying status and rating

use sqlx::SqliteConnection;

const CREATE_STATEMENTS: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id INTEGER PRIMARY KEY,
        discord_id INTEGER UNIQUE NOT NULL,
        display_name TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS anime (
        anime_id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT UNIQUE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS manga (
        manga_id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT UNIQUE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_library (
        entry_id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        media_type TEXT CHECK(media_type IN ('anime', 'manga')) NOT NULL,
        media_id INTEGER NOT NULL,
        status TEXT CHECK(status IN ('completed', 'reading', 'dropped', 'planned')) NOT NULL DEFAULT 'completed',
        rating INTEGER CHECK(rating >= 0 AND rating <= 10),
        FOREIGN KEY(user_id) REFERENCES users(user_id)
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_user_library_user_type
    ON user_library(user_id, media_type, media_id)
    "#,
];

/// Create every table and index that doesn't exist yet.
/// Safe to run against a database that already has the schema.
pub async fn create_tables(conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    for statement in CREATE_STATEMENTS {
        sqlx::query(statement).execute(&mut *conn).await?;
    }
    Ok(())
}
