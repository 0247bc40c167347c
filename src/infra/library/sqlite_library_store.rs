// SQLite implementation of the LibraryStore trait
//
// Every trait method runs inside a single transaction, so "resolve the user,
// catalogue the title, append the entry" lands as a unit or not at all.
//
// The file pool holds a single connection. Each command reads before it
// writes, and two deferred transactions racing to upgrade their read lock
// get SQLITE_BUSY straight away, so commands queue on the pool instead.

use super::{catalog, identity, ledger, queries, schema};
use crate::core::library::{
    AddedEntry, EntryStatus, LeaderboardRow, LibraryError, LibraryStore, MediaVariant, Member,
    ProfileSnapshot, Rating,
};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::path::Path;
use std::time::Duration;

/// How long a connection waits on a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteLibraryStore {
    pool: SqlitePool,
}

impl SqliteLibraryStore {
    /// Open (or create) the database file at `database_path` and make sure
    /// the schema exists.
    pub async fn new(database_path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create the library tables if they aren't there yet.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        let mut conn = self.pool.acquire().await?;
        schema::create_tables(&mut conn).await?;
        tracing::debug!("Library schema is up to date");
        Ok(())
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, LibraryError> {
        self.pool.begin().await.map_err(storage_error)
    }
}

fn storage_error(e: sqlx::Error) -> LibraryError {
    LibraryError::Storage(e.to_string())
}

fn unknown_title(variant: MediaVariant, title: &str) -> LibraryError {
    LibraryError::UnknownTitle {
        variant,
        title: title.to_string(),
    }
}

#[async_trait]
impl LibraryStore for SqliteLibraryStore {
    async fn add_title(
        &self,
        member: &Member,
        variant: MediaVariant,
        title: &str,
    ) -> Result<AddedEntry, LibraryError> {
        let mut tx = self.begin().await?;

        let user_id = identity::resolve_user(&mut tx, member)
            .await
            .map_err(storage_error)?;
        let media_id = catalog::ensure_media(&mut tx, variant, title)
            .await
            .map_err(storage_error)?;
        let entry_id = ledger::add_entry(&mut tx, user_id, variant, media_id)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;

        Ok(AddedEntry {
            user_id,
            media_id,
            entry_id,
        })
    }

    async fn set_rating(
        &self,
        member: &Member,
        variant: MediaVariant,
        title: &str,
        rating: Rating,
    ) -> Result<u64, LibraryError> {
        let mut tx = self.begin().await?;

        let user_id = identity::resolve_user(&mut tx, member)
            .await
            .map_err(storage_error)?;
        let media_id = catalog::find_media(&mut tx, variant, title)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| unknown_title(variant, title))?;
        let updated = ledger::set_rating(&mut tx, user_id, variant, media_id, rating)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(updated)
    }

    async fn set_status(
        &self,
        member: &Member,
        variant: MediaVariant,
        title: &str,
        status: EntryStatus,
    ) -> Result<u64, LibraryError> {
        let mut tx = self.begin().await?;

        let user_id = identity::resolve_user(&mut tx, member)
            .await
            .map_err(storage_error)?;
        let media_id = catalog::find_media(&mut tx, variant, title)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| unknown_title(variant, title))?;
        let updated = ledger::set_status(&mut tx, user_id, variant, media_id, status)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(updated)
    }

    async fn profile_snapshot(&self, member: &Member) -> Result<ProfileSnapshot, LibraryError> {
        let mut tx = self.begin().await?;

        let user_id = identity::resolve_user(&mut tx, member)
            .await
            .map_err(storage_error)?;
        let anime_count = queries::count_by_variant(&mut tx, user_id, MediaVariant::Anime)
            .await
            .map_err(storage_error)?;
        let manga_count = queries::count_by_variant(&mut tx, user_id, MediaVariant::Manga)
            .await
            .map_err(storage_error)?;
        let watching = queries::in_progress_titles(&mut tx, user_id, MediaVariant::Anime)
            .await
            .map_err(storage_error)?;
        let reading = queries::in_progress_titles(&mut tx, user_id, MediaVariant::Manga)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;

        Ok(ProfileSnapshot {
            anime_count,
            manga_count,
            watching,
            reading,
        })
    }

    async fn leaderboard(
        &self,
        variant: MediaVariant,
        limit: usize,
    ) -> Result<Vec<LeaderboardRow>, LibraryError> {
        let mut conn = self.pool.acquire().await.map_err(storage_error)?;
        queries::leaderboard(&mut conn, variant, limit)
            .await
            .map_err(storage_error)
    }
}

#[cfg(test)]
impl SqliteLibraryStore {
    /// Fresh in-memory database. Limited to one connection, otherwise every
    /// pooled connection would see its own empty database.
    async fn connect_in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(":memory:")
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }
}
