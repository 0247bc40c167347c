// Library system core - business logic for tracking anime and manga.
//
// Like the rest of `core`, this module has no Discord or database imports.
// Commands hand us free text; we validate it into domain types before the
// store is ever touched, so a rejected command never mutates anything.

use super::library_models::{
    AddedEntry, EntryStatus, Leaderboard, LeaderboardRow, MediaVariant, Member, Profile,
    ProfileSnapshot, Rating,
};
use async_trait::async_trait;
use thiserror::Error;

/// How many rows a leaderboard shows.
pub const LEADERBOARD_SIZE: usize = 10;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("`{0}` isn't a media type. Use `anime` or `manga`.")]
    InvalidVariant(String),

    #[error("\"{title}\" isn't in the {} database yet. Use `add` first.", .variant.as_str())]
    UnknownTitle {
        variant: MediaVariant,
        title: String,
    },

    #[error("`{0}` isn't a status. Status must be: completed, reading, dropped, or planned.")]
    InvalidStatus(String),

    #[error("{0} is not a valid rating. Ratings go from 0 to 10.")]
    InvalidRating(i64),

    #[error("Title cannot be empty.")]
    EmptyTitle,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl LibraryError {
    /// True for mistakes in what the user typed; false for failures on our side.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, LibraryError::Storage(_))
    }
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

/// Persistence for users, the media catalog and per-user library entries.
///
/// Every method is one logical command and implementations must apply it
/// atomically: resolving the member, touching the catalog and writing the
/// ledger either all happen or none do.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Ensure the title exists in the catalog and append a new `completed`
    /// entry for the member. Repeated adds append repeated entries.
    async fn add_title(
        &self,
        member: &Member,
        variant: MediaVariant,
        title: &str,
    ) -> Result<AddedEntry, LibraryError>;

    /// Set the rating on every entry the member has for the title.
    /// Returns how many entries changed.
    async fn set_rating(
        &self,
        member: &Member,
        variant: MediaVariant,
        title: &str,
        rating: Rating,
    ) -> Result<u64, LibraryError>;

    /// Set the status on every entry the member has for the title.
    /// Returns how many entries changed.
    async fn set_status(
        &self,
        member: &Member,
        variant: MediaVariant,
        title: &str,
        status: EntryStatus,
    ) -> Result<u64, LibraryError>;

    /// Resolve the member (creating the user on first sight) and read
    /// everything a profile needs: entry counts per media type and the
    /// titles marked `reading`, in insertion order.
    async fn profile_snapshot(&self, member: &Member) -> Result<ProfileSnapshot, LibraryError>;

    /// Users ranked by how many entries of `variant` they have, highest first.
    async fn leaderboard(
        &self,
        variant: MediaVariant,
        limit: usize,
    ) -> Result<Vec<LeaderboardRow>, LibraryError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct LibraryService<S: LibraryStore> {
    store: S,
}

impl<S: LibraryStore> LibraryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn validate_title(title: &str) -> Result<&str, LibraryError> {
        if title.trim().is_empty() {
            Err(LibraryError::EmptyTitle)
        } else {
            Ok(title)
        }
    }

    /// Add a title to the member's list with status `completed`.
    pub async fn add_title(
        &self,
        member: &Member,
        variant: &str,
        title: &str,
    ) -> Result<AddedEntry, LibraryError> {
        let variant: MediaVariant = variant.parse()?;
        let title = Self::validate_title(title)?;

        let added = self.store.add_title(member, variant, title).await?;
        tracing::info!(
            user_id = added.user_id,
            media_id = added.media_id,
            entry_id = added.entry_id,
            variant = variant.as_str(),
            "Library entry added"
        );
        Ok(added)
    }

    /// Rate a title the member has added. Returns the number of entries updated.
    pub async fn rate_title(
        &self,
        member: &Member,
        variant: &str,
        title: &str,
        rating: i64,
    ) -> Result<u64, LibraryError> {
        let variant: MediaVariant = variant.parse()?;
        let rating = Rating::new(rating)?;

        let updated = self.store.set_rating(member, variant, title, rating).await?;
        tracing::info!(
            external_id = member.external_id,
            variant = variant.as_str(),
            rating = rating.value(),
            updated,
            "Rating updated"
        );
        Ok(updated)
    }

    /// Change the status of a title the member has added.
    /// Returns the number of entries updated.
    pub async fn update_status(
        &self,
        member: &Member,
        variant: &str,
        title: &str,
        status: &str,
    ) -> Result<u64, LibraryError> {
        let variant: MediaVariant = variant.parse()?;
        let status: EntryStatus = status.parse()?;

        let updated = self.store.set_status(member, variant, title, status).await?;
        tracing::info!(
            external_id = member.external_id,
            variant = variant.as_str(),
            status = status.as_str(),
            updated,
            "Status updated"
        );
        Ok(updated)
    }

    /// Counts, badge and in-progress lists for a member.
    pub async fn profile(&self, member: &Member) -> Result<Profile, LibraryError> {
        let snapshot = self.store.profile_snapshot(member).await?;
        Ok(Profile::from(snapshot))
    }

    /// Top users for a media type.
    pub async fn leaderboard(&self, variant: &str) -> Result<Leaderboard, LibraryError> {
        let variant: MediaVariant = variant.parse()?;
        let rows = self.store.leaderboard(variant, LEADERBOARD_SIZE).await?;
        Ok(Leaderboard { variant, rows })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::library_models::BadgeTier;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct Entry {
        user_id: i64,
        variant: MediaVariant,
        media_id: i64,
        status: EntryStatus,
        rating: Option<u8>,
    }

    #[derive(Default)]
    struct State {
        // external id -> (user id, display name)
        users: HashMap<u64, (i64, String)>,
        catalog: HashMap<(MediaVariant, String), i64>,
        entries: Vec<Entry>,
    }

    impl State {
        fn resolve(&mut self, member: &Member) -> i64 {
            let next_id = self.users.len() as i64 + 1;
            self.users
                .entry(member.external_id)
                .or_insert_with(|| (next_id, member.display_name.clone()))
                .0
        }

        fn media_id(&self, variant: MediaVariant, title: &str) -> Option<i64> {
            self.catalog.get(&(variant, title.to_string())).copied()
        }

        fn count(&self, user_id: i64, variant: MediaVariant) -> u64 {
            self.entries
                .iter()
                .filter(|e| e.user_id == user_id && e.variant == variant)
                .count() as u64
        }

        fn in_progress(&self, user_id: i64, variant: MediaVariant) -> Vec<String> {
            self.entries
                .iter()
                .filter(|e| {
                    e.user_id == user_id
                        && e.variant == variant
                        && e.status == EntryStatus::Reading
                })
                .filter_map(|e| {
                    self.catalog
                        .iter()
                        .find(|((v, _), id)| *v == variant && **id == e.media_id)
                        .map(|((_, title), _)| title.clone())
                })
                .collect()
        }

        fn matching(
            &mut self,
            user_id: i64,
            variant: MediaVariant,
            media_id: i64,
        ) -> impl Iterator<Item = &mut Entry> + '_ {
            self.entries.iter_mut().filter(move |e| {
                e.user_id == user_id && e.variant == variant && e.media_id == media_id
            })
        }
    }

    // Simple in-memory store for testing
    #[derive(Clone, Default)]
    struct InMemoryLibraryStore {
        state: Arc<Mutex<State>>,
    }

    #[async_trait]
    impl LibraryStore for InMemoryLibraryStore {
        async fn add_title(
            &self,
            member: &Member,
            variant: MediaVariant,
            title: &str,
        ) -> Result<AddedEntry, LibraryError> {
            let mut state = self.state.lock().unwrap();
            let user_id = state.resolve(member);
            let next_media = state.catalog.len() as i64 + 1;
            let media_id = *state
                .catalog
                .entry((variant, title.to_string()))
                .or_insert(next_media);
            state.entries.push(Entry {
                user_id,
                variant,
                media_id,
                status: EntryStatus::default(),
                rating: None,
            });
            Ok(AddedEntry {
                user_id,
                media_id,
                entry_id: state.entries.len() as i64,
            })
        }

        async fn set_rating(
            &self,
            member: &Member,
            variant: MediaVariant,
            title: &str,
            rating: Rating,
        ) -> Result<u64, LibraryError> {
            let mut state = self.state.lock().unwrap();
            let user_id = state.resolve(member);
            let media_id =
                state
                    .media_id(variant, title)
                    .ok_or_else(|| LibraryError::UnknownTitle {
                        variant,
                        title: title.to_string(),
                    })?;
            let mut updated = 0;
            for entry in state.matching(user_id, variant, media_id) {
                entry.rating = Some(rating.value());
                updated += 1;
            }
            Ok(updated)
        }

        async fn set_status(
            &self,
            member: &Member,
            variant: MediaVariant,
            title: &str,
            status: EntryStatus,
        ) -> Result<u64, LibraryError> {
            let mut state = self.state.lock().unwrap();
            let user_id = state.resolve(member);
            let media_id =
                state
                    .media_id(variant, title)
                    .ok_or_else(|| LibraryError::UnknownTitle {
                        variant,
                        title: title.to_string(),
                    })?;
            let mut updated = 0;
            for entry in state.matching(user_id, variant, media_id) {
                entry.status = status;
                updated += 1;
            }
            Ok(updated)
        }

        async fn profile_snapshot(
            &self,
            member: &Member,
        ) -> Result<ProfileSnapshot, LibraryError> {
            let mut state = self.state.lock().unwrap();
            let user_id = state.resolve(member);
            Ok(ProfileSnapshot {
                anime_count: state.count(user_id, MediaVariant::Anime),
                manga_count: state.count(user_id, MediaVariant::Manga),
                watching: state.in_progress(user_id, MediaVariant::Anime),
                reading: state.in_progress(user_id, MediaVariant::Manga),
            })
        }

        async fn leaderboard(
            &self,
            variant: MediaVariant,
            limit: usize,
        ) -> Result<Vec<LeaderboardRow>, LibraryError> {
            let state = self.state.lock().unwrap();
            let mut rows: Vec<LeaderboardRow> = state
                .users
                .values()
                .map(|(user_id, name)| LeaderboardRow {
                    display_name: name.clone(),
                    count: state
                        .entries
                        .iter()
                        .filter(|e| e.user_id == *user_id && e.variant == variant)
                        .count() as u64,
                })
                .filter(|row| row.count > 0)
                .collect();
            rows.sort_by(|a, b| b.count.cmp(&a.count));
            rows.truncate(limit);
            Ok(rows)
        }
    }

    fn make_service() -> (LibraryService<InMemoryLibraryStore>, InMemoryLibraryStore) {
        let store = InMemoryLibraryStore::default();
        (LibraryService::new(store.clone()), store)
    }

    fn alice() -> Member {
        Member::new(1001, "Alice")
    }

    #[tokio::test]
    async fn add_rejects_unknown_variant() {
        let (service, store) = make_service();

        let err = service.add_title(&alice(), "novel", "X").await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidVariant(_)));
        assert!(store.state.lock().unwrap().entries.is_empty());
    }

    #[tokio::test]
    async fn add_rejects_blank_title() {
        let (service, _) = make_service();

        let err = service.add_title(&alice(), "anime", "   ").await.unwrap_err();
        assert!(matches!(err, LibraryError::EmptyTitle));
    }

    #[tokio::test]
    async fn repeated_adds_create_repeated_entries() {
        let (service, store) = make_service();

        let first = service.add_title(&alice(), "manga", "Berserk").await.unwrap();
        let second = service.add_title(&alice(), "manga", "Berserk").await.unwrap();

        assert_eq!(first.media_id, second.media_id);
        assert_ne!(first.entry_id, second.entry_id);
        let state = store.state.lock().unwrap();
        assert_eq!(state.entries.len(), 2);
        assert!(state
            .entries
            .iter()
            .all(|e| e.status == EntryStatus::Completed && e.rating.is_none()));
    }

    #[tokio::test]
    async fn rating_out_of_range_mutates_nothing() {
        let (service, store) = make_service();
        service.add_title(&alice(), "anime", "X").await.unwrap();

        let err = service.rate_title(&alice(), "anime", "X", 11).await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidRating(11)));
        assert!(store.state.lock().unwrap().entries[0].rating.is_none());
    }

    #[tokio::test]
    async fn rating_unknown_title_fails() {
        let (service, _) = make_service();

        let err = service
            .rate_title(&alice(), "anime", "Unknown", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::UnknownTitle { .. }));
        assert!(err.is_user_error());
    }

    #[tokio::test]
    async fn rating_updates_every_matching_entry() {
        let (service, store) = make_service();
        service.add_title(&alice(), "anime", "X").await.unwrap();
        service.add_title(&alice(), "anime", "X").await.unwrap();

        let updated = service.rate_title(&alice(), "Anime", "X", 7).await.unwrap();
        assert_eq!(updated, 2);
        assert!(store
            .state
            .lock()
            .unwrap()
            .entries
            .iter()
            .all(|e| e.rating == Some(7)));
    }

    #[tokio::test]
    async fn invalid_status_mutates_nothing() {
        let (service, store) = make_service();
        service.add_title(&alice(), "manga", "Y").await.unwrap();

        let err = service
            .update_status(&alice(), "manga", "Y", "finished")
            .await
            .unwrap_err();
        assert!(matches!(err, LibraryError::InvalidStatus(_)));
        assert_eq!(
            store.state.lock().unwrap().entries[0].status,
            EntryStatus::Completed
        );
    }

    #[tokio::test]
    async fn status_updates_only_the_callers_entries() {
        let (service, store) = make_service();
        let bob = Member::new(1002, "Bob");
        service.add_title(&alice(), "manga", "Y").await.unwrap();
        service.add_title(&alice(), "manga", "Y").await.unwrap();
        service.add_title(&bob, "manga", "Y").await.unwrap();

        let updated = service
            .update_status(&alice(), "manga", "Y", "dropped")
            .await
            .unwrap();
        assert_eq!(updated, 2);

        let state = store.state.lock().unwrap();
        let statuses: Vec<EntryStatus> = state.entries.iter().map(|e| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                EntryStatus::Dropped,
                EntryStatus::Dropped,
                EntryStatus::Completed
            ]
        );
    }

    #[tokio::test]
    async fn profile_scenario() {
        let (service, _) = make_service();
        service.add_title(&alice(), "anime", "X").await.unwrap();
        service.add_title(&alice(), "manga", "Y").await.unwrap();
        service.add_title(&alice(), "manga", "Z").await.unwrap();
        service
            .update_status(&alice(), "manga", "Z", "reading")
            .await
            .unwrap();

        let profile = service.profile(&alice()).await.unwrap();
        assert_eq!(profile.anime_count, 1);
        assert_eq!(profile.manga_count, 2);
        assert_eq!(profile.badge, BadgeTier::Beginner);
        assert!(profile.watching.is_empty());
        assert_eq!(profile.reading, vec!["Z".to_string()]);
    }

    #[tokio::test]
    async fn profile_of_new_member_is_empty() {
        let (service, store) = make_service();

        let profile = service.profile(&Member::new(7, "Lurker")).await.unwrap();
        assert_eq!(profile.badge, BadgeTier::None);
        assert_eq!(profile.anime_count + profile.manga_count, 0);
        assert_eq!(store.state.lock().unwrap().users.len(), 1);
    }

    #[tokio::test]
    async fn leaderboard_orders_by_count() {
        let (service, _) = make_service();
        let members = [
            (Member::new(1, "five"), 5),
            (Member::new(2, "three"), 3),
            (Member::new(3, "eight"), 8),
        ];
        for (member, count) in &members {
            for i in 0..*count {
                service
                    .add_title(member, "manga", &format!("Title {i}"))
                    .await
                    .unwrap();
            }
        }

        let board = service.leaderboard("manga").await.unwrap();
        assert_eq!(board.variant, MediaVariant::Manga);
        let counts: Vec<u64> = board.rows.iter().map(|row| row.count).collect();
        assert_eq!(counts, vec![8, 5, 3]);
        assert_eq!(board.rows[0].display_name, "eight");

        assert!(matches!(
            service.leaderboard("books").await,
            Err(LibraryError::InvalidVariant(_))
        ));
    }

    #[test]
    fn storage_errors_are_not_user_errors() {
        let err = LibraryError::Storage("db down".into());
        assert!(!err.is_user_error());
        assert!(err.to_string().contains("db down"));
    }
}
