// Domain models for the anime/manga library.
//
// Everything in here is plain data plus parsing/validation. Input coming
// from chat arrives as free text, so each enum knows how to parse itself
// and rejects anything it doesn't recognise with a typed error.

use super::library_service::LibraryError;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// MEDIA VARIANT
// ============================================================================

/// The two kinds of media we track. Each has its own title namespace,
/// so "Monster" the anime and "Monster" the manga are separate catalog rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaVariant {
    Anime,
    Manga,
}

impl MediaVariant {
    /// Tag stored in the `media_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaVariant::Anime => "anime",
            MediaVariant::Manga => "manga",
        }
    }
}

impl FromStr for MediaVariant {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anime" => Ok(MediaVariant::Anime),
            "manga" => Ok(MediaVariant::Manga),
            _ => Err(LibraryError::InvalidVariant(s.to_string())),
        }
    }
}

impl fmt::Display for MediaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaVariant::Anime => write!(f, "Anime"),
            MediaVariant::Manga => write!(f, "Manga"),
        }
    }
}

// ============================================================================
// ENTRY STATUS
// ============================================================================

/// Where a user is with a title. New entries always start as `Completed`;
/// after that any status can move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryStatus {
    #[default]
    Completed,
    Reading,
    Dropped,
    Planned,
}

impl EntryStatus {
    pub const ALL: [EntryStatus; 4] = [
        EntryStatus::Completed,
        EntryStatus::Reading,
        EntryStatus::Dropped,
        EntryStatus::Planned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Completed => "completed",
            EntryStatus::Reading => "reading",
            EntryStatus::Dropped => "dropped",
            EntryStatus::Planned => "planned",
        }
    }
}

impl FromStr for EntryStatus {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        EntryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| LibraryError::InvalidStatus(s.to_string()))
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// RATING
// ============================================================================

/// A score between 0 and 10 inclusive.
///
/// The only way to get one is `Rating::new`, so anything holding a `Rating`
/// can hand it straight to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 0;
    pub const MAX: i64 = 10;

    pub fn new(value: i64) -> Result<Self, LibraryError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(LibraryError::InvalidRating(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

// ============================================================================
// BADGES
// ============================================================================

/// Display-only badge derived from how many manga entries a user has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BadgeTier {
    None,
    Beginner,
    Reader,
    Veteran,
    Legend,
}

impl BadgeTier {
    /// Thresholds are inclusive lower bounds, checked from the top down.
    pub fn for_manga_count(count: u64) -> Self {
        match count {
            100.. => BadgeTier::Legend,
            51.. => BadgeTier::Veteran,
            11.. => BadgeTier::Reader,
            1.. => BadgeTier::Beginner,
            0 => BadgeTier::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BadgeTier::None => "None",
            BadgeTier::Beginner => "Beginner",
            BadgeTier::Reader => "Reader",
            BadgeTier::Veteran => "Veteran",
            BadgeTier::Legend => "Legend",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            BadgeTier::None => "❌",
            BadgeTier::Beginner => "📘",
            BadgeTier::Reader => "📚",
            BadgeTier::Veteran => "🏆",
            BadgeTier::Legend => "👑",
        }
    }

    /// Text shown on the profile card.
    pub fn display_text(&self) -> String {
        match self {
            BadgeTier::None => format!("{} No manga yet", self.emoji()),
            _ => format!("{} {}", self.emoji(), self.label()),
        }
    }
}

// ============================================================================
// RECORDS
// ============================================================================

/// The chat identity of whoever issued a command (or was looked up).
#[derive(Debug, Clone)]
pub struct Member {
    pub external_id: u64,
    pub display_name: String,
}

impl Member {
    pub fn new(external_id: u64, display_name: impl Into<String>) -> Self {
        Self {
            external_id,
            display_name: display_name.into(),
        }
    }
}

/// What `add` produced: the ids of every row it touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedEntry {
    pub user_id: i64,
    pub media_id: i64,
    pub entry_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    pub display_name: String,
    pub count: u64,
}

/// Ranked rows for one media type, highest count first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaderboard {
    pub variant: MediaVariant,
    pub rows: Vec<LeaderboardRow>,
}

/// Raw numbers behind a profile, read in one go from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub anime_count: u64,
    pub manga_count: u64,
    /// Anime titles with status `reading`, in the order they were added.
    pub watching: Vec<String>,
    /// Manga titles with status `reading`, in the order they were added.
    pub reading: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub anime_count: u64,
    pub manga_count: u64,
    pub badge: BadgeTier,
    pub watching: Vec<String>,
    pub reading: Vec<String>,
}

impl From<ProfileSnapshot> for Profile {
    fn from(snapshot: ProfileSnapshot) -> Self {
        Self {
            badge: BadgeTier::for_manga_count(snapshot.manga_count),
            anime_count: snapshot.anime_count,
            manga_count: snapshot.manga_count,
            watching: snapshot.watching,
            reading: snapshot.reading,
        }
    }
}
