// Library module - domain logic for tracking anime and manga lists

mod library_models;
mod library_service;

pub use library_models::{
    AddedEntry, EntryStatus, Leaderboard, LeaderboardRow, MediaVariant, Member, Profile,
    ProfileSnapshot, Rating,
};
pub use library_service::{LibraryError, LibraryService, LibraryStore};
