// Library infrastructure - SQLite storage implementation
//
// Each component is a set of free functions over a single connection so a
// command can run several of them inside one transaction.

mod catalog;
mod identity;
mod ledger;
mod queries;
mod schema;
mod sqlite_library_store;

pub use sqlite_library_store::SqliteLibraryStore;
