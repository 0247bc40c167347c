// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "library/mod.rs"]
pub mod library;
