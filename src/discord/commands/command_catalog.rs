// Discord commands module.
// Each feature gets its own command file.

pub mod library;

pub mod help;

// Bot presence management
pub mod presence;
