// Discord layer - commands and event handlers.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "embeds.rs"]
pub mod embeds;

#[path = "leveling/leveling_announcements.rs"]
pub mod leveling_announcements;

#[path = "moderation/mod.rs"]
pub mod moderation;

#[path = "welcome/welcome_events.rs"]
pub mod welcome;

// Re-export command types for convenience
pub use commands::leveling::{Context, Data, Error};
