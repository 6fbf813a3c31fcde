pub mod guild_settings_models;
pub mod guild_settings_service;
pub mod guild_settings_store;

pub use guild_settings_models::GuildSettings;
pub use guild_settings_service::{GuildSettingsError, GuildSettingsService};
pub use guild_settings_store::GuildSettingsStore;
