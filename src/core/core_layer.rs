// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "leveling/mod.rs"]
pub mod leveling;

#[path = "guild_settings/mod.rs"]
pub mod guild_settings;

#[path = "uptime/uptime_format.rs"]
pub mod uptime;
