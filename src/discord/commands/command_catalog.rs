// Discord commands module.
// Each feature gets its own command file.

use crate::discord::{Data, Error};

pub mod leveling;

pub mod settings;

pub mod info;

pub mod help;

// Bot presence management
pub mod presence;

/// Every command starts with this prefix; such messages never earn XP.
pub const COMMAND_PREFIX: &str = "!";

/// All commands the framework registers, in the order `!help` lists them.
pub fn all_commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        leveling::level(),
        leveling::leaderboard(),
        leveling::resetxp(),
        crate::discord::moderation::commands::kick(),
        crate::discord::moderation::commands::ban(),
        crate::discord::moderation::commands::mute(),
        settings::setwelcome(),
        settings::setmodrole(),
        help::help(),
        info::info(),
        info::uptime(),
        info::ping(),
        info::servercount(),
        info::usercount(),
    ]
}
