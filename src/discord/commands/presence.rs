// This module handles bot presence.
//
// Discord-layer glue only: we work with Discord SDK types (Context,
// ActivityData, OnlineStatus) and keep the logic short.

use crate::discord::commands::COMMAND_PREFIX;
use poise::serenity_prelude as serenity;

/// Point people at the help command once the bot is ready.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching(format!("{}help", COMMAND_PREFIX));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
