use crate::core::leveling::{LevelUpEvent, DAILY_BONUS_XP};
use crate::discord::embeds::{branded_embed, COLOR_INFO, COLOR_SUCCESS};
use poise::serenity_prelude::{self as serenity, builder::CreateMessage};
use rand::seq::SliceRandom;

/// Announce a level-up in the channel the triggering message was sent to.
pub async fn send_level_up_embed(
    ctx: &serenity::Context,
    message: &serenity::Message,
    level_up: &LevelUpEvent,
) -> Result<(), serenity::Error> {
    let embed = branded_embed(COLOR_SUCCESS)
        .title("🎉 Level Up!")
        .description(format!(
            "Congratulations {}, you've leveled up to level {}!\n*{}*",
            message.author.name,
            level_up.new_level,
            random_flavor_line()
        ));

    message
        .channel_id
        .send_message(ctx, CreateMessage::new().embed(embed))
        .await
        .map(|_| ())
}

pub async fn send_daily_bonus_embed(
    ctx: &serenity::Context,
    message: &serenity::Message,
) -> Result<(), serenity::Error> {
    let embed = branded_embed(COLOR_INFO)
        .title("🎁 Daily Bonus!")
        .description(format!(
            "You've received {} XP as your daily bonus!",
            DAILY_BONUS_XP
        ));

    message
        .channel_id
        .send_message(ctx, CreateMessage::new().embed(embed))
        .await
        .map(|_| ())
}

fn random_flavor_line() -> &'static str {
    const FLAVOR_LINES: [&str; 4] = [
        "Juicy progress.",
        "Fresh squeezed XP, straight to the bar.",
        "The server noticed.",
        "One step closer to the top of !leaderboard.",
    ];

    FLAVOR_LINES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FLAVOR_LINES[0])
}
