// Discord commands for the leveling system.
//
// **Notice the pattern:**
// 1. Extract primitive data from Discord types
// 2. Call core service
// 3. Format the response based on the result
//
// This layer is THIN - no business logic, just translation.

use crate::core::guild_settings::GuildSettingsService;
use crate::core::leveling::{
    LeaderboardEntry, LevelingService, ResetOutcome, DEFAULT_LEADERBOARD_LIMIT,
};
use crate::discord::embeds::{branded_embed, build_progress_bar, COLOR_INFO};
use crate::discord::moderation::permissions::can_moderate;
use crate::infra::guild_settings::InMemoryGuildSettingsStore;
use crate::infra::leveling::JsonProgressionStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Instant;

/// Check your current level and XP.
#[poise::command(prefix_command, slash_command, guild_only, category = "Leveling")]
pub async fn level(
    ctx: Context<'_>,
    #[description = "User to check (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target_user = user.as_ref().unwrap_or_else(|| ctx.author());
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let Some(status) = ctx
        .data()
        .leveling
        .status(guild_id, target_user.id.get())
        .await
    else {
        ctx.say(no_xp_message(ctx.author(), target_user)).await?;
        return Ok(());
    };

    let progress = status.xp as f64 / status.required_xp.max(1) as f64;
    let embed = branded_embed(COLOR_INFO)
        .title(format!("{}'s Level", target_user.name))
        .thumbnail(target_user.face())
        .field("Level", status.level.to_string(), true)
        .field("XP", format!("{}/{}", status.xp, status.required_xp), true)
        .field("Progress", build_progress_bar(progress, 15), false);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Display the top 10 users by XP.
#[poise::command(prefix_command, slash_command, guild_only, category = "Information")]
pub async fn leaderboard(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or("This command only works in servers")?
        .get();

    let entries = ctx
        .data()
        .leveling
        .leaderboard(guild_id, DEFAULT_LEADERBOARD_LIMIT)
        .await;

    if entries.is_empty() {
        ctx.say("No users have earned XP yet!").await?;
        return Ok(());
    }

    let mut description = String::new();
    for (index, entry) in entries.iter().enumerate() {
        let rank = index + 1;
        let user_name = resolve_user_name(ctx, entry.user_id).await;
        description.push_str(&leaderboard_line(rank, &user_name, entry));
        description.push('\n');
    }

    let embed = branded_embed(COLOR_INFO)
        .title("🏆 Leaderboard")
        .description(description);

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Reset your XP to 0 (requires manage messages permissions).
#[poise::command(prefix_command, slash_command, guild_only, category = "Utility")]
pub async fn resetxp(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;

    if !can_moderate(ctx, guild_id, serenity::Permissions::MANAGE_MESSAGES).await? {
        ctx.say("You do not have permission to reset XP.").await?;
        return Ok(());
    }

    let author = ctx.author();
    match ctx
        .data()
        .leveling
        .reset(guild_id.get(), author.id.get())
        .await
    {
        ResetOutcome::Reset => {
            tracing::info!(
                guild_id = guild_id.get(),
                user_id = author.id.get(),
                "Progression reset"
            );
            ctx.say(format!("{}, your XP has been reset.", author.name))
                .await?;
        }
        ResetOutcome::NotFound => {
            ctx.say(no_xp_message(author, author)).await?;
        }
    }

    Ok(())
}

fn leaderboard_line(rank: usize, user_name: &str, entry: &LeaderboardEntry) -> String {
    format!(
        "{}. {} - Level {}, XP: {}",
        rank, user_name, entry.level, entry.xp
    )
}

fn no_xp_message(author: &serenity::User, target: &serenity::User) -> String {
    if author.id == target.id {
        format!("{}, you haven't earned any XP yet!", author.name)
    } else {
        format!("{} hasn't earned any XP yet!", target.name)
    }
}

/// Cache first, then the API. Users who left Discord fall back to a mention.
async fn resolve_user_name(ctx: Context<'_>, user_id: u64) -> String {
    let id = serenity::UserId::new(user_id);

    let cached = ctx.cache().user(id).map(|user| user.name.clone());
    if let Some(name) = cached {
        return name;
    }

    match id.to_user(ctx.serenity_context()).await {
        Ok(user) => user.name,
        Err(e) => {
            tracing::debug!(user_id, "Could not resolve leaderboard user: {}", e);
            format!("<@{}>", user_id)
        }
    }
}

/// Type alias for our bot's context.
/// This is what every command receives as its first parameter.
pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
/// This is where we store our services.
pub struct Data {
    pub leveling: Arc<LevelingService<JsonProgressionStore>>,
    pub guild_settings: Arc<GuildSettingsService<InMemoryGuildSettingsStore>>,
    /// When the process started, for `!uptime` and `!info`.
    pub started_at: Instant,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaderboard_line_has_rank_name_level_and_xp() {
        let entry = LeaderboardEntry {
            user_id: 7,
            level: 4,
            xp: 12,
        };

        assert_eq!(
            leaderboard_line(1, "orange", &entry),
            "1. orange - Level 4, XP: 12"
        );
        assert_eq!(
            leaderboard_line(10, "<@7>", &entry),
            "10. <@7> - Level 4, XP: 12"
        );
    }
}
