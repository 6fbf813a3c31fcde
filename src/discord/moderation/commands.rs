// Kick, ban and mute. Each command checks the author, then hands the action to Discord.

use crate::discord::moderation::permissions::{bot_can_act_on, can_moderate};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use tracing::error;

/// How long `!mute` silences a member.
const MUTE_DURATION_SECS: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModerationAction {
    Kick,
    Ban,
    Mute,
}

impl ModerationAction {
    fn verb(self) -> &'static str {
        match self {
            ModerationAction::Kick => "kick",
            ModerationAction::Ban => "ban",
            ModerationAction::Mute => "mute",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            ModerationAction::Kick => "kicked",
            ModerationAction::Ban => "banned",
            ModerationAction::Mute => "muted",
        }
    }

    /// Kicks and bans are refused up front when the bot sits below the target.
    fn checks_hierarchy(self) -> bool {
        matches!(self, ModerationAction::Kick | ModerationAction::Ban)
    }

    fn required_permission(self) -> serenity::Permissions {
        match self {
            ModerationAction::Kick => serenity::Permissions::KICK_MEMBERS,
            ModerationAction::Ban => serenity::Permissions::BAN_MEMBERS,
            ModerationAction::Mute => serenity::Permissions::MODERATE_MEMBERS,
        }
    }
}

/// Kick a user from the server (requires kick permissions).
#[poise::command(prefix_command, slash_command, guild_only, category = "Moderation")]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "The user to kick"] user: Option<serenity::User>,
) -> Result<(), Error> {
    run_action(ctx, ModerationAction::Kick, user).await
}

/// Ban a user from the server (requires ban permissions).
#[poise::command(prefix_command, slash_command, guild_only, category = "Moderation")]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "The user to ban"] user: Option<serenity::User>,
) -> Result<(), Error> {
    run_action(ctx, ModerationAction::Ban, user).await
}

/// Mute a user for 1 minute (requires moderate members permissions).
#[poise::command(prefix_command, slash_command, guild_only, category = "Moderation")]
pub async fn mute(
    ctx: Context<'_>,
    #[description = "The user to mute"] user: Option<serenity::User>,
) -> Result<(), Error> {
    run_action(ctx, ModerationAction::Mute, user).await
}

async fn run_action(
    ctx: Context<'_>,
    action: ModerationAction,
    user: Option<serenity::User>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;

    if !can_moderate(ctx, guild_id, action.required_permission()).await? {
        ctx.say(format!(
            "You do not have permission to {} members.",
            action.verb()
        ))
        .await?;
        return Ok(());
    }

    let Some(user) = user else {
        ctx.say(format!("You need to mention a user to {}.", action.verb()))
            .await?;
        return Ok(());
    };

    if guild_id.member(ctx.http(), user.id).await.is_err() {
        ctx.say("That user is not in this guild.").await?;
        return Ok(());
    }

    if action.checks_hierarchy()
        && !bot_can_act_on(ctx, guild_id, user.id, action.required_permission()).await?
    {
        ctx.say(format!("I cannot {} this user.", action.verb()))
            .await?;
        return Ok(());
    }

    let result = match action {
        ModerationAction::Kick => guild_id.kick(ctx.http(), user.id).await,
        ModerationAction::Ban => guild_id.ban(ctx.http(), user.id, 0).await,
        ModerationAction::Mute => {
            let until = serenity::Timestamp::from_unix_timestamp(
                chrono::Utc::now().timestamp() + MUTE_DURATION_SECS,
            )?;
            let edit = serenity::EditMember::new().disable_communication_until_datetime(until);
            guild_id
                .edit_member(ctx.http(), user.id, edit)
                .await
                .map(|_| ())
        }
    };

    match result {
        Ok(()) => {
            tracing::info!(
                guild_id = guild_id.get(),
                target_id = user.id.get(),
                moderator_id = ctx.author().id.get(),
                action = action.verb(),
                "Moderation action applied"
            );
            ctx.say(format!("Successfully {} {}", action.past_tense(), user.tag()))
                .await?;
        }
        Err(source) => {
            error!(?source, action = action.verb(), "moderation request failed");
            ctx.say(format!(
                "There was an error trying to {} that user.",
                action.verb()
            ))
            .await?;
        }
    }

    Ok(())
}
