// Per-guild configuration commands.

use crate::discord::moderation::permissions::has_permission;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Set the welcome channel (requires manage channels permissions).
#[poise::command(prefix_command, slash_command, guild_only, category = "Configuration")]
pub async fn setwelcome(
    ctx: Context<'_>,
    #[description = "Channel that greets new members"] channel: Option<serenity::GuildChannel>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;

    if !has_permission(ctx, guild_id, serenity::Permissions::MANAGE_CHANNELS).await? {
        ctx.say("You do not have permission to set the welcome channel.")
            .await?;
        return Ok(());
    }

    let Some(channel) = channel else {
        ctx.say("You need to mention a channel to set as the welcome channel.")
            .await?;
        return Ok(());
    };

    ctx.data()
        .guild_settings
        .set_welcome_channel(guild_id.get(), channel.id.get())
        .await?;

    tracing::info!(
        guild_id = guild_id.get(),
        channel_id = channel.id.get(),
        "Welcome channel configured"
    );
    ctx.say(format!("Welcome channel set to {}", channel.name))
        .await?;

    Ok(())
}

/// Set the moderator role (requires manage roles permissions).
#[poise::command(prefix_command, slash_command, guild_only, category = "Configuration")]
pub async fn setmodrole(
    ctx: Context<'_>,
    #[description = "Role allowed to use moderation commands"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("This command only works in servers")?;

    if !has_permission(ctx, guild_id, serenity::Permissions::MANAGE_ROLES).await? {
        ctx.say("You do not have permission to set the moderator role.")
            .await?;
        return Ok(());
    }

    let Some(role) = role else {
        ctx.say("You need to mention a role to set as the moderator role.")
            .await?;
        return Ok(());
    };

    ctx.data()
        .guild_settings
        .set_moderator_role(guild_id.get(), role.id.get())
        .await?;

    tracing::info!(
        guild_id = guild_id.get(),
        role_id = role.id.get(),
        "Moderator role configured"
    );
    ctx.say(format!("Moderator role set to {}", role.name)).await?;

    Ok(())
}
