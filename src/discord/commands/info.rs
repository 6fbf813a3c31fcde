// Informational commands: uptime, ping, counts and the info card.

use crate::core::uptime::format_uptime;
use crate::discord::embeds::{branded_embed, COLOR_INFO};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Display bot information.
#[poise::command(prefix_command, slash_command, category = "Information")]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    let embed = build_info_embed(ctx);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}

pub fn build_info_embed(ctx: Context<'_>) -> serenity::CreateEmbed {
    let cache = ctx.cache();
    branded_embed(COLOR_INFO)
        .title("🤖 orangeBOT Information")
        .field("Version", env!("CARGO_PKG_VERSION"), true)
        .field(
            "Uptime",
            format_uptime(ctx.data().started_at.elapsed()),
            true,
        )
        .field("Servers", cache.guild_count().to_string(), true)
        .field("Users", cache.user_count().to_string(), true)
}

/// Display the bot's uptime.
#[poise::command(prefix_command, slash_command, category = "Information")]
pub async fn uptime(ctx: Context<'_>) -> Result<(), Error> {
    let elapsed = ctx.data().started_at.elapsed();
    ctx.say(format!("Uptime: {}", format_uptime(elapsed))).await?;
    Ok(())
}

/// Display the bot's ping.
#[poise::command(prefix_command, slash_command, category = "Information")]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    // Gateway heartbeat latency; zero until the first heartbeat is acknowledged.
    let latency = ctx.ping().await;
    ctx.say(format!("Pong! Ping: {}ms", latency.as_millis()))
        .await?;
    Ok(())
}

/// Display the number of servers the bot is in.
#[poise::command(prefix_command, slash_command, category = "Information")]
pub async fn servercount(ctx: Context<'_>) -> Result<(), Error> {
    let count = ctx.cache().guild_count();
    ctx.say(format!("I am currently in {} servers.", count))
        .await?;
    Ok(())
}

/// Display the number of users the bot is serving.
#[poise::command(prefix_command, slash_command, category = "Information")]
pub async fn usercount(ctx: Context<'_>) -> Result<(), Error> {
    let count = ctx.cache().user_count();
    ctx.say(format!("I am currently serving {} users.", count))
        .await?;
    Ok(())
}
