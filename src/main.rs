// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (files, in-memory maps)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands, event handlers and the periodic snapshot task

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "config/bot_config.rs"]
mod config;
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::config::BotConfig;
use crate::core::guild_settings::GuildSettingsService;
use crate::core::leveling::LevelingService;
use crate::discord::commands::{presence, COMMAND_PREFIX};
use crate::discord::leveling_announcements::{send_daily_bonus_embed, send_level_up_embed};
use crate::discord::{welcome, Data, Error};
use crate::infra::guild_settings::InMemoryGuildSettingsStore;
use crate::infra::leveling::JsonProgressionStore;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Instant;

/// Event handler for non-command Discord events.
/// This is where messages earn XP and new members get greeted.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            // Ignore bot messages (including our own)
            if new_message.author.bot {
                return Ok(());
            }

            // Only guild messages earn XP, and commands never do
            let Some(guild_id) = new_message.guild_id else {
                return Ok(());
            };
            if new_message.content.starts_with(COMMAND_PREFIX) {
                return Ok(());
            }

            // Length in UTF-16 units, matching how snapshots were scored so far
            let message_length = new_message.content.encode_utf16().count();
            let outcome = data
                .leveling
                .process_message(guild_id.get(), new_message.author.id.get(), message_length)
                .await;

            if let Some(level_up) = &outcome.level_up {
                tracing::info!(
                    user_id = level_up.user_id,
                    guild_id = level_up.guild_id,
                    old_level = level_up.old_level,
                    new_level = level_up.new_level,
                    "User leveled up"
                );

                if let Err(err) = send_level_up_embed(ctx, new_message, level_up).await {
                    tracing::warn!("Failed to send level-up embed: {err}");
                }
            }

            if outcome.daily_bonus_awarded {
                if let Err(err) = send_daily_bonus_embed(ctx, new_message).await {
                    tracing::warn!("Failed to send daily bonus embed: {err}");
                }
            }
        }
        serenity::FullEvent::GuildMemberAddition { new_member } => {
            if let Err(e) = welcome::handle_member_join(ctx, data, new_member).await {
                tracing::error!("Error greeting new member: {}", e);
            }
        }

        _ => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    let snapshot_store = JsonProgressionStore::new(&config.data_file);
    let leveling_service =
        Arc::new(LevelingService::load(snapshot_store, config.day_boundary).await);

    let settings_service = Arc::new(GuildSettingsService::new(
        InMemoryGuildSettingsStore::new(),
    ));

    // Create the data structure that will be shared across all commands
    let data = Data {
        leveling: Arc::clone(&leveling_service),
        guild_settings: Arc::clone(&settings_service),
        started_at: Instant::now(),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS; // Required for welcome messages

    let save_interval = config.save_interval;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: discord::commands::all_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(COMMAND_PREFIX.to_string()),
                mention_as_prefix: false,
                ..Default::default()
            },
            // Event handler for messages and other events
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "orangeBOT is online!");

                // Register slash commands globally (can take up to an hour to propagate)
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                presence::on_ready(ctx);

                // Background snapshot writer. The tracker never knows about it.
                let leveling = Arc::clone(&data.leveling);
                tokio::spawn(async move {
                    loop {
                        tokio::time::sleep(save_interval).await;
                        leveling.flush().await;
                    }
                });

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    // Flush once more on Ctrl+C so at most one interval of XP is ever lost
    let shard_manager = client.shard_manager.clone();
    let leveling_on_shutdown = Arc::clone(&leveling_service);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Could not listen for shutdown signal: {}", e);
            return;
        }
        tracing::info!("Shutdown requested, saving progression snapshot");
        leveling_on_shutdown.flush().await;
        shard_manager.shutdown_all().await;
    });

    client.start().await.context("Error running bot")?;

    leveling_service.flush().await;
    Ok(())
}
