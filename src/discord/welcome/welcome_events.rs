use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

/// Greet a new member in the guild's welcome channel, if one is configured.
pub async fn handle_member_join(
    ctx: &serenity::Context,
    data: &Data,
    new_member: &serenity::Member,
) -> Result<(), Error> {
    let Some(channel_id) = data
        .guild_settings
        .welcome_channel(new_member.guild_id.get())
        .await?
    else {
        return Ok(());
    };

    serenity::ChannelId::new(channel_id)
        .say(&ctx.http, welcome_message(&new_member.user.name))
        .await?;

    Ok(())
}

fn welcome_message(user_name: &str) -> String {
    format!("Welcome to the server, {}!", user_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welcome_message_names_the_member() {
        assert_eq!(welcome_message("orange"), "Welcome to the server, orange!");
    }
}
