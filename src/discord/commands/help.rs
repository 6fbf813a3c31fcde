use crate::discord::commands::COMMAND_PREFIX;
use crate::discord::embeds::{branded_embed, COLOR_INFO};
use crate::discord::{Context, Data, Error};

// Category definitions with emojis and order
const CATEGORY_ORDER: &[(&str, &str)] = &[
    ("Leveling", "📊"),
    ("Moderation", "🛡️"),
    ("Configuration", "⚙️"),
    ("Information", "📈"),
    ("Utility", "🛠️"),
];

fn argument_hint(name: &str) -> &'static str {
    match name {
        "kick" | "ban" | "mute" => " <user>",
        "setwelcome" => " <channel>",
        "setmodrole" => " <role>",
        _ => "",
    }
}

/// One embed field per category, built from the registered commands so the
/// list can't drift from what the bot actually answers to.
fn help_sections(commands: &[poise::Command<Data, Error>]) -> Vec<(String, String)> {
    CATEGORY_ORDER
        .iter()
        .filter_map(|(category, emoji)| {
            let lines: Vec<String> = commands
                .iter()
                .filter(|command| command.category.as_deref() == Some(*category))
                .map(|command| {
                    format!(
                        "`{}{}{}` - {}",
                        COMMAND_PREFIX,
                        command.name,
                        argument_hint(&command.name),
                        command.description.as_deref().unwrap_or("No description.")
                    )
                })
                .collect();

            if lines.is_empty() {
                None
            } else {
                Some((format!("{} {}", emoji, category), lines.join("\n")))
            }
        })
        .collect()
}

/// Show all available commands.
#[poise::command(prefix_command, slash_command, category = "Information")]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let sections = help_sections(&ctx.framework().options().commands);

    let mut embed = branded_embed(COLOR_INFO)
        .title("orangeBOT Commands")
        .description("Here are the available commands:");
    for (name, value) in sections {
        embed = embed.field(name, value, false);
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;
    Ok(())
}
