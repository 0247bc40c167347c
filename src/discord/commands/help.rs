use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

// Category definitions in display order
const CATEGORY_ORDER: &[&str] = &["Your List", "Stats & Rankings", "Utilities"];

fn get_category_emoji(category: &str) -> &'static str {
    match category {
        "Your List" => "📝",
        "Stats & Rankings" => "📊",
        "Utilities" => "🧰",
        _ => "•",
    }
}

struct CommandMetadata {
    category: &'static str,
    priority: i32,
    usage: &'static str,
    description: Option<&'static str>,
}

fn get_command_metadata(name: &str) -> CommandMetadata {
    match name {
        "add" => CommandMetadata {
            category: "Your List",
            priority: 100,
            usage: "add [anime|manga] <title>",
            description: Some("Add a title to your list."),
        },
        "rate" => CommandMetadata {
            category: "Your List",
            priority: 90,
            usage: "rate [anime|manga] <title> <rating>",
            description: Some("Rate something 0–10."),
        },
        "status" => CommandMetadata {
            category: "Your List",
            priority: 80,
            usage: "status [anime|manga] <title> <status>",
            description: Some("Update status (reading, dropped, planned, completed)."),
        },
        "profile" => CommandMetadata {
            category: "Stats & Rankings",
            priority: 70,
            usage: "profile [@user]",
            description: Some("Show your profile (with badges)."),
        },
        "leaderboard" => CommandMetadata {
            category: "Stats & Rankings",
            priority: 60,
            usage: "leaderboard [anime|manga]",
            description: Some("Show top readers/watchers."),
        },
        "help" => CommandMetadata {
            category: "Utilities",
            priority: 0,
            usage: "help",
            description: Some("Show this help menu."),
        },
        _ => CommandMetadata {
            category: "Utilities",
            priority: 0,
            usage: "",
            description: None,
        },
    }
}

/// Show every command and how to use it.
#[poise::command(slash_command, prefix_command, aliases("helpme"))]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let prefix = ctx.prefix();
    let mut categories: Vec<(&str, Vec<(i32, String)>)> = CATEGORY_ORDER
        .iter()
        .map(|category| (*category, Vec::new()))
        .collect();

    for command in &ctx.framework().options().commands {
        if command.hide_in_help {
            continue;
        }

        let metadata = get_command_metadata(&command.name);
        let usage = if metadata.usage.is_empty() {
            command.name.as_str()
        } else {
            metadata.usage
        };
        let description = metadata
            .description
            .or(command.description.as_deref())
            .unwrap_or("No description provided.");

        let entry = format_entry(prefix, usage, description);
        if let Some((_, entries)) = categories
            .iter_mut()
            .find(|(category, _)| *category == metadata.category)
        {
            entries.push((metadata.priority, entry));
        }
    }

    let mut embed = serenity::CreateEmbed::new()
        .title("📖 Anime/Manga Bot Commands")
        .description(
            "Works with slash commands or the text prefix. \
            Quote titles that contain spaces for `rate` and `status`.",
        )
        .color(0x7289DA);

    for (category, mut entries) in categories {
        if entries.is_empty() {
            continue;
        }
        // Sort by priority (descending), then text (ascending)
        entries.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        let text: Vec<String> = entries.into_iter().map(|(_, s)| s).collect();
        embed = embed.field(
            format!("{} {}", get_category_emoji(category), category),
            text.join("\n"),
            false,
        );
    }

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

fn format_entry(prefix: &str, usage: &str, description: &str) -> String {
    format!("• **{}{}** — {}", prefix, usage, description)
}
