// Discord commands for the anime/manga library.
//
// Same shape as every other command file:
// 1. Extract primitive data from Discord types
// 2. Call core service
// 3. Format the response
//
// Input mistakes (bad media type, unknown title, bad rating or status) are
// answered right here. Anything else bubbles up to the framework's error hook.

use crate::core::library::{Leaderboard, LibraryError, LibraryService, Member, Profile};
use crate::infra::library::SqliteLibraryStore;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
/// Type alias for our bot's context.
/// This is what every command receives as its first parameter.
pub type Context<'a> = poise::Context<'a, Data, Error>;

/// Data that's shared across all commands.
pub struct Data {
    pub library: Arc<LibraryService<SqliteLibraryStore>>,
}

/// Add an anime or manga to your list
#[poise::command(slash_command, prefix_command)]
pub async fn add(
    ctx: Context<'_>,
    #[description = "anime or manga"] media_type: String,
    #[description = "Title to add"]
    #[rest]
    title: String,
) -> Result<(), Error> {
    let member = caller(ctx).await;

    if let Err(err) = ctx
        .data()
        .library
        .add_title(&member, &media_type, &title)
        .await
    {
        return reply_with_error(ctx, err).await;
    }

    ctx.say(format!(
        "✅ Added {} to your {} list!",
        title,
        media_type.trim().to_lowercase()
    ))
    .await?;
    Ok(())
}

/// Rate an anime or manga from 0 to 10
#[poise::command(slash_command, prefix_command)]
pub async fn rate(
    ctx: Context<'_>,
    #[description = "anime or manga"] media_type: String,
    #[description = "Title to rate (quote it if it has spaces)"] title: String,
    #[description = "Your rating, 0-10"] rating: i64,
) -> Result<(), Error> {
    let member = caller(ctx).await;

    let updated = match ctx
        .data()
        .library
        .rate_title(&member, &media_type, &title, rating)
        .await
    {
        Ok(updated) => updated,
        Err(err) => return reply_with_error(ctx, err).await,
    };

    if updated == 0 {
        ctx.say(not_in_list_message(&title)).await?;
    } else {
        ctx.say(format!("⭐ You rated {} a {}/10!", title, rating))
            .await?;
    }
    Ok(())
}

/// Update the status of an anime or manga (completed, reading, dropped, planned)
#[poise::command(slash_command, prefix_command)]
pub async fn status(
    ctx: Context<'_>,
    #[description = "anime or manga"] media_type: String,
    #[description = "Title to update (quote it if it has spaces)"] title: String,
    #[description = "completed, reading, dropped or planned"] new_status: String,
) -> Result<(), Error> {
    let member = caller(ctx).await;

    let updated = match ctx
        .data()
        .library
        .update_status(&member, &media_type, &title, &new_status)
        .await
    {
        Ok(updated) => updated,
        Err(err) => return reply_with_error(ctx, err).await,
    };

    if updated == 0 {
        ctx.say(not_in_list_message(&title)).await?;
    } else {
        ctx.say(format!(
            "📌 Status for {} updated to **{}**.",
            title,
            new_status.trim().to_lowercase()
        ))
        .await?;
    }
    Ok(())
}

/// Show a profile with counts, badge and what's in progress
#[poise::command(slash_command, prefix_command)]
pub async fn profile(
    ctx: Context<'_>,
    #[description = "User to check (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target_user = user.as_ref().unwrap_or_else(|| ctx.author());

    if target_user.bot {
        ctx.say("Bots don't keep a watch list! 🤖").await?;
        return Ok(());
    }

    let member = resolve_member(ctx, target_user).await;
    let profile = ctx.data().library.profile(&member).await?;

    let embed = profile_embed(&member.display_name, &profile).thumbnail(target_user.face());
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Show the top 10 watchers or readers
#[poise::command(slash_command, prefix_command)]
pub async fn leaderboard(
    ctx: Context<'_>,
    #[description = "anime or manga"] media_type: String,
) -> Result<(), Error> {
    let board = match ctx.data().library.leaderboard(&media_type).await {
        Ok(board) => board,
        Err(err) => return reply_with_error(ctx, err).await,
    };

    ctx.say(format_leaderboard(&board)).await?;
    Ok(())
}

/// Answer user mistakes inline; hand everything else to the error hook.
async fn reply_with_error(ctx: Context<'_>, err: LibraryError) -> Result<(), Error> {
    if err.is_user_error() {
        ctx.say(format!("❌ {}", err)).await?;
        Ok(())
    } else {
        Err(err.into())
    }
}

fn not_in_list_message(title: &str) -> String {
    format!(
        "🤔 {} is in the database but not on your list. Use `add` first.",
        title
    )
}

/// The command author as a library member.
async fn caller(ctx: Context<'_>) -> Member {
    resolve_member(ctx, ctx.author()).await
}

/// Build a `Member`, preferring the server nickname when we're in a guild.
async fn resolve_member(ctx: Context<'_>, user: &serenity::User) -> Member {
    let display_name = match ctx.guild_id() {
        Some(guild_id) => guild_id
            .member(ctx.serenity_context(), user.id)
            .await
            .map(|member| member.display_name().to_string())
            .unwrap_or_else(|_| user.display_name().to_string()),
        None => user.display_name().to_string(),
    };

    Member::new(user.id.get(), display_name)
}

fn profile_embed(display_name: &str, profile: &Profile) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::new()
        .title(format!("{}'s Profile", display_name))
        .color(0x00ff99)
        .field("📺 Anime Watched", profile.anime_count.to_string(), true)
        .field("📖 Manga Read", profile.manga_count.to_string(), true)
        .field("🏅 Badge", profile.badge.display_text(), false);

    if !profile.watching.is_empty() {
        embed = embed.field("▶️ Currently Watching", profile.watching.join(", "), false);
    }
    if !profile.reading.is_empty() {
        embed = embed.field("📖 Currently Reading", profile.reading.join(", "), false);
    }

    embed
}

fn format_leaderboard(board: &Leaderboard) -> String {
    let heading = format!("📊 **{} Leaderboard** 📊", board.variant);

    if board.rows.is_empty() {
        return format!(
            "{}\nNobody has added any {} yet. Be the first with `add`!",
            heading,
            board.variant.as_str()
        );
    }

    let lines: Vec<String> = board
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| format!("{}. {} — {}", i + 1, row.display_name, row.count))
        .collect();

    format!("{}\n{}", heading, lines.join("\n"))
}
