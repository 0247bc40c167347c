// This module handles bot presence and lifecycle events.
//
// Discord-layer glue only: we work with SDK types (Context, ActivityData,
// OnlineStatus) and keep the logic short.

use poise::serenity_prelude as serenity;

/// Resets the bot's status to the default message.
pub fn reset_status(ctx: &serenity::Context, prefix: &str) {
    let activity = serenity::ActivityData::watching(format!("anime | {}help", prefix));
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}

/// Called once the bot is ready so the default presence is set in one place.
pub fn on_ready(ctx: &serenity::Context, prefix: &str) {
    reset_status(ctx, prefix);
}
