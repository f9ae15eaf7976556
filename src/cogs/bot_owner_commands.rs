//! Commands only the owners of the bot can use.

use tracing::instrument;

use super::Extensions;
use crate::error::ExtensionError;
use crate::BotError;
use crate::Context;

/// Disconnect every shard and stop the bot.
#[instrument(skip(ctx))]
#[poise::command(prefix_command, owners_only)]
pub async fn shutdown(ctx: Context<'_>) -> Result<(), BotError> {
    let user = &ctx.author().name;
    tracing::warn!("Shutdown requested by {user}.");

    ctx.say("Shutting down.").await?;
    ctx.framework().shard_manager().shutdown_all().await;
    Ok(())
}

pub(super) fn load(extensions: &mut Extensions) -> Result<(), ExtensionError> {
    extensions.add_commands(vec![shutdown()])
}
