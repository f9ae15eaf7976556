//! Implements the `prefix` command.

use tracing::instrument;

use super::Extensions;
use crate::error::ExtensionError;
use crate::BotError;
use crate::Context;

/// Show the command prefix used in this server.
#[instrument(skip(ctx))]
#[poise::command(prefix_command, guild_only)]
pub async fn prefix(ctx: Context<'_>) -> Result<(), BotError> {
    // Prefix commands are invoked with the resolved prefix.
    let prefix = ctx.prefix();
    ctx.say(format!("The prefix in this server is `{prefix}`"))
        .await?;
    Ok(())
}

pub(super) fn load(extensions: &mut Extensions) -> Result<(), ExtensionError> {
    extensions.add_commands(vec![prefix()])
}
