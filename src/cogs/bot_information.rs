//! Implements the `about` command.

use tracing::instrument;

use super::Extensions;
use crate::error::ExtensionError;
use crate::BotError;
use crate::Context;

/// Tells you about this bot.
#[instrument(skip(ctx))]
#[poise::command(prefix_command)]
pub async fn about(ctx: Context<'_>) -> Result<(), BotError> {
    let data = ctx.data();
    let version = env!("CARGO_PKG_VERSION");
    let extensions = data.extensions.join(", ");

    ctx.say(format!(
        "{}\nVersion: {version}\nExtensions: {extensions}",
        data.description
    ))
    .await?;
    Ok(())
}

pub(super) fn load(extensions: &mut Extensions) -> Result<(), ExtensionError> {
    extensions.add_commands(vec![about()])
}
