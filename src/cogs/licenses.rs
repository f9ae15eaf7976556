//! Implements the `licenses` command.

use tracing::instrument;

use super::Extensions;
use crate::error::ExtensionError;
use crate::BotError;
use crate::Context;

/// Shows the license this bot is distributed under.
#[instrument(skip(ctx))]
#[poise::command(prefix_command)]
pub async fn licenses(ctx: Context<'_>) -> Result<(), BotError> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    let license = env!("CARGO_PKG_LICENSE");

    ctx.say(format!("{name} v{version} is licensed under {license}."))
        .await?;
    Ok(())
}

pub(super) fn load(extensions: &mut Extensions) -> Result<(), ExtensionError> {
    extensions.add_commands(vec![licenses()])
}
