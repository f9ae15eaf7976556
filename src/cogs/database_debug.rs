//! Implements the `dbprefix` command.
//!
//! Shows what the prefix database returns for the current guild,
//! without falling back to the default prefix.

use tracing::instrument;

use super::Extensions;
use crate::database::PrefixStore;
use crate::error::ExtensionError;
use crate::error::UserError;
use crate::BotError;
use crate::Context;

/// Show the raw prefix lookup for this server.
#[instrument(skip(ctx))]
#[poise::command(prefix_command, owners_only, guild_only)]
pub async fn dbprefix(ctx: Context<'_>) -> Result<(), BotError> {
    let guild = ctx.guild_id().ok_or(UserError::GuildOnly)?;

    let reply = match ctx.data().prefixes.guild_prefix(guild).await {
        Ok(prefix) => format!("Stored prefix for {guild}: `{prefix}`"),
        Err(error) => format!("Lookup for {guild} failed: {error}"),
    };

    ctx.say(reply).await?;
    Ok(())
}

pub(super) fn load(extensions: &mut Extensions) -> Result<(), ExtensionError> {
    extensions.add_commands(vec![dbprefix()])
}
