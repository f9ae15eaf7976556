//! Per-guild command prefixes.

use poise::BoxFuture;
use poise::PartialContext;

use crate::database::PrefixStore;
use crate::error::DatabaseError;
use crate::serenity::GuildId;
use crate::BotError;
use crate::Data;

/// Returns the prefix to use for a message sent in `guild`.
///
/// Any failure (including a message without a guild, e.g. a direct message)
/// is logged once and `default` is used instead. Never fails.
pub async fn resolve_prefix(
    store: &dyn PrefixStore,
    guild: Option<GuildId>,
    default: &str,
) -> String {
    // TODO: cache prefixes per guild, this hits the database for every message.
    let lookup = match guild {
        Some(guild) => store.guild_prefix(guild).await,
        None => Err(DatabaseError::NoGuild),
    };

    match lookup {
        Ok(prefix) => prefix,
        Err(error) => {
            let guild = guild.map_or("<none>".to_string(), |g| g.to_string());
            tracing::error!(
                "Can't get guild {guild} prefix. Error: {error}. Using '{default}' as prefix."
            );
            default.to_string()
        }
    }
}

/// Prefix hook for [poise::PrefixFrameworkOptions::dynamic_prefix].
pub fn dynamic_prefix(
    ctx: PartialContext<'_, Data, BotError>,
) -> BoxFuture<'_, Result<Option<String>, BotError>> {
    Box::pin(async move {
        let data = ctx.data;
        let prefix =
            resolve_prefix(data.prefixes.as_ref(), ctx.guild_id, &data.default_prefix).await;
        Ok(Some(prefix))
    })
}
