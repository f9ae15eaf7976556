//! Builds the client and wires everything into it.

mod config;
mod framework;

use std::sync::Arc;

use crate::cogs;
use crate::database::PrefixStore;
use crate::events::Lifecycle;
use crate::serenity;
use crate::BotError;
use crate::Data;

pub use config::Config;

/// Constructs a [serenity::Client] with the startup extensions loaded.
pub(super) async fn client(
    config: Config,
    prefixes: Arc<dyn PrefixStore>,
) -> Result<serenity::Client, BotError> {
    // Get discord token from config file
    let token = config.token()?;

    // Prefix commands need to read messages.
    // See https://discord.com/developers/docs/topics/gateway#gateway-intents
    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let (commands, extensions, command_error_replies) =
        cogs::load_extensions(cogs::STARTUP_EXTENSIONS).into_parts();

    let data = Data {
        prefixes,
        default_prefix: config.default_prefix().to_string(),
        description: config.description().to_string(),
        extensions,
        command_error_replies,
    };

    let client = serenity::ClientBuilder::new(token, intents)
        .framework(framework::framework(commands, data))
        .event_handler(Lifecycle)
        .await?;

    Ok(client)
}
