//! A guild administration bot with per-guild command prefixes.

mod cogs;
mod data;
mod database;
mod error;
mod events;
mod log;
mod prefix;
mod setup;

use std::sync::Arc;

use poise::serenity_prelude as serenity;

use crate::database::Database;
pub use crate::data::Data;
pub use crate::error::BotError;
pub use crate::setup::Config;

/// Convenient type alias for [poise::Context].
pub type Context<'a> = poise::Context<'a, Data, BotError>;

#[tokio::main]
async fn main() -> Result<(), BotError> {
    let config = Config::read()?;

    // Flushes file logs when dropped, keep until shutdown.
    let _log_guard = log::install_tracing(&config);

    let database = Database::connect(config.database_url()).await?;
    tracing::info!("Connected to prefix database.");

    let mut client = setup::client(config, Arc::new(database)).await?;
    client.start().await?;

    Ok(())
}
