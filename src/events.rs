//! Lifecycle event handlers.
//!
//! Each handler only logs. Failures are funneled through [dispatch] into
//! [report_uncaught], the single error sink for events.

use async_trait::async_trait;
use serenity::client::Context;
use serenity::client::EventHandler;
use serenity::gateway::ConnectionStage;
use serenity::gateway::ShardStageUpdateEvent;
use serenity::model::gateway::Ready;
use serenity::model::guild::Guild;
use serenity::model::guild::UnavailableGuild;
use serenity::model::id::GuildId;
use serenity::model::id::UserId;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::log::report_uncaught;
use crate::BotError;

/// Client library and version, as sent to Discord.
const LIBRARY_VERSION: &str = serenity::constants::USER_AGENT;

/// Hooks the lifecycle handlers into the client.
pub struct Lifecycle;

#[async_trait]
impl EventHandler for Lifecycle {
    async fn ready(&self, _ctx: Context, data_about_bot: Ready) {
        let user = &data_about_bot.user;
        dispatch("ready", on_ready(&user.name, user.id));
    }

    async fn shard_stage_update(&self, _ctx: Context, event: ShardStageUpdateEvent) {
        let shard = event.shard_id.0;
        match event.new {
            ConnectionStage::Connected => dispatch("connect", on_connect(shard)),
            ConnectionStage::Disconnected => dispatch("disconnect", on_disconnect(shard)),
            _ => {}
        }
    }

    async fn guild_delete(
        &self,
        _ctx: Context,
        incomplete: UnavailableGuild,
        full: Option<Guild>,
    ) {
        let name = full.as_ref().map(|g| g.name.as_str());
        dispatch(
            "guild_remove",
            on_guild_remove(incomplete.id, incomplete.unavailable, name),
        );
    }
}

/// Sends the failure of an event handler to [report_uncaught].
pub fn dispatch(event: &str, outcome: Result<(), BotError>) {
    if let Err(error) = outcome {
        report_uncaught(event, Some(&error));
    }
}

pub fn on_connect(shard: u32) -> Result<(), BotError> {
    info!(shard, "Connection to Discord established");
    Ok(())
}

pub fn on_ready(name: &str, id: UserId) -> Result<(), BotError> {
    info!("Logged in as: {name} - {id}\tLibrary: {LIBRARY_VERSION}");
    info!("Successfully logged in and booted...!");
    Ok(())
}

pub fn on_disconnect(shard: u32) -> Result<(), BotError> {
    warn!(shard, "Connection lost");
    Ok(())
}

/// Logs leaving a guild. Outages also delete guilds, those are not removals.
pub fn on_guild_remove(id: GuildId, unavailable: bool, name: Option<&str>) -> Result<(), BotError> {
    if unavailable {
        debug!("Guild {id} became unavailable");
        return Ok(());
    }

    match name {
        Some(name) => info!("Left guild {name}"),
        None => info!("Left guild {id}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;
    use crate::error::DatabaseError;
    use crate::log::capture::capture;
    use crate::log::CRITICAL;

    #[test]
    fn connect_and_disconnect() {
        let (logs, _guard) = capture();

        on_connect(0).unwrap();
        on_disconnect(0).unwrap();

        let events = logs.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].level, Level::INFO);
        assert_eq!(events[0].message, "Connection to Discord established");
        assert_eq!(events[1].level, Level::WARN);
        assert_eq!(events[1].message, "Connection lost");
    }

    #[test]
    fn ready_logs_identity_and_version() {
        let (logs, _guard) = capture();

        on_ready("guild-bot", UserId::new(1234)).unwrap();

        let info = logs.at(Level::INFO);
        assert_eq!(info.len(), 2);
        assert!(info[0].message.contains("guild-bot - 1234"));
        assert!(info[0].message.contains(LIBRARY_VERSION));
    }

    #[test]
    fn guild_remove_uses_name_or_id() {
        let (logs, _guard) = capture();

        on_guild_remove(GuildId::new(5), false, Some("Rustaceans")).unwrap();
        on_guild_remove(GuildId::new(6), false, None).unwrap();

        let info = logs.at(Level::INFO);
        assert_eq!(info[0].message, "Left guild Rustaceans");
        assert_eq!(info[1].message, "Left guild 6");
    }

    #[test]
    fn outage_is_not_a_removal() {
        let (logs, _guard) = capture();

        on_guild_remove(GuildId::new(5), true, Some("Rustaceans")).unwrap();

        assert!(logs.at(Level::INFO).is_empty());
        assert_eq!(logs.at(Level::DEBUG).len(), 1);
    }

    #[test]
    fn failed_handler_reaches_sink() {
        let (logs, _guard) = capture();

        dispatch("guild_remove", Err(DatabaseError::NoGuild.into()));
        dispatch("ready", Ok(()));

        let errors = logs.at(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field("severity"), Some(CRITICAL));
        assert!(errors[0].message.contains("'guild_remove'"));
        assert!(errors[0].message.contains("NoGuild"));
    }
}
