//! Error types used throughout the bot.

use std::time::Duration;

use itertools::Itertools;
use thiserror::Error;

use crate::serenity::GuildId;
use crate::serenity::Permissions;

/// Top level error of the bot.
/// Every command and event handler returns this.
#[derive(Error, Debug)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Extension(#[from] ExtensionError),

    #[error(transparent)]
    UserError(#[from] UserError),

    #[error(transparent)]
    Serenity(#[from] serenity::Error),

    #[error("Command panicked: {}", payload.as_deref().unwrap_or("<no payload>"))]
    Panic { payload: Option<String> },

    #[error("Command check failed: {}", reason.as_deref().unwrap_or("no reason given"))]
    CheckFailed { reason: Option<String> },
}

impl BotError {
    /// Short, stable name of the error variant. Used in place of a type name in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BotError::Config(_) => "ConfigError",
            BotError::Database(e) => e.kind(),
            BotError::Extension(e) => e.kind(),
            BotError::UserError(_) => "UserError",
            BotError::Serenity(_) => "SerenityError",
            BotError::Panic { .. } => "Panic",
            BotError::CheckFailed { .. } => "CheckFailed",
        }
    }
}

/// Errors while reading [Config](crate::Config).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing config file. {action_msg}")]
    MissingConfig { action_msg: String },

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Could not access config file: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors from the prefix database.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("No prefix stored for guild {0}.")]
    NoPrefix(GuildId),

    #[error("Not in a guild.")]
    NoGuild,

    #[error("Query failed: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    pub fn kind(&self) -> &'static str {
        match self {
            DatabaseError::NoPrefix(_) => "NoPrefix",
            DatabaseError::NoGuild => "NoGuild",
            DatabaseError::Sqlx(_) => "SqlxError",
        }
    }
}

/// Errors while loading an extension into the bot.
#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("No extension named '{path}'.")]
    NotFound { path: String },

    #[error("Command '{command}' is already registered by another extension.")]
    DuplicateCommand { command: String },
}

impl ExtensionError {
    pub fn kind(&self) -> &'static str {
        match self {
            ExtensionError::NotFound { .. } => "ExtensionNotFound",
            ExtensionError::DuplicateCommand { .. } => "DuplicateCommand",
        }
    }
}

/// Errors caused by users of commands.
/// The message of each variant is shown to the user as is.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("This command can only be used in a server.")]
    GuildOnly,

    #[error("This command can only be used in direct messages.")]
    DmOnly,

    #[error("This command can only be used in NSFW channels.")]
    NsfwOnly,

    #[error("Only the bot owners can use this command.")]
    NotOwner,

    #[error("Could not understand {}.", input.as_deref().map_or("the arguments".to_string(), |i| format!("`{i}`")))]
    BadArgs { input: Option<String> },

    #[error("Slow down! Try again in {:.1} seconds.", remaining_cooldown.as_secs_f32())]
    OnCooldown { remaining_cooldown: Duration },

    #[error("I'm missing these permissions: {missing_permissions:?}")]
    MissingBotPermissions { missing_permissions: Permissions },

    #[error("You're missing these permissions: {}", missing_permissions.map_or("unknown".to_string(), |p| format!("{p:?}")))]
    MissingUserPermissions {
        missing_permissions: Option<Permissions>,
    },

    #[error("Please use one of these subcommands: {subcmds}")]
    MissingSubcommand { subcmds: String },
}

/// Formats an error followed by every error in its [source](std::error::Error::source) chain.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    std::iter::successors(Some(error), |e| e.source())
        .map(|e| e.to_string())
        .join("\n  caused by: ")
}
