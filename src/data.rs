//! This module contains everything relating to [Data].

use std::sync::Arc;

use crate::database::PrefixStore;

/// The data kept between shards
pub struct Data {
    /// Where guild prefixes are looked up
    pub prefixes: Arc<dyn PrefixStore>,
    /// Used when a guild has no prefix, or the lookup fails
    pub default_prefix: String,
    /// Description of the bot, from the config
    pub description: String,
    /// Paths of the extensions that loaded, in load order
    pub extensions: Vec<String>,
    /// Reply to users when their command fails. Enabled by the `cmd_errors` extension.
    pub command_error_replies: bool,
}
