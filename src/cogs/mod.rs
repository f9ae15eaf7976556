//! Extensions ("cogs") that add features to the bot.
//!
//! Extensions are loaded by name from [REGISTRY]. A failing extension is logged and
//! skipped, the others still load.

mod bot_information;
mod bot_owner_commands;
mod cmd_errors;
mod database_debug;
mod guild_admin;
mod licenses;

use crate::error::error_chain;
use crate::error::ExtensionError;
use crate::BotError;
use crate::Data;

/// Convenient type alias for [poise::Command].
pub type Command = poise::Command<Data, BotError>;

/// Loads an extension into [Extensions].
type LoadFn = fn(&mut Extensions) -> Result<(), ExtensionError>;

/// Every known extension, by name.
const REGISTRY: &[(&str, LoadFn)] = &[
    ("licenses", licenses::load),
    ("database_debug", database_debug::load),
    ("bot_owner_commands", bot_owner_commands::load),
    ("guild_admin", guild_admin::load),
    ("bot_information", bot_information::load),
    ("cmd_errors", cmd_errors::load),
];

/// Extensions loaded on startup, in load order.
pub const STARTUP_EXTENSIONS: &[&str] = &[
    "licenses",
    "database_debug",
    "bot_owner_commands",
    "guild_admin",
    "bot_information",
    "cmd_errors",
];

/// Everything the loaded extensions add to the bot.
#[derive(Default)]
pub struct Extensions {
    commands: Vec<Command>,
    command_error_replies: bool,
    loaded: Vec<String>,
}

impl Extensions {
    /// Adds commands to the bot.
    /// Errors if a command name is taken, in which case nothing is added.
    pub fn add_commands(&mut self, commands: Vec<Command>) -> Result<(), ExtensionError> {
        for (i, command) in commands.iter().enumerate() {
            let taken = self.commands.iter().chain(&commands[..i]).any(|c| c.name == command.name);
            if taken {
                return Err(ExtensionError::DuplicateCommand {
                    command: command.name.clone(),
                });
            }
        }

        self.commands.extend(commands);
        Ok(())
    }

    /// Reply to users when their commands fail.
    pub fn enable_command_error_replies(&mut self) {
        self.command_error_replies = true;
    }

    /// Loads the extension called `name`.
    pub fn load(&mut self, name: &str) -> Result<(), ExtensionError> {
        let path = extension_path(name);
        let (_, load) = REGISTRY
            .iter()
            .find(|(registered, _)| *registered == name)
            .ok_or_else(|| ExtensionError::NotFound { path: path.clone() })?;

        load(self)?;
        self.loaded.push(path);
        Ok(())
    }

    /// Splits into the commands, the paths of loaded extensions (in load order),
    /// and whether command error replies are enabled.
    pub fn into_parts(self) -> (Vec<Command>, Vec<String>, bool) {
        (self.commands, self.loaded, self.command_error_replies)
    }
}

/// Fully qualified path of an extension.
fn extension_path(name: &str) -> String {
    format!("cogs.{name}")
}

/// Loads every extension in `names`, in order.
/// Failures are logged and skipped.
pub fn load_extensions(names: &[&str]) -> Extensions {
    let mut extensions = Extensions::default();

    tracing::info!("Loaded extensions:");
    for name in names {
        let path = extension_path(name);
        match extensions.load(name) {
            Ok(()) => tracing::info!("{path}"),
            Err(error) => {
                let kind = error.kind();
                tracing::error!(chain = %error_chain(&error), "{kind}: {error} Failed to load extension {path}");
            }
        }
    }

    extensions
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;
    use crate::log::capture::capture;

    impl Extensions {
        fn commands(&self) -> &[Command] {
            &self.commands
        }

        fn loaded(&self) -> &[String] {
            &self.loaded
        }

        fn command_error_replies(&self) -> bool {
            self.command_error_replies
        }
    }

    #[test]
    fn startup_extensions_are_registered() {
        for name in STARTUP_EXTENSIONS {
            assert!(
                REGISTRY.iter().any(|(registered, _)| registered == name),
                "{name} missing from registry"
            );
        }
    }

    #[test]
    fn loads_startup_extensions() {
        let extensions = load_extensions(STARTUP_EXTENSIONS);

        let expected: Vec<String> = STARTUP_EXTENSIONS
            .iter()
            .map(|name| format!("cogs.{name}"))
            .collect();
        assert_eq!(extensions.loaded(), expected);
        assert!(extensions.command_error_replies());

        let names: Vec<&str> = extensions.commands().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["licenses", "dbprefix", "shutdown", "prefix", "about"]);
    }

    #[test]
    fn invalid_extension_does_not_stop_loading() {
        let (logs, _guard) = capture();
        let names = [
            "licenses",
            "database_debug",
            "not_a_cog",
            "guild_admin",
            "bot_information",
            "cmd_errors",
        ];

        let extensions = load_extensions(&names);

        assert_eq!(
            extensions.loaded(),
            [
                "cogs.licenses",
                "cogs.database_debug",
                "cogs.guild_admin",
                "cogs.bot_information",
                "cogs.cmd_errors",
            ]
        );

        // Header, then one line per extension in list order.
        let lines: Vec<(Level, String)> = logs
            .events()
            .into_iter()
            .map(|e| (e.level, e.message))
            .collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], (Level::INFO, "Loaded extensions:".to_string()));
        assert_eq!(lines[1], (Level::INFO, "cogs.licenses".to_string()));
        assert_eq!(lines[2], (Level::INFO, "cogs.database_debug".to_string()));
        assert_eq!(lines[3].0, Level::ERROR);
        assert!(lines[3].1.starts_with("ExtensionNotFound:"));
        assert!(lines[3].1.ends_with("Failed to load extension cogs.not_a_cog"));
        assert_eq!(lines[4], (Level::INFO, "cogs.guild_admin".to_string()));
        assert_eq!(lines[5], (Level::INFO, "cogs.bot_information".to_string()));
        assert_eq!(lines[6], (Level::INFO, "cogs.cmd_errors".to_string()));
    }

    #[test]
    fn duplicate_commands_fail_the_later_extension() {
        let (logs, _guard) = capture();

        let extensions = load_extensions(&["licenses", "licenses", "bot_information"]);

        assert_eq!(extensions.loaded(), ["cogs.licenses", "cogs.bot_information"]);
        assert_eq!(extensions.commands().len(), 2);

        let errors = logs.at(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("DuplicateCommand:"));
        assert!(errors[0].field("chain").unwrap().contains("'licenses'"));
    }

    #[test]
    fn add_commands_rejects_duplicates_within_batch() {
        let mut extensions = Extensions::default();

        let result = extensions.add_commands(vec![
            bot_information::about(),
            bot_information::about(),
        ]);

        assert!(matches!(
            result,
            Err(ExtensionError::DuplicateCommand { command }) if command == "about"
        ));
        assert!(extensions.commands().is_empty());
    }
}
