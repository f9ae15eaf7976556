//! Logging functionality and error reporting.
//! The logging library of choice is [tracing].
//!
//! Logging is process wide state. It is installed once by [install_tracing] at startup,
//! and torn down when the returned [WorkerGuard] is dropped (which flushes the log file).

use itertools::Itertools;
use poise::BoxFuture;
use poise::CreateReply;
use poise::FrameworkError;
use tracing::debug;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::error::error_chain;
use crate::error::UserError;
use crate::BotError;
use crate::Config;
use crate::Context;
use crate::Data;

/// The name of this crate, used to set filter target.
const THIS_CRATE: &str = env!("CARGO_CRATE_NAME");

/// Field value marking an [error] event as critical.
pub const CRITICAL: &str = "critical";

/// Setup format layers, tracing subscribers, and installs tracing.
///
/// The returned guard must be held until shutdown, file logs are lost otherwise.
pub(super) fn install_tracing(config: &Config) -> Option<WorkerGuard> {
    let debug = config.console_debug();

    // Uses local time.
    let timer = fmt::time::ChronoLocal::rfc_3339();

    // By default, all INFO traces and above are shown.
    let target = if debug {
        Targets::new()
            .with_default(LevelFilter::INFO)
            .with_target(THIS_CRATE, LevelFilter::DEBUG)
    } else {
        Targets::new().with_default(LevelFilter::INFO)
    };

    // Debug mode adds source locations to every line.
    let console_layer = fmt::layer()
        .with_ansi(true)
        .with_file(debug)
        .with_level(true)
        .with_line_number(debug)
        .with_target(true)
        .with_timer(timer.clone())
        .pretty()
        .with_filter(target.clone());

    // Put file logs in `log_dir` as "{THIS_CRATE}.log.{TIMESTAMP}" on an hourly basis.
    let (file_layer, guard) = if config.logs_enabled() {
        let appender = tracing_appender::rolling::hourly(config.log_dir(), format!("{THIS_CRATE}.log"));
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer()
            .with_ansi(false)
            .with_file(debug)
            .with_level(true)
            .with_line_number(debug)
            .with_target(true)
            .with_timer(timer)
            .with_writer(writer)
            .compact()
            .with_filter(target);

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

/// The single sink for errors that escaped an event handler.
///
/// Logs at critical severity the name of the failed `event`, the kind and message of the error,
/// and its full source chain. Without an error, placeholders are logged instead.
pub fn report_uncaught(event: &str, error: Option<&BotError>) {
    let (kind, what, chain) = match error {
        Some(error) => (error.kind(), error.to_string(), error_chain(error)),
        None => ("<no error>", String::new(), "<no error chain>".to_string()),
    };

    error!(
        severity = CRITICAL,
        event,
        error_kind = kind,
        chain = %chain,
        "Uncaught {kind} in '{event}': {what}"
    );
}

/// Defines various behaviors for how to handle errors.
///
/// Event and setup failures go to [report_uncaught].
/// Command failures are logged, and the user is told about them if replies are enabled.
pub fn handle_framework_error(err: FrameworkError<Data, BotError>) -> BoxFuture<()> {
    let handler = async move {
        match err {
            // ---
            // Failures outside of commands. Users never see these.
            // ---
            FrameworkError::Setup { error, .. } => report_uncaught("setup", Some(&error)),
            FrameworkError::EventHandler { error, event, .. } => {
                report_uncaught(event.snake_case_name(), Some(&error))
            }
            FrameworkError::DynamicPrefix { error, msg, .. } => {
                error!("Prefix lookup for message {} failed: {error}", msg.id)
            }
            FrameworkError::UnknownCommand {
                prefix,
                msg_content,
                ..
            } => debug!("Unknown command '{prefix}{msg_content}'"),

            // ---
            // Errors that users see but are not logged as error!
            // ---
            FrameworkError::SubcommandRequired { ctx } => {
                let subcmds = ctx
                    .command()
                    .subcommands
                    .iter()
                    .map(|s| s.name.as_str())
                    .join(", ");
                user_response(&ctx, UserError::MissingSubcommand { subcmds }).await;
            }
            FrameworkError::Command {
                error: BotError::UserError(user_error),
                ctx,
                ..
            } => user_response(&ctx, user_error).await,
            FrameworkError::ArgumentParse {
                error, input, ctx, ..
            } => {
                let user_error = UserError::BadArgs { input };

                Response::builder()
                    .ctx(&ctx)
                    .reply(user_error.to_string())
                    .source(user_error)
                    .add_info(error.to_string())
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::CooldownHit {
                remaining_cooldown,
                ctx,
                ..
            } => user_response(&ctx, UserError::OnCooldown { remaining_cooldown }).await,
            FrameworkError::MissingBotPermissions {
                missing_permissions,
                ctx,
                ..
            } => {
                user_response(
                    &ctx,
                    UserError::MissingBotPermissions {
                        missing_permissions,
                    },
                )
                .await
            }
            FrameworkError::MissingUserPermissions {
                missing_permissions,
                ctx,
                ..
            } => {
                user_response(
                    &ctx,
                    UserError::MissingUserPermissions {
                        missing_permissions,
                    },
                )
                .await
            }
            FrameworkError::NotAnOwner { ctx, .. } => user_response(&ctx, UserError::NotOwner).await,
            FrameworkError::GuildOnly { ctx, .. } => user_response(&ctx, UserError::GuildOnly).await,
            FrameworkError::DmOnly { ctx, .. } => user_response(&ctx, UserError::DmOnly).await,
            FrameworkError::NsfwOnly { ctx, .. } => user_response(&ctx, UserError::NsfwOnly).await,
            FrameworkError::CommandCheckFailed { error, ctx, .. } => {
                let error = BotError::CheckFailed {
                    reason: error.map(|e| e.to_string()),
                };

                Response::builder()
                    .ctx(&ctx)
                    .reply(error.to_string())
                    .source(error)
                    .build()
                    .send()
                    .await;
            }

            // ---
            // Unexpected errors during a command. Logged as error!
            // ---
            FrameworkError::Command { error, ctx, .. } => {
                Response::builder()
                    .ctx(&ctx)
                    .reply("Something went wrong while running that command.")
                    .source(error)
                    .is_error(true)
                    .build()
                    .send()
                    .await;
            }
            FrameworkError::CommandPanic { payload, ctx, .. } => {
                Response::builder()
                    .ctx(&ctx)
                    .reply("Something went horribly wrong while running that command.")
                    .source(BotError::Panic { payload })
                    .is_error(true)
                    .build()
                    .send()
                    .await;
            }
            _ => report_uncaught("framework", None),
        }
    };

    Box::pin(handler)
}

/// Responds to an error caused by the user.
async fn user_response(ctx: &Context<'_>, user_error: UserError) {
    Response::builder()
        .ctx(ctx)
        .reply(user_error.to_string())
        .source(user_error)
        .build()
        .send()
        .await;
}

/// Sends an ephemeral reply to the [Context] author.
async fn ephemeral_reply(ctx: &Context<'_>, content: impl Into<String>) {
    let reply = CreateReply::default().ephemeral(true).content(content);
    if let Err(e) = ctx.send(reply).await {
        error!("Failed to send ephemeral reply. {e}")
    };
}

/// Helper function to create debug information from [Context]
fn debug_info(ctx: &Context) -> String {
    let user = &ctx.author().name;
    let cmd = &ctx.command().name;
    let user_input = ctx.invocation_string();
    format!("{user} tried to use {cmd} with {user_input}.")
}

/// Structured response to command errors.
/// Always logs as at least [debug level](tracing::debug), but is upgraded to
/// [error level](tracing::error) if `is_error` is set.
/// The reply is only sent when the `cmd_errors` extension is loaded.
#[derive(bon::Builder)]
#[builder(on(String, into))]
struct Response<'a> {
    /// The context of the response
    ctx: &'a Context<'a>,
    /// The reason for this reply, usually the error causing the response.
    #[builder(into)]
    source: BotError,
    /// Optional reply to the user.
    reply: Option<String>,
    /// Additional information to log
    add_info: Option<String>,
    /// Set to `true` to log as error.
    #[builder(default = false)]
    is_error: bool,
}

impl Response<'_> {
    /// Execute the response
    async fn send(&self) {
        let ctx = self.ctx;

        let log_message = {
            let source = &self.source;
            let add_info = self
                .add_info
                .as_ref()
                .map_or("".to_string(), |s| format!("| {s}"));
            format!("{source} {add_info}")
        };

        if self.is_error {
            let dbg_info = debug_info(ctx);
            let chain = error_chain(&self.source);
            error!(error_kind = self.source.kind(), chain = %chain, "{dbg_info} {log_message}");
        } else {
            debug!("{log_message}");
        }

        if !ctx.data().command_error_replies {
            return;
        }
        if let Some(ref reply) = self.reply {
            ephemeral_reply(ctx, reply).await;
        }
    }
}


#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::capture::capture;
    use super::*;
    use crate::error::DatabaseError;
    use crate::error::ExtensionError;

    #[test]
    fn uncaught_error_is_critical() {
        let (logs, _guard) = capture();
        let error: BotError = ExtensionError::NotFound {
            path: "cogs.missing".to_string(),
        }
        .into();

        report_uncaught("guild_delete", Some(&error));

        let errors = logs.at(Level::ERROR);
        assert_eq!(errors.len(), 1);
        let entry = &errors[0];
        assert_eq!(entry.field("severity"), Some(CRITICAL));
        assert!(entry.message.contains("'guild_delete'"));
        assert!(entry.message.contains("ExtensionNotFound"));
        assert!(entry.message.contains("cogs.missing"));
    }

    #[test]
    fn uncaught_error_logs_source_chain() {
        let (logs, _guard) = capture();
        let error: BotError = DatabaseError::Sqlx(sqlx::Error::RowNotFound).into();

        report_uncaught("ready", Some(&error));

        let entry = &logs.at(Level::ERROR)[0];
        let chain = entry.field("chain").unwrap();
        assert!(chain.contains("caused by"));
        assert_eq!(entry.field("event"), Some("ready"));
    }

    #[test]
    fn missing_error_uses_placeholders() {
        let (logs, _guard) = capture();

        report_uncaught("message", None);

        let errors = logs.at(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field("severity"), Some(CRITICAL));
        assert_eq!(errors[0].message, "Uncaught <no error> in 'message': ");
        assert_eq!(errors[0].field("chain"), Some("<no error chain>"));
    }
}
