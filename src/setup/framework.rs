//! Setup for [poise::Framework]

use crate::cogs::Command;
use crate::serenity;
use crate::BotError;
use crate::Data;

/// Convenient type alias, only this [poise::Framework] type is used.
type Framework = poise::Framework<Data, BotError>;

/// Construct a [poise::Framework] serving `commands`.
pub(super) fn framework(commands: Vec<Command>, data: Data) -> Framework {
    poise::Framework::builder()
        .options(framework_options(commands))
        .setup(|ctx, rdy, fw| framework_setup(ctx, rdy, fw, data))
        .build()
}

/// Configure options for the [Framework]
fn framework_options(commands: Vec<Command>) -> poise::FrameworkOptions<Data, BotError> {
    poise::FrameworkOptions {
        commands,
        prefix_options: poise::PrefixFrameworkOptions {
            // Looked up per guild on every message
            dynamic_prefix: Some(|ctx| crate::prefix::dynamic_prefix(ctx)),
            ..Default::default()
        },
        // Handle framework errors
        on_error: |e| crate::log::handle_framework_error(e),
        // Log when commands start
        pre_command: |ctx| {
            Box::pin(async move {
                let cmd_name = &ctx.command().name;
                let user = &ctx.author().name;
                tracing::info!("Started '{cmd_name}' command from {user}.")
            })
        },
        // Log when finishing commands
        post_command: |ctx| {
            Box::pin(async move {
                let cmd_name = &ctx.command().name;
                let user = &ctx.author().name;
                tracing::info!("Finished '{cmd_name}' command from {user}.")
            })
        },
        ..Default::default()
    }
}

/// Construct future that runs once the first shard is ready
fn framework_setup<'a>(
    _ctx: &'a serenity::Context,
    _rdy: &'a serenity::Ready,
    fw: &'a Framework,
    data: Data,
) -> poise::BoxFuture<'a, Result<Data, BotError>> {
    Box::pin(async move {
        let commands = fw.options().commands.len();
        let default_prefix = &data.default_prefix;
        tracing::info!("Serving {commands} commands, default prefix is '{default_prefix}'.");
        Ok(data)
    })
}
