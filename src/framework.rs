use poise::command;
use serenity::all::FullEvent;
use tracing::{error, info};

use crate::{
    commands::{Context, Data, introduction::*},
    config::BotCfg,
    error::BotError,
    handlers::{on_cache_ready, on_member_update, on_ready},
};

async fn on_error(error: poise::FrameworkError<'_, Data, BotError>) {
    // Command errors were already reported to the invoking user, only log them.
    // Everything else goes to poise's default handler.
    match error {
        poise::FrameworkError::Setup { error, .. } => panic!("Failed to start bot: {}", error),
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {}", ctx.command().name, error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e)
            }
        }
    }
}

#[command(prefix_command, owners_only, hide_in_help)]
async fn register(ctx: Context<'_>) -> Result<(), BotError> {
    Ok(poise::builtins::register_application_commands_buttons(ctx).await?)
}

fn option(cfg: &BotCfg) -> poise::FrameworkOptions<Data, BotError> {
    poise::FrameworkOptions {
        commands: vec![
            introemote(),
            introchannel(),
            baserole(),
            clearbaseroles(),
            introconfig(),
            register(),
        ],
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(cfg.prefix().to_owned()),
            ..Default::default()
        },
        owners: cfg.owners.to_owned(),
        on_error: |error| {
            Box::pin(async {
                on_error(error).await;
            })
        },
        pre_command: |ctx| Box::pin(async move { info!("Invoke Command: {}", ctx.command().name) }),
        post_command: |ctx| {
            Box::pin(async move { info!("Finished executing command {}", ctx.command().name) })
        },
        event_handler: |ctx, event, _, data| {
            Box::pin(async move {
                match event {
                    FullEvent::Ready { data_about_bot } => on_ready(data_about_bot),
                    FullEvent::CacheReady { guilds } => on_cache_ready(ctx, guilds),
                    FullEvent::GuildMemberUpdate {
                        old_if_available,
                        event,
                        ..
                    } => on_member_update(ctx, data, old_if_available.as_ref(), event).await,
                    _ => {}
                }
                Ok(())
            })
        },
        ..Default::default()
    }
}

pub fn framework(data: Data) -> poise::Framework<Data, BotError> {
    let options = option(&data.cfg.load());
    poise::Framework::builder()
        .setup(move |_, _, _| {
            Box::pin(async move {
                info!("Framework has been set up!");
                Ok(data)
            })
        })
        .options(options)
        .build()
}
