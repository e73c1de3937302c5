//! Poise framework setup, the login check and the error hook.

use crate::{
    bot::{BotData, commands},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use tracing::{error, info, instrument, warn};

/// Commands anyone in the guild can run.
const OPEN_COMMANDS: [&str; 2] = ["ping", "help"];

/// Commands staff can run without a backend session.
const PUBLIC_COMMANDS: [&str; 2] = ["login", "register"];

/// Every slash command the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::ping(),
        commands::help(),
        commands::login(),
        commands::register(),
        commands::logout(),
        commands::whoami(),
        commands::users(),
        commands::season(),
        commands::shift(),
        commands::scope(),
        commands::dashboard(),
        commands::problems(),
        commands::boats(),
        commands::works(),
        commands::orders(),
        commands::season_report(),
        commands::shift_report(),
        commands::report_shifts(),
        commands::report_orders(),
        commands::report_export(),
        commands::season_export(),
    ]
}

/// Decides whether `command` may run for a user with the given access and session state.
fn gate(command: &str, allowed: bool, logged_in: bool) -> Result<()> {
    if OPEN_COMMANDS.contains(&command) {
        return Ok(());
    }
    if !allowed {
        return Err(Error::Forbidden);
    }
    if logged_in || PUBLIC_COMMANDS.contains(&command) {
        Ok(())
    } else {
        Err(Error::Unauthenticated)
    }
}

async fn require_session(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let data = ctx.data();
    let author = ctx.author().id;
    let allowed = data.config.access.allows(author.get());
    let logged_in = data.session.read().await.token().is_some();
    gate(&ctx.command().name, allowed, logged_in)
        .inspect_err(|e| {
            if matches!(e, Error::Forbidden) {
                warn!("Refused `{}` for Discord user {author}", ctx.command().name);
            }
        })
        .map(|()| true)
}

/// A rejected token means the stored session is stale: forget it.
async fn expire_session(data: &BotData) {
    warn!("Backend rejected the stored token, logging out");
    data.session.write().await.logout(data.api.as_ref()).await;
    data.invalidate_all().await;
}

async fn reply_error(ctx: poise::Context<'_, BotData, Error>, error: &Error, expire: bool) {
    if expire && matches!(error, Error::Unauthenticated) {
        expire_session(ctx.data()).await;
    }
    let reply = poise::CreateReply::default()
        .content(format!("❌ {}", error.user_message()))
        .ephemeral(true);
    if let Err(e) = ctx.send(reply).await {
        error!("Failed to send error message: {e}");
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {error:?}", ctx.command().name);
            // A 401 here comes from an authenticated backend call
            reply_error(ctx, &error, true).await;
        }
        poise::FrameworkError::CommandCheckFailed {
            error: Some(error),
            ctx,
            ..
        } => {
            reply_error(ctx, &error, false).await;
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the framework around `data` and runs the Discord client until it stops.
///
/// # Arguments
/// * `token` - Discord bot token
/// * `data` - Shared state handed to every command
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            command_check: Some(|ctx| Box::pin(require_session(ctx))),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}
