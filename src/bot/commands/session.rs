//! Session Discord commands - login, register, logout, whoami and the user directory.
//!
//! Credentials are only ever echoed in ephemeral replies.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::reply::join_capped},
        errors::{Error, Result, ValidationError},
        models::Credentials,
    };
    use std::fmt::Write;
    use tracing::info;

    async fn private_reply(ctx: poise::Context<'_, BotData, Error>, text: String) -> Result<()> {
        ctx.send(poise::CreateReply::default().content(text).ephemeral(true))
            .await?;
        Ok(())
    }

    /// Logs in to the club backend.
    #[poise::command(slash_command)]
    pub async fn login(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Username"] username: String,
        #[description = "Password"] password: String,
    ) -> Result<()> {
        let data = ctx.data();
        let credentials = Credentials { username, password };

        let user = data
            .session
            .write()
            .await
            .login(data.api.as_ref(), &credentials)
            .await?;
        data.invalidate_all().await;

        private_reply(ctx, format!("✅ Benvenuto, **{}**!", user.display_name())).await
    }

    /// Creates a new account and logs in with it.
    #[poise::command(slash_command)]
    pub async fn register(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Username"] username: String,
        #[description = "Password"] password: String,
    ) -> Result<()> {
        let data = ctx.data();
        let credentials = Credentials { username, password };
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(ValidationError::CredentialsRequired.into());
        }

        let created = data.api.register(&credentials).await?;
        info!("Registered user {}", created.username);

        let user = data
            .session
            .write()
            .await
            .login(data.api.as_ref(), &credentials)
            .await?;
        data.invalidate_all().await;

        private_reply(
            ctx,
            format!("✅ Account **{}** creato, accesso effettuato.", user.username),
        )
        .await
    }

    /// Logs out and forgets the stored session.
    #[poise::command(slash_command)]
    pub async fn logout(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        data.session.write().await.logout(data.api.as_ref()).await;
        data.invalidate_all().await;
        ctx.say("👋 Disconnesso.").await?;
        Ok(())
    }

    /// Shows the logged-in user, refreshed from the backend.
    #[poise::command(slash_command)]
    pub async fn whoami(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user = data
            .session
            .write()
            .await
            .refresh_profile(data.api.as_ref())
            .await?;

        let mut response = format!("👤 **{}**\n", user.display_name());
        writeln!(&mut response, "Username: `{}`", user.username)?;
        if let Some(email) = &user.email {
            writeln!(&mut response, "Email: {email}")?;
        }
        private_reply(ctx, response).await
    }

    /// Lists the registered users.
    #[poise::command(slash_command)]
    pub async fn users(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let users = ctx.data().api.list_users().await?;
        if users.is_empty() {
            ctx.say("👥 Nessun utente registrato.").await?;
            return Ok(());
        }

        let lines: Vec<String> = users.iter().map(|u| format!("• {}", u.username)).collect();
        ctx.say(join_capped("👥 **Utenti**", &lines)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
