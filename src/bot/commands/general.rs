//! General Discord commands - ping and help.
//! This module contains simple commands that don't talk to the backend.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**LNI Works - Guida**\n\
        Tutti i comandi lavorano sulla stagione e sul turno selezionati.\n\n\
        **Accesso**\n\
        • `/login <username> <password>` - Accedi\n\
        • `/register <username> <password>` - Crea un account\n\
        • `/logout` · `/whoami` · `/users`\n\n\
        **Selezione**\n\
        • `/season [stagione]` - Cambia stagione (vuoto per deselezionare)\n\
        • `/shift [turno]` - Cambia turno, `Tutti` per l'intera stagione\n\
        • `/scope` - Mostra la selezione corrente\n\n\
        **Attività**\n\
        • `/dashboard` - Riepilogo e attività recenti\n\
        • `/problems list|new|toggle|edit|delete|info` - Segnalazioni danni\n\
        • `/boats` - Flotta\n\
        • `/works list|new|toggle|edit|delete|export` - Lavori\n\
        • `/orders list|new|toggle|edit|delete|export` - Ordini\n\n\
        **Resoconti**\n\
        • `/season_report` · `/shift_report`\n\
        • `/report_shifts show|toggle|all|clear` - Turni del resoconto\n\
        • `/report_orders [colonna] [pagina]` - Ordini completati\n\
        • `/report_export` · `/season_export` - Esporta in Excel\n\n\
        Scrivere (creare, modificare) richiede un turno specifico, non `Tutti`.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
