//! Scope Discord commands - season and shift selection.
//!
//! The selection is shared by every view. Choosing or clearing anything here is an
//! explicit user choice, so views stop applying their defaults afterwards.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData, ShiftChoice,
            commands::reply::join_capped,
            handlers::autocomplete::{self, ALL_SHIFTS, shift_choice},
        },
        core::{
            format::shift_label,
            selection::{ShiftSelection, change_season},
        },
        errors::{Error, Result},
        models::season::sort_by_number,
    };

    /// Selects a season, or clears the selection when called without one.
    ///
    /// Changing season also clears the shift and the report shift selection.
    #[poise::command(slash_command)]
    pub async fn season(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Season name (empty to clear)"]
        #[autocomplete = "autocomplete::autocomplete_season"]
        season: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();

        let chosen = match season {
            None => None,
            Some(name) => {
                let seasons = data.api.list_seasons().await?;
                let Some(found) = seasons
                    .into_iter()
                    .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
                else {
                    ctx.say(format!("❌ Stagione '{name}' non trovata.")).await?;
                    return Ok(());
                };
                Some(found)
            }
        };

        let reply = chosen.as_ref().map_or_else(
            || "✅ Stagione deselezionata.".to_string(),
            |s| format!("✅ Stagione **{}** selezionata. Scegli un turno con `/shift`.", s.name),
        );

        {
            let mut session = data.session.write().await;
            data.views.lock().await.user_took_control();
            change_season(&mut session, chosen).await;
        }

        ctx.say(reply).await?;
        Ok(())
    }

    /// Selects a shift of the current season, `Tutti` for all of them, or clears it.
    #[poise::command(slash_command)]
    pub async fn shift(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Shift (empty to clear)"]
        #[autocomplete = "autocomplete::autocomplete_shift"]
        shift: Option<String>,
    ) -> Result<()> {
        let reply = match ctx.data().select_shift(shift.as_deref()).await? {
            ShiftChoice::NoSeason => "❌ Seleziona prima una stagione con `/season`.".to_string(),
            ShiftChoice::Unknown => format!(
                "❌ Turno '{}' non trovato.",
                shift.as_deref().unwrap_or_default()
            ),
            ShiftChoice::SeasonChanged => {
                "❌ La stagione è cambiata nel frattempo, riprova.".to_string()
            }
            ShiftChoice::Selected(ShiftSelection::None) => "✅ Turno deselezionato.".to_string(),
            ShiftChoice::Selected(ShiftSelection::Specific(s)) => {
                format!("✅ Selezionato: **{}**", shift_label(&s))
            }
            ShiftChoice::Selected(ShiftSelection::All { .. }) => {
                "✅ Selezionati **tutti i turni** (sola lettura).".to_string()
            }
        };

        ctx.say(reply).await?;
        Ok(())
    }

    /// Shows the current season and shift and lists the season's shifts.
    #[poise::command(slash_command)]
    pub async fn scope(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let (season, selection) = {
            let session = data.session.read().await;
            (
                session.selected_season().cloned(),
                session.selected_shift().clone(),
            )
        };

        let Some(season) = season else {
            ctx.say("📅 Nessuna stagione selezionata. Usa `/season`.")
                .await?;
            return Ok(());
        };

        let mut shifts = data.api.list_shifts(season.id).await?;
        sort_by_number(&mut shifts);

        let current = match &selection {
            ShiftSelection::None => "nessuno".to_string(),
            ShiftSelection::Specific(s) => shift_label(s),
            ShiftSelection::All { .. } => ALL_SHIFTS.to_string(),
        };
        let header = format!("📅 **Stagione {}**\nTurno: **{current}**\n", season.name);
        let lines: Vec<String> = shifts
            .iter()
            .map(|s| {
                let marker = if selection.shift().is_some_and(|sel| sel.id == s.id) {
                    "▶"
                } else {
                    "•"
                };
                format!("{marker} {}", shift_choice(s))
            })
            .collect();
        ctx.say(join_capped(&header, &lines)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
