//! Work Discord commands - the `works` command group.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData, View,
            commands::reply::{
                completion_icon, join_capped, optional_date, scope_header, send_export,
                work_line,
            },
            handlers::autocomplete,
        },
        core::{
            fetch,
            mutations::{self, WorkDraft},
            pipeline::StatusFilter,
            report,
        },
        errors::{Error, Result, ValidationError},
        models::{CompletionStatus, WorkCategory, WorkUpdate},
    };

    /// Status filter offered by the work and order lists.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum CompletionFilterChoice {
        #[name = "Tutti"]
        All,
        #[name = "Da fare"]
        Pending,
        #[name = "Completati"]
        Completed,
    }

    impl From<CompletionFilterChoice> for StatusFilter<CompletionStatus> {
        fn from(choice: CompletionFilterChoice) -> Self {
            match choice {
                CompletionFilterChoice::All => Self::All,
                CompletionFilterChoice::Pending => Self::Only(CompletionStatus::Pending),
                CompletionFilterChoice::Completed => Self::Only(CompletionStatus::Completed),
            }
        }
    }

    /// Status offered when creating or editing works and orders.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum CompletionChoice {
        #[name = "Da fare"]
        Pending,
        #[name = "Completato"]
        Completed,
    }

    impl From<CompletionChoice> for CompletionStatus {
        fn from(choice: CompletionChoice) -> Self {
            match choice {
                CompletionChoice::Pending => Self::Pending,
                CompletionChoice::Completed => Self::Completed,
            }
        }
    }

    fn parse_category(input: Option<&str>) -> std::result::Result<Option<WorkCategory>, String> {
        match input.map(str::trim).filter(|c| !c.is_empty()) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<WorkCategory>()
                .map(Some)
                .map_err(|_| format!("❌ Categoria '{raw}' non valida.")),
        }
    }

    /// Parent command for maintenance works.
    #[poise::command(
        slash_command,
        subcommands(
            "work_list",
            "work_new",
            "work_toggle",
            "work_edit",
            "work_delete",
            "work_export"
        )
    )]
    pub async fn works(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Lavori. Sottocomandi disponibili:\n\
            `/works list` - Elenca i lavori del turno\n\
            `/works new` - Nuovo lavoro\n\
            `/works toggle` - Segna come fatto/da fare\n\
            `/works edit` - Modifica un lavoro\n\
            `/works delete` - Elimina un lavoro\n\
            `/works export` - Esporta i lavori del turno in Excel";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Lists the works of the selected shift(s), pending ones first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn work_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Status filter (default: all)"] status: Option<CompletionFilterChoice>,
        #[description = "Search title, description or category"] search: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;

        let scope = data.scope(View::Works).await?;
        if scope.selection.is_none() {
            ctx.say(format!("{}\n❌ Seleziona un turno con `/shift`.", scope_header(&scope)))
                .await?;
            return Ok(());
        }

        let cached = fetch::load_works(data.api.as_ref(), &data.works, &scope).await?;
        let filter = status.map_or(StatusFilter::All, StatusFilter::from);
        let shown = data.views.lock().await.work_list.get(
            cached.generation,
            &cached.items,
            filter,
            search.as_deref().unwrap_or(""),
        );

        let header = format!(
            "{}\n🔨 **Lavori** ({} di {})",
            scope_header(&scope),
            shown.len(),
            cached.items.len()
        );
        if shown.is_empty() {
            ctx.say(format!("{header}\n_Nessun lavoro trovato_")).await?;
            return Ok(());
        }

        let lines: Vec<String> = shown.iter().map(work_line).collect();
        ctx.say(join_capped(&header, &lines)).await?;
        Ok(())
    }

    /// Logs a work item on the selected shift.
    #[poise::command(slash_command, rename = "new")]
    pub async fn work_new(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Short title"] title: String,
        #[description = "Area of the club"]
        #[autocomplete = "autocomplete::autocomplete_work_category"]
        category: String,
        #[description = "Longer description"] description: Option<String>,
        #[description = "Work date, dd/mm/yyyy (default: today)"] date: Option<String>,
        #[description = "Initial status (default: to do)"] status: Option<CompletionChoice>,
    ) -> Result<()> {
        let data = ctx.data();
        let (category, work_date) = match (
            parse_category(Some(&category)),
            optional_date(date.as_deref()),
        ) {
            (Ok(c), Ok(d)) => (c, d),
            (Err(reply), _) | (_, Err(reply)) => {
                ctx.say(reply).await?;
                return Ok(());
            }
        };

        let scope = data.scope(View::Works).await?;
        let draft = WorkDraft {
            title,
            description,
            category,
            work_date,
            status: status.map(CompletionStatus::from),
        };
        let created =
            mutations::create_work(data.api.as_ref(), &data.works, &scope.selection, draft).await?;

        ctx.say(format!("✅ Lavoro registrato:\n{}", work_line(&created)))
            .await?;
        Ok(())
    }

    /// Marks a work as done, or as to do again.
    #[poise::command(slash_command, rename = "toggle")]
    pub async fn work_toggle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Work id"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let current = data.api.get_work(id).await?;
        let status =
            mutations::toggle_work_status(data.api.as_ref(), &data.works, id, current.status)
                .await?;

        ctx.say(format!(
            "{} Lavoro `#{id}` ora è **{status}**.",
            completion_icon(status)
        ))
        .await?;
        Ok(())
    }

    /// Edits a work item.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn work_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Work id"] id: i64,
        #[description = "New title"] title: Option<String>,
        #[description = "New category"]
        #[autocomplete = "autocomplete::autocomplete_work_category"]
        category: Option<String>,
        #[description = "New description"] description: Option<String>,
        #[description = "New date, dd/mm/yyyy"] date: Option<String>,
        #[description = "New status"] status: Option<CompletionChoice>,
    ) -> Result<()> {
        let data = ctx.data();
        let (category, work_date) = match (
            parse_category(category.as_deref()),
            optional_date(date.as_deref()),
        ) {
            (Ok(c), Ok(d)) => (c, d),
            (Err(reply), _) | (_, Err(reply)) => {
                ctx.say(reply).await?;
                return Ok(());
            }
        };

        let update = WorkUpdate {
            title,
            description,
            category,
            status: status.map(CompletionStatus::from),
            work_date,
        };
        if update == WorkUpdate::default() {
            ctx.say("❌ Specifica almeno un campo da modificare.")
                .await?;
            return Ok(());
        }

        let updated = mutations::update_work(data.api.as_ref(), &data.works, id, update).await?;
        ctx.say(format!("✅ Lavoro aggiornato:\n{}", work_line(&updated)))
            .await?;
        Ok(())
    }

    /// Deletes a work item.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn work_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Work id"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        mutations::delete_work(data.api.as_ref(), &data.works, id).await?;
        ctx.say(format!("✅ Lavoro `#{id}` eliminato.")).await?;
        Ok(())
    }

    /// Exports the works of the selected shift as a spreadsheet.
    #[poise::command(slash_command, rename = "export")]
    pub async fn work_export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;

        let scope = data.scope(View::Works).await?;
        let shift = scope.selection.shift().ok_or(ValidationError::ShiftRequired)?;
        let export = report::export_shift_works(data.api.as_ref(), shift).await?;
        send_export(ctx, export).await
    }
}

// Re-export all commands
pub use inner::*;
