//! Dashboard and reports Discord commands.
//!
//! `/dashboard` summarizes the selected scope. The `report_*` commands work on their own
//! multi-selection of shifts, which survives restarts and is reset on season change.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        api::SortDirection,
        bot::{
            BotData, View,
            commands::reply::{
                join_capped, order_line, problem_line, scope_header, send_export, work_line,
            },
            handlers::autocomplete::{self, parse_shift_choice},
        },
        core::{
            format::{format_amount, format_iso_date, shift_ordinal_name},
            report::{self, OrderSortField},
            selection::{Scope, ShiftSelection},
        },
        errors::{Error, Result, ValidationError},
        models::Season,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Sortable columns of `/report_orders`.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum SortColumnChoice {
        #[name = "Titolo"]
        Title,
        #[name = "Importo"]
        Amount,
        #[name = "Data"]
        OrderDate,
        #[name = "Categoria"]
        Category,
        #[name = "Autore"]
        CreatedBy,
        #[name = "Turno"]
        ShiftId,
    }

    impl From<SortColumnChoice> for OrderSortField {
        fn from(choice: SortColumnChoice) -> Self {
            match choice {
                SortColumnChoice::Title => Self::Title,
                SortColumnChoice::Amount => Self::Amount,
                SortColumnChoice::OrderDate => Self::OrderDate,
                SortColumnChoice::Category => Self::Category,
                SortColumnChoice::CreatedBy => Self::CreatedBy,
                SortColumnChoice::ShiftId => Self::ShiftId,
            }
        }
    }

    /// Direction offered for category totals.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum DirectionChoice {
        #[name = "Crescente"]
        Asc,
        #[name = "Decrescente"]
        Desc,
    }

    impl From<DirectionChoice> for SortDirection {
        fn from(choice: DirectionChoice) -> Self {
            match choice {
                DirectionChoice::Asc => Self::Asc,
                DirectionChoice::Desc => Self::Desc,
            }
        }
    }

    const fn column_name(field: OrderSortField) -> &'static str {
        match field {
            OrderSortField::Title => "titolo",
            OrderSortField::Amount => "importo",
            OrderSortField::OrderDate => "data",
            OrderSortField::Category => "categoria",
            OrderSortField::CreatedBy => "autore",
            OrderSortField::ShiftId => "turno",
        }
    }

    const fn sort_arrow(direction: SortDirection) -> &'static str {
        match direction {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }

    async fn reports_season(
        ctx: poise::Context<'_, BotData, Error>,
    ) -> Result<Option<(Season, Scope)>> {
        let scope = ctx.data().scope(View::Reports).await?;
        match scope.season.clone() {
            Some(season) => Ok(Some((season, scope))),
            None => {
                ctx.say("❌ Seleziona prima una stagione con `/season`.")
                    .await?;
                Ok(None)
            }
        }
    }

    /// Summary and latest activity of the selected scope.
    #[allow(clippy::too_many_lines)]
    #[poise::command(slash_command)]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;

        let scope = data.scope(View::Dashboard).await?;
        let greeting = data
            .session
            .read()
            .await
            .current_user()
            .map(|u| format!("Ciao, {}!", u.display_name()))
            .unwrap_or_default();

        if scope.selection.is_none() {
            ctx.say(format!(
                "{}\n❌ Seleziona un turno con `/shift` per vedere il riepilogo.",
                scope_header(&scope)
            ))
            .await?;
            return Ok(());
        }

        let view = report::load_dashboard(
            data.api.as_ref(),
            (&data.problems, &data.works, &data.orders),
            &scope,
            data.config.dashboard.recent_limit,
        )
        .await?;
        let summary = &view.summary;

        let mut fields = vec![
            (
                "🛠️ Segnalazioni aperte".to_string(),
                summary.open_problems.to_string(),
                true,
            ),
            (
                "🔨 Lavori".to_string(),
                format!(
                    "{} da fare · {} fatti",
                    summary.pending_works, summary.completed_works
                ),
                true,
            ),
            (
                "🧾 Ordini".to_string(),
                format!(
                    "{} in sospeso · speso {}",
                    summary.pending_orders,
                    format_amount(summary.completed_spending)
                ),
                true,
            ),
        ];

        let sections = [
            (
                "Ultime segnalazioni",
                view.recent_problems.iter().map(problem_line).collect::<Vec<_>>(),
            ),
            (
                "Ultimi lavori",
                view.recent_works.iter().map(work_line).collect(),
            ),
            (
                "Ultimi ordini",
                view.recent_orders.iter().map(order_line).collect(),
            ),
        ];
        for (title, lines) in sections {
            let value = if lines.is_empty() {
                "_Nessuna attività_".to_string()
            } else {
                // Embed field values are capped at 1024 characters
                let mut value = String::new();
                for line in lines {
                    if value.len() + line.len() + 1 > 1000 {
                        break;
                    }
                    writeln!(&mut value, "{line}")?;
                }
                value
            };
            fields.push((title.to_string(), value, false));
        }

        let embed = serenity::CreateEmbed::default()
            .title("📊 Dashboard")
            .description(format!("{greeting}\n{}", scope_header(&scope)))
            .color(0x0034_98DB)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Season-wide report computed by the backend.
    #[poise::command(slash_command)]
    pub async fn season_report(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order of the category totals (default: descending)"]
        categories: Option<DirectionChoice>,
    ) -> Result<()> {
        ctx.defer().await?;
        let Some((season, _)) = reports_season(ctx).await? else {
            return Ok(());
        };
        let report = ctx.data().api.season_report(season.id).await?;

        let mut totals = String::new();
        writeln!(
            &mut totals,
            "💶 Spesa totale: **{}** · {} ordini",
            format_amount(report.total_orders_amount),
            report.total_orders_count
        )?;
        writeln!(
            &mut totals,
            "🔨 Lavori: **{}** ({} da fare, {} completati)",
            report.total_works_count,
            report.works_summary.pending_count,
            report.works_summary.completed_count
        )?;
        writeln!(
            &mut totals,
            "🛠️ Segnalazioni: **{}** ({} aperte, {} risolte)",
            report.total_problems_count,
            report.problems_summary.open_count,
            report.problems_summary.closed_count
        )?;

        let direction = categories.map_or(SortDirection::Desc, SortDirection::from);
        let mut by_category = String::new();
        for (category, amount) in report::category_totals(&report, direction) {
            writeln!(&mut by_category, "• {category}: {}", format_amount(amount))?;
        }
        if by_category.is_empty() {
            by_category.push_str("_Nessun ordine completato_");
        }

        let mut by_shift = String::new();
        for digest in &report.shifts_data {
            writeln!(
                &mut by_shift,
                "• **{}** ({} - {}): {} ordini, {} · {} lavori · {} segnalazioni",
                shift_ordinal_name(digest.shift_number),
                format_iso_date(&digest.start_date),
                format_iso_date(&digest.end_date),
                digest.orders_count,
                format_amount(digest.orders_amount),
                digest.works_count,
                digest.problems_count
            )?;
        }
        if by_shift.is_empty() {
            by_shift.push_str("_Nessun turno_");
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("📈 Resoconto stagione {}", report.season_name))
            .description(totals)
            .color(0x0034_98DB)
            .field(
                format!("Spese per categoria {}", sort_arrow(direction)),
                by_category,
                false,
            )
            .field("Per turno", by_shift, false);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Report of one shift (default: the selected one).
    #[poise::command(slash_command)]
    pub async fn shift_report(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Shift (default: the selected one)"]
        #[autocomplete = "autocomplete::autocomplete_shift"]
        shift: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;
        let Some((season, scope)) = reports_season(ctx).await? else {
            return Ok(());
        };

        let selection = match shift {
            Some(input) => parse_shift_choice(&input, season.id, &scope.shifts),
            None => Some(data.session.read().await.selected_shift().clone()),
        };
        let Some(ShiftSelection::Specific(shift)) = selection else {
            return Err(ValidationError::ShiftRequired.into());
        };

        let report = data.api.shift_report(shift.id).await?;
        let mut response = format!(
            "📋 **{} turno** ({} - {})\n",
            shift_ordinal_name(report.shift_number),
            format_iso_date(&report.start_date),
            format_iso_date(&report.end_date)
        );
        writeln!(
            &mut response,
            "🧾 Ordini: {} · {}",
            report.summary.total_orders_count,
            format_amount(report.summary.total_orders_amount)
        )?;
        writeln!(&mut response, "🔨 Lavori: {}", report.summary.total_works_count)?;
        writeln!(
            &mut response,
            "🛠️ Segnalazioni: {}",
            report.summary.total_problems_count
        )?;

        ctx.say(response).await?;
        Ok(())
    }

    /// Parent command for the shifts included in the reports.
    #[poise::command(
        slash_command,
        subcommands(
            "report_shift_show",
            "report_shift_toggle",
            "report_shift_all",
            "report_shift_clear"
        )
    )]
    pub async fn report_shifts(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Turni del resoconto. Sottocomandi disponibili:\n\
            `/report_shifts show` - Mostra i turni selezionati\n\
            `/report_shifts toggle` - Aggiungi/togli un turno\n\
            `/report_shifts all` - Seleziona tutti i turni della stagione\n\
            `/report_shifts clear` - Deseleziona tutto";

        ctx.say(help_text).await?;
        Ok(())
    }

    async fn show_report_shifts(
        ctx: poise::Context<'_, BotData, Error>,
        scope: &Scope,
    ) -> Result<()> {
        let ticked = ctx.data().session.read().await.report_shifts().to_vec();
        let mut response = String::from("📋 **Turni del resoconto**\n");
        for shift in &scope.shifts {
            let mark = if ticked.contains(&shift.id) { "☑" } else { "☐" };
            writeln!(
                &mut response,
                "{mark} {} turno",
                shift_ordinal_name(shift.shift_number)
            )?;
        }
        if scope.shifts.is_empty() {
            response.push_str("_La stagione non ha turni_");
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Shows which shifts are included.
    #[poise::command(slash_command, rename = "show")]
    pub async fn report_shift_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some((_, scope)) = reports_season(ctx).await? else {
            return Ok(());
        };
        show_report_shifts(ctx, &scope).await
    }

    /// Adds a shift to the report, or removes it if already included.
    #[poise::command(slash_command, rename = "toggle")]
    pub async fn report_shift_toggle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Shift"]
        #[autocomplete = "autocomplete::autocomplete_shift"]
        shift: String,
    ) -> Result<()> {
        let Some((season, scope)) = reports_season(ctx).await? else {
            return Ok(());
        };
        let Some(ShiftSelection::Specific(chosen)) =
            parse_shift_choice(&shift, season.id, &scope.shifts)
        else {
            ctx.say(format!("❌ Turno '{shift}' non trovato.")).await?;
            return Ok(());
        };

        report::toggle_report_shift(&mut *ctx.data().session.write().await, chosen.id).await;
        show_report_shifts(ctx, &scope).await
    }

    /// Includes every shift of the season.
    #[poise::command(slash_command, rename = "all")]
    pub async fn report_shift_all(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some((_, scope)) = reports_season(ctx).await? else {
            return Ok(());
        };
        report::select_all_report_shifts(&mut *ctx.data().session.write().await, &scope.shifts)
            .await;
        show_report_shifts(ctx, &scope).await
    }

    /// Excludes every shift.
    #[poise::command(slash_command, rename = "clear")]
    pub async fn report_shift_clear(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some((_, scope)) = reports_season(ctx).await? else {
            return Ok(());
        };
        report::clear_report_shifts(&mut *ctx.data().session.write().await).await;
        show_report_shifts(ctx, &scope).await
    }

    /// Completed orders of the report shifts, sortable and paginated.
    ///
    /// Choosing the column already sorted on flips the direction; another column starts
    /// ascending.
    #[poise::command(slash_command)]
    pub async fn report_orders(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Sort by this column"] column: Option<SortColumnChoice>,
        #[description = "Page (default: 1)"]
        #[min = 1]
        page: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;

        let shift_ids = data.session.read().await.report_shifts().to_vec();
        if shift_ids.is_empty() {
            ctx.say("❌ Nessun turno selezionato. Usa `/report_shifts`.")
                .await?;
            return Ok(());
        }

        let sort = {
            let mut views = data.views.lock().await;
            if let Some(column) = column {
                views.order_sort = views.order_sort.click(column.into());
            }
            views.order_sort
        };

        let mut orders = report::completed_orders_for_shifts(data.api.as_ref(), &shift_ids).await?;
        if orders.is_empty() {
            ctx.say("🧾 **Ordini completati**\n_Nessun ordine completato_")
                .await?;
            return Ok(());
        }
        let total: f64 = orders.iter().map(|o| o.amount).sum();
        report::sort_orders(&mut orders, sort);

        let page_number = page.map_or(1, |p| usize::try_from(p).unwrap_or(usize::MAX));
        let page = report::paginate(&orders, page_number, data.config.reports.page_size);

        let header = format!(
            "🧾 **Ordini completati** · {} ordini · totale {}\nOrdinati per {} {} · pagina {}/{}",
            orders.len(),
            format_amount(total),
            column_name(sort.field),
            sort_arrow(sort.direction),
            page.page,
            page.total_pages
        );
        let lines: Vec<String> = page.items.iter().map(order_line).collect();
        ctx.say(join_capped(&header, &lines)).await?;
        Ok(())
    }

    /// Exports the orders of the report shifts as a spreadsheet.
    #[poise::command(slash_command)]
    pub async fn report_export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;

        let shift_ids = data.session.read().await.report_shifts().to_vec();
        let export = report::export_report_orders(
            data.api.as_ref(),
            &shift_ids,
            &data.config.reports.export_filename,
        )
        .await?;
        send_export(ctx, export).await
    }

    /// Exports the season workbook.
    #[poise::command(slash_command)]
    pub async fn season_export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.defer().await?;
        let Some((season, _)) = reports_season(ctx).await? else {
            return Ok(());
        };
        let export = report::export_season(ctx.data().api.as_ref(), season.id, &season.name).await?;
        send_export(ctx, export).await
    }
}

// Re-export all commands
pub use inner::*;
