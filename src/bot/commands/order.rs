//! Order Discord commands - the `orders` command group.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData, View,
            commands::{
                reply::{
                    completion_icon, join_capped, optional_date, order_line, scope_header,
                    send_export,
                },
                work::{CompletionChoice, CompletionFilterChoice},
            },
            handlers::autocomplete,
        },
        core::{
            fetch,
            format::format_amount,
            mutations::{self, OrderDraft},
            pipeline::StatusFilter,
            report,
        },
        errors::{Error, Result, ValidationError},
        models::{CompletionStatus, OrderUpdate},
    };

    /// Parent command for purchase orders.
    #[poise::command(
        slash_command,
        subcommands(
            "order_list",
            "order_new",
            "order_toggle",
            "order_edit",
            "order_delete",
            "order_export"
        )
    )]
    pub async fn orders(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Ordini. Sottocomandi disponibili:\n\
            `/orders list` - Elenca gli ordini del turno\n\
            `/orders new` - Registra un acquisto\n\
            `/orders toggle` - Segna come completato/da fare\n\
            `/orders edit` - Modifica un ordine\n\
            `/orders delete` - Elimina un ordine\n\
            `/orders export` - Esporta gli ordini completati del turno in Excel";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Lists the orders of the selected shift(s), pending ones first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn order_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Status filter (default: all)"] status: Option<CompletionFilterChoice>,
        #[description = "Search title, description or category"] search: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;

        let scope = data.scope(View::Orders).await?;
        if scope.selection.is_none() {
            ctx.say(format!("{}\n❌ Seleziona un turno con `/shift`.", scope_header(&scope)))
                .await?;
            return Ok(());
        }

        let cached = fetch::load_orders(data.api.as_ref(), &data.orders, &scope).await?;
        let filter = status.map_or(StatusFilter::All, StatusFilter::from);
        let shown = data.views.lock().await.order_list.get(
            cached.generation,
            &cached.items,
            filter,
            search.as_deref().unwrap_or(""),
        );

        let total: f64 = shown.iter().map(|o| o.amount).sum();
        let header = format!(
            "{}\n🧾 **Ordini** ({} di {}) · totale {}",
            scope_header(&scope),
            shown.len(),
            cached.items.len(),
            format_amount(total)
        );
        if shown.is_empty() {
            ctx.say(format!("{header}\n_Nessun ordine trovato_")).await?;
            return Ok(());
        }

        let lines: Vec<String> = shown.iter().map(order_line).collect();
        ctx.say(join_capped(&header, &lines)).await?;
        Ok(())
    }

    /// Records a purchase on the selected shift.
    #[poise::command(slash_command, rename = "new")]
    pub async fn order_new(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "What was bought"] title: String,
        #[description = "Price in euro"] amount: f64,
        #[description = "Spending category"]
        #[autocomplete = "autocomplete::autocomplete_order_category"]
        category: String,
        #[description = "Purchase date, dd/mm/yyyy (default: today)"] date: Option<String>,
        #[description = "Free notes"] notes: Option<String>,
        #[description = "Initial status (default: to do)"] status: Option<CompletionChoice>,
    ) -> Result<()> {
        let data = ctx.data();
        let order_date = match optional_date(date.as_deref()) {
            Ok(d) => d,
            Err(reply) => {
                ctx.say(reply).await?;
                return Ok(());
            }
        };

        let scope = data.scope(View::Orders).await?;
        let draft = OrderDraft {
            title,
            amount: Some(amount),
            category: Some(category),
            order_date,
            notes,
            status: status.map(CompletionStatus::from),
        };
        let created =
            mutations::create_order(data.api.as_ref(), &data.orders, &scope.selection, draft)
                .await?;

        ctx.say(format!("✅ Ordine registrato:\n{}", order_line(&created)))
            .await?;
        Ok(())
    }

    /// Marks an order as completed, or as pending again.
    #[poise::command(slash_command, rename = "toggle")]
    pub async fn order_toggle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order id"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let current = data.api.get_order(id).await?;
        let status =
            mutations::toggle_order_status(data.api.as_ref(), &data.orders, id, current.status)
                .await?;

        ctx.say(format!(
            "{} Ordine `#{id}` ora è **{status}**.",
            completion_icon(status)
        ))
        .await?;
        Ok(())
    }

    /// Edits an order.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn order_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order id"] id: i64,
        #[description = "New title"] title: Option<String>,
        #[description = "New amount in euro"] amount: Option<f64>,
        #[description = "New category"]
        #[autocomplete = "autocomplete::autocomplete_order_category"]
        category: Option<String>,
        #[description = "New purchase date, dd/mm/yyyy"] date: Option<String>,
        #[description = "New notes"] notes: Option<String>,
        #[description = "New status"] status: Option<CompletionChoice>,
    ) -> Result<()> {
        let data = ctx.data();
        let order_date = match optional_date(date.as_deref()) {
            Ok(d) => d,
            Err(reply) => {
                ctx.say(reply).await?;
                return Ok(());
            }
        };

        let update = OrderUpdate {
            title,
            amount,
            category,
            order_date,
            status: status.map(CompletionStatus::from),
            notes,
        };
        if update == OrderUpdate::default() {
            ctx.say("❌ Specifica almeno un campo da modificare.")
                .await?;
            return Ok(());
        }

        let updated = mutations::update_order(data.api.as_ref(), &data.orders, id, update).await?;
        ctx.say(format!("✅ Ordine aggiornato:\n{}", order_line(&updated)))
            .await?;
        Ok(())
    }

    /// Deletes an order.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn order_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order id"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        mutations::delete_order(data.api.as_ref(), &data.orders, id).await?;
        ctx.say(format!("✅ Ordine `#{id}` eliminato.")).await?;
        Ok(())
    }

    /// Exports the completed orders of the selected shift as a spreadsheet.
    #[poise::command(slash_command, rename = "export")]
    pub async fn order_export(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;

        let scope = data.scope(View::Orders).await?;
        let shift = scope.selection.shift().ok_or(ValidationError::ShiftRequired)?;
        let export = report::export_shift_orders(data.api.as_ref(), shift).await?;
        send_export(ctx, export).await
    }
}

// Re-export all commands
pub use inner::*;
