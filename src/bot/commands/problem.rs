//! Damage report Discord commands - `problems` and `boats`.
//!
//! Lists go through the shared filter/search pipeline; every write goes through
//! `core::mutations`, which validates and invalidates the cache.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        api::ProblemQuery,
        bot::{
            BotData, View,
            commands::reply::{
                join_capped, optional_date, problem_icon, problem_line, scope_header,
            },
            handlers::autocomplete,
        },
        core::{
            fetch,
            format::format_date,
            mutations::{self, ProblemDraft},
            pipeline::StatusFilter,
        },
        errors::{Error, Result},
        models::{Boat, BoatType, Problem, ProblemStatus, ProblemUpdate},
    };
    use std::{collections::HashMap, fmt::Write};

    /// Status filter offered by `/problems list`.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum ProblemFilterChoice {
        #[name = "Tutti"]
        All,
        #[name = "Aperti"]
        Open,
        #[name = "Risolti"]
        Closed,
    }

    impl From<ProblemFilterChoice> for StatusFilter<ProblemStatus> {
        fn from(choice: ProblemFilterChoice) -> Self {
            match choice {
                ProblemFilterChoice::All => Self::All,
                ProblemFilterChoice::Open => Self::Only(ProblemStatus::Open),
                ProblemFilterChoice::Closed => Self::Only(ProblemStatus::Closed),
            }
        }
    }

    /// Status offered by `/problems edit`.
    #[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
    pub enum ProblemStatusChoice {
        #[name = "Aperto"]
        Open,
        #[name = "Risolto"]
        Closed,
    }

    impl From<ProblemStatusChoice> for ProblemStatus {
        fn from(choice: ProblemStatusChoice) -> Self {
            match choice {
                ProblemStatusChoice::Open => Self::Open,
                ProblemStatusChoice::Closed => Self::Closed,
            }
        }
    }

    async fn boat_id_by_name(data: &BotData, name: Option<&str>) -> Result<Option<i64>> {
        let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
            return Ok(None);
        };
        let boats = data.api.list_boats(None).await?;
        Ok(boats
            .into_iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .map(|b| b.id))
    }

    /// Parent command for boat damage reports.
    #[poise::command(
        slash_command,
        subcommands(
            "problem_list",
            "problem_new",
            "problem_toggle",
            "problem_edit",
            "problem_delete",
            "problem_info"
        )
    )]
    pub async fn problems(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Segnalazioni danni. Sottocomandi disponibili:\n\
            `/problems list` - Elenca le segnalazioni del turno\n\
            `/problems new` - Nuova segnalazione\n\
            `/problems toggle` - Apri/chiudi una segnalazione\n\
            `/problems edit` - Modifica una segnalazione\n\
            `/problems delete` - Elimina una segnalazione\n\
            `/problems info` - Dettagli di una segnalazione";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Lists the damage reports of the selected shift(s), open ones first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn problem_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Status filter (default: all)"] status: Option<ProblemFilterChoice>,
        #[description = "Search description, part or boat"] search: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        ctx.defer().await?;

        let scope = data.scope(View::Problems).await?;
        if scope.selection.is_none() {
            ctx.say(format!("{}\n❌ Seleziona un turno con `/shift`.", scope_header(&scope)))
                .await?;
            return Ok(());
        }

        let cached = fetch::load_problems(data.api.as_ref(), &data.problems, &scope).await?;
        let filter = status.map_or(StatusFilter::All, StatusFilter::from);
        let shown = data.views.lock().await.problem_list.get(
            cached.generation,
            &cached.items,
            filter,
            search.as_deref().unwrap_or(""),
        );

        let header = format!(
            "{}\n🛠️ **Segnalazioni** ({} di {})",
            scope_header(&scope),
            shown.len(),
            cached.items.len()
        );
        if shown.is_empty() {
            ctx.say(format!("{header}\n_Nessuna segnalazione trovata_"))
                .await?;
            return Ok(());
        }

        let lines: Vec<String> = shown.iter().map(problem_line).collect();
        ctx.say(join_capped(&header, &lines)).await?;
        Ok(())
    }

    /// Files a damage report on the selected shift.
    #[poise::command(slash_command, rename = "new")]
    pub async fn problem_new(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Damaged boat"]
        #[autocomplete = "autocomplete::autocomplete_boat"]
        boat: String,
        #[description = "What is broken"] description: String,
        #[description = "Damaged part"]
        #[autocomplete = "autocomplete::autocomplete_part"]
        part: Option<String>,
        #[description = "Report date, dd/mm/yyyy (default: today)"] date: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let reported_date = match optional_date(date.as_deref()) {
            Ok(d) => d,
            Err(reply) => {
                ctx.say(reply).await?;
                return Ok(());
            }
        };

        let boat_id = boat_id_by_name(data, Some(&boat)).await?;
        let scope = data.scope(View::Problems).await?;
        let draft = ProblemDraft {
            boat_id,
            description,
            part_affected: part,
            reported_date,
        };
        let created =
            mutations::create_problem(data.api.as_ref(), &data.problems, &scope.selection, draft)
                .await?;

        ctx.say(format!(
            "✅ Segnalazione `#{}` registrata per **{boat}**.",
            created.id
        ))
        .await?;
        Ok(())
    }

    /// Opens a closed damage report or closes an open one.
    #[poise::command(slash_command, rename = "toggle")]
    pub async fn problem_toggle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Report id"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        let current = data.api.get_problem(id).await?;
        let status =
            mutations::toggle_problem_status(data.api.as_ref(), &data.problems, id, current.status)
                .await?;

        ctx.say(format!(
            "{} Segnalazione `#{id}` ora è **{status}**.",
            problem_icon(status)
        ))
        .await?;
        Ok(())
    }

    /// Edits a damage report.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn problem_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Report id"] id: i64,
        #[description = "New description"] description: Option<String>,
        #[description = "New damaged part"]
        #[autocomplete = "autocomplete::autocomplete_part"]
        part: Option<String>,
        #[description = "New status"] status: Option<ProblemStatusChoice>,
        #[description = "Repair date, dd/mm/yyyy"] resolved: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let resolved_date = match optional_date(resolved.as_deref()) {
            Ok(d) => d,
            Err(reply) => {
                ctx.say(reply).await?;
                return Ok(());
            }
        };

        let update = ProblemUpdate {
            description,
            part_affected: part,
            status: status.map(ProblemStatus::from),
            resolved_date,
        };
        if update == ProblemUpdate::default() {
            ctx.say("❌ Specifica almeno un campo da modificare.")
                .await?;
            return Ok(());
        }

        let updated =
            mutations::update_problem(data.api.as_ref(), &data.problems, id, update).await?;
        ctx.say(format!("✅ Segnalazione aggiornata:\n{}", problem_line(&updated)))
            .await?;
        Ok(())
    }

    /// Deletes a damage report.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn problem_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Report id"] id: i64,
    ) -> Result<()> {
        let data = ctx.data();
        mutations::delete_problem(data.api.as_ref(), &data.problems, id).await?;
        ctx.say(format!("✅ Segnalazione `#{id}` eliminata.")).await?;
        Ok(())
    }

    /// Shows every detail of a damage report.
    #[poise::command(slash_command, rename = "info")]
    pub async fn problem_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Report id"] id: i64,
    ) -> Result<()> {
        let problem = ctx.data().api.get_problem(id).await?;

        let boat = problem.boat_name.as_deref().unwrap_or("Imbarcazione");
        let mut response = format!(
            "{} **Segnalazione #{}** - {boat}",
            problem_icon(problem.status),
            problem.id
        );
        if let Some(boat_type) = &problem.boat_type {
            write!(&mut response, " ({boat_type})")?;
        }
        writeln!(&mut response, "\n")?;
        writeln!(&mut response, "{}", problem.description)?;
        if let Some(part) = &problem.part_affected {
            writeln!(&mut response, "🔧 Parte: {part}")?;
        }
        writeln!(&mut response, "📊 Stato: {}", problem.status)?;
        writeln!(
            &mut response,
            "📅 Segnalata: {}",
            format_date(Some(problem.reported_date))
        )?;
        writeln!(
            &mut response,
            "✔️ Risolta: {}",
            format_date(problem.resolved_date)
        )?;

        ctx.say(response).await?;
        Ok(())
    }

    /// Fleet grouped by boat type, each boat with its open damage report count.
    pub(crate) fn fleet_lines(boats: &[Boat], open: &[Problem]) -> Vec<String> {
        let mut open_per_boat: HashMap<i64, usize> = HashMap::new();
        for problem in open {
            *open_per_boat.entry(problem.boat_id).or_default() += 1;
        }

        let mut lines = Vec::new();
        for boat_type in BoatType::ALL {
            let of_type: Vec<_> = boats.iter().filter(|b| b.boat_type == boat_type).collect();
            if of_type.is_empty() {
                continue;
            }
            lines.push(format!("**{boat_type}**"));
            for boat in of_type {
                lines.push(match open_per_boat.get(&boat.id) {
                    Some(n) => format!("• {} - 🔴 {n} aperte", boat.name),
                    None => format!("• {} - 🟢", boat.name),
                });
            }
        }
        lines
    }

    /// Lists the fleet with the number of open damage reports per boat.
    #[poise::command(slash_command)]
    pub async fn boats(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this boat type"]
        #[autocomplete = "autocomplete::autocomplete_boat_type"]
        boat_type: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let boat_type = match boat_type.as_deref().map(str::parse::<BoatType>) {
            None => None,
            Some(Ok(t)) => Some(t),
            Some(Err(_)) => {
                ctx.say("❌ Tipo di imbarcazione non valido.").await?;
                return Ok(());
            }
        };

        let open_query = ProblemQuery {
            status_filter: Some(ProblemStatus::Open),
            ..ProblemQuery::default()
        };
        let (boats, open) = futures::try_join!(
            data.api.list_boats(boat_type),
            data.api.list_problems(&open_query),
        )?;

        if boats.is_empty() {
            ctx.say("⛵ Nessuna imbarcazione trovata.").await?;
            return Ok(());
        }

        ctx.say(join_capped("⛵ **Flotta**", &fleet_lines(&boats, &open)))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
