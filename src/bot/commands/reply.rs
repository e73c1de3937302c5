//! Reply formatting shared by the command modules.
//!
//! Discord caps a message at 2000 characters, so every list goes through
//! [`join_capped`] before it is sent.

use crate::{
    bot::BotData,
    core::{
        format::{format_amount, format_date, shift_label, truncate},
        report::Export,
        selection::{Scope, ShiftSelection},
    },
    errors::{Error, Result},
    models::{CompletionStatus, Order, Problem, ProblemStatus, Work},
};
use chrono::NaiveDate;
use poise::serenity_prelude as serenity;

/// Discord message length limit, minus room for a trailer line.
pub const MESSAGE_BUDGET: usize = 1900;

/// Icon of a damage report status.
#[must_use]
pub const fn problem_icon(status: ProblemStatus) -> &'static str {
    match status {
        ProblemStatus::Open => "🔴",
        ProblemStatus::Closed => "🟢",
    }
}

/// Icon of a work or order status.
#[must_use]
pub const fn completion_icon(status: CompletionStatus) -> &'static str {
    match status {
        CompletionStatus::Pending => "⏳",
        CompletionStatus::Completed => "✅",
    }
}

/// One line of a damage report list.
#[must_use]
pub fn problem_line(problem: &Problem) -> String {
    let boat = problem.boat_name.as_deref().unwrap_or("Imbarcazione");
    let part = problem
        .part_affected
        .as_deref()
        .map(|p| format!(" [{p}]"))
        .unwrap_or_default();
    format!(
        "{} `#{}` **{boat}**{part} - {} ({})",
        problem_icon(problem.status),
        problem.id,
        truncate(&problem.description, 60),
        format_date(Some(problem.reported_date))
    )
}

/// One line of a work list.
#[must_use]
pub fn work_line(work: &Work) -> String {
    format!(
        "{} `#{}` **{}** · {} ({})",
        completion_icon(work.status),
        work.id,
        truncate(&work.title, 60),
        work.category,
        format_date(Some(work.work_date))
    )
}

/// One line of an order list.
#[must_use]
pub fn order_line(order: &Order) -> String {
    format!(
        "{} `#{}` **{}** · {} · {} ({})",
        completion_icon(order.status),
        order.id,
        truncate(&order.title, 50),
        format_amount(order.amount),
        order.category,
        format_date(order.order_date)
    )
}

/// Header naming the season and shift(s) a reply is about.
#[must_use]
pub fn scope_header(scope: &Scope) -> String {
    let season = scope
        .season
        .as_ref()
        .map_or_else(|| "nessuna stagione".to_string(), |s| format!("Stagione {}", s.name));
    let shift = match &scope.selection {
        ShiftSelection::None => "nessun turno".to_string(),
        ShiftSelection::Specific(shift) => shift_label(shift),
        ShiftSelection::All { .. } => "Tutti i turni".to_string(),
    };
    format!("📅 {season} · {shift}")
}

/// Joins `lines` under `header`, dropping the lines that would exceed the message budget.
#[must_use]
pub fn join_capped(header: &str, lines: &[String]) -> String {
    let mut out = String::from(header);
    for (shown, line) in lines.iter().enumerate() {
        if out.len() + line.len() + 1 > MESSAGE_BUDGET {
            out.push_str(&format!("\n… e altri {}", lines.len() - shown));
            return out;
        }
        out.push('\n');
        out.push_str(line);
    }
    out
}

/// Parses a date typed as `gg/mm/aaaa` or `aaaa-mm-gg`.
#[must_use]
pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y-%m-%d"))
        .ok()
}

/// Parses an optional date option; `Err` carries the reply for a malformed date.
pub fn optional_date(input: Option<&str>) -> std::result::Result<Option<NaiveDate>, String> {
    match input {
        None => Ok(None),
        Some(raw) => parse_date_input(raw)
            .map(Some)
            .ok_or_else(|| format!("❌ Data '{raw}' non valida, usa gg/mm/aaaa.")),
    }
}

/// Attaches an exported workbook to the reply.
pub async fn send_export(ctx: poise::Context<'_, BotData, Error>, export: Export) -> Result<()> {
    let content = format!("📎 {}", export.filename);
    let attachment = serenity::CreateAttachment::bytes(export.bytes, export.filename);
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .attachment(attachment),
    )
    .await?;
    Ok(())
}
