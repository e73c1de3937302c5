//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are plain strings; the commands parse them back with the helpers in this
//! module so the label format lives in one place.

use crate::{
    bot::BotData,
    core::{format::shift_label, selection::ShiftSelection},
    errors::Error,
    models::{BoatType, ORDER_CATEGORIES, Shift, WorkCategory, season::sort_by_number},
};

/// Label of the all-shifts choice.
pub const ALL_SHIFTS: &str = "Tutti";

/// Autocomplete value of a shift: `"<number> · <label>"`.
#[must_use]
pub fn shift_choice(shift: &Shift) -> String {
    format!("{} · {}", shift.shift_number, shift_label(shift))
}

/// Parses a shift choice back into a selection.
///
/// Accepts `Tutti`, a bare shift number or a full [`shift_choice`] label.
#[must_use]
pub fn parse_shift_choice(input: &str, season_id: i64, shifts: &[Shift]) -> Option<ShiftSelection> {
    let input = input.trim();
    if input.eq_ignore_ascii_case(ALL_SHIFTS) {
        return Some(ShiftSelection::All { season_id });
    }
    let digits: String = input.chars().take_while(char::is_ascii_digit).collect();
    let number: i32 = digits.parse().ok()?;
    shifts
        .iter()
        .find(|s| s.shift_number == number)
        .cloned()
        .map(ShiftSelection::Specific)
}

/// Suggestions that need the backend are only offered to staff.
fn is_staff(ctx: poise::Context<'_, BotData, Error>) -> bool {
    ctx.data().config.access.allows(ctx.author().id.get())
}

fn filter_sorted(candidates: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = candidates
        .into_iter()
        .filter(|c| c.to_lowercase().contains(&partial_lower))
        .take(25) // Discord autocomplete limit
        .collect();
    matching.sort();
    matching
}

/// Suggests season names.
pub async fn autocomplete_season(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    if !is_staff(ctx) {
        return Vec::new();
    }
    let Ok(seasons) = ctx.data().api.list_seasons().await else {
        return Vec::new();
    };
    filter_sorted(seasons.into_iter().map(|s| s.name), partial)
}

/// Suggests the shifts of the selected season, plus `Tutti`, in shift order.
pub async fn autocomplete_shift(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    if !is_staff(ctx) {
        return Vec::new();
    }
    let data = ctx.data();
    let Some(season_id) = data.session.read().await.selected_season().map(|s| s.id) else {
        return Vec::new();
    };
    let Ok(mut shifts) = data.api.list_shifts(season_id).await else {
        return Vec::new();
    };
    sort_by_number(&mut shifts);

    let partial_lower = partial.to_lowercase();
    std::iter::once(ALL_SHIFTS.to_string())
        .chain(shifts.iter().map(shift_choice))
        .filter(|c| c.to_lowercase().contains(&partial_lower))
        .take(25)
        .collect()
}

/// Suggests boat names from the fleet.
pub async fn autocomplete_boat(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    if !is_staff(ctx) {
        return Vec::new();
    }
    let Ok(boats) = ctx.data().api.list_boats(None).await else {
        return Vec::new();
    };
    filter_sorted(boats.into_iter().map(|b| b.name), partial)
}

/// Suggests boat types.
pub async fn autocomplete_boat_type(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_sorted(BoatType::ALL.iter().map(ToString::to_string), partial)
}

/// Suggests the parts of the boat named in the `boat` option, when it is already filled.
pub async fn autocomplete_part(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    if !is_staff(ctx) {
        return Vec::new();
    }
    let api = ctx.data().api.as_ref();
    let Ok(boats) = api.list_boats(None).await else {
        return Vec::new();
    };
    let chosen = boat_option(ctx).and_then(|name| {
        boats
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(&name))
            .map(|b| b.boat_type)
    });
    let types: Vec<BoatType> = chosen.map_or_else(|| BoatType::ALL.to_vec(), |t| vec![t]);

    let mut parts = Vec::new();
    for boat_type in types {
        if let Ok(found) = api.boat_parts(boat_type).await {
            parts.extend(found);
        }
    }
    parts.sort();
    parts.dedup();
    filter_sorted(parts, partial)
}

fn boat_option(ctx: poise::Context<'_, BotData, Error>) -> Option<String> {
    let poise::Context::Application(app) = ctx else {
        return None;
    };
    find_string_option(&app.interaction.data.options, "boat")
}

fn find_string_option(
    options: &[poise::serenity_prelude::CommandDataOption],
    name: &str,
) -> Option<String> {
    use poise::serenity_prelude::CommandDataOptionValue as Value;
    options.iter().find_map(|o| match &o.value {
        Value::String(s) if o.name == name => Some(s.clone()),
        Value::Autocomplete { value, .. } if o.name == name => Some(value.clone()),
        Value::SubCommand(inner) | Value::SubCommandGroup(inner) => {
            find_string_option(inner, name)
        }
        _ => None,
    })
}

/// Suggests work categories.
pub async fn autocomplete_work_category(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    WorkCategory::ALL
        .iter()
        .map(ToString::to_string)
        .filter(|c| c.to_lowercase().contains(&partial.to_lowercase()))
        .collect()
}

/// Suggests order categories. Free text is accepted as well.
pub async fn autocomplete_order_category(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    ORDER_CATEGORIES
        .iter()
        .map(ToString::to_string)
        .filter(|c| c.to_lowercase().contains(&partial.to_lowercase()))
        .collect()
}
