//! Display helpers shared by every reply.

use crate::models::Shift;
use chrono::NaiveDate;

const ORDINALS: [&str; 6] = ["Primo", "Secondo", "Terzo", "Quarto", "Quinto", "Sesto"];

/// Italian ordinal name of a shift ("Primo" .. "Sesto"), else `Turno n`.
#[must_use]
pub fn shift_ordinal_name(shift_number: i32) -> String {
    usize::try_from(shift_number)
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| ORDINALS.get(i))
        .map_or_else(|| format!("Turno {shift_number}"), |name| (*name).to_string())
}

/// `Secondo turno (01/07 - 14/07)`.
#[must_use]
pub fn shift_label(shift: &Shift) -> String {
    format!(
        "{} turno ({} - {})",
        shift_ordinal_name(shift.shift_number),
        shift.start_date.format("%d/%m"),
        shift.end_date.format("%d/%m")
    )
}

/// `dd/mm/yyyy`, or `N/A` when absent.
#[must_use]
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "N/A".to_string(), |d| d.format("%d/%m/%Y").to_string())
}

/// Like [`format_date`] for a raw ISO date string from a report.
#[must_use]
pub fn format_iso_date(raw: &str) -> String {
    format_date(NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d").ok())
}

/// Euro amount with two decimals.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    format!("€{amount:.2}")
}

/// Cuts `text` to `max` characters, appending an ellipsis when shortened.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_ordinal_names() {
        assert_eq!(shift_ordinal_name(1), "Primo");
        assert_eq!(shift_ordinal_name(6), "Sesto");
        assert_eq!(shift_ordinal_name(7), "Turno 7");
        assert_eq!(shift_ordinal_name(0), "Turno 0");
        assert_eq!(shift_ordinal_name(-2), "Turno -2");
    }

    #[test]
    fn test_dates() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2025, 7, 3)), "03/07/2025");
        assert_eq!(format_date(None), "N/A");
        assert_eq!(format_iso_date("2025-08-15T10:00:00"), "15/08/2025");
        assert_eq!(format_iso_date("boh"), "N/A");
    }

    #[test]
    fn test_amount_and_truncate() {
        assert_eq!(format_amount(12.5), "€12.50");
        assert_eq!(truncate("Sostituzione drizza randa", 10), "Sostituzio…");
        assert_eq!(truncate("Cime", 25), "Cime");
    }
}
