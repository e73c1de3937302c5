//! Records exchanged with the lniworks backend.
//!
//! These are plain serde structs. The client never owns their persistence; it only keeps
//! transient copies for display.

/// Boats and damage reports
pub mod boat;
/// Purchase orders
pub mod order;
/// Backend aggregates
pub mod report;
/// Seasons and shifts
pub mod season;
/// Two-valued statuses
pub mod status;
/// Users and login
pub mod user;
/// Maintenance works
pub mod work;

pub use boat::{Boat, BoatType, NewProblem, Problem, ProblemUpdate};
pub use order::{NewOrder, ORDER_CATEGORIES, Order, OrderUpdate};
pub use report::{SeasonReport, ShiftReport};
pub use season::{Season, Shift};
pub use status::{CompletionStatus, ProblemStatus, TwoState};
pub use user::{Credentials, TokenResponse, User, UserSummary};
pub use work::{NewWork, Work, WorkCategory, WorkUpdate};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Deserializes `null` as the type's default instead of failing.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Parses a backend timestamp leniently.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` date-time or a plain date.
/// Anything else yields `None`.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let naive = parse_timestamp("2025-07-01T10:30:00.123456");
        assert!(naive.is_some());

        let zoned = parse_timestamp("2025-07-01T10:30:00+02:00");
        assert_eq!(
            zoned.map(|d| d.format("%H:%M").to_string()),
            Some("08:30".to_string())
        );

        let date_only = parse_timestamp("2025-07-01");
        assert_eq!(
            date_only.map(|d| d.format("%Y-%m-%d %H:%M").to_string()),
            Some("2025-07-01 00:00".to_string())
        );

        assert_eq!(parse_timestamp("ieri"), None);
    }
}
