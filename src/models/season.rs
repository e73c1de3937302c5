//! Seasons and shifts - the scoping entities every list is filtered by.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A yearly season grouping the club's shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// Unique identifier
    pub id: i64,
    /// Calendar year
    pub year: i32,
    /// Display name, usually the year itself (e.g. "2025")
    pub name: String,
}

/// A numbered operating period inside a season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier
    pub id: i64,
    /// Owning season
    pub season_id: i64,
    /// Position within the season, starting at 1
    pub shift_number: i32,
    /// First day of the shift
    pub start_date: NaiveDate,
    /// Last day of the shift
    pub end_date: NaiveDate,
}

/// Sorts shifts by their number, the order every view shows them in.
pub fn sort_by_number(shifts: &mut [Shift]) {
    shifts.sort_by_key(|s| s.shift_number);
}
