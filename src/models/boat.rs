//! Boats and their damage reports ("problems").

use super::status::ProblemStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Class of boat in the club's fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoatType {
    /// Rubber dinghy
    Gommone,
    /// Optimist dinghy
    Optimist,
    /// Fly
    Fly,
    /// Equipe
    Equipe,
    /// Caravella
    Caravella,
    /// Trident
    Trident,
    /// Canoe
    Canoe,
}

impl BoatType {
    /// Every boat type, in the order the fleet list shows them.
    pub const ALL: [Self; 7] = [
        Self::Gommone,
        Self::Optimist,
        Self::Fly,
        Self::Equipe,
        Self::Caravella,
        Self::Trident,
        Self::Canoe,
    ];

    /// Wire and display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gommone => "Gommone",
            Self::Optimist => "Optimist",
            Self::Fly => "Fly",
            Self::Equipe => "Equipe",
            Self::Caravella => "Caravella",
            Self::Trident => "Trident",
            Self::Canoe => "Canoe",
        }
    }
}

impl fmt::Display for BoatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown boat type '{s}'"))
    }
}

/// A boat of the fleet. Read only from this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boat {
    /// Unique identifier
    pub id: i64,
    /// Name painted on the hull
    pub name: String,
    /// Boat class
    #[serde(rename = "type")]
    pub boat_type: BoatType,
}

/// A reported damage on a boat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Unique identifier
    pub id: i64,
    /// Damaged boat
    pub boat_id: i64,
    /// What is broken
    pub description: String,
    /// Part of the boat affected, when known
    #[serde(default)]
    pub part_affected: Option<String>,
    /// Open until repaired
    pub status: ProblemStatus,
    /// Day the damage was reported
    pub reported_date: NaiveDate,
    /// Day the damage was repaired
    #[serde(default)]
    pub resolved_date: Option<NaiveDate>,
    /// Shift the report belongs to
    pub shift_id: i64,
    /// Reporting user
    #[serde(default)]
    pub reported_by: Option<i64>,
    /// Boat name joined in by the backend
    #[serde(default)]
    pub boat_name: Option<String>,
    /// Boat type joined in by the backend
    #[serde(default)]
    pub boat_type: Option<String>,
    /// Creation timestamp as sent by the backend
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Payload for a new damage report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewProblem {
    /// Damaged boat
    pub boat_id: i64,
    /// What is broken
    pub description: String,
    /// Affected part
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_affected: Option<String>,
    /// Day of the report
    pub reported_date: NaiveDate,
    /// Shift the report belongs to (always a real shift)
    pub shift_id: i64,
    /// Initial status
    pub status: ProblemStatus,
}

/// Partial update of a damage report; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProblemUpdate {
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New affected part
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_affected: Option<String>,
    /// New status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProblemStatus>,
    /// Repair day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_date: Option<NaiveDate>,
}
