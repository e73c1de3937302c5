//! Maintenance work items.

use super::status::CompletionStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Area of the club a work item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkCategory {
    /// Camp grounds
    Campo,
    /// Workshop
    Officina,
    /// Facilities
    Servizi,
    /// Rubber dinghies
    Gommoni,
    /// Boats
    Barche,
    /// Sails
    Vele,
    /// Anything else
    Altro,
}

impl WorkCategory {
    /// Every category, in menu order.
    pub const ALL: [Self; 7] = [
        Self::Campo,
        Self::Officina,
        Self::Servizi,
        Self::Gommoni,
        Self::Barche,
        Self::Vele,
        Self::Altro,
    ];

    /// Wire and display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Campo => "Campo",
            Self::Officina => "Officina",
            Self::Servizi => "Servizi",
            Self::Gommoni => "Gommoni",
            Self::Barche => "Barche",
            Self::Vele => "Vele",
            Self::Altro => "Altro",
        }
    }
}

impl fmt::Display for WorkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown work category '{s}'"))
    }
}

/// A maintenance task logged during a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    /// Unique identifier
    pub id: i64,
    /// Short title
    pub title: String,
    /// Longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Area of the club
    pub category: WorkCategory,
    /// Pending until done
    pub status: CompletionStatus,
    /// Day the work was done or planned
    pub work_date: NaiveDate,
    /// Shift the work belongs to
    pub shift_id: i64,
    /// Author id
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Author username joined in by the backend
    #[serde(default)]
    pub created_by: Option<String>,
    /// Creation timestamp as sent by the backend
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp as sent by the backend
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload for a new work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWork {
    /// Short title
    pub title: String,
    /// Longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Area of the club
    pub category: WorkCategory,
    /// Initial status
    pub status: CompletionStatus,
    /// Day of the work
    pub work_date: NaiveDate,
    /// Shift the work belongs to (always a real shift)
    pub shift_id: i64,
}

/// Partial update of a work item; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkUpdate {
    /// New title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<WorkCategory>,
    /// New status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CompletionStatus>,
    /// New date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_date: Option<NaiveDate>,
}
