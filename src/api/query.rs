//! Query-string parameters accepted by the list and export endpoints.

use crate::models::{CompletionStatus, ProblemStatus, WorkCategory};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};

/// Sort direction for server-side and client-side sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    Asc,
    /// Largest first
    #[default]
    Desc,
}

impl SortDirection {
    /// The other direction.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Filters for `GET /api/problems/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProblemQuery {
    /// Only reports for this boat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boat_id: Option<i64>,
    /// Only reports with this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<ProblemStatus>,
    /// Only reports of this shift
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<i64>,
}

impl ProblemQuery {
    /// Every report of one shift.
    #[must_use]
    pub fn for_shift(shift_id: i64) -> Self {
        Self {
            shift_id: Some(shift_id),
            ..Self::default()
        }
    }
}

/// Filters for `GET /api/works/` and its export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkQuery {
    /// Only works with this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<CompletionStatus>,
    /// Only works of this shift
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<i64>,
    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Earliest work date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Latest work date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    /// Only this category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<WorkCategory>,
    /// Server-side sort column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<&'static str>,
    /// Server-side sort direction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortDirection>,
}

impl WorkQuery {
    /// Every work of one shift.
    #[must_use]
    pub fn for_shift(shift_id: i64) -> Self {
        Self {
            shift_id: Some(shift_id),
            ..Self::default()
        }
    }
}

/// Filters for `GET /api/orders/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderQuery {
    /// Only orders with this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<CompletionStatus>,
    /// Only orders of this shift
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<i64>,
    /// Free-text search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Earliest purchase date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Latest purchase date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
    /// Only this category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Minimum amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_min: Option<f64>,
    /// Maximum amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_max: Option<f64>,
    /// Server-side sort column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<&'static str>,
    /// Server-side sort direction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortDirection>,
}

impl OrderQuery {
    /// Every order of one shift.
    #[must_use]
    pub fn for_shift(shift_id: i64) -> Self {
        Self {
            shift_id: Some(shift_id),
            ..Self::default()
        }
    }
}

/// Parameters for `GET /api/orders/export`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderExportQuery {
    /// Shifts to include, sent as `1,2,3`
    #[serde(
        serialize_with = "comma_separated",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub shift_ids: Vec<i64>,
    /// Single shift, used instead of `shift_ids`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift_id: Option<i64>,
    /// Only orders with this status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<CompletionStatus>,
    /// Sort column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<&'static str>,
    /// Sort direction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortDirection>,
}

fn comma_separated<S: Serializer>(ids: &[i64], serializer: S) -> Result<S::Ok, S::Error> {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}
