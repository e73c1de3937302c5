//! Aggregates computed by the backend's reporting endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Order counters of a season.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Spending of completed orders
    pub total_amount: f64,
    /// Every order, whatever the status
    pub total_count: u32,
    /// Still pending
    pub pending_count: u32,
    /// Completed
    pub completed_count: u32,
}

/// Work counters of a season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSummary {
    /// Every work item
    pub total_count: u32,
    /// Still pending
    pub pending_count: u32,
    /// Completed
    pub completed_count: u32,
    /// Completed works per category
    #[serde(default)]
    pub by_category: BTreeMap<String, u32>,
}

/// Damage report counters of a season.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSummary {
    /// Every report
    pub total_count: u32,
    /// Still open
    pub open_count: u32,
    /// Repaired
    pub closed_count: u32,
}

/// One row of the per-shift breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftDigest {
    /// Shift position in the season
    pub shift_number: i32,
    /// First day, ISO formatted
    pub start_date: String,
    /// Last day, ISO formatted
    pub end_date: String,
    /// Orders of the shift
    pub orders_count: u32,
    /// Spending of the shift, all statuses
    pub orders_amount: f64,
    /// Works of the shift
    pub works_count: u32,
    /// Damage reports of the shift
    pub problems_count: u32,
}

/// Season-wide aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonReport {
    /// Season display name
    pub season_name: String,
    /// Season year
    pub season_year: i32,
    /// Spending of completed orders
    pub total_orders_amount: f64,
    /// Completed orders
    pub total_orders_count: u32,
    /// Completed works
    pub total_works_count: u32,
    /// Every damage report
    pub total_problems_count: u32,
    /// Per-shift breakdown
    #[serde(default)]
    pub shifts_data: Vec<ShiftDigest>,
    /// Order counters
    pub orders_summary: OrderSummary,
    /// Work counters
    pub works_summary: WorkSummary,
    /// Damage report counters
    pub problems_summary: ProblemSummary,
    /// Completed spending per category
    #[serde(default)]
    pub orders_by_category: BTreeMap<String, f64>,
    /// Spending per month (`YYYY-MM`)
    #[serde(default)]
    pub orders_by_month: BTreeMap<String, f64>,
    /// Completed works per month (`YYYY-MM`)
    #[serde(default)]
    pub works_by_month: BTreeMap<String, u32>,
}

/// Totals block of a shift report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftTotals {
    /// Spending, all statuses
    pub total_orders_amount: f64,
    /// Orders
    pub total_orders_count: u32,
    /// Works
    pub total_works_count: u32,
    /// Damage reports
    pub total_problems_count: u32,
}

/// Shift-wide aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftReport {
    /// Shift position in the season
    pub shift_number: i32,
    /// First day, ISO formatted
    pub start_date: String,
    /// Last day, ISO formatted
    pub end_date: String,
    /// Totals
    pub summary: ShiftTotals,
}
