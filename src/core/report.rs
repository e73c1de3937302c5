//! Dashboard and reports business logic.
//!
//! This module builds the dashboard summary, drives the reports view (shift
//! multi-selection, completed-order table, column sort, pagination) and prepares the
//! spreadsheet exports. All functions are framework-agnostic and return structured data
//! that the bot layer formats.

use crate::{
    api::{ClubApi, OrderExportQuery, OrderQuery, SortDirection, WorkQuery},
    core::{
        fetch::{
            self, QueryCache, fetch_for_shifts, order_recency, problem_recency, recent_slice,
            work_recency,
        },
        selection::{Scope, ShiftSelection},
        session::SessionStore,
    },
    errors::{Result, ValidationError},
    models::{CompletionStatus, Order, Problem, ProblemStatus, SeasonReport, Shift, Work},
};
use std::{cmp::Ordering, str::FromStr};

/// Counters shown at the top of the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    /// Damage reports still open
    pub open_problems: usize,
    /// Works still to do
    pub pending_works: usize,
    /// Works done
    pub completed_works: usize,
    /// Orders not yet completed
    pub pending_orders: usize,
    /// Spending of completed orders
    pub completed_spending: f64,
}

impl DashboardSummary {
    /// Computes the counters from full, untruncated lists.
    ///
    /// # Arguments
    /// * `problems` - Every damage report of the scope
    /// * `works` - Every work item of the scope
    /// * `orders` - Every order of the scope
    #[must_use]
    pub fn from_lists(problems: &[Problem], works: &[Work], orders: &[Order]) -> Self {
        let completed_works = works
            .iter()
            .filter(|w| w.status == CompletionStatus::Completed)
            .count();
        let (completed_orders, pending_orders): (Vec<&Order>, Vec<&Order>) = orders
            .iter()
            .partition(|o| o.status == CompletionStatus::Completed);

        Self {
            open_problems: problems
                .iter()
                .filter(|p| p.status == ProblemStatus::Open)
                .count(),
            pending_works: works.len() - completed_works,
            completed_works,
            pending_orders: pending_orders.len(),
            completed_spending: completed_orders.iter().map(|o| o.amount).sum(),
        }
    }
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    /// Counters over the whole scope
    pub summary: DashboardSummary,
    /// Latest damage reports
    pub recent_problems: Vec<Problem>,
    /// Latest works
    pub recent_works: Vec<Work>,
    /// Latest orders
    pub recent_orders: Vec<Order>,
}

impl DashboardView {
    /// Builds the view from full lists.
    ///
    /// The summary is computed before the lists are cut to `limit` entries.
    #[must_use]
    pub fn build(
        selection: &ShiftSelection,
        problems: &[Problem],
        works: &[Work],
        orders: &[Order],
        limit: usize,
    ) -> Self {
        Self {
            summary: DashboardSummary::from_lists(problems, works, orders),
            recent_problems: recent_slice(selection, problems, problem_recency, limit),
            recent_works: recent_slice(selection, works, work_recency, limit),
            recent_orders: recent_slice(selection, orders, order_recency, limit),
        }
    }
}

/// Loads the three lists of the scope (through their caches) and builds the dashboard.
///
/// # Arguments
/// * `api` - Backend client
/// * `caches` - Problem, work and order caches
/// * `scope` - Resolved season and shift selection
/// * `limit` - Entries per recent list
pub async fn load_dashboard(
    api: &dyn ClubApi,
    caches: (&QueryCache<Problem>, &QueryCache<Work>, &QueryCache<Order>),
    scope: &Scope,
    limit: usize,
) -> Result<DashboardView> {
    let (problem_cache, work_cache, order_cache) = caches;
    let (problems, works, orders) = futures::try_join!(
        fetch::load_problems(api, problem_cache, scope),
        fetch::load_works(api, work_cache, scope),
        fetch::load_orders(api, order_cache, scope),
    )?;

    Ok(DashboardView::build(
        &scope.selection,
        &problems.items,
        &works.items,
        &orders.items,
        limit,
    ))
}

/// Ticks or unticks a shift in the reports view.
pub async fn toggle_report_shift(session: &mut SessionStore, shift_id: i64) {
    let mut ids = session.report_shifts().to_vec();
    if let Some(pos) = ids.iter().position(|id| *id == shift_id) {
        ids.remove(pos);
    } else {
        ids.push(shift_id);
    }
    session.set_report_shifts(ids).await;
}

/// Ticks every shift of the season.
pub async fn select_all_report_shifts(session: &mut SessionStore, shifts: &[Shift]) {
    session
        .set_report_shifts(shifts.iter().map(|s| s.id).collect())
        .await;
}

/// Unticks every shift.
pub async fn clear_report_shifts(session: &mut SessionStore) {
    session.set_report_shifts(Vec::new()).await;
}

/// Completed orders of the given shifts, concatenated in the order of `shift_ids`.
///
/// # Returns
/// An empty list when no shift is given, without contacting the backend.
pub async fn completed_orders_for_shifts(
    api: &dyn ClubApi,
    shift_ids: &[i64],
) -> Result<Vec<Order>> {
    let orders = fetch_for_shifts(shift_ids.iter().copied(), |shift_id| async move {
        api.list_orders(&OrderQuery::for_shift(shift_id)).await
    })
    .await?;

    Ok(orders
        .into_iter()
        .filter(|o| o.status == CompletionStatus::Completed)
        .collect())
}

/// Sortable columns of the reports order table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderSortField {
    /// What was bought
    Title,
    /// Price
    Amount,
    /// Day of purchase
    OrderDate,
    /// Spending category
    Category,
    /// Author
    CreatedBy,
    /// Owning shift
    ShiftId,
}

impl FromStr for OrderSortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "amount" => Ok(Self::Amount),
            "order_date" => Ok(Self::OrderDate),
            "category" => Ok(Self::Category),
            "created_by" => Ok(Self::CreatedBy),
            "shift_id" => Ok(Self::ShiftId),
            other => Err(format!("unknown sort column '{other}'")),
        }
    }
}

/// Current column sort of the reports order table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSort {
    /// Column
    pub field: OrderSortField,
    /// Direction
    pub direction: SortDirection,
}

impl Default for OrderSort {
    fn default() -> Self {
        Self {
            field: OrderSortField::OrderDate,
            direction: SortDirection::Desc,
        }
    }
}

impl OrderSort {
    /// Header click: the same column flips direction, another column starts ascending.
    #[must_use]
    pub fn click(self, field: OrderSortField) -> Self {
        let direction = if self.field == field {
            self.direction.reversed()
        } else {
            SortDirection::Asc
        };
        Self { field, direction }
    }
}

fn compare_orders(a: &Order, b: &Order, field: OrderSortField) -> Ordering {
    match field {
        OrderSortField::Title => a.title.cmp(&b.title),
        OrderSortField::Amount => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
        OrderSortField::OrderDate => a.order_date.cmp(&b.order_date),
        OrderSortField::Category => a.category.cmp(&b.category),
        OrderSortField::CreatedBy => a.created_by.cmp(&b.created_by),
        OrderSortField::ShiftId => a.shift_id.cmp(&b.shift_id),
    }
}

/// Stable column sort; equal keys keep their relative order in either direction.
pub fn sort_orders(orders: &mut [Order], sort: OrderSort) {
    orders.sort_by(|a, b| {
        let ord = compare_orders(a, b, sort.field);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// One page of a longer list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Entries on this page
    pub items: Vec<T>,
    /// 1-based page number actually shown
    pub page: usize,
    /// Number of pages, zero for an empty list (whose `page` is still 1)
    pub total_pages: usize,
}

/// Cuts `items` into pages of `per_page` and returns page `page` (1-based).
///
/// The page number is clamped into range.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_pages = items.len().div_ceil(per_page);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1) * per_page;

    Page {
        items: items.iter().skip(start).take(per_page).cloned().collect(),
        page,
        total_pages,
    }
}

/// Completed spending per category, sorted by amount.
#[must_use]
pub fn category_totals(report: &SeasonReport, direction: SortDirection) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = report
        .orders_by_category
        .iter()
        .map(|(category, amount)| (category.clone(), *amount))
        .collect();
    totals.sort_by(|a, b| {
        let ord = a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    totals
}

/// A spreadsheet produced by the backend, ready to attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// File name to save under
    pub filename: String,
    /// Raw workbook bytes
    pub bytes: Vec<u8>,
}

/// Orders of the ticked report shifts, sorted by id.
///
/// # Arguments
/// * `api` - Backend client
/// * `shift_ids` - Ticked shifts; at least one is required
/// * `filename` - Fixed export file name
pub async fn export_report_orders(
    api: &dyn ClubApi,
    shift_ids: &[i64],
    filename: &str,
) -> Result<Export> {
    if shift_ids.is_empty() {
        return Err(ValidationError::ShiftRequired.into());
    }
    let query = OrderExportQuery {
        shift_ids: shift_ids.to_vec(),
        sort_by: Some("id"),
        order: Some(SortDirection::Asc),
        ..OrderExportQuery::default()
    };
    Ok(Export {
        filename: filename.to_string(),
        bytes: api.export_orders(&query).await?,
    })
}

/// Completed orders of one shift, sorted by id.
pub async fn export_shift_orders(api: &dyn ClubApi, shift: &Shift) -> Result<Export> {
    let query = OrderExportQuery {
        shift_id: Some(shift.id),
        status_filter: Some(CompletionStatus::Completed),
        sort_by: Some("id"),
        order: Some(SortDirection::Asc),
        ..OrderExportQuery::default()
    };
    Ok(Export {
        filename: format!("Ordini_{}.xlsx", shift.shift_number),
        bytes: api.export_orders(&query).await?,
    })
}

/// Works of one shift.
pub async fn export_shift_works(api: &dyn ClubApi, shift: &Shift) -> Result<Export> {
    let query = WorkQuery {
        sort_by: Some("work_date"),
        order: Some(SortDirection::Asc),
        ..WorkQuery::for_shift(shift.id)
    };
    Ok(Export {
        filename: format!("Lavori_{}.xlsx", shift.shift_number),
        bytes: api.export_works(&query).await?,
    })
}

/// Season workbook.
pub async fn export_season(api: &dyn ClubApi, season_id: i64, season_name: &str) -> Result<Export> {
    Ok(Export {
        filename: format!("Resoconto_{season_name}.xlsx"),
        bytes: api.export_season(season_id).await?,
    })
}
