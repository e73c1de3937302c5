//! Writes: status toggles, creation, edits and deletion.
//!
//! Every mutation validates its input before anything is sent, writes through
//! [`ClubApi`] and invalidates the resource's [`QueryCache`] once the backend has
//! accepted the change. A failed write returns its error and leaves the cache alone.

use crate::{
    api::ClubApi,
    core::{fetch::QueryCache, selection::ShiftSelection},
    errors::{Result, ValidationError},
    models::{
        CompletionStatus, NewOrder, NewProblem, NewWork, Order, OrderUpdate, Problem,
        ProblemStatus, ProblemUpdate, TwoState, Work, WorkCategory, WorkUpdate,
    },
};
use chrono::{Local, NaiveDate};
use tracing::info;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn check_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::AmountInvalid.into())
    }
}

/// Flips a damage report between open and closed. Returns the new status.
pub async fn toggle_problem_status(
    api: &dyn ClubApi,
    cache: &QueryCache<Problem>,
    id: i64,
    current: ProblemStatus,
) -> Result<ProblemStatus> {
    let status = current.toggled();
    let update = ProblemUpdate {
        status: Some(status),
        ..ProblemUpdate::default()
    };
    api.update_problem(id, &update).await?;
    cache.invalidate().await;
    info!("Problem {id} is now {}", status.as_str());
    Ok(status)
}

/// Flips a work item between pending and completed. Returns the new status.
pub async fn toggle_work_status(
    api: &dyn ClubApi,
    cache: &QueryCache<Work>,
    id: i64,
    current: CompletionStatus,
) -> Result<CompletionStatus> {
    let status = current.toggled();
    let update = WorkUpdate {
        status: Some(status),
        ..WorkUpdate::default()
    };
    api.update_work(id, &update).await?;
    cache.invalidate().await;
    info!("Work {id} is now {}", status.as_str());
    Ok(status)
}

/// Flips an order between pending and completed. Returns the new status.
pub async fn toggle_order_status(
    api: &dyn ClubApi,
    cache: &QueryCache<Order>,
    id: i64,
    current: CompletionStatus,
) -> Result<CompletionStatus> {
    let status = current.toggled();
    let update = OrderUpdate {
        status: Some(status),
        ..OrderUpdate::default()
    };
    api.update_order(id, &update).await?;
    cache.invalidate().await;
    info!("Order {id} is now {}", status.as_str());
    Ok(status)
}

/// Form input for a new damage report.
#[derive(Debug, Clone, Default)]
pub struct ProblemDraft {
    /// Damaged boat
    pub boat_id: Option<i64>,
    /// What is broken
    pub description: String,
    /// Damaged part
    pub part_affected: Option<String>,
    /// Day the damage was found; today when absent
    pub reported_date: Option<NaiveDate>,
}

/// Files a damage report on the selected shift.
pub async fn create_problem(
    api: &dyn ClubApi,
    cache: &QueryCache<Problem>,
    selection: &ShiftSelection,
    draft: ProblemDraft,
) -> Result<Problem> {
    let boat_id = draft.boat_id.ok_or(ValidationError::BoatRequired)?;
    let shift_id = selection.shift_id_for_write()?;
    if draft.description.trim().is_empty() {
        return Err(ValidationError::DescriptionRequired.into());
    }

    let payload = NewProblem {
        boat_id,
        description: draft.description.trim().to_string(),
        part_affected: non_blank(draft.part_affected),
        reported_date: draft.reported_date.unwrap_or_else(today),
        shift_id,
        status: ProblemStatus::Open,
    };
    let created = api.create_problem(&payload).await?;
    cache.invalidate().await;
    info!("Created problem {} on shift {shift_id}", created.id);
    Ok(created)
}

/// Edits a damage report.
pub async fn update_problem(
    api: &dyn ClubApi,
    cache: &QueryCache<Problem>,
    id: i64,
    update: ProblemUpdate,
) -> Result<Problem> {
    if update
        .description
        .as_deref()
        .is_some_and(|d| d.trim().is_empty())
    {
        return Err(ValidationError::DescriptionRequired.into());
    }
    let updated = api.update_problem(id, &update).await?;
    cache.invalidate().await;
    Ok(updated)
}

/// Deletes a damage report.
pub async fn delete_problem(api: &dyn ClubApi, cache: &QueryCache<Problem>, id: i64) -> Result<()> {
    api.delete_problem(id).await?;
    cache.invalidate().await;
    info!("Deleted problem {id}");
    Ok(())
}

/// Form input for a new work item.
#[derive(Debug, Clone, Default)]
pub struct WorkDraft {
    /// Short title
    pub title: String,
    /// Longer description
    pub description: Option<String>,
    /// Area of the club
    pub category: Option<WorkCategory>,
    /// Day of the work; today when absent
    pub work_date: Option<NaiveDate>,
    /// Initial status; pending when absent
    pub status: Option<CompletionStatus>,
}

/// Logs a work item on the selected shift.
pub async fn create_work(
    api: &dyn ClubApi,
    cache: &QueryCache<Work>,
    selection: &ShiftSelection,
    draft: WorkDraft,
) -> Result<Work> {
    let shift_id = selection.shift_id_for_write()?;
    if draft.title.trim().is_empty() {
        return Err(ValidationError::TitleRequired.into());
    }
    let category = draft.category.ok_or(ValidationError::CategoryRequired)?;

    let payload = NewWork {
        title: draft.title.trim().to_string(),
        description: non_blank(draft.description),
        category,
        status: draft.status.unwrap_or_default(),
        work_date: draft.work_date.unwrap_or_else(today),
        shift_id,
    };
    let created = api.create_work(&payload).await?;
    cache.invalidate().await;
    info!("Created work {} on shift {shift_id}", created.id);
    Ok(created)
}

/// Edits a work item.
pub async fn update_work(
    api: &dyn ClubApi,
    cache: &QueryCache<Work>,
    id: i64,
    update: WorkUpdate,
) -> Result<Work> {
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ValidationError::TitleRequired.into());
    }
    let updated = api.update_work(id, &update).await?;
    cache.invalidate().await;
    Ok(updated)
}

/// Deletes a work item.
pub async fn delete_work(api: &dyn ClubApi, cache: &QueryCache<Work>, id: i64) -> Result<()> {
    api.delete_work(id).await?;
    cache.invalidate().await;
    info!("Deleted work {id}");
    Ok(())
}

/// Form input for a new purchase order.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    /// What was bought
    pub title: String,
    /// Price in euro
    pub amount: Option<f64>,
    /// Spending category
    pub category: Option<String>,
    /// Day of purchase; today when absent
    pub order_date: Option<NaiveDate>,
    /// Free notes
    pub notes: Option<String>,
    /// Initial status; pending when absent
    pub status: Option<CompletionStatus>,
}

/// Records a purchase on the selected shift.
pub async fn create_order(
    api: &dyn ClubApi,
    cache: &QueryCache<Order>,
    selection: &ShiftSelection,
    draft: OrderDraft,
) -> Result<Order> {
    let shift_id = selection.shift_id_for_write()?;
    if draft.title.trim().is_empty() {
        return Err(ValidationError::TitleRequired.into());
    }
    let category = non_blank(draft.category).ok_or(ValidationError::CategoryRequired)?;
    let amount = draft.amount.ok_or(ValidationError::AmountInvalid)?;
    check_amount(amount)?;

    let payload = NewOrder {
        title: draft.title.trim().to_string(),
        amount,
        category,
        order_date: draft.order_date.unwrap_or_else(today),
        status: draft.status.unwrap_or_default(),
        notes: non_blank(draft.notes),
        shift_id,
    };
    let created = api.create_order(&payload).await?;
    cache.invalidate().await;
    info!("Created order {} on shift {shift_id}", created.id);
    Ok(created)
}

/// Edits an order.
pub async fn update_order(
    api: &dyn ClubApi,
    cache: &QueryCache<Order>,
    id: i64,
    update: OrderUpdate,
) -> Result<Order> {
    if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ValidationError::TitleRequired.into());
    }
    if let Some(amount) = update.amount {
        check_amount(amount)?;
    }
    let updated = api.update_order(id, &update).await?;
    cache.invalidate().await;
    Ok(updated)
}

/// Deletes an order.
pub async fn delete_order(api: &dyn ClubApi, cache: &QueryCache<Order>, id: i64) -> Result<()> {
    api.delete_order(id).await?;
    cache.invalidate().await;
    info!("Deleted order {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::fetch::ScopeKey,
        errors::Error,
        test_utils::{FakeClubApi, order, problem, shift},
    };

    async fn warm<T: Send + Sync>(cache: &QueryCache<T>) -> Result<()> {
        cache
            .get_or_fetch(ScopeKey::Shift(10), async { Ok(Vec::new()) })
            .await?;
        assert_eq!(cache.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_toggle_writes_opposite_and_invalidates() -> Result<()> {
        let api = FakeClubApi::new().with_problems(vec![problem(2, ProblemStatus::Closed, "Timone")]);
        let cache = QueryCache::new();
        warm(&cache).await?;

        let status = toggle_problem_status(&api, &cache, 2, ProblemStatus::Closed).await?;
        assert_eq!(status, ProblemStatus::Open);
        assert!(cache.is_empty().await);
        assert_eq!(api.problem(2).map(|p| p.status), Some(ProblemStatus::Open));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_toggle_keeps_cache() -> Result<()> {
        let api = FakeClubApi::new().failing();
        let cache: QueryCache<Order> = QueryCache::new();
        warm(&cache).await?;

        let result = toggle_order_status(&api, &cache, 1, CompletionStatus::Pending).await;
        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
        assert_eq!(cache.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_writes_need_a_specific_shift() {
        let api = FakeClubApi::new();
        let cache = QueryCache::new();
        let draft = WorkDraft {
            title: "Pulizia scivolo".to_string(),
            category: Some(WorkCategory::Campo),
            ..WorkDraft::default()
        };

        let result =
            create_work(&api, &cache, &ShiftSelection::All { season_id: 1 }, draft).await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::ShiftRequired))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_order_validation_order() {
        let api = FakeClubApi::new();
        let cache = QueryCache::new();
        let selection = ShiftSelection::Specific(shift(10, 1, 1));

        let missing_title = OrderDraft::default();
        let result = create_order(&api, &cache, &selection, missing_title).await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::TitleRequired))
        ));

        let bad_amount = OrderDraft {
            title: "Cime".to_string(),
            category: Some("Materiali".to_string()),
            amount: Some(0.0),
            ..OrderDraft::default()
        };
        let result = create_order(&api, &cache, &selection, bad_amount).await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::AmountInvalid))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_order_posts_to_selected_shift() -> Result<()> {
        let api = FakeClubApi::new();
        let cache = QueryCache::new();
        warm(&cache).await?;
        let selection = ShiftSelection::Specific(shift(10, 1, 1));

        let draft = OrderDraft {
            title: " Cime ".to_string(),
            category: Some("Materiali".to_string()),
            amount: Some(42.5),
            ..OrderDraft::default()
        };
        let created = create_order(&api, &cache, &selection, draft).await?;
        assert_eq!(created.shift_id, 10);
        assert_eq!(created.title, "Cime");
        assert_eq!(created.status, CompletionStatus::Pending);
        assert!(cache.is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_problem_requires_boat_first() {
        let api = FakeClubApi::new();
        let cache = QueryCache::new();
        let result = create_problem(&api, &cache, &ShiftSelection::None, ProblemDraft::default()).await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::BoatRequired))
        ));
    }

    #[tokio::test]
    async fn test_delete_invalidates() -> Result<()> {
        let api = FakeClubApi::new().with_orders(vec![order(5, CompletionStatus::Pending, "Vernice")]);
        let cache = QueryCache::new();
        warm(&cache).await?;
        delete_order(&api, &cache, 5).await?;
        assert!(cache.is_empty().await);
        assert_eq!(api.count_calls("delete_order"), 1);
        Ok(())
    }
}
