//! Fetching scoped lists and caching them per scope.
//!
//! Lists are always read per shift. Selecting every shift of a season fans out one read
//! per shift and concatenates the results in shift order. [`QueryCache`] keeps the last
//! result per scope until a mutation invalidates the resource.

use crate::{
    api::{ClubApi, OrderQuery, ProblemQuery, WorkQuery},
    core::selection::{Scope, ShiftSelection},
    errors::Result,
    models::{Order, Problem, Shift, Work, parse_timestamp},
};
use chrono::NaiveDateTime;
use futures::future::try_join_all;
use std::{
    cmp::Reverse,
    collections::HashMap,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use tokio::sync::RwLock;
use tracing::debug;

/// Reads `fetch_one` for every shift id concurrently and concatenates the results in the
/// order of `shift_ids`. Duplicates are kept.
pub async fn fetch_for_shifts<T, F, Fut>(
    shift_ids: impl IntoIterator<Item = i64>,
    fetch_one: F,
) -> Result<Vec<T>>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let per_shift = try_join_all(shift_ids.into_iter().map(fetch_one)).await?;
    Ok(per_shift.into_iter().flatten().collect())
}

/// Reads the list for `selection`.
///
/// `shifts` are the shifts of the selected season in display order; only the ones that
/// belong to the aggregated season are read.
pub async fn fetch_scoped<T, F, Fut>(
    selection: &ShiftSelection,
    shifts: &[Shift],
    fetch_one: F,
) -> Result<Vec<T>>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    match selection {
        ShiftSelection::None => Ok(Vec::new()),
        ShiftSelection::Specific(shift) => fetch_one(shift.id).await,
        ShiftSelection::All { season_id } => {
            let ids = shifts
                .iter()
                .filter(|s| s.season_id == *season_id)
                .map(|s| s.id);
            fetch_for_shifts(ids, fetch_one).await
        }
    }
}

/// Cache key of a scoped list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
    /// One shift
    Shift(i64),
    /// Every shift of a season
    Season(i64),
}

impl ScopeKey {
    /// Key for a selection; `None` when nothing is selected.
    #[must_use]
    pub const fn for_selection(selection: &ShiftSelection) -> Option<Self> {
        match selection {
            ShiftSelection::None => None,
            ShiftSelection::Specific(shift) => Some(Self::Shift(shift.id)),
            ShiftSelection::All { season_id } => Some(Self::Season(*season_id)),
        }
    }
}

/// A cached list and the generation it was stored under.
#[derive(Debug, Clone)]
pub struct CachedList<T> {
    /// Changes every time the list is refetched
    pub generation: u64,
    /// The raw list as returned by the backend
    pub items: Arc<Vec<T>>,
}

impl<T> CachedList<T> {
    fn empty() -> Self {
        Self {
            generation: 0,
            items: Arc::new(Vec::new()),
        }
    }
}

/// Per-resource cache of scoped lists.
#[derive(Debug)]
pub struct QueryCache<T> {
    entries: RwLock<HashMap<ScopeKey, CachedList<T>>>,
    next_generation: AtomicU64,
    invalidations: AtomicU64,
}

impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_generation: AtomicU64::new(1),
            invalidations: AtomicU64::new(0),
        }
    }
}

impl<T> QueryCache<T> {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached list for `key`, or the result of `fetch` stored under a new generation.
    ///
    /// A result fetched while the cache was invalidated is returned but not stored.
    pub async fn get_or_fetch<Fut>(&self, key: ScopeKey, fetch: Fut) -> Result<CachedList<T>>
    where
        Fut: Future<Output = Result<Vec<T>>>,
    {
        if let Some(hit) = self.entries.read().await.get(&key) {
            return Ok(CachedList {
                generation: hit.generation,
                items: Arc::clone(&hit.items),
            });
        }

        let epoch = self.invalidations.load(Ordering::Acquire);
        let items = Arc::new(fetch.await?);
        let entry = CachedList {
            generation: self.next_generation.fetch_add(1, Ordering::Relaxed),
            items,
        };

        let mut entries = self.entries.write().await;
        if self.invalidations.load(Ordering::Acquire) == epoch {
            entries.insert(
                key,
                CachedList {
                    generation: entry.generation,
                    items: Arc::clone(&entry.items),
                },
            );
        }
        debug!("Fetched {key:?} as generation {}", entry.generation);
        Ok(entry)
    }

    /// Drops every cached scope so the next read refetches.
    pub async fn invalidate(&self) {
        let mut entries = self.entries.write().await;
        self.invalidations.fetch_add(1, Ordering::AcqRel);
        entries.clear();
    }

    /// Number of cached scopes.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// The items shown in a "recent" panel.
///
/// On the all-shifts selection the concatenated list is stably sorted newest first by
/// `timestamp` (missing timestamps last) and cut to `limit`. On a single shift the first
/// `limit` items are kept in server order.
pub fn recent_slice<T, F>(
    selection: &ShiftSelection,
    items: &[T],
    timestamp: F,
    limit: usize,
) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<NaiveDateTime>,
{
    let mut items = items.to_vec();
    if selection.is_all() {
        items.sort_by_key(|item| Reverse(timestamp(item)));
    }
    items.truncate(limit);
    items
}

/// Recency key of a damage report: the day it was reported.
#[must_use]
pub fn problem_recency(problem: &Problem) -> Option<NaiveDateTime> {
    problem.reported_date.and_hms_opt(0, 0, 0)
}

/// Recency key of a work item.
#[must_use]
pub fn work_recency(work: &Work) -> Option<NaiveDateTime> {
    work.created_at.as_deref().and_then(parse_timestamp)
}

/// Recency key of an order.
#[must_use]
pub fn order_recency(order: &Order) -> Option<NaiveDateTime> {
    order.created_at.as_deref().and_then(parse_timestamp)
}

async fn load_scoped<T, F, Fut>(
    cache: &QueryCache<T>,
    scope: &Scope,
    fetch_one: F,
) -> Result<CachedList<T>>
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let Some(key) = ScopeKey::for_selection(&scope.selection) else {
        return Ok(CachedList::empty());
    };
    cache
        .get_or_fetch(key, fetch_scoped(&scope.selection, &scope.shifts, fetch_one))
        .await
}

/// Damage reports of the scope.
pub async fn load_problems(
    api: &dyn ClubApi,
    cache: &QueryCache<Problem>,
    scope: &Scope,
) -> Result<CachedList<Problem>> {
    load_scoped(cache, scope, |shift_id| async move {
        api.list_problems(&ProblemQuery::for_shift(shift_id)).await
    })
    .await
}

/// Works of the scope.
pub async fn load_works(
    api: &dyn ClubApi,
    cache: &QueryCache<Work>,
    scope: &Scope,
) -> Result<CachedList<Work>> {
    load_scoped(cache, scope, |shift_id| async move {
        api.list_works(&WorkQuery::for_shift(shift_id)).await
    })
    .await
}

/// Orders of the scope.
pub async fn load_orders(
    api: &dyn ClubApi,
    cache: &QueryCache<Order>,
    scope: &Scope,
) -> Result<CachedList<Order>> {
    load_scoped(cache, scope, |shift_id| async move {
        api.list_orders(&OrderQuery::for_shift(shift_id)).await
    })
    .await
}
