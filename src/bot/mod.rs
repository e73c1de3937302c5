//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for `LniworksBuddy`: slash commands that
//! replace the old web pages, autocomplete handlers, and the shared [`BotData`] every
//! command reads its session, caches and view state from.

/// Discord command implementations (session, scope, problems, works, orders, reports)
pub mod commands;
/// Framework setup and the error hook
pub mod framework;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

pub use framework::run_bot;

use crate::{
    api::ClubApi,
    bot::handlers::autocomplete::parse_shift_choice,
    config::AppConfig,
    core::{
        fetch::QueryCache,
        pipeline::MemoizedList,
        report::OrderSort,
        selection::{AutoSelector, Scope, ShiftDefault, ShiftSelection, resolve_scope},
        session::SessionStore,
    },
    errors::Result,
    models::{Order, Problem, Work},
};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// The views that pick their own default scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// `/dashboard`
    Dashboard,
    /// `/problems`
    Problems,
    /// `/works`
    Works,
    /// `/orders`
    Orders,
    /// `/report_*`
    Reports,
}

/// Per-view state that lives as long as the bot process.
#[derive(Debug)]
pub struct ViewState {
    dashboard: AutoSelector,
    problems: AutoSelector,
    works: AutoSelector,
    orders: AutoSelector,
    reports: AutoSelector,
    /// Derived damage report list
    pub problem_list: MemoizedList<Problem>,
    /// Derived work list
    pub work_list: MemoizedList<Work>,
    /// Derived order list
    pub order_list: MemoizedList<Order>,
    /// Column sort of the reports order table
    pub order_sort: OrderSort,
}

impl ViewState {
    /// Fresh view state using the configured defaults.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let season = config.selection.default_season.as_str();
        let shift_number = ShiftDefault::Number(config.selection.default_shift_number);
        Self {
            dashboard: AutoSelector::new(season, shift_number),
            problems: AutoSelector::new(season, ShiftDefault::All),
            works: AutoSelector::new(season, ShiftDefault::All),
            orders: AutoSelector::new(season, shift_number),
            reports: AutoSelector::new(season, ShiftDefault::Keep),
            problem_list: MemoizedList::new(),
            work_list: MemoizedList::new(),
            order_list: MemoizedList::new(),
            order_sort: OrderSort::default(),
        }
    }

    /// Default-selection state machine of `view`.
    pub fn selector_mut(&mut self, view: View) -> &mut AutoSelector {
        match view {
            View::Dashboard => &mut self.dashboard,
            View::Problems => &mut self.problems,
            View::Works => &mut self.works,
            View::Orders => &mut self.orders,
            View::Reports => &mut self.reports,
        }
    }

    /// The selection is shared, so an explicit choice stops every view's defaults.
    pub fn user_took_control(&mut self) {
        for view in [
            View::Dashboard,
            View::Problems,
            View::Works,
            View::Orders,
            View::Reports,
        ] {
            self.selector_mut(view).user_took_control();
        }
    }
}

/// Outcome of an explicit shift choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftChoice {
    /// No season is selected
    NoSeason,
    /// The input names no shift of the season
    Unknown,
    /// The season changed while the shifts were loading
    SeasonChanged,
    /// Stored as the new selection
    Selected(ShiftSelection),
}

/// Shared data available to all bot commands.
pub struct BotData {
    /// Backend client
    pub api: Arc<dyn ClubApi>,
    /// Token, profile and selections, persisted locally
    pub session: RwLock<SessionStore>,
    /// Application settings
    pub config: AppConfig,
    /// Damage report lists per scope
    pub problems: QueryCache<Problem>,
    /// Work lists per scope
    pub works: QueryCache<Work>,
    /// Order lists per scope
    pub orders: QueryCache<Order>,
    /// View state
    pub views: Mutex<ViewState>,
}

impl BotData {
    /// Creates a new `BotData` around a loaded session.
    #[must_use]
    pub fn new(api: Arc<dyn ClubApi>, session: SessionStore, config: AppConfig) -> Self {
        let views = ViewState::new(&config);
        Self {
            api,
            session: RwLock::new(session),
            config,
            problems: QueryCache::new(),
            works: QueryCache::new(),
            orders: QueryCache::new(),
            views: Mutex::new(views),
        }
    }

    /// Resolves the scope of `view`, applying its defaults the first time.
    pub async fn scope(&self, view: View) -> Result<Scope> {
        let mut session = self.session.write().await;
        let mut views = self.views.lock().await;
        resolve_scope(self.api.as_ref(), &mut session, views.selector_mut(view)).await
    }

    /// Selects a shift of the current season by its autocomplete label, `Tutti`, or
    /// clears the shift when `input` is `None`.
    ///
    /// The shifts are loaded without holding the session, so other commands keep running
    /// while the backend answers.
    pub async fn select_shift(&self, input: Option<&str>) -> Result<ShiftChoice> {
        let season_id = self.session.read().await.selected_season().map(|s| s.id);
        let Some(season_id) = season_id else {
            return Ok(ShiftChoice::NoSeason);
        };

        let selection = match input {
            None => ShiftSelection::None,
            Some(input) => {
                let shifts = self.api.list_shifts(season_id).await?;
                match parse_shift_choice(input, season_id, &shifts) {
                    Some(selection) => selection,
                    None => return Ok(ShiftChoice::Unknown),
                }
            }
        };

        let mut session = self.session.write().await;
        if session.selected_season().map(|s| s.id) != Some(season_id) {
            return Ok(ShiftChoice::SeasonChanged);
        }
        self.views.lock().await.user_took_control();
        session.set_selected_shift(selection.clone()).await;
        Ok(ShiftChoice::Selected(selection))
    }

    /// Drops every cached list, used after logout and season changes.
    pub async fn invalidate_all(&self) {
        self.problems.invalidate().await;
        self.works.invalidate().await;
        self.orders.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{selection::change_season, storage::MemoryStore},
        test_utils::{FakeClubApi, season, shift},
    };
    use tokio::sync::Notify;

    async fn bot_data(api: FakeClubApi) -> BotData {
        let session = SessionStore::load(Arc::new(MemoryStore::new())).await;
        BotData::new(Arc::new(api), session, AppConfig::default())
    }

    #[tokio::test]
    async fn test_first_view_visited_picks_the_shift() -> Result<()> {
        let api = FakeClubApi::new()
            .with_seasons(vec![season(1, 2025)])
            .with_shifts((1..=6).map(|n| shift(10 + i64::from(n), 1, n)).collect());
        let data = bot_data(api).await;

        let scope = data.scope(View::Dashboard).await?;
        assert_eq!(scope.selection.shift().map(|s| s.shift_number), Some(6));

        // Works would default to all shifts, but a shift is already selected
        let scope = data.scope(View::Works).await?;
        assert_eq!(scope.selection.shift().map(|s| s.shift_number), Some(6));
        Ok(())
    }

    #[tokio::test]
    async fn test_reports_view_never_selects_a_shift() -> Result<()> {
        let api = FakeClubApi::new()
            .with_seasons(vec![season(1, 2025)])
            .with_shifts(vec![shift(11, 1, 1)]);
        let data = bot_data(api).await;

        let scope = data.scope(View::Reports).await?;
        assert_eq!(scope.season.map(|s| s.id), Some(1));
        assert_eq!(scope.selection, ShiftSelection::None);
        Ok(())
    }

    #[tokio::test]
    async fn test_user_control_stops_every_view() -> Result<()> {
        let api = FakeClubApi::new()
            .with_seasons(vec![season(1, 2025)])
            .with_shifts(vec![shift(11, 1, 1)]);
        let data = bot_data(api).await;

        data.views.lock().await.user_took_control();
        let scope = data.scope(View::Problems).await?;
        assert!(scope.season.is_none());
        assert!(scope.selection.is_none());
        Ok(())
    }

    async fn paused_bot(gate: &Arc<Notify>) -> (Arc<FakeClubApi>, Arc<BotData>) {
        let api = Arc::new(
            FakeClubApi::new()
                .with_seasons(vec![season(1, 2025), season(2, 2026)])
                .with_shifts(vec![shift(11, 1, 1), shift(12, 1, 2)])
                .with_shift_gate(Arc::clone(gate)),
        );
        let session = SessionStore::load(Arc::new(MemoryStore::new())).await;
        let data = Arc::new(BotData::new(api.clone(), session, AppConfig::default()));
        data.session
            .write()
            .await
            .set_selected_season(Some(season(1, 2025)))
            .await;
        (api, data)
    }

    async fn wait_for_shift_lookup(api: &FakeClubApi) {
        while api.count_calls("list_shifts") == 0 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_shift_lookup_leaves_the_session_free() -> Result<()> {
        let gate = Arc::new(Notify::new());
        let (api, data) = paused_bot(&gate).await;

        let task = tokio::spawn({
            let data = Arc::clone(&data);
            async move { data.select_shift(Some("2")).await }
        });
        wait_for_shift_lookup(&api).await;

        // The backend has not answered yet, other commands can still use the session
        assert!(data.session.try_write().is_ok());

        gate.notify_one();
        let choice = task.await.expect("select_shift task panicked")?;
        assert_eq!(
            choice,
            ShiftChoice::Selected(ShiftSelection::Specific(shift(12, 1, 2)))
        );
        assert_eq!(
            data.session.read().await.selected_shift(),
            &ShiftSelection::Specific(shift(12, 1, 2))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_season_change_during_lookup_wins() -> Result<()> {
        let gate = Arc::new(Notify::new());
        let (api, data) = paused_bot(&gate).await;

        let task = tokio::spawn({
            let data = Arc::clone(&data);
            async move { data.select_shift(Some("1")).await }
        });
        wait_for_shift_lookup(&api).await;
        change_season(&mut *data.session.write().await, Some(season(2, 2026))).await;

        gate.notify_one();
        let choice = task.await.expect("select_shift task panicked")?;
        assert_eq!(choice, ShiftChoice::SeasonChanged);
        assert_eq!(
            data.session.read().await.selected_shift(),
            &ShiftSelection::None
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_select_shift_outcomes() -> Result<()> {
        let api = FakeClubApi::new()
            .with_seasons(vec![season(1, 2025)])
            .with_shifts(vec![shift(11, 1, 1)]);
        let data = bot_data(api).await;
        assert_eq!(data.select_shift(Some("1")).await?, ShiftChoice::NoSeason);

        data.session
            .write()
            .await
            .set_selected_season(Some(season(1, 2025)))
            .await;
        assert_eq!(data.select_shift(Some("9")).await?, ShiftChoice::Unknown);
        assert_eq!(
            data.select_shift(Some("Tutti")).await?,
            ShiftChoice::Selected(ShiftSelection::All { season_id: 1 })
        );
        assert_eq!(
            data.select_shift(None).await?,
            ShiftChoice::Selected(ShiftSelection::None)
        );
        Ok(())
    }
}
