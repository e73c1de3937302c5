//! Shared test utilities for `LniworksBuddy`.
//!
//! This module provides an in-memory `SQLite` setup, record fixtures with sensible
//! defaults and [`FakeClubApi`], an in-memory stand-in for the backend that records every
//! call it receives.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use crate::{
    api::{ClubApi, OrderExportQuery, OrderQuery, ProblemQuery, WorkQuery},
    errors::{Error, Result, ValidationError},
    models::{
        Boat, BoatType, CompletionStatus, Credentials, NewOrder, NewProblem, NewWork, Order,
        OrderUpdate, Problem, ProblemStatus, ProblemUpdate, Season, SeasonReport, Shift,
        ShiftReport, TokenResponse, User, UserSummary, Work, WorkCategory, WorkUpdate,
        report::{OrderSummary, ProblemSummary, ShiftTotals, WorkSummary},
    },
};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use sea_orm::DatabaseConnection;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tracing_subscriber::EnvFilter;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes tracing output to the test writer. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

/// A season named after its year.
#[must_use]
pub fn season(id: i64, year: i32) -> Season {
    Season {
        id,
        year,
        name: year.to_string(),
    }
}

/// A two-week shift; shift 1 starts on June 1st.
#[must_use]
pub fn shift(id: i64, season_id: i64, shift_number: i32) -> Shift {
    let offset = u64::try_from((shift_number - 1).max(0)).unwrap_or(0) * 14;
    let start_date = day(2025, 6, 1) + Days::new(offset);
    Shift {
        id,
        season_id,
        shift_number,
        start_date,
        end_date: start_date + Days::new(13),
    }
}

/// A user without a full name.
#[must_use]
pub fn user(id: i64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        email: None,
        full_name: None,
        created_at: None,
    }
}

/// A damage report on boat 1, shift 10.
#[must_use]
pub fn problem(id: i64, status: ProblemStatus, description: &str) -> Problem {
    Problem {
        id,
        boat_id: 1,
        description: description.to_string(),
        part_affected: None,
        status,
        reported_date: day(2025, 7, 1),
        resolved_date: None,
        shift_id: 10,
        reported_by: None,
        boat_name: None,
        boat_type: None,
        created_at: None,
    }
}

/// A "Campo" work item on shift 10.
#[must_use]
pub fn work(id: i64, status: CompletionStatus, title: &str) -> Work {
    Work {
        id,
        title: title.to_string(),
        description: None,
        category: WorkCategory::Campo,
        status,
        work_date: day(2025, 7, 1),
        shift_id: 10,
        user_id: None,
        created_by: None,
        created_at: None,
        updated_at: None,
    }
}

/// A 10 euro "Materiali" order on shift 10.
#[must_use]
pub fn order(id: i64, status: CompletionStatus, title: &str) -> Order {
    Order {
        id,
        title: title.to_string(),
        description: None,
        amount: 10.0,
        category: "Materiali".to_string(),
        order_date: Some(day(2025, 7, 1)),
        status,
        notes: None,
        created_by: Some("mario".to_string()),
        shift_id: 10,
        user_id: None,
        created_at: None,
        updated_at: None,
    }
}

/// An empty 2025 season report.
#[must_use]
pub fn season_report() -> SeasonReport {
    SeasonReport {
        season_name: "2025".to_string(),
        season_year: 2025,
        total_orders_amount: 0.0,
        total_orders_count: 0,
        total_works_count: 0,
        total_problems_count: 0,
        shifts_data: Vec::new(),
        orders_summary: OrderSummary::default(),
        works_summary: WorkSummary::default(),
        problems_summary: ProblemSummary::default(),
        orders_by_category: std::collections::BTreeMap::new(),
        orders_by_month: std::collections::BTreeMap::new(),
        works_by_month: std::collections::BTreeMap::new(),
    }
}

#[derive(Default)]
struct FakeState {
    seasons: Vec<Season>,
    shifts: Vec<Shift>,
    boats: Vec<Boat>,
    problems: Vec<Problem>,
    works: Vec<Work>,
    orders: Vec<Order>,
    profile: Option<User>,
    bearer: Option<String>,
    calls: Vec<String>,
    next_id: i64,
}

/// In-memory backend. Every trait method is recorded by name in [`FakeClubApi::calls`].
#[derive(Default)]
pub struct FakeClubApi {
    state: Mutex<FakeState>,
    failing: bool,
    password: Option<String>,
    shift_gate: Option<Arc<Notify>>,
}

impl FakeClubApi {
    /// An empty backend.
    #[must_use]
    pub fn new() -> Self {
        let api = Self::default();
        api.state.lock().unwrap().next_id = 1000;
        api
    }

    /// A backend that answers every request with HTTP 500.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Only `password` is accepted by `login`; any other answers like a wrong password.
    #[must_use]
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// `list_shifts` records the call, then waits for `gate` before answering.
    #[must_use]
    pub fn with_shift_gate(mut self, gate: Arc<Notify>) -> Self {
        self.shift_gate = Some(gate);
        self
    }

    /// Seeds seasons.
    #[must_use]
    pub fn with_seasons(self, seasons: Vec<Season>) -> Self {
        self.state.lock().unwrap().seasons = seasons;
        self
    }

    /// Seeds shifts of any season.
    #[must_use]
    pub fn with_shifts(self, shifts: Vec<Shift>) -> Self {
        self.state.lock().unwrap().shifts = shifts;
        self
    }

    /// Seeds the fleet.
    #[must_use]
    pub fn with_boats(self, boats: Vec<Boat>) -> Self {
        self.state.lock().unwrap().boats = boats;
        self
    }

    /// Seeds damage reports.
    #[must_use]
    pub fn with_problems(self, problems: Vec<Problem>) -> Self {
        self.state.lock().unwrap().problems = problems;
        self
    }

    /// Seeds works.
    #[must_use]
    pub fn with_works(self, works: Vec<Work>) -> Self {
        self.state.lock().unwrap().works = works;
        self
    }

    /// Seeds orders.
    #[must_use]
    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        self.state.lock().unwrap().orders = orders;
        self
    }

    /// Profile returned once logged in.
    #[must_use]
    pub fn with_profile(self, user: User) -> Self {
        self.state.lock().unwrap().profile = Some(user);
        self
    }

    /// Names of the trait methods called so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// How many times `method` was called.
    #[must_use]
    pub fn count_calls(&self, method: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.as_str() == method)
            .count()
    }

    /// Bearer token currently attached.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.state.lock().unwrap().bearer.clone()
    }

    /// Stored damage report.
    #[must_use]
    pub fn problem(&self, id: i64) -> Option<Problem> {
        self.state
            .lock()
            .unwrap()
            .problems
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    fn enter(&self, method: &str) -> Result<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(method.to_string());
        if self.failing {
            return Err(Error::Api {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        Ok(state)
    }
}

fn missing(entity: &'static str, id: i64) -> Error {
    Error::Api {
        status: 404,
        message: format!("{entity} {id} not found"),
    }
}

fn next_id(state: &mut FakeState) -> i64 {
    state.next_id += 1;
    state.next_id
}

#[async_trait]
impl ClubApi for FakeClubApi {
    fn set_bearer(&self, token: Option<String>) {
        self.state.lock().unwrap().bearer = token;
    }

    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        let _state = self.enter("login")?;
        if self
            .password
            .as_ref()
            .is_some_and(|p| *p != credentials.password)
        {
            return Err(ValidationError::InvalidCredentials.into());
        }
        Ok(TokenResponse {
            access_token: format!("token-{}", credentials.username),
            token_type: "bearer".to_string(),
        })
    }

    async fn register(&self, credentials: &Credentials) -> Result<User> {
        let mut state = self.enter("register")?;
        let id = next_id(&mut state);
        Ok(user(id, &credentials.username))
    }

    async fn profile(&self) -> Result<User> {
        let state = self.enter("profile")?;
        if state.bearer.is_none() {
            return Err(Error::Unauthenticated);
        }
        state.profile.clone().ok_or(Error::Unauthenticated)
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>> {
        let state = self.enter("list_users")?;
        Ok(state
            .profile
            .iter()
            .map(|u| UserSummary {
                id: u.id,
                username: u.username.clone(),
            })
            .collect())
    }

    async fn list_seasons(&self) -> Result<Vec<Season>> {
        Ok(self.enter("list_seasons")?.seasons.clone())
    }

    async fn list_shifts(&self, season_id: i64) -> Result<Vec<Shift>> {
        drop(self.enter("list_shifts")?);
        if let Some(gate) = &self.shift_gate {
            gate.notified().await;
        }
        let state = self.state.lock().unwrap();
        Ok(state
            .shifts
            .iter()
            .filter(|s| s.season_id == season_id)
            .cloned()
            .collect())
    }

    async fn list_boats(&self, boat_type: Option<BoatType>) -> Result<Vec<Boat>> {
        let state = self.enter("list_boats")?;
        Ok(state
            .boats
            .iter()
            .filter(|b| boat_type.is_none_or(|t| b.boat_type == t))
            .cloned()
            .collect())
    }

    async fn boat_parts(&self, _boat_type: BoatType) -> Result<Vec<String>> {
        let _state = self.enter("boat_parts")?;
        Ok(vec!["Scafo".to_string(), "Vela".to_string(), "Timone".to_string()])
    }

    async fn list_problems(&self, query: &ProblemQuery) -> Result<Vec<Problem>> {
        let state = self.enter("list_problems")?;
        Ok(state
            .problems
            .iter()
            .filter(|p| query.shift_id.is_none_or(|id| p.shift_id == id))
            .filter(|p| query.boat_id.is_none_or(|id| p.boat_id == id))
            .filter(|p| query.status_filter.is_none_or(|s| p.status == s))
            .cloned()
            .collect())
    }

    async fn get_problem(&self, id: i64) -> Result<Problem> {
        let state = self.enter("get_problem")?;
        state
            .problems
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| missing("Problem", id))
    }

    async fn create_problem(&self, new: &NewProblem) -> Result<Problem> {
        let mut state = self.enter("create_problem")?;
        let id = next_id(&mut state);
        let created = Problem {
            boat_id: new.boat_id,
            part_affected: new.part_affected.clone(),
            reported_date: new.reported_date,
            shift_id: new.shift_id,
            ..problem(id, new.status, &new.description)
        };
        state.problems.push(created.clone());
        Ok(created)
    }

    async fn update_problem(&self, id: i64, update: &ProblemUpdate) -> Result<Problem> {
        let mut state = self.enter("update_problem")?;
        let stored = state
            .problems
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| missing("Problem", id))?;
        if let Some(description) = &update.description {
            stored.description.clone_from(description);
        }
        if let Some(part) = &update.part_affected {
            stored.part_affected = Some(part.clone());
        }
        if let Some(status) = update.status {
            stored.status = status;
        }
        if let Some(resolved) = update.resolved_date {
            stored.resolved_date = Some(resolved);
        }
        Ok(stored.clone())
    }

    async fn delete_problem(&self, id: i64) -> Result<()> {
        let mut state = self.enter("delete_problem")?;
        state.problems.retain(|p| p.id != id);
        Ok(())
    }

    async fn list_works(&self, query: &WorkQuery) -> Result<Vec<Work>> {
        let state = self.enter("list_works")?;
        Ok(state
            .works
            .iter()
            .filter(|w| query.shift_id.is_none_or(|id| w.shift_id == id))
            .filter(|w| query.status_filter.is_none_or(|s| w.status == s))
            .cloned()
            .collect())
    }

    async fn get_work(&self, id: i64) -> Result<Work> {
        let state = self.enter("get_work")?;
        state
            .works
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| missing("Work", id))
    }

    async fn create_work(&self, new: &NewWork) -> Result<Work> {
        let mut state = self.enter("create_work")?;
        let id = next_id(&mut state);
        let created = Work {
            description: new.description.clone(),
            category: new.category,
            work_date: new.work_date,
            shift_id: new.shift_id,
            ..work(id, new.status, &new.title)
        };
        state.works.push(created.clone());
        Ok(created)
    }

    async fn update_work(&self, id: i64, update: &WorkUpdate) -> Result<Work> {
        let mut state = self.enter("update_work")?;
        let stored = state
            .works
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| missing("Work", id))?;
        if let Some(title) = &update.title {
            stored.title.clone_from(title);
        }
        if let Some(description) = &update.description {
            stored.description = Some(description.clone());
        }
        if let Some(category) = update.category {
            stored.category = category;
        }
        if let Some(status) = update.status {
            stored.status = status;
        }
        if let Some(work_date) = update.work_date {
            stored.work_date = work_date;
        }
        Ok(stored.clone())
    }

    async fn delete_work(&self, id: i64) -> Result<()> {
        let mut state = self.enter("delete_work")?;
        state.works.retain(|w| w.id != id);
        Ok(())
    }

    async fn export_works(&self, _query: &WorkQuery) -> Result<Vec<u8>> {
        let _state = self.enter("export_works")?;
        Ok(b"xlsx".to_vec())
    }

    async fn list_orders(&self, query: &OrderQuery) -> Result<Vec<Order>> {
        let state = self.enter("list_orders")?;
        Ok(state
            .orders
            .iter()
            .filter(|o| query.shift_id.is_none_or(|id| o.shift_id == id))
            .filter(|o| query.status_filter.is_none_or(|s| o.status == s))
            .cloned()
            .collect())
    }

    async fn get_order(&self, id: i64) -> Result<Order> {
        let state = self.enter("get_order")?;
        state
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| missing("Order", id))
    }

    async fn create_order(&self, new: &NewOrder) -> Result<Order> {
        let mut state = self.enter("create_order")?;
        let id = next_id(&mut state);
        let created = Order {
            amount: new.amount,
            category: new.category.clone(),
            order_date: Some(new.order_date),
            notes: new.notes.clone(),
            shift_id: new.shift_id,
            ..order(id, new.status, &new.title)
        };
        state.orders.push(created.clone());
        Ok(created)
    }

    async fn update_order(&self, id: i64, update: &OrderUpdate) -> Result<Order> {
        let mut state = self.enter("update_order")?;
        let stored = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| missing("Order", id))?;
        if let Some(title) = &update.title {
            stored.title.clone_from(title);
        }
        if let Some(amount) = update.amount {
            stored.amount = amount;
        }
        if let Some(category) = &update.category {
            stored.category.clone_from(category);
        }
        if let Some(order_date) = update.order_date {
            stored.order_date = Some(order_date);
        }
        if let Some(status) = update.status {
            stored.status = status;
        }
        if let Some(notes) = &update.notes {
            stored.notes = Some(notes.clone());
        }
        Ok(stored.clone())
    }

    async fn delete_order(&self, id: i64) -> Result<()> {
        let mut state = self.enter("delete_order")?;
        state.orders.retain(|o| o.id != id);
        Ok(())
    }

    async fn export_orders(&self, _query: &OrderExportQuery) -> Result<Vec<u8>> {
        let _state = self.enter("export_orders")?;
        Ok(b"xlsx".to_vec())
    }

    async fn season_report(&self, _season_id: i64) -> Result<SeasonReport> {
        let _state = self.enter("season_report")?;
        Ok(season_report())
    }

    async fn shift_report(&self, shift_id: i64) -> Result<ShiftReport> {
        let state = self.enter("shift_report")?;
        let shift = state
            .shifts
            .iter()
            .find(|s| s.id == shift_id)
            .cloned()
            .ok_or_else(|| missing("Shift", shift_id))?;
        Ok(ShiftReport {
            shift_number: shift.shift_number,
            start_date: shift.start_date.to_string(),
            end_date: shift.end_date.to_string(),
            summary: ShiftTotals::default(),
        })
    }

    async fn export_season(&self, _season_id: i64) -> Result<Vec<u8>> {
        let _state = self.enter("export_season")?;
        Ok(b"xlsx".to_vec())
    }
}
