//! Client side of the lniworks REST backend.
//!
//! [`ClubApi`] is the seam between the bot and the network: commands and core logic only
//! ever see the trait, [`HttpClubApi`] talks to the real server, and tests plug in an
//! in-memory fake.

/// `reqwest` implementation of [`ClubApi`]
pub mod http;
/// Query-string parameter structs
pub mod query;

pub use http::HttpClubApi;
pub use query::{OrderExportQuery, OrderQuery, ProblemQuery, SortDirection, WorkQuery};

use crate::{
    errors::Result,
    models::{
        Boat, BoatType, Credentials, NewOrder, NewProblem, NewWork, Order, OrderUpdate, Problem,
        ProblemUpdate, Season, SeasonReport, Shift, ShiftReport, TokenResponse, User,
        UserSummary, Work, WorkUpdate,
    },
};
use async_trait::async_trait;

/// Every backend operation this client consumes.
#[async_trait]
pub trait ClubApi: Send + Sync {
    /// Sets or clears the bearer token attached to later requests.
    fn set_bearer(&self, token: Option<String>);

    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse>;
    /// Creates a new account.
    async fn register(&self, credentials: &Credentials) -> Result<User>;
    /// Profile of the token's owner.
    async fn profile(&self) -> Result<User>;
    /// User directory.
    async fn list_users(&self) -> Result<Vec<UserSummary>>;

    /// All seasons.
    async fn list_seasons(&self) -> Result<Vec<Season>>;
    /// Shifts of a season, in backend order.
    async fn list_shifts(&self, season_id: i64) -> Result<Vec<Shift>>;

    /// Fleet, optionally restricted to one boat type.
    async fn list_boats(&self, boat_type: Option<BoatType>) -> Result<Vec<Boat>>;
    /// Parts that can be damaged on a boat type.
    async fn boat_parts(&self, boat_type: BoatType) -> Result<Vec<String>>;

    /// Damage reports matching the query.
    async fn list_problems(&self, query: &ProblemQuery) -> Result<Vec<Problem>>;
    /// One damage report.
    async fn get_problem(&self, id: i64) -> Result<Problem>;
    /// Files a damage report.
    async fn create_problem(&self, problem: &NewProblem) -> Result<Problem>;
    /// Edits a damage report.
    async fn update_problem(&self, id: i64, update: &ProblemUpdate) -> Result<Problem>;
    /// Deletes a damage report.
    async fn delete_problem(&self, id: i64) -> Result<()>;

    /// Works matching the query.
    async fn list_works(&self, query: &WorkQuery) -> Result<Vec<Work>>;
    /// One work item.
    async fn get_work(&self, id: i64) -> Result<Work>;
    /// Logs a work item.
    async fn create_work(&self, work: &NewWork) -> Result<Work>;
    /// Edits a work item.
    async fn update_work(&self, id: i64, update: &WorkUpdate) -> Result<Work>;
    /// Deletes a work item.
    async fn delete_work(&self, id: i64) -> Result<()>;
    /// Spreadsheet of the works matching the query.
    async fn export_works(&self, query: &WorkQuery) -> Result<Vec<u8>>;

    /// Orders matching the query.
    async fn list_orders(&self, query: &OrderQuery) -> Result<Vec<Order>>;
    /// One order.
    async fn get_order(&self, id: i64) -> Result<Order>;
    /// Records an order.
    async fn create_order(&self, order: &NewOrder) -> Result<Order>;
    /// Edits an order.
    async fn update_order(&self, id: i64, update: &OrderUpdate) -> Result<Order>;
    /// Deletes an order.
    async fn delete_order(&self, id: i64) -> Result<()>;
    /// Spreadsheet of the orders of the given shifts.
    async fn export_orders(&self, query: &OrderExportQuery) -> Result<Vec<u8>>;

    /// Season aggregate.
    async fn season_report(&self, season_id: i64) -> Result<SeasonReport>;
    /// Shift aggregate.
    async fn shift_report(&self, shift_id: i64) -> Result<ShiftReport>;
    /// Season spreadsheet.
    async fn export_season(&self, season_id: i64) -> Result<Vec<u8>>;
}
