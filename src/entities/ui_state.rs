//! UI state entity - persisted key-value pairs for the session and selection store.
//! Holds the bearer token, the cached profile and the user's current season, shift and
//! report selections so a restart resumes where the user left off.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// UI state database model - one row per storage key
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ui_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Storage key (e.g., `"selectedSeason"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Raw value, JSON encoded for everything except the token
    pub value: String,
    /// When this key was last written
    pub updated_at: DateTime,
}

/// `UiState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
