//! Entity module - Contains the SeaORM entity definitions for the local database.
//! The backend owns every club record; locally only UI state is persisted.

pub mod ui_state;

pub use ui_state::{Column as UiStateColumn, Entity as UiState, Model as UiStateModel};
