//! Core business logic - framework-agnostic session, selection, list and report operations.
//!
//! Nothing in here knows about Discord. Every function takes a [`crate::api::ClubApi`]
//! and plain data, and returns structured results for the bot layer to format.

/// Fetch fan-out and per-scope query caches
pub mod fetch;
/// Display formatting helpers
pub mod format;
/// Status toggles, creation, edits and deletion
pub mod mutations;
/// Filter, search and priority ordering of lists
pub mod pipeline;
/// Dashboard, reports view and exports
pub mod report;
/// Season/shift scope and default selection
pub mod selection;
/// Session and selection store
pub mod session;
/// Key-value persistence port and adapters
pub mod storage;
