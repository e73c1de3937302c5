//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions that are not commands.

/// Autocomplete handlers for seasons, shifts, boats, parts and categories
pub mod autocomplete;
