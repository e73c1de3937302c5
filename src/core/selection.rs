//! Scope selection: which season and which shift(s) every view is looking at.
//!
//! The "all shifts" choice is its own variant of [`ShiftSelection`] rather than a fake
//! shift, so it can never leak into a create or update payload. [`AutoSelector`] picks
//! sensible defaults the first time a view loads and steps aside for good as soon as the
//! user makes a choice of their own.

use crate::{
    api::ClubApi,
    core::session::SessionStore,
    errors::{Result, ValidationError},
    models::{Season, Shift, season::sort_by_number},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The shift scope of the current view.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShiftSelection {
    /// Nothing selected
    #[default]
    None,
    /// One concrete shift
    Specific(Shift),
    /// Every shift of a season, for reading only
    All {
        /// Season whose shifts are aggregated
        season_id: i64,
    },
}

impl ShiftSelection {
    /// Id to attach to a create or update payload.
    ///
    /// Only a concrete shift can own new records.
    pub fn shift_id_for_write(&self) -> Result<i64> {
        match self {
            Self::Specific(shift) => Ok(shift.id),
            Self::None | Self::All { .. } => Err(ValidationError::ShiftRequired.into()),
        }
    }

    /// The concrete shift, if one is selected.
    #[must_use]
    pub const fn shift(&self) -> Option<&Shift> {
        match self {
            Self::Specific(shift) => Some(shift),
            Self::None | Self::All { .. } => None,
        }
    }

    /// Whether the all-shifts aggregate is selected.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All { .. })
    }

    /// Whether nothing is selected.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Where a view is in its default-selection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoSelectState {
    /// No default applied yet
    #[default]
    Uninitialized,
    /// Season default applied, shift default may still run
    AutoSelected,
    /// The user chose something; defaults never run again
    UserControlled,
}

/// Which shift a view selects by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDefault {
    /// Shift with this number, or the last shift if there is none
    Number(i32),
    /// The all-shifts aggregate
    All,
    /// Leave the shift selection alone (reports view)
    Keep,
}

/// Forward-only default-selection state machine for one view.
#[derive(Debug, Clone)]
pub struct AutoSelector {
    state: AutoSelectState,
    default_season: String,
    shift_default: ShiftDefault,
}

impl AutoSelector {
    /// A fresh selector.
    #[must_use]
    pub fn new(default_season: impl Into<String>, shift_default: ShiftDefault) -> Self {
        Self {
            state: AutoSelectState::Uninitialized,
            default_season: default_season.into(),
            shift_default,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> AutoSelectState {
        self.state
    }

    /// Default-season step.
    ///
    /// Runs once, on the first non-empty season list. An already selected season is kept,
    /// otherwise the configured default (by name) or the first season is selected.
    pub async fn apply_season(&mut self, session: &mut SessionStore, seasons: &[Season]) {
        if self.state != AutoSelectState::Uninitialized || seasons.is_empty() {
            return;
        }

        if session.selected_season().is_none() {
            let Some(pick) = seasons
                .iter()
                .find(|s| s.name == self.default_season)
                .or_else(|| seasons.first())
            else {
                return;
            };
            info!("Auto-selecting season {}", pick.name);
            session.set_selected_season(Some(pick.clone())).await;
        }

        self.state = AutoSelectState::AutoSelected;
    }

    /// Default-shift step.
    ///
    /// Runs only after the season step, while a season is selected, no shift is selected
    /// and the season has shifts. `shifts` must be sorted by number.
    pub async fn apply_shift(&mut self, session: &mut SessionStore, shifts: &[Shift]) {
        if self.state != AutoSelectState::AutoSelected
            || !session.selected_shift().is_none()
            || shifts.is_empty()
        {
            return;
        }
        let Some(season_id) = session.selected_season().map(|s| s.id) else {
            return;
        };

        let selection = match self.shift_default {
            ShiftDefault::Keep => return,
            ShiftDefault::All => ShiftSelection::All { season_id },
            ShiftDefault::Number(n) => {
                let pick = shifts
                    .iter()
                    .find(|s| s.shift_number == n)
                    .or_else(|| shifts.last());
                match pick {
                    Some(shift) => ShiftSelection::Specific(shift.clone()),
                    None => return,
                }
            }
        };

        debug!("Auto-selecting shift {selection:?}");
        session.set_selected_shift(selection).await;
    }

    /// Records an explicit user selection or clear.
    pub fn user_took_control(&mut self) {
        self.state = AutoSelectState::UserControlled;
    }
}

/// Everything a view needs to know about its current scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    /// Selected season
    pub season: Option<Season>,
    /// Shifts of the selected season, sorted by number
    pub shifts: Vec<Shift>,
    /// Selected shift(s)
    pub selection: ShiftSelection,
}

/// Loads seasons and shifts and applies the view's defaults.
pub async fn resolve_scope(
    api: &dyn ClubApi,
    session: &mut SessionStore,
    selector: &mut AutoSelector,
) -> Result<Scope> {
    let seasons = api.list_seasons().await?;
    selector.apply_season(session, &seasons).await;

    let season = session.selected_season().cloned();
    let shifts = match &season {
        Some(season) => {
            let mut shifts = api.list_shifts(season.id).await?;
            sort_by_number(&mut shifts);
            shifts
        }
        None => Vec::new(),
    };
    selector.apply_shift(session, &shifts).await;

    Ok(Scope {
        season,
        shifts,
        selection: session.selected_shift().clone(),
    })
}

/// Switches season. The shift selection and the report multi-selection belong to the old
/// season, so both are cleared.
pub async fn change_season(session: &mut SessionStore, season: Option<Season>) {
    session.set_selected_season(season).await;
    session.set_selected_shift(ShiftSelection::None).await;
    session.set_report_shifts(Vec::new()).await;
}
