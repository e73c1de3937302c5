//! Two-valued status enums shared by problems, works and orders.
//!
//! Toggling is the only transition a status ever makes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Behaviour shared by every two-valued status.
pub trait TwoState: Copy + Eq + fmt::Debug {
    /// The opposite value.
    #[must_use]
    fn toggled(self) -> Self;

    /// Whether this is the "still needs attention" state (open / pending).
    fn is_active(self) -> bool;

    /// Wire representation.
    fn as_str(self) -> &'static str;
}

/// Status of a boat damage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProblemStatus {
    /// Damage still to be repaired
    #[default]
    Open,
    /// Repaired
    Closed,
}

impl TwoState for ProblemStatus {
    fn toggled(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    fn is_active(self) -> bool {
        self == Self::Open
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Status of a work item or a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    /// Not done yet
    #[default]
    Pending,
    /// Done
    Completed,
}

impl TwoState for CompletionStatus {
    fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    fn is_active(self) -> bool {
        self == Self::Pending
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ProblemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "aperto",
            Self::Closed => "risolto",
        })
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "da fare",
            Self::Completed => "completato",
        })
    }
}
