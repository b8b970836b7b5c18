//! Captured items and their lifecycle.
//!
//! An [`Item`] is a persisted still frame. Items are only ever constructed
//! from data the persistence collaborator has confirmed — there is no
//! optimistic variant. Lifecycle is monotonic: `CAPTURED` is the only
//! initial state, `USED` and `DISCARDED` are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

/// Lifecycle state of a captured item.
///
/// Serialized in SCREAMING_SNAKE_CASE to match the stored representation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemState {
    /// Freshly captured, awaiting review. The only initial state.
    Captured,
    /// Reviewed and kept. Terminal.
    Used,
    /// Reviewed and rejected. Terminal.
    Discarded,
}

impl ItemState {
    /// Whether no further transition may leave this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Used | Self::Discarded)
    }

    /// Whether a transition from `self` to `next` is legal.
    ///
    /// Only `CAPTURED → USED` and `CAPTURED → DISCARDED` are allowed.
    /// Self-transitions are rejected so callers can't mask a stale cache.
    pub fn can_transition_to(self, next: Self) -> bool {
        self == Self::Captured && next.is_terminal()
    }

    /// Stable string form (matches the serialized representation).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Captured => "CAPTURED",
            Self::Used => "USED",
            Self::Discarded => "DISCARDED",
        }
    }

    /// Parse from the stored string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CAPTURED" => Some(Self::Captured),
            "USED" => Some(Self::Used),
            "DISCARDED" => Some(Self::Discarded),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An illegal lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid lifecycle transition: {from} -> {to}")]
pub struct LifecycleError {
    /// State the item was in.
    pub from: ItemState,
    /// State that was requested.
    pub to: ItemState,
}

/// A persisted captured frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Server-assigned identifier (unique).
    pub id: ItemId,
    /// Stored file reference (e.g. `snapshot_20260824_101500_123456.jpg`).
    pub filename: String,
    /// Optional user-assigned name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Lifecycle state.
    pub state: ItemState,
    /// When the frame was captured.
    pub captured_at: DateTime<Utc>,
}

impl Item {
    /// Validate a lifecycle transition for this item.
    pub fn check_transition(&self, next: ItemState) -> Result<(), LifecycleError> {
        if self.state.can_transition_to(next) {
            Ok(())
        } else {
            Err(LifecycleError {
                from: self.state,
                to: next,
            })
        }
    }
}

/// Mutable item fields for confirmed round-trip updates.
///
/// `None` means "leave unchanged". A state change rides along with metadata
/// edits so the persistence collaborator can apply both atomically.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    /// New name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New category, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New lifecycle state, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ItemState>,
}

impl ItemFields {
    /// Fields carrying only a state change.
    pub fn state(state: ItemState) -> Self {
        Self {
            state: Some(state),
            ..Self::default()
        }
    }

    /// True when nothing would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.state.is_none()
    }
}
