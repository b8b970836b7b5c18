//! Derived view state.

use serde::{Deserialize, Serialize};

/// Window orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Height ≥ width: new items surface through the alert banner.
    Portrait,
    /// Width > height: new items surface through the drawer.
    Landscape,
}

impl Orientation {
    /// Derive orientation from window geometry.
    pub fn from_size(width: u32, height: u32) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }
}

/// Live window geometry provider.
///
/// Queried at event delivery time — orientation may have changed between
/// capture and confirmation, and delivery-time wins.
pub trait WindowGeometry: Send + Sync {
    /// Current orientation.
    fn orientation(&self) -> Orientation;
}

/// Derived presentation state. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Orientation at the last event delivery.
    pub orientation: Orientation,
    /// Whether the item drawer is open.
    pub drawer_open: bool,
    /// Whether the new-item alert is visible.
    pub alert_visible: bool,
}

impl ViewState {
    /// Initial state for a given orientation: nothing open, nothing shown.
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            drawer_open: false,
            alert_visible: false,
        }
    }

    /// Apply the new-item presentation policy for the given orientation.
    /// Exactly one of drawer/alert is triggered, never both.
    pub fn on_new_item(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        match orientation {
            Orientation::Landscape => {
                self.drawer_open = true;
                self.alert_visible = false;
            }
            Orientation::Portrait => {
                self.alert_visible = true;
                self.drawer_open = false;
            }
        }
    }
}
