//! Events delivered to view surfaces.
//!
//! [`ReedEvent`] is the typed replacement for the original DOM-keyed event
//! delegation: tagged variants, independent of any rendering tree. Events
//! are emitted only after the authoritative side has confirmed the change
//! (items) or the transition has actually happened (phase, orb).

use serde::{Deserialize, Serialize};

use crate::ids::ItemId;
use crate::item::Item;
use crate::orb::OrbState;
use crate::phase::SessionPhase;

/// A state change fanned out to all mounted view surfaces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReedEvent {
    /// A new item was confirmed by the persistence collaborator.
    ItemCreated {
        /// The confirmed item.
        item: Item,
    },

    /// An existing item's fields or lifecycle state changed (confirmed).
    ItemUpdated {
        /// Identifier of the updated item.
        id: ItemId,
        /// The item as confirmed after the update.
        item: Item,
    },

    /// The session moved to a new phase.
    SessionPhaseChanged {
        /// The phase just entered.
        phase: SessionPhase,
    },

    /// The orb indicator changed state.
    OrbStateChanged {
        /// The new orb state.
        state: OrbState,
    },
}

impl ReedEvent {
    /// Event type discriminator (matches the serialized `type` tag).
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ItemCreated { .. } => "item_created",
            Self::ItemUpdated { .. } => "item_updated",
            Self::SessionPhaseChanged { .. } => "session_phase_changed",
            Self::OrbStateChanged { .. } => "orb_state_changed",
        }
    }
}

/// Fan-out seam between state owners and the view layer.
///
/// Implemented by the view sync bus; the item store and the session
/// orchestrator publish through it without depending on the view layer.
/// `publish` is synchronous and must not block on I/O.
pub trait EventSink: Send + Sync {
    /// Deliver one event to all interested surfaces.
    fn publish(&self, event: ReedEvent);
}

/// Sink that drops every event. Useful for headless tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn publish(&self, _event: ReedEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemState;
    use chrono::Utc;

    fn item() -> Item {
        Item {
            id: ItemId::from("7"),
            filename: "snapshot_a.jpg".into(),
            name: None,
            category: None,
            state: ItemState::Captured,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn event_type_matches_tag() {
        let e = ReedEvent::ItemCreated { item: item() };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], e.event_type());
        assert_eq!(e.event_type(), "item_created");
    }

    #[test]
    fn phase_event_serializes() {
        let e = ReedEvent::SessionPhaseChanged {
            phase: SessionPhase::Capturing,
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "session_phase_changed");
        assert_eq!(json["phase"], "capturing");
    }

    #[test]
    fn orb_event_serializes() {
        let e = ReedEvent::OrbStateChanged {
            state: OrbState::Speaking,
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["state"], "speaking");
    }

    #[test]
    fn item_updated_round_trips() {
        let e = ReedEvent::ItemUpdated {
            id: ItemId::from("7"),
            item: item(),
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: ReedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn null_sink_accepts_events() {
        NullSink.publish(ReedEvent::OrbStateChanged {
            state: OrbState::Idle,
        });
    }
}
