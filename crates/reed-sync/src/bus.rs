//! Event fan-out to mounted view surfaces.
//!
//! Delivery is synchronous and in registration order. A failing or
//! panicking subscriber never prevents delivery to the remaining
//! subscribers — faults are isolated per surface and logged.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use metrics::counter;
use parking_lot::Mutex;
use tracing::{debug, warn};

use reed_core::events::{EventSink, ReedEvent};

use crate::view::{Orientation, ViewState, WindowGeometry};

/// Identifies one subscription for later removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// A subscriber fault. Does not affect other subscribers.
#[derive(Debug, thiserror::Error)]
#[error("surface error: {0}")]
pub struct SurfaceError(pub String);

/// A mounted view surface (drawer, alert banner, secondary viewer,
/// review surface).
pub trait ViewSurface: Send + Sync {
    /// Surface name for logs.
    fn name(&self) -> &str;

    /// Handle one event. Errors are logged and isolated.
    fn on_event(&self, event: &ReedEvent) -> Result<(), SurfaceError>;
}

struct Registration {
    id: SubscriptionId,
    surface: Arc<dyn ViewSurface>,
}

/// Synchronous fan-out bus with orientation-dependent presentation.
pub struct ViewSyncBus {
    geometry: Arc<dyn WindowGeometry>,
    subscribers: Mutex<Vec<Registration>>,
    view_state: Mutex<ViewState>,
    next_id: Mutex<u64>,
}

impl ViewSyncBus {
    /// New bus over a geometry provider.
    pub fn new(geometry: Arc<dyn WindowGeometry>) -> Self {
        let initial = ViewState::new(geometry.orientation());
        Self {
            geometry,
            subscribers: Mutex::new(Vec::new()),
            view_state: Mutex::new(initial),
            next_id: Mutex::new(0),
        }
    }

    /// Register a surface. Delivery order follows registration order.
    pub fn subscribe(&self, surface: Arc<dyn ViewSurface>) -> SubscriptionId {
        let mut next = self.next_id.lock();
        *next += 1;
        let id = SubscriptionId(*next);
        self.subscribers.lock().push(Registration { id, surface });
        id
    }

    /// Remove a surface. Returns true if it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.lock();
        let before = subs.len();
        subs.retain(|r| r.id != id);
        subs.len() != before
    }

    /// Number of registered surfaces.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Current derived view state (for initial render).
    pub fn view_state(&self) -> ViewState {
        *self.view_state.lock()
    }

    /// Current orientation, evaluated live.
    pub fn orientation(&self) -> Orientation {
        self.geometry.orientation()
    }

    /// User closed the drawer.
    pub fn close_drawer(&self) {
        self.view_state.lock().drawer_open = false;
    }

    /// User dismissed the alert.
    pub fn dismiss_alert(&self) {
        self.view_state.lock().alert_visible = false;
    }

    fn resolve_presentation(&self, event: &ReedEvent) {
        if let ReedEvent::ItemCreated { .. } = event {
            // Orientation is read at delivery time, not item-creation time.
            let orientation = self.geometry.orientation();
            self.view_state.lock().on_new_item(orientation);
        }
    }

    fn deliver(&self, event: &ReedEvent) {
        // Snapshot under the lock, deliver outside it — a subscriber may
        // unsubscribe (or subscribe another surface) from its callback.
        let subscribers: Vec<(SubscriptionId, Arc<dyn ViewSurface>)> = self
            .subscribers
            .lock()
            .iter()
            .map(|r| (r.id, Arc::clone(&r.surface)))
            .collect();

        for (id, surface) in subscribers {
            let outcome = catch_unwind(AssertUnwindSafe(|| surface.on_event(event)));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    counter!("view_surface_faults_total").increment(1);
                    warn!(surface = surface.name(), ?id, error = %e, "surface rejected event");
                }
                Err(_) => {
                    counter!("view_surface_faults_total").increment(1);
                    warn!(surface = surface.name(), ?id, "surface panicked during delivery");
                }
            }
        }
        debug!(event_type = event.event_type(), "event delivered");
    }
}

impl EventSink for ViewSyncBus {
    fn publish(&self, event: ReedEvent) {
        counter!("view_publish_total").increment(1);
        self.resolve_presentation(&event);
        self.deliver(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use reed_core::ids::ItemId;
    use reed_core::item::{Item, ItemState};
    use reed_core::orb::OrbState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGeometry(Mutex<Orientation>);

    impl FixedGeometry {
        fn new(o: Orientation) -> Arc<Self> {
            Arc::new(Self(Mutex::new(o)))
        }
        fn rotate_to(&self, o: Orientation) {
            *self.0.lock() = o;
        }
    }

    impl WindowGeometry for FixedGeometry {
        fn orientation(&self) -> Orientation {
            *self.0.lock()
        }
    }

    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<(&'static str, &'static str)>>>,
    }

    impl ViewSurface for Recorder {
        fn name(&self) -> &str {
            self.name
        }
        fn on_event(&self, event: &ReedEvent) -> Result<(), SurfaceError> {
            self.log.lock().push((self.name, event.event_type()));
            Ok(())
        }
    }

    struct Panicking;

    impl ViewSurface for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }
        fn on_event(&self, _event: &ReedEvent) -> Result<(), SurfaceError> {
            panic!("surface bug");
        }
    }

    struct Failing {
        calls: AtomicUsize,
    }

    impl ViewSurface for Failing {
        fn name(&self) -> &str {
            "failing"
        }
        fn on_event(&self, _event: &ReedEvent) -> Result<(), SurfaceError> {
            let _ = self.calls.fetch_add(1, Ordering::SeqCst);
            Err(SurfaceError("render failed".into()))
        }
    }

    fn item_created() -> ReedEvent {
        ReedEvent::ItemCreated {
            item: Item {
                id: ItemId::from("7"),
                filename: "snapshot_7.jpg".into(),
                name: None,
                category: None,
                state: ItemState::Captured,
                captured_at: Utc::now(),
            },
        }
    }

    #[test]
    fn delivers_in_registration_order() {
        let bus = ViewSyncBus::new(FixedGeometry::new(Orientation::Portrait));
        let log = Arc::new(Mutex::new(Vec::new()));
        let _a = bus.subscribe(Arc::new(Recorder {
            name: "drawer",
            log: Arc::clone(&log),
        }));
        let _b = bus.subscribe(Arc::new(Recorder {
            name: "alert",
            log: Arc::clone(&log),
        }));

        bus.publish(ReedEvent::OrbStateChanged {
            state: OrbState::Speaking,
        });

        assert_eq!(
            *log.lock(),
            vec![
                ("drawer", "orb_state_changed"),
                ("alert", "orb_state_changed")
            ]
        );
    }

    #[test]
    fn panicking_subscriber_does_not_block_others() {
        let bus = ViewSyncBus::new(FixedGeometry::new(Orientation::Portrait));
        let log = Arc::new(Mutex::new(Vec::new()));
        let _a = bus.subscribe(Arc::new(Panicking));
        let _b = bus.subscribe(Arc::new(Recorder {
            name: "review",
            log: Arc::clone(&log),
        }));

        bus.publish(item_created());
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn failing_subscriber_does_not_block_others() {
        let bus = ViewSyncBus::new(FixedGeometry::new(Orientation::Portrait));
        let failing = Arc::new(Failing {
            calls: AtomicUsize::new(0),
        });
        let log = Arc::new(Mutex::new(Vec::new()));
        let _a = bus.subscribe(Arc::clone(&failing) as Arc<dyn ViewSurface>);
        let _b = bus.subscribe(Arc::new(Recorder {
            name: "review",
            log: Arc::clone(&log),
        }));

        bus.publish(item_created());
        bus.publish(item_created());

        // The failing surface keeps being delivered to — faults are
        // isolated, not punished with removal.
        assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn landscape_new_item_opens_drawer() {
        let bus = ViewSyncBus::new(FixedGeometry::new(Orientation::Landscape));
        bus.publish(item_created());
        let state = bus.view_state();
        assert!(state.drawer_open);
        assert!(!state.alert_visible);
    }

    #[test]
    fn portrait_new_item_shows_alert() {
        let bus = ViewSyncBus::new(FixedGeometry::new(Orientation::Portrait));
        bus.publish(item_created());
        let state = bus.view_state();
        assert!(state.alert_visible);
        assert!(!state.drawer_open);
    }

    #[test]
    fn orientation_read_at_delivery_time() {
        let geometry = FixedGeometry::new(Orientation::Portrait);
        let bus = ViewSyncBus::new(Arc::clone(&geometry) as Arc<dyn WindowGeometry>);
        // Rotate after the bus was constructed but before delivery.
        geometry.rotate_to(Orientation::Landscape);
        bus.publish(item_created());
        assert!(bus.view_state().drawer_open);
        assert!(!bus.view_state().alert_visible);
    }

    #[test]
    fn non_item_events_leave_presentation_alone() {
        let bus = ViewSyncBus::new(FixedGeometry::new(Orientation::Landscape));
        bus.publish(ReedEvent::OrbStateChanged {
            state: OrbState::Listening,
        });
        let state = bus.view_state();
        assert!(!state.drawer_open);
        assert!(!state.alert_visible);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let bus = ViewSyncBus::new(FixedGeometry::new(Orientation::Portrait));
        let log = Arc::new(Mutex::new(Vec::new()));
        let id = bus.subscribe(Arc::new(Recorder {
            name: "drawer",
            log: Arc::clone(&log),
        }));
        assert_eq!(bus.subscriber_count(), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(item_created());
        assert!(log.lock().is_empty());
    }

    #[test]
    fn close_and_dismiss() {
        let bus = ViewSyncBus::new(FixedGeometry::new(Orientation::Landscape));
        bus.publish(item_created());
        assert!(bus.view_state().drawer_open);
        bus.close_drawer();
        assert!(!bus.view_state().drawer_open);

        let bus = ViewSyncBus::new(FixedGeometry::new(Orientation::Portrait));
        bus.publish(item_created());
        assert!(bus.view_state().alert_visible);
        bus.dismiss_alert();
        assert!(!bus.view_state().alert_visible);
    }
}
