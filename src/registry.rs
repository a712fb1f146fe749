//! Listener registry and event broadcast
//!
//! The registry is the one piece of state mutated from multiple call sites:
//! listeners are added and removed by arbitrary callers while session
//! callbacks broadcast into it. Every broadcast works from a snapshot taken
//! under the lock, so concurrent mutation never causes a broadcast to skip,
//! duplicate, or crash on a listener.

use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use crate::error::BeaconError;
use crate::listener::BeaconListener;
use crate::proximity::ProximityEvent;
use crate::region::BeaconRegion;
use crate::Result;

// ----------------------------------------------------------------------------
// Listener Registry
// ----------------------------------------------------------------------------

/// Ordered, deduplicated listener collection plus one distinguished primary
///
/// Uniqueness is `Arc` identity. The primary listener is independent of
/// membership: it is always notified first, and a listener that is both
/// primary and a member is still invoked exactly once per event.
pub struct ListenerRegistry {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    members: Vec<Arc<dyn BeaconListener>>,
    primary: Option<Arc<dyn BeaconListener>>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Add a listener if it carries at least one capability
    ///
    /// Capability-less listeners are ignored with a warning rather than an
    /// error. Adding a listener that is already present is a no-op.
    pub fn add(&self, listener: Arc<dyn BeaconListener>) {
        if listener.as_proximity().is_none() && listener.as_beacon_manager().is_none() {
            warn!("ignoring listener with no proximity or beacon-manager capability");
            return;
        }
        let mut inner = self.inner.write().expect("registry lock poisoned");
        if inner.members.iter().any(|m| Arc::ptr_eq(m, &listener)) {
            return;
        }
        inner.members.push(listener);
    }

    /// Remove a listener if present
    pub fn remove(&self, listener: &Arc<dyn BeaconListener>) {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        inner.members.retain(|m| !Arc::ptr_eq(m, listener));
    }

    /// Remove all members; the primary listener is unaffected
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        inner.members.clear();
    }

    /// Replace the distinguished primary listener; `None` clears it
    ///
    /// Capability is not checked here; a primary without the capability an
    /// event requires is simply skipped at dispatch time.
    pub fn set_primary(&self, listener: Option<Arc<dyn BeaconListener>>) {
        let mut inner = self.inner.write().expect("registry lock poisoned");
        inner.primary = listener;
    }

    /// Number of registered members (excluding the primary slot)
    pub fn len(&self) -> usize {
        self.inner.read().expect("registry lock poisoned").members.len()
    }

    /// Whether no members are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consistent delivery snapshot: primary first, then members in
    /// insertion order, with a member identical to the primary skipped
    fn snapshot(&self) -> Vec<Arc<dyn BeaconListener>> {
        let inner = self.inner.read().expect("registry lock poisoned");
        let mut targets = Vec::with_capacity(inner.members.len() + 1);
        if let Some(primary) = &inner.primary {
            targets.push(Arc::clone(primary));
        }
        for member in &inner.members {
            let is_primary = inner
                .primary
                .as_ref()
                .map(|p| Arc::ptr_eq(p, member))
                .unwrap_or(false);
            if !is_primary {
                targets.push(Arc::clone(member));
            }
        }
        targets
    }

    /// Deliver one event to the snapshot, isolating per-listener faults
    fn dispatch<F>(&self, event: &str, deliver: F)
    where
        F: Fn(&dyn BeaconListener) -> Option<Result<()>>,
    {
        for listener in self.snapshot() {
            match deliver(listener.as_ref()) {
                Some(Err(fault)) => {
                    warn!("listener failed handling {}: {}", event, fault);
                }
                Some(Ok(())) => {}
                // Listener does not carry the capability this event requires
                None => debug!("skipping listener without capability for {}", event),
            }
        }
    }

    // ------------------------------------------------------------------
    // Broadcasts
    // ------------------------------------------------------------------

    /// Broadcast a region-entered notification
    pub fn notify_region_entered(&self, region: &BeaconRegion) {
        self.dispatch("region entry", |l| {
            l.as_proximity().map(|p| p.region_entered(region))
        });
    }

    /// Broadcast a region-exited notification
    pub fn notify_region_exited(&self, region: &BeaconRegion) {
        self.dispatch("region exit", |l| {
            l.as_proximity().map(|p| p.region_exited(region))
        });
    }

    /// Broadcast a classified proximity event
    pub fn notify_proximity_event(&self, event: &ProximityEvent) {
        self.dispatch("proximity event", |l| {
            l.as_proximity().map(|p| p.proximity_event(event))
        });
    }

    /// Broadcast a monitoring-start failure
    pub fn notify_monitoring_failed(&self, error: &BeaconError) {
        self.dispatch("monitoring failure", |l| {
            l.as_proximity().map(|p| p.monitoring_failed(error))
        });
    }

    /// Broadcast an advertising-start completion, with the error on failure
    pub fn notify_advertising_started(&self, error: Option<&BeaconError>) {
        self.dispatch("advertising start", |l| {
            l.as_beacon_manager().map(|m| m.advertising_started(error))
        });
    }

    /// Broadcast an advertising-stopped notification
    pub fn notify_advertising_stopped(&self) {
        self.dispatch("advertising stop", |l| {
            l.as_beacon_manager().map(|m| m.advertising_stopped())
        });
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
