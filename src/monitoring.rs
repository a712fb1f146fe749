//! Monitoring session and ranging pump
//!
//! The monitoring session owns the single active region and the external
//! proximity radio. Each accepted start spawns one pump task over the
//! radio's event stream; the pump drops observations outside the region's
//! major/minor filter, classifies the rest, applies the unknown-proximity
//! filter, and broadcasts through the listener registry in radio report
//! order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::proximity::{classify, Proximity, ProximityEvent};
use crate::radio::{ProximityRadio, ProximityRadioEvent};
use crate::region::BeaconRegion;
use crate::registry::ListenerRegistry;

// ----------------------------------------------------------------------------
// Monitoring Session
// ----------------------------------------------------------------------------

enum State {
    Idle,
    Monitoring {
        region: BeaconRegion,
        pump: JoinHandle<()>,
    },
}

/// State machine owning the single active region watch
///
/// Start/stop calls on the same session are serialized by the state lock,
/// which is held across the radio round-trip.
pub struct MonitoringSession {
    radio: Arc<dyn ProximityRadio>,
    registry: Arc<ListenerRegistry>,
    filter_unknown: Arc<AtomicBool>,
    state: Mutex<State>,
}

impl MonitoringSession {
    /// Create an idle session over the given radio and registry
    ///
    /// Unknown-proximity filtering defaults to on.
    pub fn new(radio: Arc<dyn ProximityRadio>, registry: Arc<ListenerRegistry>) -> Self {
        Self {
            radio,
            registry,
            filter_unknown: Arc::new(AtomicBool::new(true)),
            state: Mutex::new(State::Idle),
        }
    }

    /// Whether Unknown-tier observations are dropped before delivery
    pub fn filter_out_unknown_proximity(&self) -> bool {
        self.filter_unknown.load(Ordering::Relaxed)
    }

    /// Toggle Unknown-tier filtering; takes effect on the next callback
    pub fn set_filter_out_unknown_proximity(&self, filter: bool) {
        self.filter_unknown.store(filter, Ordering::Relaxed);
    }

    /// Start watching `region`, replacing any previously watched region
    ///
    /// A previous watch is stopped first; its stop errors are logged, not
    /// propagated. The session transitions to monitoring only once the radio
    /// accepts; a rejection leaves it idle and broadcasts a
    /// monitoring-failure notification.
    pub async fn start(&self, region: BeaconRegion) {
        let mut state = self.state.lock().await;

        if let State::Monitoring { region: old, pump } =
            std::mem::replace(&mut *state, State::Idle)
        {
            if let Err(e) = self.radio.stop_watching().await {
                warn!(
                    "ignoring stop failure while replacing region {}: {}",
                    old.identifier(),
                    e
                );
            }
            pump.abort();
            debug!("stopped watching region {}", old.identifier());
        }

        match self.radio.start_watching(&region).await {
            Ok(events) => {
                info!(identifier = region.identifier(), "monitoring started");
                let pump = tokio::spawn(pump_events(
                    events,
                    Arc::clone(&self.registry),
                    Arc::clone(&self.filter_unknown),
                ));
                *state = State::Monitoring { region, pump };
            }
            Err(e) => {
                warn!(
                    "proximity radio rejected region {}: {}",
                    region.identifier(),
                    e
                );
                self.registry.notify_monitoring_failed(&e);
            }
        }
    }

    /// Stop watching; a no-op while idle
    ///
    /// Transitions to idle unconditionally; a failing radio stop is logged
    /// and treated as a collaborator failure.
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if let State::Monitoring { region, pump } = std::mem::replace(&mut *state, State::Idle) {
            if let Err(e) = self.radio.stop_watching().await {
                warn!("proximity radio stop failed: {}", e);
            }
            pump.abort();
            info!(identifier = region.identifier(), "monitoring stopped");
        }
    }

    /// Whether the session is currently watching a region
    pub async fn is_monitoring(&self) -> bool {
        matches!(*self.state.lock().await, State::Monitoring { .. })
    }

    /// The actively watched region, if any
    pub async fn region(&self) -> Option<BeaconRegion> {
        match &*self.state.lock().await {
            State::Monitoring { region, .. } => Some(region.clone()),
            State::Idle => None,
        }
    }
}

impl Drop for MonitoringSession {
    fn drop(&mut self) {
        // The pump holds a registry handle; abort it so a dropped session
        // does not leave a detached task behind.
        if let State::Monitoring { pump, .. } = self.state.get_mut() {
            pump.abort();
        }
    }
}

// ----------------------------------------------------------------------------
// Ranging Pump
// ----------------------------------------------------------------------------

/// Drain one watch run's event stream into the registry
///
/// A single task per run keeps delivery order equal to radio report order.
async fn pump_events(
    mut events: mpsc::Receiver<ProximityRadioEvent>,
    registry: Arc<ListenerRegistry>,
    filter_unknown: Arc<AtomicBool>,
) {
    while let Some(event) = events.recv().await {
        match event {
            ProximityRadioEvent::RegionEntered(region) => {
                registry.notify_region_entered(&region);
            }
            ProximityRadioEvent::RegionExited(region) => {
                registry.notify_region_exited(&region);
            }
            ProximityRadioEvent::Ranging(update) => {
                for observation in &update.beacons {
                    if !update.region.matches(observation) {
                        debug!(
                            major = observation.major,
                            minor = observation.minor,
                            "dropping observation outside region filter"
                        );
                        continue;
                    }
                    let tier = classify(observation);
                    if tier == Proximity::Unknown && filter_unknown.load(Ordering::Relaxed) {
                        debug!("dropping unknown-proximity observation");
                        continue;
                    }
                    let event = ProximityEvent {
                        region: update.region.clone(),
                        tier,
                        estimate: observation.estimate,
                        timestamp: SystemTime::now(),
                    };
                    registry.notify_proximity_event(&event);
                }
            }
        }
    }
    debug!("ranging stream closed");
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
