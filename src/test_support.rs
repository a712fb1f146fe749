//! Shared fixtures for unit tests: recording listeners and mock radios

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::advertising::AdvertisingConfig;
use crate::error::BeaconError;
use crate::listener::{BeaconListener, BeaconManagerListener, ProximityListener};
use crate::proximity::ProximityEvent;
use crate::radio::{AdvertisingRadio, ProximityRadio, ProximityRadioEvent};
use crate::region::BeaconRegion;
use crate::Result;

// ----------------------------------------------------------------------------
// Recording Listener
// ----------------------------------------------------------------------------

pub type SharedLog = Arc<Mutex<Vec<String>>>;

pub fn shared_log() -> SharedLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A listener that appends every notification to a shared log, so tests can
/// assert cross-listener delivery order.
pub struct Recorder {
    name: &'static str,
    log: SharedLog,
    proximity: bool,
    beacon_manager: bool,
    fail: bool,
}

impl Recorder {
    fn build(
        name: &'static str,
        log: &SharedLog,
        proximity: bool,
        beacon_manager: bool,
        fail: bool,
    ) -> Arc<dyn BeaconListener> {
        Arc::new(Self {
            name,
            log: Arc::clone(log),
            proximity,
            beacon_manager,
            fail,
        })
    }

    /// Proximity capability only
    pub fn proximity(name: &'static str, log: &SharedLog) -> Arc<dyn BeaconListener> {
        Self::build(name, log, true, false, false)
    }

    /// Beacon-manager capability only
    pub fn beacon_manager(name: &'static str, log: &SharedLog) -> Arc<dyn BeaconListener> {
        Self::build(name, log, false, true, false)
    }

    /// Both capabilities
    pub fn both(name: &'static str, log: &SharedLog) -> Arc<dyn BeaconListener> {
        Self::build(name, log, true, true, false)
    }

    /// Neither capability; registration must reject it
    pub fn capability_less(name: &'static str, log: &SharedLog) -> Arc<dyn BeaconListener> {
        Self::build(name, log, false, false, false)
    }

    /// Proximity capability whose handlers record and then fail
    pub fn failing(name: &'static str, log: &SharedLog) -> Arc<dyn BeaconListener> {
        Self::build(name, log, true, false, true)
    }

    fn record(&self, entry: String) -> Result<()> {
        self.log.lock().unwrap().push(entry);
        if self.fail {
            Err(BeaconError::listener_fault("handler refused the event"))
        } else {
            Ok(())
        }
    }
}

impl ProximityListener for Recorder {
    fn region_entered(&self, region: &BeaconRegion) -> Result<()> {
        self.record(format!("{}:entered:{}", self.name, region.identifier()))
    }

    fn region_exited(&self, region: &BeaconRegion) -> Result<()> {
        self.record(format!("{}:exited:{}", self.name, region.identifier()))
    }

    fn proximity_event(&self, event: &ProximityEvent) -> Result<()> {
        self.record(format!("{}:event:{:?}", self.name, event.tier))
    }

    fn monitoring_failed(&self, error: &BeaconError) -> Result<()> {
        let _ = error;
        self.record(format!("{}:monitoring_failed", self.name))
    }
}

impl BeaconManagerListener for Recorder {
    fn advertising_started(&self, error: Option<&BeaconError>) -> Result<()> {
        let outcome = if error.is_some() { "err" } else { "ok" };
        self.record(format!("{}:adv_started:{}", self.name, outcome))
    }

    fn advertising_stopped(&self) -> Result<()> {
        self.record(format!("{}:adv_stopped", self.name))
    }
}

impl BeaconListener for Recorder {
    fn as_proximity(&self) -> Option<&dyn ProximityListener> {
        self.proximity.then_some(self as &dyn ProximityListener)
    }

    fn as_beacon_manager(&self) -> Option<&dyn BeaconManagerListener> {
        self.beacon_manager
            .then_some(self as &dyn BeaconManagerListener)
    }
}

// ----------------------------------------------------------------------------
// Mock Radios
// ----------------------------------------------------------------------------

/// Proximity radio double that hands out a channel-backed event stream
pub struct MockProximityRadio {
    accept: bool,
    pub start_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    pub watched: Mutex<Option<BeaconRegion>>,
    sender: Mutex<Option<mpsc::Sender<ProximityRadioEvent>>>,
}

impl MockProximityRadio {
    fn new(accept: bool) -> Arc<Self> {
        Arc::new(Self {
            accept,
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            watched: Mutex::new(None),
            sender: Mutex::new(None),
        })
    }

    pub fn accepting() -> Arc<Self> {
        Self::new(true)
    }

    pub fn rejecting() -> Arc<Self> {
        Self::new(false)
    }

    /// Emit an event into the active watch stream
    pub async fn emit(&self, event: ProximityRadioEvent) {
        let sender = self
            .sender
            .lock()
            .unwrap()
            .clone()
            .expect("no active watch stream");
        sender.send(event).await.expect("stream receiver dropped");
    }
}

#[async_trait]
impl ProximityRadio for MockProximityRadio {
    async fn start_watching(
        &self,
        region: &BeaconRegion,
    ) -> Result<mpsc::Receiver<ProximityRadioEvent>> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if !self.accept {
            return Err(BeaconError::proximity_rejected("hardware unavailable"));
        }
        *self.watched.lock().unwrap() = Some(region.clone());
        let (tx, rx) = mpsc::channel(32);
        *self.sender.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn stop_watching(&self) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.sender.lock().unwrap().take();
        self.watched.lock().unwrap().take();
        Ok(())
    }
}

/// Advertising radio double that records the start/stop call sequence
pub struct MockAdvertisingRadio {
    accept: bool,
    pub calls: Mutex<Vec<String>>,
    pub transmitting: Mutex<Option<AdvertisingConfig>>,
}

impl MockAdvertisingRadio {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            accept: true,
            calls: Mutex::new(Vec::new()),
            transmitting: Mutex::new(None),
        })
    }

    pub fn rejecting() -> Arc<Self> {
        Arc::new(Self {
            accept: false,
            calls: Mutex::new(Vec::new()),
            transmitting: Mutex::new(None),
        })
    }

    pub fn call_sequence(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AdvertisingRadio for MockAdvertisingRadio {
    async fn start_transmitting(&self, config: &AdvertisingConfig) -> Result<()> {
        self.calls.lock().unwrap().push("start".to_string());
        if !self.accept {
            return Err(BeaconError::advertising_rejected("permission denied"));
        }
        *self.transmitting.lock().unwrap() = Some(config.clone());
        Ok(())
    }

    async fn stop_transmitting(&self) -> Result<()> {
        self.calls.lock().unwrap().push("stop".to_string());
        self.transmitting.lock().unwrap().take();
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Async Helpers
// ----------------------------------------------------------------------------

/// Poll `predicate` until it holds, panicking after one second
pub async fn wait_for(predicate: impl Fn() -> bool) {
    for _ in 0..100 {
        if predicate() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within one second");
}
