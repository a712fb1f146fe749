//! Beacon manager facade
//!
//! One manager owns one monitoring session, one advertising session, and the
//! listener registry they both broadcast into. Any number of listeners can
//! react to beacon events while only one radio watch exists; advertising the
//! local device runs independently through the same listener set.

use std::sync::Arc;

use crate::advertising::{AdvertisingConfig, AdvertisingSession};
use crate::listener::BeaconListener;
use crate::monitoring::MonitoringSession;
use crate::radio::{AdvertisingRadio, ProximityRadio};
use crate::region::BeaconRegion;
use crate::registry::ListenerRegistry;

// ----------------------------------------------------------------------------
// Beacon Manager
// ----------------------------------------------------------------------------

/// Single-region beacon event multiplexer
///
/// Construction selects the region to watch and immediately starts the
/// monitoring session; a radio rejection is broadcast to listeners rather
/// than returned. The two sessions are independent state machines and may be
/// driven concurrently.
pub struct BeaconManager {
    registry: Arc<ListenerRegistry>,
    monitoring: Arc<MonitoringSession>,
    advertising: Arc<AdvertisingSession>,
}

impl BeaconManager {
    /// Create a manager watching `region` over the given radios
    pub async fn new(
        proximity_radio: Arc<dyn ProximityRadio>,
        advertising_radio: Arc<dyn AdvertisingRadio>,
        region: BeaconRegion,
    ) -> Self {
        let registry = Arc::new(ListenerRegistry::new());
        let monitoring = Arc::new(MonitoringSession::new(
            proximity_radio,
            Arc::clone(&registry),
        ));
        let advertising = Arc::new(AdvertisingSession::new(
            advertising_radio,
            Arc::clone(&registry),
        ));

        monitoring.start(region).await;

        Self {
            registry,
            monitoring,
            advertising,
        }
    }

    // ------------------------------------------------------------------
    // Listener management
    // ------------------------------------------------------------------

    /// Register a listener; see [`ListenerRegistry::add`]
    pub fn add_listener(&self, listener: Arc<dyn BeaconListener>) {
        self.registry.add(listener);
    }

    /// Remove a previously registered listener
    pub fn remove_listener(&self, listener: &Arc<dyn BeaconListener>) {
        self.registry.remove(listener);
    }

    /// Remove all registered listeners; the primary listener is kept
    pub fn clear_listeners(&self) {
        self.registry.clear();
    }

    /// Set or clear the distinguished primary listener
    ///
    /// The primary is notified first on every broadcast, independent of
    /// whether it is also a registered member. The host decides which
    /// listener is current; this manager has no notion of UI state.
    pub fn set_primary(&self, listener: Option<Arc<dyn BeaconListener>>) {
        self.registry.set_primary(listener);
    }

    // ------------------------------------------------------------------
    // Monitoring
    // ------------------------------------------------------------------

    /// Watch a new region, stopping the previous one first
    pub async fn start_monitoring(&self, region: BeaconRegion) {
        self.monitoring.start(region).await;
    }

    /// Stop watching; a no-op when not monitoring
    pub async fn stop_monitoring(&self) {
        self.monitoring.stop().await;
    }

    /// Whether a region is currently being watched
    pub async fn is_monitoring(&self) -> bool {
        self.monitoring.is_monitoring().await
    }

    /// The actively watched region, if any
    pub async fn region(&self) -> Option<BeaconRegion> {
        self.monitoring.region().await
    }

    /// Whether Unknown-tier observations are dropped before delivery
    pub fn filter_out_unknown_proximity(&self) -> bool {
        self.monitoring.filter_out_unknown_proximity()
    }

    /// Toggle Unknown-tier filtering; takes effect on the next callback
    pub fn set_filter_out_unknown_proximity(&self, filter: bool) {
        self.monitoring.set_filter_out_unknown_proximity(filter);
    }

    // ------------------------------------------------------------------
    // Advertising
    // ------------------------------------------------------------------

    /// Advertise the local device as a beacon, replacing any active beacon
    ///
    /// Completion is reported through the advertising-started notification,
    /// which carries the radio's error on failure.
    pub async fn start_advertising(&self, config: AdvertisingConfig) {
        self.advertising.start(config).await;
    }

    /// Advertise as an Estimote beacon with the fixed preset identity
    ///
    /// `measured_power` falls back to the default of -59 when `None`.
    pub async fn start_advertising_estimote(
        &self,
        major: u16,
        minor: u16,
        measured_power: Option<i8>,
    ) {
        let mut config = AdvertisingConfig::estimote(major, minor);
        if let Some(power) = measured_power {
            config = config.with_measured_power(power);
        }
        self.advertising.start(config).await;
    }

    /// Stop advertising; a no-op when not advertising
    pub async fn stop_advertising(&self) {
        self.advertising.stop().await;
    }

    /// Whether the device is currently advertising
    pub async fn is_advertising(&self) -> bool {
        self.advertising.is_advertising().await
    }

    /// The active advertising configuration, if any
    pub async fn advertising_config(&self) -> Option<AdvertisingConfig> {
        self.advertising.config().await
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity::{BeaconObservation, DistanceEstimate, RangingUpdate};
    use crate::radio::ProximityRadioEvent;
    use crate::test_support::{
        shared_log, wait_for, MockAdvertisingRadio, MockProximityRadio, Recorder,
    };

    const HOME_UUID: uuid::Uuid = uuid::uuid!("E2C56DB5-DFFB-48D2-B060-D0F5A71096E0");

    async fn manager(
        proximity: &Arc<MockProximityRadio>,
        advertising: &Arc<MockAdvertisingRadio>,
    ) -> BeaconManager {
        BeaconManager::new(
            proximity.clone(),
            advertising.clone(),
            BeaconRegion::new(HOME_UUID, "home").unwrap(),
        )
        .await
    }

    #[tokio::test]
    async fn test_construction_starts_monitoring() {
        let proximity = MockProximityRadio::accepting();
        let advertising = MockAdvertisingRadio::accepting();
        let manager = manager(&proximity, &advertising).await;

        assert!(manager.is_monitoring().await);
        assert_eq!(manager.region().await.unwrap().identifier(), "home");
        assert_eq!(
            proximity.watched.lock().unwrap().as_ref().unwrap().identifier(),
            "home"
        );
    }

    #[tokio::test]
    async fn test_any_major_region_delivers_specific_major() {
        let proximity = MockProximityRadio::accepting();
        let advertising = MockAdvertisingRadio::accepting();
        let manager = manager(&proximity, &advertising).await;

        let log = shared_log();
        manager.add_listener(Recorder::proximity("l1", &log));

        // A region with no major/minor filter still classifies and delivers
        // an observation carrying a concrete major.
        proximity
            .emit(ProximityRadioEvent::Ranging(RangingUpdate {
                region: manager.region().await.unwrap(),
                beacons: vec![BeaconObservation {
                    major: 10,
                    minor: 0,
                    tier: None,
                    estimate: DistanceEstimate::Meters(0.3),
                }],
            }))
            .await;

        wait_for(|| !log.lock().unwrap().is_empty()).await;
        assert_eq!(log.lock().unwrap().as_slice(), ["l1:event:Immediate"]);
    }

    #[tokio::test]
    async fn test_advertising_flows_through_same_listeners() {
        let proximity = MockProximityRadio::accepting();
        let advertising = MockAdvertisingRadio::accepting();
        let manager = manager(&proximity, &advertising).await;

        let log = shared_log();
        manager.add_listener(Recorder::both("l1", &log));

        manager.start_advertising_estimote(5, 6, None).await;
        assert!(manager.is_advertising().await);
        let config = manager.advertising_config().await.unwrap();
        assert_eq!(config.measured_power(), crate::advertising::DEFAULT_MEASURED_POWER);

        manager.stop_advertising().await;
        assert_eq!(
            log.lock().unwrap().as_slice(),
            ["l1:adv_started:ok", "l1:adv_stopped"]
        );
    }

    #[tokio::test]
    async fn test_filter_flag_round_trip() {
        let proximity = MockProximityRadio::accepting();
        let advertising = MockAdvertisingRadio::accepting();
        let manager = manager(&proximity, &advertising).await;

        assert!(manager.filter_out_unknown_proximity());
        manager.set_filter_out_unknown_proximity(false);
        assert!(!manager.filter_out_unknown_proximity());
    }
}
