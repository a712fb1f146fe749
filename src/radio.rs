//! External radio collaborator traits
//!
//! The actual radio hardware sits behind these two traits: a proximity radio
//! that scans for nearby beacons and an advertising radio that makes the
//! local device discoverable. Both are modeled as non-blocking requests with
//! asynchronous completion; the proximity radio additionally hands out a
//! per-run event stream that the monitoring session pumps until stopped.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::advertising::AdvertisingConfig;
use crate::proximity::RangingUpdate;
use crate::region::BeaconRegion;
use crate::Result;

// ----------------------------------------------------------------------------
// Radio Events
// ----------------------------------------------------------------------------

/// Asynchronous events emitted by the proximity radio during a watch run
#[derive(Debug, Clone, PartialEq)]
pub enum ProximityRadioEvent {
    /// The device entered the watched region
    RegionEntered(BeaconRegion),
    /// The device exited the watched region
    RegionExited(BeaconRegion),
    /// A ranging callback with the beacons observed since the last one
    Ranging(RangingUpdate),
}

// ----------------------------------------------------------------------------
// Radio Traits
// ----------------------------------------------------------------------------

/// Beacon-scanning radio service
#[async_trait]
pub trait ProximityRadio: Send + Sync {
    /// Begin watching for beacons matching `region`
    ///
    /// On acceptance returns the event stream for this run; the stream ends
    /// when watching stops. A rejection returns `ServiceRejected` and no
    /// stream is created.
    async fn start_watching(
        &self,
        region: &BeaconRegion,
    ) -> Result<mpsc::Receiver<ProximityRadioEvent>>;

    /// Cease watching and close the active event stream
    async fn stop_watching(&self) -> Result<()>;
}

/// Beacon-advertising radio service
#[async_trait]
pub trait AdvertisingRadio: Send + Sync {
    /// Begin transmitting as a beacon with the given configuration
    ///
    /// Resolves once the radio acknowledges the request; a rejection
    /// resolves to `ServiceRejected`.
    async fn start_transmitting(&self, config: &AdvertisingConfig) -> Result<()>;

    /// Cease transmitting
    async fn stop_transmitting(&self) -> Result<()>;
}
