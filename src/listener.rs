//! Listener capabilities
//!
//! Listeners implement one or both of two independent notification families:
//! the proximity capability (region entry/exit, classified ranging events,
//! monitoring failures) and the beacon-manager capability (advertising
//! lifecycle). There is no common base interface; the registry queries each
//! listener for the capability an event requires and skips listeners that do
//! not carry it.
//!
//! Handlers return `Result<()>`. A failure is contained by the registry: it
//! is logged and delivery continues to the remaining listeners.

use crate::error::BeaconError;
use crate::proximity::ProximityEvent;
use crate::region::BeaconRegion;
use crate::Result;

// ----------------------------------------------------------------------------
// Capability Traits
// ----------------------------------------------------------------------------

/// General proximity capability
///
/// All methods default to no-ops, so implementors opt into only the
/// notifications they care about.
pub trait ProximityListener: Send + Sync {
    /// The device entered the watched region
    fn region_entered(&self, region: &BeaconRegion) -> Result<()> {
        let _ = region;
        Ok(())
    }

    /// The device exited the watched region
    fn region_exited(&self, region: &BeaconRegion) -> Result<()> {
        let _ = region;
        Ok(())
    }

    /// A classified (and filtered) beacon observation
    fn proximity_event(&self, event: &ProximityEvent) -> Result<()> {
        let _ = event;
        Ok(())
    }

    /// The proximity radio rejected a start request
    fn monitoring_failed(&self, error: &BeaconError) -> Result<()> {
        let _ = error;
        Ok(())
    }
}

/// Beacon-manager capability: advertising lifecycle notifications
pub trait BeaconManagerListener: Send + Sync {
    /// Advertising start completed; `error` is `None` on success
    fn advertising_started(&self, error: Option<&BeaconError>) -> Result<()> {
        let _ = error;
        Ok(())
    }

    /// Advertising stopped
    fn advertising_stopped(&self) -> Result<()> {
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Capability Query
// ----------------------------------------------------------------------------

/// A registrable listener, queried per event for the capability it carries
///
/// A listener that returns `None` from both queries is rejected at
/// registration time.
pub trait BeaconListener: Send + Sync {
    /// The general proximity capability, if implemented
    fn as_proximity(&self) -> Option<&dyn ProximityListener> {
        None
    }

    /// The beacon-manager capability, if implemented
    fn as_beacon_manager(&self) -> Option<&dyn BeaconManagerListener> {
        None
    }
}
