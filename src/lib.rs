//! Single-region beacon monitoring and advertising multiplexer
//!
//! This crate lets any number of listeners react to beacon proximity events
//! while exactly one radio watch exists, and provides an API for advertising
//! the local device as a beacon itself. The radio hardware sits behind the
//! [`ProximityRadio`] and [`AdvertisingRadio`] traits; session lifecycles,
//! proximity classification, and listener fan-out all live here.
//!
//! ## Architecture
//!
//! - [`error`] - Error taxonomy and `Result` alias
//! - [`proximity`] - Proximity tiers, classification, observation/event types
//! - [`region`] - Region descriptors (standard and Estimote-preset)
//! - [`radio`] - External radio collaborator traits
//! - [`listener`] - The two optional listener capabilities
//! - [`registry`] - Ordered, deduplicated listener registry with snapshot
//!   broadcast
//! - [`monitoring`] - Region-watch state machine and ranging pump
//! - [`advertising`] - Advertising configuration and state machine
//! - [`manager`] - The [`BeaconManager`] facade
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use beacon_mux::{BeaconManager, BeaconRegion};
//! # use beacon_mux::{ProximityRadio, AdvertisingRadio};
//!
//! # async fn example(
//! #     proximity: Arc<dyn ProximityRadio>,
//! #     advertising: Arc<dyn AdvertisingRadio>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let region = BeaconRegion::new(
//!     "E2C56DB5-DFFB-48D2-B060-D0F5A71096E0".parse()?,
//!     "home",
//! )?;
//!
//! // Construction immediately starts watching the region; proximity events
//! // reach every registered listener and the primary listener.
//! let manager = BeaconManager::new(proximity, advertising, region).await;
//!
//! // Advertising is independent of monitoring and reports its outcome
//! // through the same listener set.
//! manager.start_advertising_estimote(1, 2, None).await;
//! # Ok(())
//! # }
//! ```

pub mod advertising;
pub mod error;
pub mod listener;
pub mod manager;
pub mod monitoring;
pub mod proximity;
pub mod radio;
pub mod region;
pub mod registry;

#[cfg(test)]
mod test_support;

// Public API exports
pub use advertising::{AdvertisingConfig, AdvertisingSession, DEFAULT_MEASURED_POWER};
pub use error::{BeaconError, Result};
pub use listener::{BeaconListener, BeaconManagerListener, ProximityListener};
pub use manager::BeaconManager;
pub use monitoring::MonitoringSession;
pub use proximity::{
    classify, BeaconObservation, DistanceEstimate, Proximity, ProximityEvent, RangingUpdate,
};
pub use radio::{AdvertisingRadio, ProximityRadio, ProximityRadioEvent};
pub use region::{BeaconRegion, ESTIMOTE_IDENTIFIER, ESTIMOTE_UUID};
pub use registry::ListenerRegistry;
