//! Proximity tiers and classification of raw beacon observations
//!
//! Observations arrive from the proximity radio either pre-classified or as a
//! raw distance estimate. Pre-classified tiers are passed through verbatim so
//! that hardware-level calibration is never second-guessed; the distance bins
//! here only apply to radios that report estimates alone.

use std::time::SystemTime;

use crate::region::BeaconRegion;

// ----------------------------------------------------------------------------
// Proximity Tiers
// ----------------------------------------------------------------------------

/// Coarse distance bucket for a ranged beacon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Proximity {
    /// Within a couple of inches
    Immediate,
    /// Between a few inches and a couple of feet
    Near,
    /// Beyond a couple of feet
    Far,
    /// Detected, but the signal is too weak for a good estimate
    Unknown,
}

/// Raw signal-derived distance estimate reported by the radio
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DistanceEstimate {
    /// The radio could not derive an estimate
    Indeterminate,
    /// Estimated distance in meters
    Meters(f64),
}

/// Upper bound of the immediate bin, in meters
pub const IMMEDIATE_CUTOFF_METERS: f64 = 0.5;
/// Upper bound of the near bin, in meters
pub const NEAR_CUTOFF_METERS: f64 = 4.0;

impl Proximity {
    /// Classify a raw distance estimate into a tier
    ///
    /// Total over all inputs: indeterminate, non-finite, and negative
    /// estimates all classify as `Unknown`.
    pub fn from_estimate(estimate: DistanceEstimate) -> Self {
        match estimate {
            DistanceEstimate::Indeterminate => Proximity::Unknown,
            DistanceEstimate::Meters(m) if !m.is_finite() || m < 0.0 => Proximity::Unknown,
            DistanceEstimate::Meters(m) if m <= IMMEDIATE_CUTOFF_METERS => Proximity::Immediate,
            DistanceEstimate::Meters(m) if m <= NEAR_CUTOFF_METERS => Proximity::Near,
            DistanceEstimate::Meters(_) => Proximity::Far,
        }
    }
}

// ----------------------------------------------------------------------------
// Observations and Events
// ----------------------------------------------------------------------------

/// A single beacon sighting within a ranging callback
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BeaconObservation {
    /// Major value reported by the beacon
    pub major: u16,
    /// Minor value reported by the beacon
    pub minor: u16,
    /// Tier already assigned by the radio, if it classifies itself
    pub tier: Option<Proximity>,
    /// Raw distance estimate
    pub estimate: DistanceEstimate,
}

/// One raw ranging callback from the proximity radio
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RangingUpdate {
    /// Region the beacons were ranged against
    pub region: BeaconRegion,
    /// Beacons observed in this callback, in radio report order
    pub beacons: Vec<BeaconObservation>,
}

/// A classified proximity event delivered to listeners
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProximityEvent {
    /// Region the observation was ranged against
    pub region: BeaconRegion,
    /// Classified tier
    pub tier: Proximity,
    /// Raw distance estimate, opaque beyond classification
    pub estimate: DistanceEstimate,
    /// Observation time
    pub timestamp: SystemTime,
}

/// Classify an observation, preferring the radio's own tier
pub fn classify(observation: &BeaconObservation) -> Proximity {
    observation
        .tier
        .unwrap_or_else(|| Proximity::from_estimate(observation.estimate))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
