//! Beacon region descriptors
//!
//! A region identifies which beacon family to watch: a 128-bit identity, an
//! optional major/minor filter, and an identifier string for later lookup.
//! Regions are immutable values; reconfiguring a session replaces the region
//! wholesale rather than mutating it.

use uuid::Uuid;

use crate::error::BeaconError;
use crate::proximity::BeaconObservation;
use crate::Result;

// ----------------------------------------------------------------------------
// Vendor Preset
// ----------------------------------------------------------------------------

/// Fixed identity used by the Estimote preset constructors
pub const ESTIMOTE_UUID: Uuid = uuid::uuid!("B9407F30-F5F8-466E-AFF9-25556B57FE6D");

/// Fixed identifier used by the Estimote preset constructors
pub const ESTIMOTE_IDENTIFIER: &str = "EstimoteSampleRegion";

// ----------------------------------------------------------------------------
// Region Descriptor
// ----------------------------------------------------------------------------

/// Immutable descriptor of a beacon family to watch
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BeaconRegion {
    identity: Uuid,
    major: Option<u16>,
    minor: Option<u16>,
    identifier: String,
}

impl BeaconRegion {
    /// Watch for beacons with any major or minor value
    pub fn new(identity: Uuid, identifier: impl Into<String>) -> Result<Self> {
        Self::try_new(identity, None, None, identifier.into())
    }

    /// Watch for beacons with a specific major value and any minor value
    pub fn with_major(identity: Uuid, major: u16, identifier: impl Into<String>) -> Result<Self> {
        Self::try_new(identity, Some(major), None, identifier.into())
    }

    /// Watch for beacons with specific major and minor values
    pub fn with_major_minor(
        identity: Uuid,
        major: u16,
        minor: u16,
        identifier: impl Into<String>,
    ) -> Result<Self> {
        Self::try_new(identity, Some(major), Some(minor), identifier.into())
    }

    /// Watch for Estimote beacons with any major or minor value
    pub fn estimote() -> Self {
        Self {
            identity: ESTIMOTE_UUID,
            major: None,
            minor: None,
            identifier: ESTIMOTE_IDENTIFIER.to_string(),
        }
    }

    /// Watch for Estimote beacons with a specific major value and any minor value
    pub fn estimote_with_major(major: u16) -> Self {
        Self {
            major: Some(major),
            ..Self::estimote()
        }
    }

    /// Watch for Estimote beacons with specific major and minor values
    pub fn estimote_with_major_minor(major: u16, minor: u16) -> Self {
        Self {
            major: Some(major),
            minor: Some(minor),
            ..Self::estimote()
        }
    }

    /// Assemble a region from raw parts, validating the filter shape
    ///
    /// Fails with `InvalidArgument` when the identifier is empty or a minor
    /// filter is supplied without a major filter.
    pub fn try_new(
        identity: Uuid,
        major: Option<u16>,
        minor: Option<u16>,
        identifier: String,
    ) -> Result<Self> {
        if identifier.is_empty() {
            return Err(BeaconError::invalid_argument(
                "region identifier must not be empty",
            ));
        }
        if minor.is_some() && major.is_none() {
            return Err(BeaconError::invalid_argument(
                "minor filter requires a major filter",
            ));
        }
        Ok(Self {
            identity,
            major,
            minor,
            identifier,
        })
    }

    /// 128-bit identity of the beacon family
    pub fn identity(&self) -> Uuid {
        self.identity
    }

    /// Major filter; `None` matches any major value
    pub fn major(&self) -> Option<u16> {
        self.major
    }

    /// Minor filter; `None` matches any minor value
    pub fn minor(&self) -> Option<u16> {
        self.minor
    }

    /// Identifier string for this region instance
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether an observation falls within this region's major/minor filter
    pub fn matches(&self, observation: &BeaconObservation) -> bool {
        match (self.major, self.minor) {
            (None, _) => true,
            (Some(major), None) => observation.major == major,
            (Some(major), Some(minor)) => {
                observation.major == major && observation.minor == minor
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
