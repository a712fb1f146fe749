//! Error types for the beacon multiplexer

use thiserror::Error;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Errors produced by the beacon manager and its sessions
#[derive(Error, Debug)]
pub enum BeaconError {
    /// Malformed construction input (empty identifier, minor without major)
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A radio service declined a start request
    #[error("{service} radio rejected the request: {reason}")]
    ServiceRejected { service: String, reason: String },

    /// A listener's notification handler failed during broadcast
    #[error("Listener fault: {reason}")]
    ListenerFault { reason: String },
}

// ----------------------------------------------------------------------------
// Convenience Error Constructors
// ----------------------------------------------------------------------------

impl BeaconError {
    /// Create an invalid argument error with a reason
    pub fn invalid_argument<T: Into<String>>(reason: T) -> Self {
        BeaconError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a proximity-radio rejection error
    pub fn proximity_rejected<T: Into<String>>(reason: T) -> Self {
        BeaconError::ServiceRejected {
            service: "proximity".to_string(),
            reason: reason.into(),
        }
    }

    /// Create an advertising-radio rejection error
    pub fn advertising_rejected<T: Into<String>>(reason: T) -> Self {
        BeaconError::ServiceRejected {
            service: "advertising".to_string(),
            reason: reason.into(),
        }
    }

    /// Create a listener fault error with a reason
    pub fn listener_fault<T: Into<String>>(reason: T) -> Self {
        BeaconError::ListenerFault {
            reason: reason.into(),
        }
    }
}

// ----------------------------------------------------------------------------
// Type Aliases
// ----------------------------------------------------------------------------

pub type Result<T> = core::result::Result<T, BeaconError>;
