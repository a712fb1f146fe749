//! Advertising configuration and session
//!
//! The advertising session owns the single active advertising configuration
//! and the external advertising radio. Reconfiguring is always safe with a
//! single call: starting while already advertising stops the previous beacon
//! first, as a hard guarantee. Start completions carry an optional error;
//! stop notifications carry none.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::BeaconError;
use crate::radio::AdvertisingRadio;
use crate::region::{ESTIMOTE_IDENTIFIER, ESTIMOTE_UUID};
use crate::registry::ListenerRegistry;
use crate::Result;

/// Reference signal strength at one meter used when none is supplied
pub const DEFAULT_MEASURED_POWER: i8 = -59;

// ----------------------------------------------------------------------------
// Advertising Configuration
// ----------------------------------------------------------------------------

/// Immutable configuration for advertising the local device as a beacon
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AdvertisingConfig {
    identity: Uuid,
    major: u16,
    minor: u16,
    identifier: String,
    measured_power: i8,
}

impl AdvertisingConfig {
    /// Advertise with the given identity, major/minor, and identifier
    ///
    /// `measured_power` defaults to [`DEFAULT_MEASURED_POWER`]; override it
    /// with [`with_measured_power`](Self::with_measured_power).
    pub fn new(
        identity: Uuid,
        major: u16,
        minor: u16,
        identifier: impl Into<String>,
    ) -> Result<Self> {
        let identifier = identifier.into();
        if identifier.is_empty() {
            return Err(BeaconError::invalid_argument(
                "advertising identifier must not be empty",
            ));
        }
        Ok(Self {
            identity,
            major,
            minor,
            identifier,
            measured_power: DEFAULT_MEASURED_POWER,
        })
    }

    /// Advertise as an Estimote beacon with the fixed preset identity
    pub fn estimote(major: u16, minor: u16) -> Self {
        Self {
            identity: ESTIMOTE_UUID,
            major,
            minor,
            identifier: ESTIMOTE_IDENTIFIER.to_string(),
            measured_power: DEFAULT_MEASURED_POWER,
        }
    }

    /// Override the reference signal strength at one meter
    pub fn with_measured_power(mut self, measured_power: i8) -> Self {
        self.measured_power = measured_power;
        self
    }

    /// 128-bit identity to advertise
    pub fn identity(&self) -> Uuid {
        self.identity
    }

    /// Major value to advertise
    pub fn major(&self) -> u16 {
        self.major
    }

    /// Minor value to advertise
    pub fn minor(&self) -> u16 {
        self.minor
    }

    /// Identifier string for this configuration
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Reference signal strength at one meter
    pub fn measured_power(&self) -> i8 {
        self.measured_power
    }
}

// ----------------------------------------------------------------------------
// Advertising Session
// ----------------------------------------------------------------------------

enum State {
    NotAdvertising,
    Advertising { config: AdvertisingConfig },
}

/// State machine owning the single active advertising run
///
/// Start/stop calls on the same session are serialized by the state lock,
/// which is held across the radio round-trip.
pub struct AdvertisingSession {
    radio: Arc<dyn AdvertisingRadio>,
    registry: Arc<ListenerRegistry>,
    state: Mutex<State>,
}

impl AdvertisingSession {
    /// Create an idle session over the given radio and registry
    pub fn new(radio: Arc<dyn AdvertisingRadio>, registry: Arc<ListenerRegistry>) -> Self {
        Self {
            radio,
            registry,
            state: Mutex::new(State::NotAdvertising),
        }
    }

    /// Start advertising with `config`, stopping any previous beacon first
    ///
    /// The outcome is reported through the registry: listeners receive an
    /// advertising-started notification carrying the radio's error, if any.
    /// When a previous beacon is replaced, its stop is notified before the
    /// new start completes.
    pub async fn start(&self, config: AdvertisingConfig) {
        let mut state = self.state.lock().await;

        if matches!(*state, State::Advertising { .. }) {
            // Hard guarantee: the previous beacon is stopped before the new
            // one starts. Stop errors are ignored here.
            if let Err(e) = self.radio.stop_transmitting().await {
                warn!("ignoring stop failure while replacing beacon: {}", e);
            }
            *state = State::NotAdvertising;
            self.registry.notify_advertising_stopped();
        }

        match self.radio.start_transmitting(&config).await {
            Ok(()) => {
                info!(
                    identifier = config.identifier(),
                    major = config.major(),
                    minor = config.minor(),
                    "advertising started"
                );
                *state = State::Advertising { config };
                self.registry.notify_advertising_started(None);
            }
            Err(e) => {
                warn!("advertising radio rejected start: {}", e);
                self.registry.notify_advertising_started(Some(&e));
            }
        }
    }

    /// Stop advertising; a no-op while not advertising
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        if matches!(*state, State::NotAdvertising) {
            return;
        }
        if let Err(e) = self.radio.stop_transmitting().await {
            warn!("advertising radio stop failed: {}", e);
        }
        *state = State::NotAdvertising;
        info!("advertising stopped");
        self.registry.notify_advertising_stopped();
    }

    /// Whether the session is currently advertising
    pub async fn is_advertising(&self) -> bool {
        matches!(*self.state.lock().await, State::Advertising { .. })
    }

    /// The active configuration, if advertising
    pub async fn config(&self) -> Option<AdvertisingConfig> {
        match &*self.state.lock().await {
            State::Advertising { config } => Some(config.clone()),
            State::NotAdvertising => None,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
