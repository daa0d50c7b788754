//! Device location plumbing for the backend.
//!
//! This crate wraps the platform location capability behind a small set of
//! abstractions oriented toward one-shot fixes and continuous streaming:
//! - The [`LocationProvider`] contract a platform integration implements
//!   (service state, permissions, fixes, subscriptions).
//! - The guarded acquisition sequence ([`acquire_position`]) that prompts at
//!   most once for the service and at most once for the permission.
//! - Position streams with pause/resume/cancel delivery control, so a screen
//!   can suspend updates without losing its registration.
//!
//! No platform integration lives here; [`sim::SimulatedLocation`] provides a
//! scripted stand-in for development and tests.

pub mod provider;
pub mod sim;

pub use provider::{
    DeliveryState, LocationError, LocationProvider, PermissionStatus, PositionSender,
    PositionSubscription, PositionUpdates, SubscriptionHandle, acquire_position, position_channel,
};

/// A single reported device position ("fix").
///
/// Latitude and longitude are finite degrees. Only the latest fix is ever
/// kept by consumers; no history is retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}
