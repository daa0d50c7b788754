//! Communication bridge between the rendering host and the backend.
//!
//! This crate defines the types and protocol used to connect a rendering and
//! navigation host (the screens, the map widget) with an asynchronous backend
//! responsible for the launch gate, position acquisition, roster loading, and
//! interest filtering.
//!
//! The design is deliberately lightweight and unidirectional:
//! - The host sends commands (e.g., start discovery, toggle location
//!   sharing, flip an interest filter).
//! - The backend pushes events (e.g., screen transitions, marker and camera
//!   updates, roster views, notifications).
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`], providing back-pressure, async compatibility, and a
//! clean seam: the host never touches backend state directly, and the map
//! display collaborator is driven purely through outbound events.

pub mod map;
pub mod notification;
pub mod roster;

use tokio::sync::mpsc::{self, Receiver, Sender};

/// Screens the navigation host can be asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// The onboarding carousel, shown on the very first launch only.
    Onboarding,
    /// The home screen with the map and the nearby-user roster.
    Home,
}

/// Events emitted by the backend to inform the host of state updates.
///
/// These are typically sent in response to host commands or to push
/// asynchronous progress (streamed position fixes, completed roster fetches).
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// Generic message for all user-visible notifications.
    NotificationMessage(notification::NotificationMessage),
    /// Request that the host transition to the given screen.
    NavigateTo(Screen),
    /// Full replacement set of markers for the map display.
    MapMarkersUpdate(Vec<map::MapMarker>),
    /// Request that the map display recenter its camera.
    RecenterCamera {
        /// New camera center, normally the latest position fix.
        center: map::GeoPoint,
        /// Zoom level to apply together with the move.
        zoom: f32,
    },
    /// Position acquisition failed; the home screen should degrade to a
    /// static "enable location" message instead of the map.
    LocationUnavailable {
        /// Human-readable reason, suitable for display.
        reason: String,
    },
    /// The currently visible roster view, already filtered by the active
    /// interest selection. Always a full replacement.
    RosterUpdate(Vec<roster::User>),
    /// The sharing toggle changed state.
    SharingStateUpdate { enabled: bool },
}

/// Commands issued by the host to control or query the backend.
///
/// These messages drive the core functionality of the application.
#[derive(Debug, Clone)]
pub enum MessageToBackend {
    /// Ask which screen to show at startup (onboarding vs. home).
    LaunchStateRequest,
    /// The onboarding flow finished; persist that and move on.
    OnboardingCompleted,
    /// The home screen mounted: acquire a position, start the continuous
    /// subscription, and load the roster.
    StartDiscovery,
    /// The home screen is being torn down: release the subscription.
    StopDiscovery,
    /// Flip the location sharing toggle.
    SetSharingEnabled(bool),
    /// Select or deselect one interest for roster filtering.
    SetInterestSelected {
        interest: roster::Interest,
        selected: bool,
    },
    /// Explicitly reload the roster from its source.
    RefreshRosterRequest,
}

/// Paired `tokio::mpsc` channels for bidirectional communication between the
/// host and the backend.
pub struct BridgeChannels {
    /// Receiver used by the host to get events from the backend.
    pub host_rx: Receiver<MessageFromBackend>,
    /// Sender used by the host to send commands to the backend.
    pub host_tx: Sender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the host.
    pub backend_rx: Receiver<MessageToBackend>,
    /// Sender used by the backend to send events back to the host.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::channel(buffer);
        let (to_host_tx, to_host_rx) = mpsc::channel(buffer);
        Self {
            host_tx: to_backend_tx,
            host_rx: to_host_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_host_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
