//! Shared backend state.

use mingle_bridge::map::MapMarker;
use mingle_bridge::roster::{InterestSelection, User};
use mingle_location::{Position, SubscriptionHandle};

use crate::config::FlagStore;
use crate::sharing::SharingState;

/// The core application state for one home-screen session plus the launch
/// gate.
///
/// This struct contains all the data that needs to be shared across async
/// tasks: the dispatch loop, the position-stream consumer, and spawned
/// roster fetches.
///
/// It is designed to be wrapped in thread-safe, async-friendly concurrency
/// primitives (see [`SharedState`]) to allow safe concurrent reads and
/// occasional writes from multiple tasks.
#[derive(Debug)]
pub struct State {
    /// Persisted boolean flags, holding the launch gate.
    pub flags: Box<dyn FlagStore>,
    /// Whether location sharing is currently enabled.
    pub sharing: SharingState,
    /// The latest position fix, absent until acquisition succeeds.
    pub position: Option<Position>,
    /// The current marker set for the map display.
    pub markers: Vec<MapMarker>,
    /// The full roster as last fetched; cleared while sharing is off.
    pub roster: Vec<User>,
    /// Which interest tags are selected for filtering.
    pub selection: InterestSelection,
    /// Control handle for the continuous position subscription, if one is
    /// running. Owned exclusively by this state; replacing or dropping it
    /// cancels delivery.
    pub subscription: Option<SubscriptionHandle>,
}

impl State {
    /// A fresh state: sharing enabled, nothing acquired or fetched yet.
    pub fn new(flags: Box<dyn FlagStore>) -> Self {
        Self {
            flags,
            sharing: SharingState::Sharing,
            position: None,
            markers: Vec::new(),
            roster: Vec::new(),
            selection: InterestSelection::new(),
            subscription: None,
        }
    }
}

/// Thread-safe, async-friendly shared reference to the application [`State`].
///
/// This is the recommended way to pass state into async handlers, background
/// tasks, or any context where multiple tasks need read access (and
/// occasional write access).
pub type SharedState = std::sync::Arc<tokio::sync::RwLock<State>>;
