//! Backend service handlers for host-driven commands.
//!
//! This module groups async command handlers that operate on the shared
//! `AppContext`, perform side effects (device location, the roster source,
//! flag persistence), and emit events or notifications back to the host.

pub mod launch_service;
pub mod location_service;
pub mod roster_service;
pub mod sharing_service;

/// Represents a type that is used in all handlers as an application context.
pub(crate) type AppContextHandle = std::sync::Arc<crate::app::AppContext>;
