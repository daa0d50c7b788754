//! Map display vocabulary.
//!
//! The map itself is rendered by the host; the backend drives it with full
//! marker replacement sets and camera recenter requests.

use serde::{Deserialize, Serialize};

/// Marker id reserved for the device owner's own position. The backend
/// replaces this marker on every position fix.
pub const CURRENT_USER_MARKER_ID: &str = "current_user";

/// Zoom level applied when recentering the camera on a fresh fix.
pub const DEFAULT_ZOOM: f32 = 15.0;

/// A coordinate on the map. Latitude and longitude are finite degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A single marker for the map display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    /// Identifier, unique within the current marker set.
    pub id: String,
    /// Where to place the marker.
    pub position: GeoPoint,
    /// Short label shown alongside the marker.
    pub label: String,
}
