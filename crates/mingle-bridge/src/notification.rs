//! User-visible notifications pushed from the backend.

/// Severity of a notification, used by the host to pick styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    /// Neutral informational message.
    Info,
    /// A completed operation worth confirming.
    Success,
    /// A non-fatal degradation the user should know about, e.g. location
    /// being unavailable.
    Warning,
    /// An operation failed.
    Error,
}

/// A notification payload intended for the host's banner or toast surface.
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    /// Severity, determining the visual style.
    pub notification_type: NotificationType,
    /// Text content to display to the user.
    pub message: String,
}
