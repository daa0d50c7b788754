//! The location provider contract and position delivery primitives.

use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::Position;

/// Errors that can occur while acquiring a position from the device.
///
/// All of these are recoverable at the screen boundary: the home screen
/// degrades to an informational message rather than aborting.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// The device-level location service is off and the user declined (or
    /// the platform refused) to enable it.
    #[error("device location service is disabled")]
    ServiceDisabled,
    /// The user declined location access. `permanent` is set when the
    /// platform reports the denial can no longer be prompted away.
    #[error("location permission denied")]
    PermissionDenied { permanent: bool },
    /// The provider failed to produce a fix for some other reason.
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Platform permission state for location access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// Denied and the platform will not show the request dialog again.
    DeniedForever,
}

/// Contract for a device location service.
///
/// Implementations are platform integrations; the backend only ever talks to
/// this trait. All methods are async because every one of them may hop to a
/// platform thread or show a system dialog.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Whether the device-level location service is currently on.
    async fn is_service_enabled(&self) -> bool;

    /// Prompt the user to enable the location service. Returns the service
    /// state after the prompt.
    async fn request_service_enable(&self) -> bool;

    /// Current permission state without prompting.
    async fn permission_status(&self) -> PermissionStatus;

    /// Show the permission request dialog. Returns the resulting state.
    async fn request_permission(&self) -> PermissionStatus;

    /// The most recent fix. Callers are expected to have passed the guard
    /// sequence in [`acquire_position`] first.
    async fn current_position(&self) -> Result<Position, LocationError>;

    /// Open a continuous position subscription.
    async fn subscribe(&self) -> Result<PositionSubscription, LocationError>;
}

/// Runs the guarded acquisition sequence against a provider.
///
/// Each precondition short-circuits with a reported failure if unmet, and
/// each is prompted for at most once:
/// 1. The location service must be enabled, or become enabled after a single
///    prompt.
/// 2. The permission must be granted, or become granted after a single
///    request. A permanent denial fails immediately without prompting.
///
/// There is no retry policy beyond the single re-prompt; a repeated failure
/// is terminal for this acquisition attempt.
pub async fn acquire_position(
    provider: &dyn LocationProvider,
) -> Result<Position, LocationError> {
    if !provider.is_service_enabled().await && !provider.request_service_enable().await {
        return Err(LocationError::ServiceDisabled);
    }

    match provider.permission_status().await {
        PermissionStatus::Granted => {}
        PermissionStatus::DeniedForever => {
            return Err(LocationError::PermissionDenied { permanent: true });
        }
        PermissionStatus::Denied => match provider.request_permission().await {
            PermissionStatus::Granted => {}
            status => {
                return Err(LocationError::PermissionDenied {
                    permanent: status == PermissionStatus::DeniedForever,
                });
            }
        },
    }

    provider.current_position().await
}

/// Delivery state of a position subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    /// Fixes flow to the consumer.
    Active,
    /// Registration is kept but fixes are discarded until resumed.
    Paused,
    /// The subscription ended; terminal.
    Cancelled,
}

/// Creates a linked producer/consumer pair for position delivery.
///
/// The producer side goes to the platform integration, the subscription side
/// to the backend. Delivery starts in the [`DeliveryState::Active`] state.
pub fn position_channel(buffer: usize) -> (PositionSender, PositionSubscription) {
    let (tx, rx) = mpsc::channel(buffer);
    let (state_tx, state_rx) = watch::channel(DeliveryState::Active);
    (
        PositionSender {
            tx,
            state: state_rx,
        },
        PositionSubscription {
            handle: SubscriptionHandle { state: state_tx },
            updates: PositionUpdates { rx },
        },
    )
}

/// Producer half of a position subscription, held by the provider.
#[derive(Debug)]
pub struct PositionSender {
    tx: mpsc::Sender<Position>,
    state: watch::Receiver<DeliveryState>,
}

impl PositionSender {
    /// Offers one fix to the subscription.
    ///
    /// While paused the fix is discarded (delivery is suspended, the
    /// registration survives). Returns `false` once the subscription is
    /// cancelled or the consumer is gone, at which point the producer should
    /// stop emitting.
    pub async fn deliver(&mut self, fix: Position) -> bool {
        let state = *self.state.borrow();
        match state {
            DeliveryState::Cancelled => false,
            DeliveryState::Paused => true,
            DeliveryState::Active => self.tx.send(fix).await.is_ok(),
        }
    }

    /// Whether the subscription has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow() == DeliveryState::Cancelled
    }
}

/// A continuous position subscription as returned by a provider.
#[derive(Debug)]
pub struct PositionSubscription {
    handle: SubscriptionHandle,
    updates: PositionUpdates,
}

impl PositionSubscription {
    /// Splits the subscription into its control handle and update stream, so
    /// the handle can live in shared state while a task consumes the stream.
    pub fn split(self) -> (SubscriptionHandle, PositionUpdates) {
        (self.handle, self.updates)
    }
}

/// Control handle for a position subscription.
///
/// Owned exclusively by the one screen state that created the subscription.
/// Dropping the handle cancels delivery, so a torn-down screen cannot keep
/// receiving fixes.
#[derive(Debug)]
pub struct SubscriptionHandle {
    state: watch::Sender<DeliveryState>,
}

impl SubscriptionHandle {
    /// Suspends delivery without losing the registration.
    pub fn pause(&self) {
        self.transition(DeliveryState::Paused);
    }

    /// Resumes delivery after a pause. Does not re-run any permission flow.
    pub fn resume(&self) {
        self.transition(DeliveryState::Active);
    }

    /// Permanently ends the subscription.
    pub fn cancel(&self) {
        self.transition(DeliveryState::Cancelled);
    }

    /// Current delivery state.
    pub fn delivery_state(&self) -> DeliveryState {
        *self.state.borrow()
    }

    fn transition(&self, next: DeliveryState) {
        self.state.send_if_modified(|current| {
            // cancellation is terminal
            if *current == DeliveryState::Cancelled || *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Consumer half of a position subscription: an async stream of fixes.
#[derive(Debug)]
pub struct PositionUpdates {
    rx: mpsc::Receiver<Position>,
}

impl PositionUpdates {
    /// Waits for the next delivered fix. Returns `None` once the
    /// subscription ends.
    pub async fn next_fix(&mut self) -> Option<Position> {
        self.rx.recv().await
    }
}

impl futures_util::Stream for PositionUpdates {
    type Item = Position;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_transitions() {
        let (_sender, subscription) = position_channel(4);
        let (handle, _updates) = subscription.split();

        assert_eq!(handle.delivery_state(), DeliveryState::Active);
        handle.pause();
        assert_eq!(handle.delivery_state(), DeliveryState::Paused);
        handle.resume();
        assert_eq!(handle.delivery_state(), DeliveryState::Active);
        handle.cancel();
        assert_eq!(handle.delivery_state(), DeliveryState::Cancelled);

        // cancellation is terminal
        handle.resume();
        assert_eq!(handle.delivery_state(), DeliveryState::Cancelled);
    }

    #[tokio::test]
    async fn paused_delivery_discards_fixes() {
        let (mut sender, subscription) = position_channel(4);
        let (handle, mut updates) = subscription.split();

        handle.pause();
        assert!(sender.deliver(Position::new(1.0, 2.0)).await);

        handle.resume();
        assert!(sender.deliver(Position::new(3.0, 4.0)).await);
        assert_eq!(updates.next_fix().await, Some(Position::new(3.0, 4.0)));
    }

    #[tokio::test]
    async fn cancelled_delivery_ends_the_stream() {
        let (mut sender, subscription) = position_channel(4);
        let (handle, mut updates) = subscription.split();

        assert!(sender.deliver(Position::new(1.0, 2.0)).await);
        handle.cancel();
        assert!(!sender.deliver(Position::new(3.0, 4.0)).await);
        drop(sender);

        assert_eq!(updates.next_fix().await, Some(Position::new(1.0, 2.0)));
        assert_eq!(updates.next_fix().await, None);
    }

    #[tokio::test]
    async fn dropping_the_handle_cancels() {
        let (mut sender, subscription) = position_channel(4);
        let (handle, _updates) = subscription.split();

        drop(handle);
        assert!(sender.is_cancelled());
        assert!(!sender.deliver(Position::new(0.0, 0.0)).await);
    }
}
