//! Application context and message dispatching utilities.
//!
//! The context contains the shared state, the injected collaborators, and
//! helpers for sending events and notifications back to the host bridge.

use std::sync::Arc;

use mingle_bridge::notification::{NotificationMessage, NotificationType};
use mingle_bridge::{MessageFromBackend, MessageToBackend};
use mingle_location::LocationProvider;
use tokio::sync::mpsc::{Receiver, Sender};

use crate::services;
use crate::services::roster_service::RosterSource;
use crate::state::SharedState;

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext {
    /// Mutable runtime application state shared across services.
    pub state: SharedState,
    /// Outbound channel to the host bridge.
    pub tx: Sender<MessageFromBackend>,
    /// The device location collaborator.
    pub location: Arc<dyn LocationProvider>,
    /// The nearby-user roster collaborator.
    pub roster_source: Arc<dyn RosterSource>,
}

impl AppContext {
    /// Read and dispatch messages from the host bridge until it closes.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: Receiver<MessageToBackend>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a host message: {message:?}");
            self.dispatch_message(message).await;
        }
    }

    /// Dispatches the received message from the host down to individual
    /// service handlers.
    async fn dispatch_message(self: &Arc<Self>, message: MessageToBackend) {
        match message {
            MessageToBackend::LaunchStateRequest => {
                services::launch_service::handle_launch_state_request(self.clone()).await;
            }
            MessageToBackend::OnboardingCompleted => {
                services::launch_service::handle_onboarding_completed(self.clone()).await;
            }
            MessageToBackend::StartDiscovery => {
                services::location_service::handle_start_discovery(self.clone()).await;
            }
            MessageToBackend::StopDiscovery => {
                services::location_service::handle_stop_discovery(self.clone()).await;
            }
            MessageToBackend::SetSharingEnabled(enabled) => {
                services::sharing_service::handle_set_sharing(self.clone(), enabled).await;
            }
            MessageToBackend::SetInterestSelected { interest, selected } => {
                services::roster_service::handle_set_interest(self.clone(), interest, selected)
                    .await;
            }
            MessageToBackend::RefreshRosterRequest => {
                // fetches run on their own task so the dispatch loop stays
                // responsive to a toggle arriving mid-flight
                services::roster_service::spawn_refresh(self.clone());
            }
        }
    }

    /// Send an event to the host bridge.
    pub async fn send(&self, message: MessageFromBackend) {
        self.tx
            .send(message)
            .await
            .expect("failed to send message to host");
    }

    /// Send a notification message to the host bridge.
    pub async fn send_notification(
        &self,
        notification_type: NotificationType,
        content: impl Into<String>,
    ) {
        self.send(MessageFromBackend::NotificationMessage(NotificationMessage {
            notification_type,
            message: content.into(),
        }))
        .await;
    }
}
