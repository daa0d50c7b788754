//! Backend runtime setup and orchestration.
//!
//! This module wires together the persisted flag store, shared state, and the
//! message dispatch loop that listens to host bridge requests.

use std::{sync::Arc, thread};

use mingle_bridge::{MessageFromBackend, MessageToBackend};
use mingle_location::LocationProvider;
use tokio::sync::{
    RwLock,
    mpsc::{Receiver, Sender},
};

use crate::app::AppContext;
use crate::config::{FlagStore, MemoryFlagStore, TomlFlagStore};
use crate::services::roster_service::RosterSource;
use crate::state::State;

/// Drives the backend message loop over the given channels until the host
/// closes its side.
///
/// Collaborators are injected so embedders (and tests) can run the loop on
/// their own runtime with simulated or real implementations.
pub async fn serve(
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
    location: Arc<dyn LocationProvider>,
    roster_source: Arc<dyn RosterSource>,
    flags: Box<dyn FlagStore>,
) {
    let state = Arc::new(RwLock::new(State::new(flags)));
    let context = Arc::new(AppContext {
        state,
        tx,
        location,
        roster_source,
    });
    context.consume_bridge_messages(rx).await;
}

/// Spawn the backend runtime and begin processing bridge messages.
///
/// Flags are loaded from the persisted store; when flag storage is
/// unavailable the backend degrades to an in-memory store, which reads as a
/// first launch.
pub fn run(
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
    location: Arc<dyn LocationProvider>,
    roster_source: Arc<dyn RosterSource>,
) {
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("failed to build tokio runtime");
        runtime.block_on(async {
            let flags: Box<dyn FlagStore> = match TomlFlagStore::load().await {
                Ok(store) => Box::new(store),
                Err(error) => {
                    log::warn!("Flag storage unavailable, treating as first launch: {error}");
                    Box::new(MemoryFlagStore::new())
                }
            };
            serve(rx, tx, location, roster_source, flags).await;
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use mingle_bridge::roster::{Interest, User};
    use mingle_bridge::{BridgeChannels, MessageFromBackend, MessageToBackend, Screen};
    use mingle_location::sim::SimulatedLocation;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use crate::config::MemoryFlagStore;
    use crate::services::roster_service::SimulatedRoster;

    const EVENT_WAIT: Duration = Duration::from_secs(5);

    fn start_backend() -> (
        mpsc::Sender<MessageToBackend>,
        mpsc::Receiver<MessageFromBackend>,
    ) {
        let channels = BridgeChannels::default();
        let location = Arc::new(SimulatedLocation::new());
        let roster_source = Arc::new(SimulatedRoster::with_latency(Duration::from_millis(50)));
        tokio::spawn(serve(
            channels.backend_rx,
            channels.backend_tx,
            location,
            roster_source,
            Box::new(MemoryFlagStore::new()),
        ));
        (channels.host_tx, channels.host_rx)
    }

    async fn next_roster_update(rx: &mut mpsc::Receiver<MessageFromBackend>) -> Vec<User> {
        loop {
            let event = timeout(EVENT_WAIT, rx.recv())
                .await
                .expect("timed out waiting for a roster update")
                .expect("backend closed the bridge");
            if let MessageFromBackend::RosterUpdate(users) = event {
                return users;
            }
        }
    }

    async fn next_navigation(rx: &mut mpsc::Receiver<MessageFromBackend>) -> Screen {
        loop {
            let event = timeout(EVENT_WAIT, rx.recv())
                .await
                .expect("timed out waiting for a navigation event")
                .expect("backend closed the bridge");
            if let MessageFromBackend::NavigateTo(screen) = event {
                return screen;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn launch_gate_routes_onboarding_then_home() {
        let (tx, mut rx) = start_backend();

        tx.send(MessageToBackend::LaunchStateRequest).await.unwrap();
        assert_eq!(next_navigation(&mut rx).await, Screen::Onboarding);

        tx.send(MessageToBackend::OnboardingCompleted).await.unwrap();
        assert_eq!(next_navigation(&mut rx).await, Screen::Home);

        // the flag sticks for the rest of the process
        tx.send(MessageToBackend::LaunchStateRequest).await.unwrap();
        assert_eq!(next_navigation(&mut rx).await, Screen::Home);
    }

    #[tokio::test(start_paused = true)]
    async fn discovery_produces_a_filtered_roster() {
        let (tx, mut rx) = start_backend();

        tx.send(MessageToBackend::StartDiscovery).await.unwrap();
        let full = next_roster_update(&mut rx).await;
        assert!(!full.is_empty());

        tx.send(MessageToBackend::SetInterestSelected {
            interest: Interest::Ai,
            selected: true,
        })
        .await
        .unwrap();
        let filtered = next_roster_update(&mut rx).await;
        assert!(!filtered.is_empty());
        assert!(filtered.len() < full.len());
        assert!(
            filtered
                .iter()
                .all(|user| user.interests.contains(&Interest::Ai))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn disabling_sharing_clears_and_reenabling_refetches() {
        let (tx, mut rx) = start_backend();

        tx.send(MessageToBackend::StartDiscovery).await.unwrap();
        let first = next_roster_update(&mut rx).await;
        assert!(!first.is_empty());

        tx.send(MessageToBackend::SetSharingEnabled(false))
            .await
            .unwrap();
        assert!(next_roster_update(&mut rx).await.is_empty());

        // repopulated from the source after its latency, not from a cache
        tx.send(MessageToBackend::SetSharingEnabled(true))
            .await
            .unwrap();
        assert_eq!(next_roster_update(&mut rx).await, first);
    }
}
