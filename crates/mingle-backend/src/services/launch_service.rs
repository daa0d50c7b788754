//! The launch gate: first-launch reads and onboarding completion.

use mingle_bridge::{MessageFromBackend, Screen};

use crate::config::{FIRST_LAUNCH_KEY, FlagStore, FlagStoreError};

/// Reads the launch flag, defaulting to a first launch when it was never
/// set (or the store degraded to empty).
pub fn is_first_launch(flags: &dyn FlagStore) -> bool {
    flags.get(FIRST_LAUNCH_KEY).unwrap_or(true)
}

/// Marks onboarding as completed.
///
/// Idempotent: the flag is written once; later calls leave the store
/// untouched.
pub async fn mark_launch_complete(flags: &mut dyn FlagStore) -> Result<(), FlagStoreError> {
    if flags.get(FIRST_LAUNCH_KEY) == Some(false) {
        return Ok(());
    }
    flags.set(FIRST_LAUNCH_KEY, false).await
}

/// Handles an incoming launch state request (see
/// [`mingle_bridge::MessageToBackend::LaunchStateRequest`]): routes the host
/// to onboarding on the first launch and straight to home otherwise.
pub async fn handle_launch_state_request(context: super::AppContextHandle) {
    let first_launch = {
        let state = context.state.read().await;
        is_first_launch(state.flags.as_ref())
    };

    let screen = if first_launch {
        Screen::Onboarding
    } else {
        Screen::Home
    };
    context.send(MessageFromBackend::NavigateTo(screen)).await;
}

/// Handles the host reporting a finished onboarding flow: persists the gate
/// and requests the transition to the home screen.
pub async fn handle_onboarding_completed(context: super::AppContextHandle) {
    {
        let mut state = context.state.write().await;
        if let Err(error) = mark_launch_complete(state.flags.as_mut()).await {
            // the gate still flips in memory; next run just onboards again
            log::warn!("Failed to persist onboarding completion: {error}");
        }
    }
    context
        .send(MessageFromBackend::NavigateTo(Screen::Home))
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::config::MemoryFlagStore;

    /// Wraps the memory store to observe how often the gate actually writes.
    #[derive(Debug, Default)]
    struct CountingStore {
        inner: MemoryFlagStore,
        writes: usize,
    }

    #[async_trait]
    impl FlagStore for CountingStore {
        fn get(&self, key: &str) -> Option<bool> {
            self.inner.get(key)
        }

        async fn set(&mut self, key: &str, value: bool) -> Result<(), FlagStoreError> {
            self.writes += 1;
            self.inner.set(key, value).await
        }
    }

    #[tokio::test]
    async fn defaults_to_first_launch_and_sticks_after_completion() {
        let mut store = CountingStore::default();
        assert!(is_first_launch(&store));

        mark_launch_complete(&mut store).await.unwrap();
        assert!(!is_first_launch(&store));
        assert!(!is_first_launch(&store));
    }

    #[tokio::test]
    async fn completing_twice_writes_once() {
        let mut store = CountingStore::default();
        mark_launch_complete(&mut store).await.unwrap();
        mark_launch_complete(&mut store).await.unwrap();
        assert_eq!(store.writes, 1);
        assert!(!is_first_launch(&store));
    }
}
