//! Roster loading and the interest filter handlers.

use std::time::Duration;

use async_trait::async_trait;
use mingle_bridge::MessageFromBackend;
use mingle_bridge::notification::NotificationType;
use mingle_bridge::roster::{Interest, User};

use crate::filter::apply_filter;

/// Errors from a roster source.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The source could not be reached or did not answer.
    #[error("roster source unreachable: {0}")]
    Unreachable(String),
}

/// A source of discoverable users.
///
/// The contract is intentionally thin: given no arguments, eventually return
/// a full roster replacing any previous one. Pagination, proximity radius,
/// and ranking are the source's own business, so a real backend can be
/// substituted without touching the filter logic.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<User>, FetchError>;
}

/// The stand-in roster source: a fixed latency followed by a constant list.
pub struct SimulatedRoster {
    latency: Duration,
}

impl SimulatedRoster {
    pub fn new() -> Self {
        Self::with_latency(Duration::from_millis(1200))
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedRoster {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RosterSource for SimulatedRoster {
    async fn fetch(&self) -> Result<Vec<User>, FetchError> {
        tokio::time::sleep(self.latency).await;
        Ok(sample_roster())
    }
}

fn sample_roster() -> Vec<User> {
    let user = |id: &str, name: &str, interests: &[Interest]| User {
        id: id.to_string(),
        display_name: name.to_string(),
        interests: interests.to_vec(),
    };

    vec![
        user("u-01", "Alex", &[Interest::Coffee, Interest::Ai]),
        user("u-02", "Maria", &[Interest::Music, Interest::Basketball]),
        user("u-03", "Sam", &[Interest::Ai, Interest::Music]),
        user("u-04", "Priya", &[Interest::Hiking, Interest::Photography]),
        user("u-05", "Jonas", &[Interest::Coffee, Interest::Travel]),
        user("u-06", "Noor", &[Interest::Gaming, Interest::Ai, Interest::Coffee]),
    ]
}

/// Kicks off a roster refresh on its own task so the dispatch loop stays
/// responsive while the source answers.
pub fn spawn_refresh(context: super::AppContextHandle) {
    tokio::spawn(handle_refresh_roster(context));
}

/// Replaces the roster from the source and pushes the filtered view.
///
/// A result that lands after sharing was disabled is dropped: re-enabling
/// always re-fetches rather than resurrecting a stale list.
pub async fn handle_refresh_roster(context: super::AppContextHandle) {
    if !context.state.read().await.sharing.is_enabled() {
        log::debug!("Skipping roster refresh while sharing is disabled");
        return;
    }

    match context.roster_source.fetch().await {
        Ok(users) => {
            let filtered = {
                let mut state = context.state.write().await;
                if !state.sharing.is_enabled() {
                    return;
                }
                state.roster = users;
                apply_filter(&state.roster, &state.selection)
            };
            context.send(MessageFromBackend::RosterUpdate(filtered)).await;
        }
        Err(error) => {
            log::warn!("Roster fetch failed: {error}");
            context
                .send_notification(
                    NotificationType::Error,
                    "Couldn't load people nearby. Try again.",
                )
                .await;
        }
    }
}

/// Handles one interest chip being toggled (see
/// [`mingle_bridge::MessageToBackend::SetInterestSelected`]): updates the
/// selection and pushes the recomputed view over the stored roster.
pub async fn handle_set_interest(
    context: super::AppContextHandle,
    interest: Interest,
    selected: bool,
) {
    let filtered = {
        let mut state = context.state.write().await;
        state.selection.set(interest, selected);
        apply_filter(&state.roster, &state.selection)
    };
    context.send(MessageFromBackend::RosterUpdate(filtered)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn simulated_source_answers_after_its_latency() {
        let source = SimulatedRoster::with_latency(Duration::from_millis(50));
        let started = tokio::time::Instant::now();
        let roster = source.fetch().await.expect("fetch");

        assert_eq!(roster, sample_roster());
        assert!(started.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn sample_roster_has_unique_ids_and_names() {
        let roster = sample_roster();
        for user in &roster {
            assert!(!user.display_name.is_empty());
            assert_eq!(
                roster.iter().filter(|other| other.id == user.id).count(),
                1
            );
        }
    }
}
