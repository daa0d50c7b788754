//! Applies sharing toggle transitions to the running session.

use mingle_bridge::MessageFromBackend;

use crate::services::{location_service, roster_service};
use crate::sharing::SharingEffect;

/// Handles the sharing toggle (see
/// [`mingle_bridge::MessageToBackend::SetSharingEnabled`]).
///
/// The transition itself is computed by the pure state machine in
/// [`crate::sharing`]; this handler applies its effect to the subscription,
/// the roster, and the host.
pub async fn handle_set_sharing(context: super::AppContextHandle, enabled: bool) {
    let effect = {
        let mut state = context.state.write().await;
        let (next, effect) = state.sharing.transition(enabled);
        state.sharing = next;
        effect
    };

    let Some(effect) = effect else {
        // same-state toggle, nothing to do
        return;
    };

    match effect {
        SharingEffect::SuspendAndClear => {
            {
                let mut state = context.state.write().await;
                if let Some(subscription) = &state.subscription {
                    // suspend delivery but keep the registration; a later
                    // enable resumes without re-running the permission flow
                    subscription.pause();
                }
                state.roster.clear();
            }
            context
                .send(MessageFromBackend::SharingStateUpdate { enabled: false })
                .await;
            context.send(MessageFromBackend::RosterUpdate(Vec::new())).await;
        }
        SharingEffect::ResumeAndFetch => {
            context
                .send(MessageFromBackend::SharingStateUpdate { enabled: true })
                .await;

            let resumed = {
                let state = context.state.read().await;
                match &state.subscription {
                    Some(subscription) => {
                        subscription.resume();
                        true
                    }
                    None => false,
                }
            };

            if resumed {
                roster_service::spawn_refresh(context);
            } else {
                // nothing to resume: run the full discovery start, which
                // also triggers the fetch
                location_service::handle_start_discovery(context).await;
            }
        }
    }
}
