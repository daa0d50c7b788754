//! Scripted location provider for development and tests.
//!
//! `SimulatedLocation` walks a fixed route on a timer instead of talking to
//! real hardware. Service and permission behavior is configurable so the
//! guard sequence in [`acquire_position`](crate::acquire_position) can be
//! exercised end to end.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;

use crate::Position;
use crate::provider::{
    LocationError, LocationProvider, PermissionStatus, PositionSubscription, position_channel,
};

/// How often the default simulated route advances.
const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

struct SimState {
    service_enabled: bool,
    enable_on_request: bool,
    permission: PermissionStatus,
    grant_on_request: bool,
    cursor: usize,
}

/// A location provider that replays a scripted route.
pub struct SimulatedLocation {
    state: Mutex<SimState>,
    route: Vec<Position>,
    interval: Duration,
}

impl SimulatedLocation {
    /// An enabled, granted provider walking the default route.
    pub fn new() -> Self {
        Self::with_route(default_route(), DEFAULT_INTERVAL)
    }

    /// An enabled, granted provider walking the given route, advancing one
    /// fix per `interval`. The route repeats from the start once exhausted.
    pub fn with_route(route: Vec<Position>, interval: Duration) -> Self {
        Self::build(
            SimState {
                service_enabled: true,
                enable_on_request: true,
                permission: PermissionStatus::Granted,
                grant_on_request: true,
                cursor: 0,
            },
            route,
            interval,
        )
    }

    /// A provider whose location service starts disabled. When
    /// `enable_on_request` is set, the simulated enable prompt succeeds.
    pub fn service_disabled(enable_on_request: bool) -> Self {
        Self::build(
            SimState {
                service_enabled: false,
                enable_on_request,
                permission: PermissionStatus::Granted,
                grant_on_request: true,
                cursor: 0,
            },
            default_route(),
            DEFAULT_INTERVAL,
        )
    }

    /// A provider whose permission starts denied. When `grant_on_request` is
    /// set, the simulated request dialog grants access.
    pub fn permission_denied(grant_on_request: bool) -> Self {
        Self::build(
            SimState {
                service_enabled: true,
                enable_on_request: true,
                permission: PermissionStatus::Denied,
                grant_on_request,
                cursor: 0,
            },
            default_route(),
            DEFAULT_INTERVAL,
        )
    }

    /// A provider whose permission is permanently denied; the request dialog
    /// can no longer be shown.
    pub fn permission_denied_forever() -> Self {
        Self::build(
            SimState {
                service_enabled: true,
                enable_on_request: true,
                permission: PermissionStatus::DeniedForever,
                grant_on_request: false,
                cursor: 0,
            },
            default_route(),
            DEFAULT_INTERVAL,
        )
    }

    fn build(state: SimState, route: Vec<Position>, interval: Duration) -> Self {
        Self {
            state: Mutex::new(state),
            route,
            interval,
        }
    }

    async fn check_access(&self) -> Result<(), LocationError> {
        let state = self.state.lock().await;
        if !state.service_enabled {
            return Err(LocationError::ServiceDisabled);
        }
        match state.permission {
            PermissionStatus::Granted => Ok(()),
            PermissionStatus::Denied => Err(LocationError::PermissionDenied { permanent: false }),
            PermissionStatus::DeniedForever => {
                Err(LocationError::PermissionDenied { permanent: true })
            }
        }
    }
}

impl Default for SimulatedLocation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LocationProvider for SimulatedLocation {
    async fn is_service_enabled(&self) -> bool {
        self.state.lock().await.service_enabled
    }

    async fn request_service_enable(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.enable_on_request {
            state.service_enabled = true;
        }
        state.service_enabled
    }

    async fn permission_status(&self) -> PermissionStatus {
        self.state.lock().await.permission
    }

    async fn request_permission(&self) -> PermissionStatus {
        let mut state = self.state.lock().await;
        if state.permission == PermissionStatus::Denied && state.grant_on_request {
            state.permission = PermissionStatus::Granted;
        }
        state.permission
    }

    async fn current_position(&self) -> Result<Position, LocationError> {
        self.check_access().await?;
        let mut state = self.state.lock().await;
        if self.route.is_empty() {
            return Err(LocationError::Unavailable("no scripted fixes".into()));
        }
        let fix = self.route[state.cursor % self.route.len()];
        state.cursor += 1;
        Ok(fix)
    }

    async fn subscribe(&self) -> Result<PositionSubscription, LocationError> {
        self.check_access().await?;

        let (mut sender, subscription) = position_channel(16);
        let route = self.route.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            for fix in route.iter().copied().cycle() {
                ticker.tick().await;
                if !sender.deliver(fix).await {
                    break;
                }
            }
        });
        Ok(subscription)
    }
}

/// A short scripted walk through central Amsterdam.
fn default_route() -> Vec<Position> {
    vec![
        Position::new(52.3702, 4.8952),
        Position::new(52.3705, 4.8963),
        Position::new(52.3711, 4.8974),
        Position::new(52.3718, 4.8969),
        Position::new(52.3723, 4.8958),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire_position;
    use tokio::time::timeout;

    #[tokio::test]
    async fn acquisition_succeeds_when_enabled_and_granted() {
        let provider = SimulatedLocation::new();
        let fix = acquire_position(&provider).await.expect("should acquire");
        assert_eq!(fix, default_route()[0]);
    }

    #[tokio::test]
    async fn disabled_service_fails_after_one_declined_prompt() {
        let provider = SimulatedLocation::service_disabled(false);
        let err = acquire_position(&provider).await.unwrap_err();
        assert!(matches!(err, LocationError::ServiceDisabled));
    }

    #[tokio::test]
    async fn disabled_service_recovers_when_prompt_succeeds() {
        let provider = SimulatedLocation::service_disabled(true);
        assert!(acquire_position(&provider).await.is_ok());
    }

    #[tokio::test]
    async fn denied_permission_fails_after_one_declined_request() {
        let provider = SimulatedLocation::permission_denied(false);
        let err = acquire_position(&provider).await.unwrap_err();
        assert!(matches!(
            err,
            LocationError::PermissionDenied { permanent: false }
        ));
    }

    #[tokio::test]
    async fn denied_permission_recovers_when_request_granted() {
        let provider = SimulatedLocation::permission_denied(true);
        assert!(acquire_position(&provider).await.is_ok());
    }

    #[tokio::test]
    async fn permanent_denial_fails_without_prompting() {
        let provider = SimulatedLocation::permission_denied_forever();
        let err = acquire_position(&provider).await.unwrap_err();
        assert!(matches!(
            err,
            LocationError::PermissionDenied { permanent: true }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn subscription_walks_the_route_in_order() {
        let route = vec![Position::new(1.0, 1.0), Position::new(2.0, 2.0)];
        let provider = SimulatedLocation::with_route(route.clone(), Duration::from_millis(10));

        let (_handle, mut updates) = provider.subscribe().await.expect("subscribe").split();
        assert_eq!(updates.next_fix().await, Some(route[0]));
        assert_eq!(updates.next_fix().await, Some(route[1]));
        // the route repeats once exhausted
        assert_eq!(updates.next_fix().await, Some(route[0]));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_suspends_and_resume_restores_delivery() {
        let provider = SimulatedLocation::with_route(
            vec![Position::new(1.0, 1.0)],
            Duration::from_millis(10),
        );
        let (handle, mut updates) = provider.subscribe().await.expect("subscribe").split();

        assert!(updates.next_fix().await.is_some());

        handle.pause();
        let waited = timeout(Duration::from_millis(100), updates.next_fix()).await;
        assert!(waited.is_err(), "paused subscription must not deliver");

        handle.resume();
        let resumed = timeout(Duration::from_millis(100), updates.next_fix()).await;
        assert_eq!(resumed.expect("resumed delivery"), Some(Position::new(1.0, 1.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_ends_the_stream() {
        let provider = SimulatedLocation::with_route(
            vec![Position::new(1.0, 1.0)],
            Duration::from_millis(10),
        );
        let (handle, mut updates) = provider.subscribe().await.expect("subscribe").split();

        assert!(updates.next_fix().await.is_some());
        handle.cancel();

        // drain anything already buffered, then expect the end of the stream
        let ended = timeout(Duration::from_secs(1), async {
            while updates.next_fix().await.is_some() {}
        })
        .await;
        assert!(ended.is_ok(), "cancelled subscription must terminate");
    }
}
