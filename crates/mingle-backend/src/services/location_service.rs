//! Position acquisition, the continuous subscription, and map updates.

use futures_util::StreamExt;
use log::info;
use mingle_bridge::MessageFromBackend;
use mingle_bridge::map::{CURRENT_USER_MARKER_ID, DEFAULT_ZOOM, GeoPoint, MapMarker};
use mingle_bridge::notification::NotificationType;
use mingle_location::{LocationError, Position, acquire_position};

use crate::services::roster_service;

/// Handles the home screen mounting (see
/// [`mingle_bridge::MessageToBackend::StartDiscovery`]): one guarded
/// acquisition, then the continuous subscription, then the initial roster
/// load.
///
/// An acquisition failure degrades the screen instead of aborting: the host
/// gets a warning notification plus a `LocationUnavailable` event, and the
/// roster is still loaded.
pub async fn handle_start_discovery(context: super::AppContextHandle) {
    match acquire_position(context.location.as_ref()).await {
        Ok(fix) => {
            info!(
                "Acquired initial fix at ({}, {})",
                fix.latitude, fix.longitude
            );
            apply_fix(&context, fix).await;
            start_subscription(context.clone()).await;
        }
        Err(error) => report_unavailable(&context, &error).await,
    }

    roster_service::spawn_refresh(context);
}

/// Handles the home screen teardown (see
/// [`mingle_bridge::MessageToBackend::StopDiscovery`]). The subscription must
/// not outlive the screen that owns it.
pub async fn handle_stop_discovery(context: super::AppContextHandle) {
    let subscription = context.state.write().await.subscription.take();
    if let Some(handle) = subscription {
        handle.cancel();
        info!("Released the position subscription");
    }
}

/// Opens the continuous subscription and spawns its consumer task.
async fn start_subscription(context: super::AppContextHandle) {
    let subscription = match context.location.subscribe().await {
        Ok(subscription) => subscription,
        Err(error) => {
            report_unavailable(&context, &error).await;
            return;
        }
    };

    let (handle, mut updates) = subscription.split();
    {
        let mut state = context.state.write().await;
        if !state.sharing.is_enabled() {
            // discovery started while the toggle is off; register suspended
            handle.pause();
        }
        // replacing an older handle cancels it on drop
        state.subscription = Some(handle);
    }

    tokio::spawn(async move {
        while let Some(fix) = updates.next().await {
            apply_fix(&context, fix).await;
        }
        log::debug!("Position stream closed");
    });
}

/// Applies one fix: store it, replace the current-user marker, and push the
/// new marker set and a camera recenter to the host.
async fn apply_fix(context: &super::AppContextHandle, fix: Position) {
    let center = GeoPoint {
        latitude: fix.latitude,
        longitude: fix.longitude,
    };

    let markers = {
        let mut state = context.state.write().await;
        state.position = Some(fix);
        state
            .markers
            .retain(|marker| marker.id != CURRENT_USER_MARKER_ID);
        state.markers.push(MapMarker {
            id: CURRENT_USER_MARKER_ID.to_string(),
            position: center,
            label: "You".to_string(),
        });
        state.markers.clone()
    };

    context
        .send(MessageFromBackend::MapMarkersUpdate(markers))
        .await;
    context
        .send(MessageFromBackend::RecenterCamera {
            center,
            zoom: DEFAULT_ZOOM,
        })
        .await;
}

async fn report_unavailable(context: &super::AppContextHandle, error: &LocationError) {
    log::warn!("Position acquisition failed: {error}");
    context
        .send_notification(
            NotificationType::Warning,
            "Enable location to find people near you.",
        )
        .await;
    context
        .send(MessageFromBackend::LocationUnavailable {
            reason: error.to_string(),
        })
        .await;
}
