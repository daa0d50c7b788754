//! Minimal interactive host standing in for the rendering/navigation layer.
//!
//! The real product front-end is a mobile UI; this console maps stdin
//! commands to bridge messages and renders backend events as log lines,
//! which is enough to drive the whole flow end to end from a terminal.

use std::io::BufRead;
use std::thread;

use anyhow::Context;
use log::{info, warn};
use mingle_bridge::roster::Interest;
use mingle_bridge::{MessageFromBackend, MessageToBackend, Screen};
use tokio::sync::mpsc::{Receiver, Sender};

const HELP: &str = "\
commands:
  onboarded            finish the onboarding flow
  start                mount the home screen (acquire, subscribe, fetch)
  stop                 tear the home screen down
  share on|off         toggle location sharing
  filter <tag> on|off  toggle an interest filter chip
  refresh              reload the roster
  help                 show this help
  quit                 exit";

/// Runs the console host until stdin closes or `quit` is entered.
pub fn run(rx: Receiver<MessageFromBackend>, tx: Sender<MessageToBackend>) -> anyhow::Result<()> {
    let printer = thread::spawn(move || render_events(rx));

    // the launch gate decides the initial screen
    tx.blocking_send(MessageToBackend::LaunchStateRequest)
        .context("backend hung up before the launch state request")?;

    println!("{HELP}");
    for line in std::io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        match parse_command(line.trim()) {
            Ok(Some(message)) => tx
                .blocking_send(message)
                .context("backend hung up")?,
            Ok(None) => break,
            Err(feedback) => {
                if !feedback.is_empty() {
                    println!("{feedback}");
                }
            }
        }
    }

    drop(tx);
    let _ = printer.join();
    Ok(())
}

/// Maps one input line to a bridge command. `Ok(None)` requests exit; `Err`
/// carries feedback to print back to the user.
fn parse_command(line: &str) -> Result<Option<MessageToBackend>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(String::new());
    };

    match head {
        "onboarded" => Ok(Some(MessageToBackend::OnboardingCompleted)),
        "start" => Ok(Some(MessageToBackend::StartDiscovery)),
        "stop" => Ok(Some(MessageToBackend::StopDiscovery)),
        "refresh" => Ok(Some(MessageToBackend::RefreshRosterRequest)),
        "share" => match words.next() {
            Some("on") => Ok(Some(MessageToBackend::SetSharingEnabled(true))),
            Some("off") => Ok(Some(MessageToBackend::SetSharingEnabled(false))),
            _ => Err("usage: share on|off".to_string()),
        },
        "filter" => {
            let interest = words.next().and_then(Interest::parse);
            let selected = match words.next() {
                Some("on") => Some(true),
                Some("off") => Some(false),
                _ => None,
            };
            match (interest, selected) {
                (Some(interest), Some(selected)) => {
                    Ok(Some(MessageToBackend::SetInterestSelected {
                        interest,
                        selected,
                    }))
                }
                _ => Err(format!("usage: filter <tag> on|off (tags: {})", tag_list())),
            }
        }
        "help" => Err(HELP.to_string()),
        "quit" | "exit" => Ok(None),
        other => Err(format!("unknown command: {other}")),
    }
}

fn tag_list() -> String {
    Interest::ALL
        .iter()
        .map(|interest| interest.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders backend events until the backend closes its side of the bridge.
fn render_events(mut rx: Receiver<MessageFromBackend>) {
    while let Some(event) = rx.blocking_recv() {
        match event {
            MessageFromBackend::NavigateTo(screen) => {
                let name = match screen {
                    Screen::Onboarding => "onboarding",
                    Screen::Home => "home",
                };
                info!("screen: {name}");
            }
            MessageFromBackend::NotificationMessage(notification) => {
                info!(
                    "[{:?}] {}",
                    notification.notification_type, notification.message
                );
            }
            MessageFromBackend::MapMarkersUpdate(markers) => {
                let summary = markers
                    .iter()
                    .map(|marker| {
                        format!(
                            "{} ({:.4}, {:.4})",
                            marker.label, marker.position.latitude, marker.position.longitude
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                info!("map markers: {summary}");
            }
            MessageFromBackend::RecenterCamera { center, zoom } => {
                info!(
                    "camera: ({:.4}, {:.4}) at zoom {zoom}",
                    center.latitude, center.longitude
                );
            }
            MessageFromBackend::LocationUnavailable { reason } => {
                warn!("location unavailable: {reason}");
            }
            MessageFromBackend::RosterUpdate(users) => {
                if users.is_empty() {
                    info!("roster: (empty)");
                } else {
                    let summary = users
                        .iter()
                        .map(|user| {
                            let tags = user
                                .interests
                                .iter()
                                .map(|tag| tag.label())
                                .collect::<Vec<_>>()
                                .join("+");
                            format!("{} [{tags}]", user.display_name)
                        })
                        .collect::<Vec<_>>()
                        .join(", ");
                    info!("roster: {summary}");
                }
            }
            MessageFromBackend::SharingStateUpdate { enabled } => {
                info!("sharing {}", if enabled { "enabled" } else { "disabled" });
            }
        }
    }
}
