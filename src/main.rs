use std::sync::Arc;

mod console;

fn main() {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()
        .expect("failed to build logger instance");

    let channels = mingle_bridge::BridgeChannels::default();
    let location = Arc::new(mingle_location::sim::SimulatedLocation::new());
    let roster_source = Arc::new(mingle_backend::SimulatedRoster::new());
    mingle_backend::run(
        channels.backend_rx,
        channels.backend_tx,
        location,
        roster_source,
    );
    console::run(channels.host_rx, channels.host_tx).expect("failed to run console host");
}
