//! Ticket scanning flow: decoder adapter, dedup guard, and the scan view
//! controller.

pub mod controller;
pub mod decoder;
pub mod dedup;

pub use controller::{
    ActionOutcome, ScanCompletion, ScanController, ScanOutcome, ScannerState,
};
pub use decoder::{DecodeHandle, DecodeSource, DecodedCode};
pub use dedup::{DedupState, ScanDecision, DEDUP_WINDOW};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::client::AttendanceApi;
use crate::models::event::EventStatus;

/// Drain decoder events into the controller until the camera goes away.
/// Decodes are dropped outright unless the owning event is ongoing.
pub async fn run_scan_loop<A: AttendanceApi>(
    mut controller: ScanController<A>,
    mut source: DecodeSource,
    status: watch::Receiver<EventStatus>,
) {
    info!("Scan loop started");
    while let Some(code) = source.next().await {
        if *status.borrow() != EventStatus::Ongoing {
            debug!("Event not ongoing, decode dropped");
            continue;
        }
        let outcome = controller.handle_decode(&code.text, code.at).await;
        debug!(?outcome, "Decode handled");
    }
    info!("Scan loop stopped");
}
