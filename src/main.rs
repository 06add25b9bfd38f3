use std::sync::Arc;
use std::time::Duration;

use dotenvy::dotenv;
use tokio::sync::watch;

use agora_scanner::client::{AttendanceApi, AttendanceClient};
use agora_scanner::config::Config;
use agora_scanner::monitor::AttendanceMonitor;

/// How often the daemon re-reads the event status.
const STATUS_REFRESH: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env();
    let event_id = config
        .event_id
        .clone()
        .expect("AGORA_EVENT_ID must be set");
    let ctx = config.request_context();

    let client = Arc::new(
        AttendanceClient::new(&config.api_base_url).expect("Failed to build attendance client"),
    );

    let summary = client
        .event_summary(&ctx, &event_id)
        .await
        .expect("Failed to fetch event");
    tracing::info!(event = %summary.title, status = ?summary.status, "Monitoring event attendance");

    let (status_tx, status_rx) = watch::channel(summary.status);
    let (monitor, mut snapshots) =
        AttendanceMonitor::new(client.clone(), ctx.clone(), event_id.clone(), status_rx);
    tokio::spawn(monitor.run());

    let status_client = client.clone();
    let status_ctx = ctx.clone();
    let status_event = event_id.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(STATUS_REFRESH);
        // First tick completes immediately; we already fetched the status.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match status_client.event_summary(&status_ctx, &status_event).await {
                Ok(summary) => {
                    status_tx.send_if_modified(|current| {
                        if *current != summary.status {
                            tracing::info!(status = ?summary.status, "Event status changed");
                            *current = summary.status;
                            true
                        } else {
                            false
                        }
                    });
                }
                Err(e) => tracing::warn!(error = %e, "Event status refresh failed"),
            }
        }
    });

    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow().clone();
        tracing::info!(
            current = snapshot.current_count,
            total = snapshot.total_checkins,
            "Attendance update"
        );
    }
}
