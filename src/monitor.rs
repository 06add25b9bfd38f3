//! Attendance counter polling.
//!
//! Refreshes the aggregate attendance snapshot on a fixed interval while,
//! and only while, the owning event is ongoing. A failed fetch degrades to
//! a zeroed snapshot inside the client and never stops the loop; the next
//! tick simply retries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::client::AttendanceApi;
use crate::config::RequestContext;
use crate::models::attendance::AttendanceSnapshot;
use crate::models::event::EventStatus;

/// Snapshot refresh cadence while the event is ongoing.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Polls the aggregate attendance counts for one event and publishes them
/// on a watch channel.
pub struct AttendanceMonitor<A> {
    api: Arc<A>,
    ctx: RequestContext,
    event_id: String,
    status_rx: watch::Receiver<EventStatus>,
    snapshot_tx: watch::Sender<AttendanceSnapshot>,
}

impl<A: AttendanceApi> AttendanceMonitor<A> {
    /// Returns the monitor and the receiving side of the snapshot feed.
    pub fn new(
        api: Arc<A>,
        ctx: RequestContext,
        event_id: impl Into<String>,
        status_rx: watch::Receiver<EventStatus>,
    ) -> (Self, watch::Receiver<AttendanceSnapshot>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(AttendanceSnapshot::zeroed());
        (
            Self {
                api,
                ctx,
                event_id: event_id.into(),
                status_rx,
                snapshot_tx,
            },
            snapshot_rx,
        )
    }

    /// Run until the status channel closes or the last snapshot consumer
    /// goes away. The poll timer only exists while the event is ongoing,
    /// and is dropped on every exit path.
    pub async fn run(self) {
        let AttendanceMonitor {
            api,
            ctx,
            event_id,
            mut status_rx,
            snapshot_tx,
        } = self;

        loop {
            while *status_rx.borrow_and_update() != EventStatus::Ongoing {
                if status_rx.changed().await.is_err() {
                    return;
                }
            }

            info!(event_id = %event_id, "Attendance polling started");
            let mut ticker = interval(POLL_INTERVAL);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let snapshot = api.event_attendance(&ctx, &event_id).await;
                        debug!(
                            current = snapshot.current_count,
                            total = snapshot.total_checkins,
                            "Attendance refreshed"
                        );
                        if snapshot_tx.send(snapshot).is_err() {
                            info!("No snapshot consumers left, stopping monitor");
                            return;
                        }
                    }
                    changed = status_rx.changed() => {
                        match changed {
                            Ok(()) => {
                                if *status_rx.borrow() != EventStatus::Ongoing {
                                    break;
                                }
                            }
                            Err(_) => return,
                        }
                    }
                }
            }

            info!(event_id = %event_id, "Attendance polling stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::client::types::{ActionResponse, ScanResponse};
    use crate::models::attendance::{AttendanceRecord, CheckedInAttendee};
    use crate::models::event::EventSummary;
    use crate::utils::error::Result;

    #[derive(Default)]
    struct CountingApi {
        fetches: AtomicU32,
    }

    #[async_trait]
    impl AttendanceApi for CountingApi {
        async fn scan_ticket(
            &self,
            _ctx: &RequestContext,
            _ticket_id: &str,
            _ticket_number: &str,
        ) -> Result<ScanResponse> {
            Ok(ScanResponse {
                success: false,
                ticket: None,
                status: None,
                message: None,
            })
        }

        async fn check_in(
            &self,
            _ctx: &RequestContext,
            _ticket_id: &str,
        ) -> Result<ActionResponse> {
            Ok(ActionResponse {
                success: true,
                message: None,
            })
        }

        async fn check_out(
            &self,
            _ctx: &RequestContext,
            _ticket_id: &str,
        ) -> Result<ActionResponse> {
            Ok(ActionResponse {
                success: true,
                message: None,
            })
        }

        async fn event_attendance(
            &self,
            _ctx: &RequestContext,
            _event_id: &str,
        ) -> AttendanceSnapshot {
            let count = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            AttendanceSnapshot {
                current_count: count,
                total_checkins: count,
                last_updated: Utc::now(),
            }
        }

        async fn attendance_history(
            &self,
            _ctx: &RequestContext,
            _event_id: &str,
        ) -> Vec<AttendanceRecord> {
            Vec::new()
        }

        async fn checked_in_attendees(
            &self,
            _ctx: &RequestContext,
            _event_id: &str,
        ) -> Vec<CheckedInAttendee> {
            Vec::new()
        }

        async fn event_summary(
            &self,
            _ctx: &RequestContext,
            event_id: &str,
        ) -> Result<EventSummary> {
            Ok(EventSummary {
                id: event_id.to_string(),
                title: "Test Event".to_string(),
                status: EventStatus::Ongoing,
            })
        }
    }

    fn spawn_monitor(
        api: Arc<CountingApi>,
        status: EventStatus,
    ) -> (
        watch::Sender<EventStatus>,
        watch::Receiver<AttendanceSnapshot>,
    ) {
        let (status_tx, status_rx) = watch::channel(status);
        let (monitor, snapshot_rx) =
            AttendanceMonitor::new(api, RequestContext::anonymous(), "e1", status_rx);
        tokio::spawn(monitor.run());
        (status_tx, snapshot_rx)
    }

    #[tokio::test(start_paused = true)]
    async fn fetches_immediately_then_every_interval() {
        let api = Arc::new(CountingApi::default());
        let (_status_tx, _snapshots) = spawn_monitor(api.clone(), EventStatus::Ongoing);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);

        tokio::time::sleep(POLL_INTERVAL).await;
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);

        tokio::time::sleep(POLL_INTERVAL).await;
        assert_eq!(api.fetches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_poll_while_event_is_not_ongoing() {
        let api = Arc::new(CountingApi::default());
        let (_status_tx, _snapshots) = spawn_monitor(api.clone(), EventStatus::Upcoming);

        tokio::time::sleep(POLL_INTERVAL * 3).await;
        assert_eq!(api.fetches.load(Ordering::SeqCst), 0);
    }

    // Scenario D: status leaves `ongoing`; the next scheduled tick must not
    // fire.
    #[tokio::test(start_paused = true)]
    async fn stops_polling_when_status_leaves_ongoing() {
        let api = Arc::new(CountingApi::default());
        let (status_tx, _snapshots) = spawn_monitor(api.clone(), EventStatus::Ongoing);

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);

        status_tx.send(EventStatus::Past).unwrap();
        tokio::time::sleep(POLL_INTERVAL * 3).await;
        assert_eq!(api.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn resumes_polling_when_status_returns_to_ongoing() {
        let api = Arc::new(CountingApi::default());
        let (status_tx, _snapshots) = spawn_monitor(api.clone(), EventStatus::Ongoing);

        tokio::time::sleep(Duration::from_millis(10)).await;
        status_tx.send(EventStatus::Postponed).unwrap();
        tokio::time::sleep(POLL_INTERVAL * 2).await;
        let after_pause = api.fetches.load(Ordering::SeqCst);
        assert_eq!(after_pause, 1);

        status_tx.send(EventStatus::Ongoing).unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_snapshots_to_consumers() {
        let api = Arc::new(CountingApi::default());
        let (_status_tx, mut snapshots) = spawn_monitor(api, EventStatus::Ongoing);

        snapshots.changed().await.unwrap();
        let snapshot = snapshots.borrow().clone();
        assert_eq!(snapshot.current_count, 1);

        snapshots.changed().await.unwrap();
        assert_eq!(snapshots.borrow().current_count, 2);
    }
}
