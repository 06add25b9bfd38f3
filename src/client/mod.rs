//! HTTP client for the attendance endpoints of the Agora API.
//!
//! The remote service is the system of record: scan, check-in/check-out,
//! and the aggregate counters all live server-side. This client owns no
//! state beyond the in-flight request.

pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::config::RequestContext;
use crate::models::attendance::{AttendanceRecord, AttendanceSnapshot, CheckedInAttendee};
use crate::models::event::EventSummary;
use crate::utils::error::{Error, Result};
use types::{ActionResponse, ErrorBody, HistoryResponse, ScanResponse};

/// Request timeout applied to every call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Bounded automatic retry for transient failures.
const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(1000);

/// Operations the scan flow needs from the remote attendance service.
#[async_trait]
pub trait AttendanceApi: Send + Sync {
    async fn scan_ticket(
        &self,
        ctx: &RequestContext,
        ticket_id: &str,
        ticket_number: &str,
    ) -> Result<ScanResponse>;

    async fn check_in(&self, ctx: &RequestContext, ticket_id: &str) -> Result<ActionResponse>;

    async fn check_out(&self, ctx: &RequestContext, ticket_id: &str) -> Result<ActionResponse>;

    /// Degrades to a zeroed snapshot on failure so the counter display
    /// keeps rendering through transient errors.
    async fn event_attendance(&self, ctx: &RequestContext, event_id: &str) -> AttendanceSnapshot;

    async fn attendance_history(
        &self,
        ctx: &RequestContext,
        event_id: &str,
    ) -> Vec<AttendanceRecord>;

    async fn checked_in_attendees(
        &self,
        ctx: &RequestContext,
        event_id: &str,
    ) -> Vec<CheckedInAttendee>;

    async fn event_summary(&self, ctx: &RequestContext, event_id: &str) -> Result<EventSummary>;
}

/// Whether a response status is worth an automatic retry.
///
/// Mutating endpoints go through the same policy; the server treats
/// check-in and check-out as idempotent per ticket.
pub fn retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
}

fn retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[derive(Clone)]
pub struct AttendanceClient {
    http: Client,
    base_url: String,
}

impl AttendanceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_context(req: RequestBuilder, ctx: &RequestContext) -> RequestBuilder {
        match ctx.bearer_token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send a request, retrying transient failures (connect errors,
    /// timeouts, 5xx) up to `MAX_ATTEMPTS` with a fixed delay.
    async fn send_with_retry(&self, req: RequestBuilder) -> Result<Response> {
        let mut last_err: Option<Error> = None;

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                tokio::time::sleep(RETRY_DELAY).await;
            }

            let Some(req) = req.try_clone() else {
                break;
            };

            match req.send().await {
                Ok(resp) if retryable_status(resp.status()) => {
                    warn!(status = %resp.status(), attempt, "Server error, will retry");
                    last_err = Some(Error::Api(format!("server returned {}", resp.status())));
                }
                Ok(resp) => return Ok(resp),
                Err(e) if retryable_error(&e) => {
                    warn!(error = %e, attempt, "Transient network failure, will retry");
                    last_err = Some(Error::Http(e));
                }
                Err(e) => return Err(Error::Http(e)),
            }
        }

        Err(last_err.unwrap_or_else(|| Error::Api("request failed".to_string())))
    }

    async fn read_json<T: DeserializeOwned>(&self, resp: Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body: ErrorBody = resp.json().await.unwrap_or_default();
            let message = body
                .message
                .unwrap_or_else(|| format!("request failed with {}", status));
            return Err(Error::Api(message));
        }
        Ok(resp.json().await?)
    }

    async fn post_json<B, T>(&self, ctx: &RequestContext, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let req = Self::with_context(self.http.post(self.url(path)), ctx).json(body);
        let resp = self.send_with_retry(req).await?;
        self.read_json(resp).await
    }

    async fn get_json<T: DeserializeOwned>(&self, ctx: &RequestContext, path: &str) -> Result<T> {
        let req = Self::with_context(self.http.get(self.url(path)), ctx);
        let resp = self.send_with_retry(req).await?;
        self.read_json(resp).await
    }
}

#[async_trait]
impl AttendanceApi for AttendanceClient {
    async fn scan_ticket(
        &self,
        ctx: &RequestContext,
        ticket_id: &str,
        ticket_number: &str,
    ) -> Result<ScanResponse> {
        if ticket_id.is_empty() || ticket_number.is_empty() {
            return Err(Error::Validation(
                "Ticket ID and ticket number are required".to_string(),
            ));
        }
        let body = serde_json::json!({
            "ticketId": ticket_id,
            "ticketNumber": ticket_number,
        });
        self.post_json(ctx, "/attendance/scan", &body).await
    }

    async fn check_in(&self, ctx: &RequestContext, ticket_id: &str) -> Result<ActionResponse> {
        if ticket_id.is_empty() {
            return Err(Error::Validation("Ticket ID is required".to_string()));
        }
        let body = serde_json::json!({ "ticketId": ticket_id });
        self.post_json(ctx, "/attendance/check-in", &body).await
    }

    async fn check_out(&self, ctx: &RequestContext, ticket_id: &str) -> Result<ActionResponse> {
        if ticket_id.is_empty() {
            return Err(Error::Validation("Ticket ID is required".to_string()));
        }
        let body = serde_json::json!({ "ticketId": ticket_id });
        self.post_json(ctx, "/attendance/check-out", &body).await
    }

    async fn event_attendance(&self, ctx: &RequestContext, event_id: &str) -> AttendanceSnapshot {
        let path = format!("/attendance/event/{event_id}");
        match self.get_json(ctx, &path).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "Attendance fetch failed, using zeroed snapshot");
                AttendanceSnapshot::zeroed()
            }
        }
    }

    async fn attendance_history(
        &self,
        ctx: &RequestContext,
        event_id: &str,
    ) -> Vec<AttendanceRecord> {
        let path = format!("/attendance/event/{event_id}/history");
        match self.get_json::<HistoryResponse>(ctx, &path).await {
            Ok(resp) => resp.history,
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "History fetch failed");
                Vec::new()
            }
        }
    }

    async fn checked_in_attendees(
        &self,
        ctx: &RequestContext,
        event_id: &str,
    ) -> Vec<CheckedInAttendee> {
        let path = format!("/attendance/event/{event_id}/attendees");
        match self.get_json(ctx, &path).await {
            Ok(attendees) => attendees,
            Err(e) => {
                warn!(event_id = %event_id, error = %e, "Attendee list fetch failed");
                Vec::new()
            }
        }
    }

    async fn event_summary(&self, ctx: &RequestContext, event_id: &str) -> Result<EventSummary> {
        let path = format!("/events/{event_id}");
        self.get_json(ctx, &path).await
    }
}
