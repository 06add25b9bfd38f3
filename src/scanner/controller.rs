//! Scan view controller.
//!
//! A small state machine coordinating decoder events, the dedup guard, and
//! the attendance API: `Scanning` (camera armed) -> `Reviewing` (ticket on
//! screen) -> `Processing` (check-in/check-out in flight) -> back to
//! `Scanning`. Every state change goes through [`transition`].

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::types::{ActionResponse, ScanResponse};
use crate::client::AttendanceApi;
use crate::config::RequestContext;
use crate::models::attendance::AttendanceAction;
use crate::models::qr::QrPayload;
use crate::models::ticket::ScannedTicket;
use crate::scanner::dedup::{DedupState, ScanDecision};
use crate::utils::error::{Error, Result};

/// Controller states. `Processing` keeps the ticket so a failed action can
/// fall back to `Reviewing` without losing the display.
#[derive(Debug, Clone, PartialEq)]
pub enum ScannerState {
    Scanning,
    Reviewing(ScannedTicket),
    Processing(ScannedTicket),
}

/// Inputs to the transition function.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    TicketFetched(ScannedTicket),
    ScanRejected { message: String },
    ScanFailed { message: String },
    CheckInRequested,
    CheckOutRequested,
    ActionSucceeded(AttendanceAction),
    ActionFailed { message: String },
    ResetRequested,
}

/// Side effects the driver carries out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue the attendance-mutating request for the displayed ticket.
    BeginAction(AttendanceAction),
    /// Notify the parent that a check-in/check-out completed.
    EmitCompletion(AttendanceAction),
    /// Surface a message to the operator.
    ShowMessage(String),
}

/// The single authoritative transition function over (state, event) pairs.
///
/// Unknown combinations are no-ops. In particular nothing is accepted while
/// `Processing`, which is what prevents double submission: a second tap or
/// decode during an in-flight request falls through to the catch-all.
pub fn transition(state: ScannerState, event: ScanEvent) -> (ScannerState, Option<Effect>) {
    use ScanEvent::*;
    use ScannerState::*;

    match (state, event) {
        (Scanning, TicketFetched(ticket)) => (Reviewing(ticket), None),
        (Scanning, ScanRejected { message }) | (Scanning, ScanFailed { message }) => {
            (Scanning, Some(Effect::ShowMessage(message)))
        }
        (Reviewing(ticket), CheckInRequested) if ticket.can_check_in() => (
            Processing(ticket),
            Some(Effect::BeginAction(AttendanceAction::CheckIn)),
        ),
        (Reviewing(ticket), CheckOutRequested) if ticket.can_check_out() => (
            Processing(ticket),
            Some(Effect::BeginAction(AttendanceAction::CheckOut)),
        ),
        (Reviewing(_), ResetRequested) => (Scanning, None),
        (Processing(_), ActionSucceeded(action)) => {
            (Scanning, Some(Effect::EmitCompletion(action)))
        }
        (Processing(ticket), ActionFailed { message }) => {
            (Reviewing(ticket), Some(Effect::ShowMessage(message)))
        }
        // Everything else is a no-op in the current state.
        (state, _) => (state, None),
    }
}

/// What a decode attempt amounted to, for the embedding UI.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Not in `Scanning`, or suppressed by the dedup guard.
    Ignored,
    InvalidQr { message: String },
    /// Server rejected the ticket.
    Rejected { message: String },
    /// Transport failure after retries.
    Failed { message: String },
    /// Ticket fetched; now reviewing.
    Accepted,
    /// Response arrived after the scan session was reset.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Ignored,
    Completed(AttendanceAction),
    Failed { message: String },
    Stale,
}

/// Completion event emitted to the parent after a successful action.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanCompletion {
    pub action: AttendanceAction,
    pub ticket_id: String,
    pub ticket_number: String,
}

/// Drives the scan flow against an [`AttendanceApi`]. One controller per
/// active scanner; it exclusively owns the dedup slot and the camera side
/// of the session.
pub struct ScanController<A> {
    api: Arc<A>,
    ctx: RequestContext,
    state: ScannerState,
    dedup: DedupState,
    /// Bumped on every reset; responses stamped with an older value are
    /// stale and silently discarded.
    session: u64,
    completions: mpsc::UnboundedSender<ScanCompletion>,
}

impl<A: AttendanceApi> ScanController<A> {
    pub fn new(
        api: Arc<A>,
        ctx: RequestContext,
    ) -> (Self, mpsc::UnboundedReceiver<ScanCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                api,
                ctx,
                state: ScannerState::Scanning,
                dedup: DedupState::new(),
                session: 0,
                completions: tx,
            },
            rx,
        )
    }

    pub fn state(&self) -> &ScannerState {
        &self.state
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    fn apply(&mut self, event: ScanEvent) -> Option<Effect> {
        let state = std::mem::replace(&mut self.state, ScannerState::Scanning);
        let (next, effect) = transition(state, event);
        self.state = next;
        effect
    }

    /// Re-arm the scanner, discarding any displayed ticket. Ignored while a
    /// request is in flight.
    pub fn reset(&mut self) {
        if matches!(self.state, ScannerState::Processing(_)) {
            return;
        }
        self.session += 1;
        self.state = ScannerState::Scanning;
        debug!(session = self.session, "Scanner reset");
    }

    /// Handle a decoded QR payload from the camera.
    pub async fn handle_decode(&mut self, raw: &str, now: Instant) -> ScanOutcome {
        if self.state != ScannerState::Scanning {
            return ScanOutcome::Ignored;
        }

        let (next, decision) = self.dedup.observe(raw, now);
        self.dedup = next;
        if decision == ScanDecision::Duplicate {
            debug!("Duplicate scan suppressed");
            return ScanOutcome::Ignored;
        }

        let payload = match QrPayload::parse(raw) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Unparseable QR payload");
                return ScanOutcome::InvalidQr {
                    message: e.to_string(),
                };
            }
        };

        let session = self.session;
        let result = self
            .api
            .scan_ticket(&self.ctx, &payload.ticket_id, &payload.ticket_number)
            .await;
        self.apply_scan_result(session, result)
    }

    /// Fold a scan response stamped with `session` back into the machine.
    /// A stamp that no longer matches the current session means the
    /// operator reset the scanner while the request was in flight.
    pub fn apply_scan_result(
        &mut self,
        session: u64,
        result: Result<ScanResponse>,
    ) -> ScanOutcome {
        if session != self.session {
            debug!(
                stamped = session,
                current = self.session,
                "Discarding stale scan response"
            );
            return ScanOutcome::Stale;
        }

        match result {
            Ok(resp) if resp.success => match resp.into_ticket() {
                Some(ticket) => {
                    info!(ticket_number = %ticket.ticket_number, "Ticket scanned");
                    self.apply(ScanEvent::TicketFetched(ticket));
                    ScanOutcome::Accepted
                }
                None => {
                    let message = "Malformed scan response".to_string();
                    self.apply(ScanEvent::ScanFailed {
                        message: message.clone(),
                    });
                    ScanOutcome::Failed { message }
                }
            },
            Ok(resp) => {
                let message = resp
                    .message
                    .unwrap_or_else(|| "Invalid ticket".to_string());
                self.apply(ScanEvent::ScanRejected {
                    message: message.clone(),
                });
                ScanOutcome::Rejected { message }
            }
            Err(e) => {
                warn!(error = %e, "Scan request failed");
                let message = "Failed to scan ticket".to_string();
                self.apply(ScanEvent::ScanFailed {
                    message: message.clone(),
                });
                ScanOutcome::Failed { message }
            }
        }
    }

    pub async fn check_in(&mut self) -> ActionOutcome {
        self.perform(AttendanceAction::CheckIn).await
    }

    pub async fn check_out(&mut self) -> ActionOutcome {
        self.perform(AttendanceAction::CheckOut).await
    }

    async fn perform(&mut self, action: AttendanceAction) -> ActionOutcome {
        let event = match action {
            AttendanceAction::CheckIn => ScanEvent::CheckInRequested,
            AttendanceAction::CheckOut => ScanEvent::CheckOutRequested,
        };
        match self.apply(event) {
            Some(Effect::BeginAction(_)) => {}
            _ => return ActionOutcome::Ignored,
        }

        let ticket_id = match &self.state {
            ScannerState::Processing(ticket) => ticket.ticket_id.clone(),
            _ => return ActionOutcome::Ignored,
        };

        let session = self.session;
        let result = match action {
            AttendanceAction::CheckIn => self.api.check_in(&self.ctx, &ticket_id).await,
            AttendanceAction::CheckOut => self.api.check_out(&self.ctx, &ticket_id).await,
        };
        self.apply_action_result(session, action, result)
    }

    /// Fold a check-in/check-out response back into the machine.
    pub fn apply_action_result(
        &mut self,
        session: u64,
        action: AttendanceAction,
        result: Result<ActionResponse>,
    ) -> ActionOutcome {
        if session != self.session {
            debug!(
                stamped = session,
                current = self.session,
                "Discarding stale action response"
            );
            return ActionOutcome::Stale;
        }

        let ticket = match &self.state {
            ScannerState::Processing(ticket) => ticket.clone(),
            // An action response only makes sense while processing.
            _ => return ActionOutcome::Ignored,
        };

        match result {
            Ok(resp) if resp.success => {
                if let Some(Effect::EmitCompletion(done)) =
                    self.apply(ScanEvent::ActionSucceeded(action))
                {
                    let _ = self.completions.send(ScanCompletion {
                        action: done,
                        ticket_id: ticket.ticket_id.clone(),
                        ticket_number: ticket.ticket_number.clone(),
                    });
                }
                info!(
                    ticket_number = %ticket.ticket_number,
                    action = ?action,
                    "Attendance action completed"
                );
                ActionOutcome::Completed(action)
            }
            Ok(resp) => {
                let message = resp.message.unwrap_or_else(|| default_failure(action));
                self.apply(ScanEvent::ActionFailed {
                    message: message.clone(),
                });
                ActionOutcome::Failed { message }
            }
            Err(Error::Api(message)) => {
                self.apply(ScanEvent::ActionFailed {
                    message: message.clone(),
                });
                ActionOutcome::Failed { message }
            }
            Err(e) => {
                warn!(error = %e, "Attendance action failed");
                let message = default_failure(action);
                self.apply(ScanEvent::ActionFailed {
                    message: message.clone(),
                });
                ActionOutcome::Failed { message }
            }
        }
    }
}

fn default_failure(action: AttendanceAction) -> String {
    match action {
        AttendanceAction::CheckIn => "Failed to check in attendee".to_string(),
        AttendanceAction::CheckOut => "Failed to check out attendee".to_string(),
    }
}
