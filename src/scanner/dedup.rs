//! One-slot scan dedup guard.
//!
//! Suppresses re-processing of the same physical scan: an identical code
//! seen again inside the window is dropped, a different code is always
//! accepted. Only the most recent accepted code is remembered.

use std::time::{Duration, Instant};

/// How long an identical code is ignored after being accepted.
pub const DEDUP_WINDOW: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDecision {
    Accept,
    Duplicate,
}

/// The single remembered (code, timestamp) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupState {
    last: Option<(String, Instant)>,
}

impl DedupState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `code` is a fresh scan at `now`, returning the next
    /// guard state alongside the decision. Keyed on code equality: a
    /// different code inside the window is accepted.
    pub fn observe(&self, code: &str, now: Instant) -> (DedupState, ScanDecision) {
        if let Some((last_code, last_seen)) = &self.last {
            if last_code == code && now.duration_since(*last_seen) < DEDUP_WINDOW {
                return (self.clone(), ScanDecision::Duplicate);
            }
        }
        (
            DedupState {
                last: Some((code.to_string(), now)),
            },
            ScanDecision::Accept,
        )
    }
}
