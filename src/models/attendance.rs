use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operator-triggered attendance transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceAction {
    CheckIn,
    CheckOut,
}

/// Point-in-time read of the aggregate attendance counts. Remote-owned and
/// eventually consistent; never computed client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSnapshot {
    pub current_count: u32,
    pub total_checkins: u32,
    pub last_updated: DateTime<Utc>,
}

impl AttendanceSnapshot {
    /// Fallback used when a fetch fails, so the counter display keeps
    /// rendering through transient errors.
    pub fn zeroed() -> Self {
        Self {
            current_count: 0,
            total_checkins: 0,
            last_updated: Utc::now(),
        }
    }
}

/// One entry of the attendance history, most recent first (server-side
/// ordering).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub timestamp: DateTime<Utc>,
    pub action: AttendanceAction,
    pub ticket_number: String,
    pub attendee_name: String,
    pub scanned_by_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckedInAttendee {
    pub ticket_id: String,
    pub ticket_number: String,
    pub attendee_name: String,
    pub checked_in_at: Option<DateTime<Utc>>,
}
