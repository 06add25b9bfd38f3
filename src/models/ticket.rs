use serde::{Deserialize, Serialize};

/// Server-tracked attendance state of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketStatus {
    NotCheckedIn,
    CheckedIn,
    CheckedOut,
}

/// Ticket displayed after a successful scan. Scan-session-scoped: discarded
/// when the operator resets the scanner or scans another code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannedTicket {
    pub ticket_id: String,
    pub ticket_number: String,
    pub is_valid: bool,
    pub status: TicketStatus,
    pub holder_name: Option<String>,
    pub check_in_count: u32,
}

impl ScannedTicket {
    /// Check-in requires a valid ticket that is not already checked in.
    pub fn can_check_in(&self) -> bool {
        self.is_valid && self.status != TicketStatus::CheckedIn
    }

    /// Check-out is only meaningful for a checked-in ticket.
    pub fn can_check_out(&self) -> bool {
        self.status == TicketStatus::CheckedIn
    }
}
