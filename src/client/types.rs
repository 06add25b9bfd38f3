//! Wire types for the attendance endpoints.

use serde::{Deserialize, Serialize};

use crate::models::attendance::AttendanceRecord;
use crate::models::ticket::{ScannedTicket, TicketStatus};

/// Response of `POST /attendance/scan`. `success: false` is a business
/// rejection (invalid or already-used ticket), not a transport error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    pub success: bool,
    #[serde(default)]
    pub ticket: Option<TicketPayload>,
    #[serde(default)]
    pub status: Option<StatusPayload>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketPayload {
    #[serde(alias = "_id")]
    pub id: String,
    pub ticket_number: String,
    pub is_valid: bool,
    #[serde(default)]
    pub holder_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub status: TicketStatus,
    #[serde(default)]
    pub check_in_count: u32,
}

impl ScanResponse {
    /// Assemble the scan-session ticket from a successful response. Returns
    /// `None` when the body is missing the ticket or status block.
    pub fn into_ticket(self) -> Option<ScannedTicket> {
        let ticket = self.ticket?;
        let status = self.status?;
        Some(ScannedTicket {
            ticket_id: ticket.id,
            ticket_number: ticket.ticket_number,
            is_valid: ticket.is_valid,
            status: status.status,
            holder_name: ticket.holder_name,
            check_in_count: status.check_in_count,
        })
    }
}

/// Response of the check-in/check-out endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<AttendanceRecord>,
}

/// Error body the API attaches to non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
