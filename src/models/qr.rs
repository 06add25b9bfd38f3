use serde::{Deserialize, Serialize};

use crate::utils::error::{Error, Result};

/// Payload embedded in a ticket QR code: a JSON object carrying the ticket
/// identifier and number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub ticket_id: String,
    pub ticket_number: String,
}

impl QrPayload {
    /// Parse decoded QR text. Anything that is not a JSON object with
    /// non-empty `ticketId` and `ticketNumber` is an invalid code.
    pub fn parse(raw: &str) -> Result<Self> {
        let payload: QrPayload = serde_json::from_str(raw).map_err(|_| Error::InvalidQr)?;
        if payload.ticket_id.is_empty() || payload.ticket_number.is_empty() {
            return Err(Error::InvalidQr);
        }
        Ok(payload)
    }
}
