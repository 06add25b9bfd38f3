use serde::{Deserialize, Serialize};

/// Event lifecycle status. Scanning and attendance polling are only
/// permitted while the event is `Ongoing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Past,
    Cancelled,
    Postponed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub status: EventStatus,
}
