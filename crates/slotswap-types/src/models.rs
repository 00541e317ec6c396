use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states for an event slot.
///
/// `SWAP_PENDING` is a lock: while a swap negotiation is outstanding the
/// slot cannot be offered again or deleted. `COMPLETED` is absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Busy,
    Swappable,
    SwapPending,
    Completed,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Busy => "BUSY",
            EventStatus::Swappable => "SWAPPABLE",
            EventStatus::SwapPending => "SWAP_PENDING",
            EventStatus::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BUSY" => Some(EventStatus::Busy),
            "SWAPPABLE" => Some(EventStatus::Swappable),
            "SWAP_PENDING" => Some(EventStatus::SwapPending),
            "COMPLETED" => Some(EventStatus::Completed),
            _ => None,
        }
    }
}

/// Swap negotiation states. ACCEPTED and REJECTED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SwapStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SwapStatus::Pending => "PENDING",
            SwapStatus::Accepted => "ACCEPTED",
            SwapStatus::Rejected => "REJECTED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(SwapStatus::Pending),
            "ACCEPTED" => Some(SwapStatus::Accepted),
            "REJECTED" => Some(SwapStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub owner_id: Uuid,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swap {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub responder_id: Uuid,
    pub my_slot_id: Uuid,
    pub their_slot_id: Uuid,
    pub status: SwapStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user as shown to other users: no email, no credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub user_name: String,
}
