/// Database row types — these map directly to SQLite rows.
/// Distinct from slotswap-types API models to keep the DB layer independent.
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};

pub struct UserRow {
    pub id: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub refresh_token: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

pub struct EventRow {
    pub id: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub owner_id: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct SwapRow {
    pub id: String,
    pub requester_id: String,
    pub responder_id: String,
    pub my_slot_id: String,
    pub their_slot_id: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A swappable event joined with its owner's display name.
pub struct SwappableRow {
    pub event: EventRow,
    pub owner_name: String,
}

/// Timestamps are stored as fixed-width RFC 3339 UTC strings so that
/// lexicographic ORDER BY matches chronological order.
pub fn encode_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_ts(s: &str) -> Result<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>()
        .with_context(|| format!("invalid timestamp column: {s}"))
}
