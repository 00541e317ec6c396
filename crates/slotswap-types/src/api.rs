use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Event, PublicUser, SwapStatus};

// -- JWT Claims --

/// JWT claims shared between token issuance (auth handlers) and the request
/// middleware. Canonical definition lives here in slotswap-types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub user_name: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub user_name: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// -- Events --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEventRequest {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

// -- Swaps --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestSwapRequest {
    pub event_id: Option<Uuid>,
    pub target_event_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondSwapRequest {
    pub accept: Option<bool>,
}

/// A swappable slot belonging to someone else, with its owner redacted to
/// public display fields.
#[derive(Debug, Clone, Serialize)]
pub struct SwappableSlot {
    pub event: Event,
    pub owner: PublicUser,
}

/// A swap with its referenced events and both parties attached. A slot is
/// `None` when the underlying event no longer exists.
#[derive(Debug, Clone, Serialize)]
pub struct SwapDetails {
    pub id: Uuid,
    pub status: SwapStatus,
    pub my_slot: Option<Event>,
    pub their_slot: Option<Event>,
    pub requester: PublicUser,
    pub responder: PublicUser,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
