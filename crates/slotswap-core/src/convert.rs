//! Row-to-domain decoding. Rows carry TEXT columns; corrupt ids, statuses,
//! or timestamps surface as internal errors rather than defaults.

use anyhow::{Context, anyhow};
use slotswap_db::models::{EventRow, SwapRow, UserRow, decode_ts};
use slotswap_types::models::{Event, EventStatus, PublicUser, Swap, SwapStatus};
use uuid::Uuid;

use crate::error::DomainResult;

pub(crate) fn parse_id(s: &str) -> anyhow::Result<Uuid> {
    s.parse::<Uuid>().with_context(|| format!("invalid id column: {s}"))
}

pub(crate) fn event_from_row(row: &EventRow) -> DomainResult<Event> {
    Ok(Event {
        id: parse_id(&row.id)?,
        title: row.title.clone(),
        start_time: decode_ts(&row.start_time)?,
        end_time: decode_ts(&row.end_time)?,
        owner_id: parse_id(&row.owner_id)?,
        status: EventStatus::parse(&row.status)
            .ok_or_else(|| anyhow!("unknown event status: {}", row.status))?,
        created_at: decode_ts(&row.created_at)?,
        updated_at: decode_ts(&row.updated_at)?,
    })
}

pub(crate) fn swap_from_row(row: &SwapRow) -> DomainResult<Swap> {
    Ok(Swap {
        id: parse_id(&row.id)?,
        requester_id: parse_id(&row.requester_id)?,
        responder_id: parse_id(&row.responder_id)?,
        my_slot_id: parse_id(&row.my_slot_id)?,
        their_slot_id: parse_id(&row.their_slot_id)?,
        status: SwapStatus::parse(&row.status)
            .ok_or_else(|| anyhow!("unknown swap status: {}", row.status))?,
        created_at: decode_ts(&row.created_at)?,
        updated_at: decode_ts(&row.updated_at)?,
    })
}

pub(crate) fn public_user_from_row(row: &UserRow) -> DomainResult<PublicUser> {
    Ok(PublicUser {
        id: parse_id(&row.id)?,
        user_name: row.user_name.clone(),
    })
}
