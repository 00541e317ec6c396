//! Two-party swap negotiation: request → accept/reject, with every
//! transition applied as one all-or-nothing transaction. State is
//! re-checked inside the transaction scope, so a stale request loses to
//! whatever committed first instead of corrupting the records.

use std::collections::HashMap;

use anyhow::anyhow;
use chrono::Utc;
use rusqlite::Connection;
use slotswap_db::models::{SwapRow, encode_ts};
use slotswap_db::{Database, queries};
use slotswap_types::api::{SwapDetails, SwappableSlot};
use slotswap_types::models::{Event, EventStatus, PublicUser, Swap, SwapStatus};
use tracing::info;
use uuid::Uuid;

use crate::convert;
use crate::error::{DomainError, DomainResult};
use crate::overlap;

pub fn request_swap(
    db: &Database,
    requester: Uuid,
    event_id: Option<Uuid>,
    target_event_id: Option<Uuid>,
) -> DomainResult<Swap> {
    let (event_id, target_event_id) = match (event_id, target_event_id) {
        (Some(mine), Some(theirs)) => (mine, theirs),
        _ => {
            return Err(DomainError::Validation(
                "both event ids are required".to_string(),
            ));
        }
    };

    db.with_tx(|tx| {
        let my_row = queries::event_by_id(tx, &event_id.to_string())?;
        let their_row = queries::event_by_id(tx, &target_event_id.to_string())?;
        let (my_row, their_row) = match (my_row, their_row) {
            (Some(mine), Some(theirs)) => (mine, theirs),
            _ => {
                return Err(DomainError::NotFound(
                    "one or both events not found".to_string(),
                ));
            }
        };

        let mine = convert::event_from_row(&my_row)?;
        let theirs = convert::event_from_row(&their_row)?;

        if mine.owner_id != requester {
            return Err(DomainError::Forbidden(
                "you can only request swaps for your own events".to_string(),
            ));
        }
        if mine.status != EventStatus::Swappable || theirs.status != EventStatus::Swappable {
            return Err(DomainError::Validation(
                "both events must be swappable to request a swap".to_string(),
            ));
        }
        if queries::pending_swap_for_pair(tx, &my_row.id, &their_row.id)?.is_some() {
            return Err(DomainError::Conflict(
                "a swap request for these events already exists".to_string(),
            ));
        }

        // Would either party end up double-booked if this swap completed?
        // Each calendar is checked against the slot it would receive,
        // ignoring the slot it would give away.
        if let Some(conflicting) = overlap::find_conflict(
            tx,
            requester,
            theirs.start_time,
            theirs.end_time,
            Some(mine.id),
        )? {
            return Err(overlap::conflict_error("the requested slot", &conflicting));
        }
        if let Some(conflicting) = overlap::find_conflict(
            tx,
            theirs.owner_id,
            mine.start_time,
            mine.end_time,
            Some(theirs.id),
        )? {
            return Err(overlap::conflict_error("the offered slot", &conflicting));
        }

        let now = Utc::now();
        let row = SwapRow {
            id: Uuid::new_v4().to_string(),
            requester_id: requester.to_string(),
            responder_id: their_row.owner_id.clone(),
            my_slot_id: my_row.id.clone(),
            their_slot_id: their_row.id.clone(),
            status: SwapStatus::Pending.as_str().to_string(),
            created_at: encode_ts(now),
            updated_at: encode_ts(now),
        };
        queries::insert_swap(tx, &row)?;
        queries::set_event_status(
            tx,
            &my_row.id,
            EventStatus::SwapPending.as_str(),
            &encode_ts(now),
        )?;
        queries::set_event_status(
            tx,
            &their_row.id,
            EventStatus::SwapPending.as_str(),
            &encode_ts(now),
        )?;

        info!("Swap {} requested ({} for {})", row.id, my_row.id, their_row.id);
        convert::swap_from_row(&row)
    })
}

pub fn respond_swap(
    db: &Database,
    responder: Uuid,
    swap_id: Uuid,
    accept: Option<bool>,
) -> DomainResult<Swap> {
    let accept = accept.ok_or_else(|| {
        DomainError::Validation("acceptance status is required".to_string())
    })?;

    db.with_tx(|tx| {
        let swap_row = queries::swap_by_id(tx, &swap_id.to_string())?
            .ok_or_else(|| DomainError::NotFound("swap not found".to_string()))?;
        let mut swap = convert::swap_from_row(&swap_row)?;

        if swap.status != SwapStatus::Pending {
            return Err(DomainError::Validation(
                "this swap has already been processed".to_string(),
            ));
        }
        if swap.responder_id != responder {
            return Err(DomainError::Forbidden(
                "you are not authorized to respond to this swap".to_string(),
            ));
        }

        let my_row = queries::event_by_id(tx, &swap_row.my_slot_id)?;
        let their_row = queries::event_by_id(tx, &swap_row.their_slot_id)?;
        let (my_row, their_row) = match (my_row, their_row) {
            (Some(mine), Some(theirs)) => (mine, theirs),
            _ => {
                return Err(DomainError::NotFound(
                    "one or both events no longer exist".to_string(),
                ));
            }
        };

        let mine = convert::event_from_row(&my_row)?;
        let theirs = convert::event_from_row(&their_row)?;

        // Either slot may have been pulled back (disable-swap) since the
        // request; the swap is then unservable.
        if mine.status != EventStatus::SwapPending {
            return Err(DomainError::Validation(
                "the requester's event is no longer locked for this swap".to_string(),
            ));
        }
        if theirs.status != EventStatus::SwapPending {
            return Err(DomainError::Validation(
                "your event is no longer locked for this swap".to_string(),
            ));
        }

        let now = Utc::now();
        if accept {
            // Re-validate both calendars: either may have gained events
            // since the request was made.
            if let Some(conflicting) = overlap::find_conflict(
                tx,
                responder,
                mine.start_time,
                mine.end_time,
                Some(theirs.id),
            )? {
                return Err(overlap::conflict_error(
                    "the slot you would take",
                    &conflicting,
                ));
            }
            if let Some(conflicting) = overlap::find_conflict(
                tx,
                swap.requester_id,
                theirs.start_time,
                theirs.end_time,
                Some(mine.id),
            )? {
                return Err(overlap::conflict_error(
                    "the slot they would take",
                    &conflicting,
                ));
            }

            queries::transfer_event(
                tx,
                &my_row.id,
                &swap_row.responder_id,
                EventStatus::Busy.as_str(),
                &encode_ts(now),
            )?;
            queries::transfer_event(
                tx,
                &their_row.id,
                &swap_row.requester_id,
                EventStatus::Busy.as_str(),
                &encode_ts(now),
            )?;
            queries::set_swap_status(
                tx,
                &swap_row.id,
                SwapStatus::Accepted.as_str(),
                &encode_ts(now),
            )?;
            swap.status = SwapStatus::Accepted;
            info!("Swap {} accepted", swap_row.id);
        } else {
            queries::set_swap_status(
                tx,
                &swap_row.id,
                SwapStatus::Rejected.as_str(),
                &encode_ts(now),
            )?;
            queries::set_event_status(
                tx,
                &my_row.id,
                EventStatus::Swappable.as_str(),
                &encode_ts(now),
            )?;
            queries::set_event_status(
                tx,
                &their_row.id,
                EventStatus::Swappable.as_str(),
                &encode_ts(now),
            )?;
            swap.status = SwapStatus::Rejected;
            info!("Swap {} rejected", swap_row.id);
        }

        swap.updated_at = now;
        Ok(swap)
    })
}

/// Swappable slots belonging to other users, owners redacted to public
/// display fields.
pub fn list_swappable(db: &Database, viewer: Uuid) -> DomainResult<Vec<SwappableSlot>> {
    let rows =
        db.with_conn(|conn| queries::swappable_events_excluding(conn, &viewer.to_string()))?;

    rows.iter()
        .map(|row| {
            Ok(SwappableSlot {
                event: convert::event_from_row(&row.event)?,
                owner: PublicUser {
                    id: convert::parse_id(&row.event.owner_id)?,
                    user_name: row.owner_name.clone(),
                },
            })
        })
        .collect()
}

pub fn list_incoming(db: &Database, viewer: Uuid) -> DomainResult<Vec<SwapDetails>> {
    swap_details(db, viewer, queries::swaps_by_responder)
}

pub fn list_outgoing(db: &Database, viewer: Uuid) -> DomainResult<Vec<SwapDetails>> {
    swap_details(db, viewer, queries::swaps_by_requester)
}

/// Fetch a viewer's swaps plus every referenced event and party in two
/// batch queries, then stitch the details together in memory.
fn swap_details<F>(db: &Database, viewer: Uuid, fetch: F) -> DomainResult<Vec<SwapDetails>>
where
    F: FnOnce(&Connection, &str) -> anyhow::Result<Vec<SwapRow>>,
{
    let (swap_rows, event_rows, user_rows) = db.with_conn(|conn| {
        let swaps = fetch(conn, &viewer.to_string())?;

        let event_ids: Vec<String> = swaps
            .iter()
            .flat_map(|s| [s.my_slot_id.clone(), s.their_slot_id.clone()])
            .collect();
        let user_ids: Vec<String> = swaps
            .iter()
            .flat_map(|s| [s.requester_id.clone(), s.responder_id.clone()])
            .collect();

        let events = queries::events_by_ids(conn, &event_ids)?;
        let users = queries::users_by_ids(conn, &user_ids)?;
        Ok((swaps, events, users))
    })?;

    let mut events: HashMap<String, Event> = HashMap::new();
    for row in &event_rows {
        events.insert(row.id.clone(), convert::event_from_row(row)?);
    }
    let mut users: HashMap<String, PublicUser> = HashMap::new();
    for row in &user_rows {
        users.insert(row.id.clone(), convert::public_user_from_row(row)?);
    }

    swap_rows
        .iter()
        .map(|row| {
            let swap = convert::swap_from_row(row)?;
            Ok(SwapDetails {
                id: swap.id,
                status: swap.status,
                // A slot deleted after the swap settled renders as null.
                my_slot: events.get(&row.my_slot_id).cloned(),
                their_slot: events.get(&row.their_slot_id).cloned(),
                requester: users
                    .get(&row.requester_id)
                    .cloned()
                    .ok_or_else(|| anyhow!("missing user {}", row.requester_id))?,
                responder: users
                    .get(&row.responder_id)
                    .cloned()
                    .ok_or_else(|| anyhow!("missing user {}", row.responder_id))?,
                created_at: swap.created_at,
                updated_at: swap.updated_at,
            })
        })
        .collect()
}
