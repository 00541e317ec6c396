//! Event lifecycle: creation, edits, deletion, swap-eligibility toggles,
//! and the lazy status-advancement pass applied on list reads.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use slotswap_db::models::{EventRow, encode_ts};
use slotswap_db::{Database, queries};
use slotswap_types::models::{Event, EventStatus};
use uuid::Uuid;

use crate::convert;
use crate::error::{DomainError, DomainResult};
use crate::overlap;
use crate::status;

#[derive(Debug, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl EventPatch {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.start_time.is_none() && self.end_time.is_none()
    }
}

pub fn create_event(
    db: &Database,
    owner: Uuid,
    title: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> DomainResult<Event> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("title is required".to_string()));
    }
    if start_time >= end_time {
        return Err(DomainError::Validation(
            "start time must be before end time".to_string(),
        ));
    }
    let now = Utc::now();
    if start_time <= now || end_time <= now {
        return Err(DomainError::Validation(
            "cannot create an event in the past".to_string(),
        ));
    }

    db.with_tx(|tx| {
        if let Some(conflicting) = overlap::find_conflict(tx, owner, start_time, end_time, None)? {
            return Err(overlap::conflict_error("event", &conflicting));
        }

        let row = EventRow {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            start_time: encode_ts(start_time),
            end_time: encode_ts(end_time),
            owner_id: owner.to_string(),
            status: EventStatus::Busy.as_str().to_string(),
            created_at: encode_ts(now),
            updated_at: encode_ts(now),
        };
        queries::insert_event(tx, &row)?;

        convert::event_from_row(&row)
    })
}

pub fn update_event(
    db: &Database,
    event_id: Uuid,
    owner: Uuid,
    patch: EventPatch,
) -> DomainResult<Event> {
    if patch.is_empty() {
        return Err(DomainError::Validation(
            "at least one field is required".to_string(),
        ));
    }
    if let (Some(start), Some(end)) = (patch.start_time, patch.end_time) {
        if start >= end {
            return Err(DomainError::Validation(
                "start time must be before end time".to_string(),
            ));
        }
    }
    let now = Utc::now();
    if patch.start_time.is_some_and(|t| t < now) || patch.end_time.is_some_and(|t| t < now) {
        return Err(DomainError::Validation(
            "cannot move an event into the past".to_string(),
        ));
    }

    db.with_tx(|tx| {
        let mut event = fetch_owned_event(tx, event_id, owner, "update")?;

        // A lone bound is validated against the stored other bound before
        // the interval is merged.
        if let (Some(start), None) = (patch.start_time, patch.end_time) {
            if start >= event.end_time {
                return Err(DomainError::Validation(
                    "start time must stay before the current end time".to_string(),
                ));
            }
        }
        if let (None, Some(end)) = (patch.start_time, patch.end_time) {
            if end <= event.start_time {
                return Err(DomainError::Validation(
                    "end time must stay after the current start time".to_string(),
                ));
            }
        }

        let new_start = patch.start_time.unwrap_or(event.start_time);
        let new_end = patch.end_time.unwrap_or(event.end_time);

        if let Some(conflicting) =
            overlap::find_conflict(tx, owner, new_start, new_end, Some(event.id))?
        {
            return Err(overlap::conflict_error("event", &conflicting));
        }

        if let Some(title) = patch.title {
            event.title = title;
        }
        event.start_time = new_start;
        event.end_time = new_end;
        event.updated_at = now;

        queries::update_event_fields(
            tx,
            &event.id.to_string(),
            &event.title,
            &encode_ts(new_start),
            &encode_ts(new_end),
            &encode_ts(now),
        )?;

        Ok(event)
    })
}

pub fn delete_event(db: &Database, event_id: Uuid, owner: Uuid) -> DomainResult<Event> {
    db.with_tx(|tx| {
        let event = fetch_owned_event(tx, event_id, owner, "delete")?;

        if event.status == EventStatus::SwapPending {
            return Err(DomainError::Validation(
                "event is locked by a pending swap".to_string(),
            ));
        }

        queries::delete_event(tx, &event.id.to_string())?;
        Ok(event)
    })
}

/// The caller's events, statuses advanced to reflect the clock.
pub fn list_own_events(db: &Database, owner: Uuid) -> DomainResult<Vec<Event>> {
    db.with_tx(|tx| {
        let rows = queries::events_by_owner(tx, &owner.to_string())?;
        advance_rows(tx, &rows)
    })
}

pub fn list_all_events(db: &Database) -> DomainResult<Vec<Event>> {
    db.with_tx(|tx| {
        let rows = queries::all_events(tx)?;
        advance_rows(tx, &rows)
    })
}

pub fn enable_swap(db: &Database, event_id: Uuid, owner: Uuid) -> DomainResult<Event> {
    db.with_tx(|tx| {
        let mut event = fetch_owned_event(tx, event_id, owner, "update")?;

        if event.status != EventStatus::Busy {
            return Err(DomainError::Validation("event is not busy".to_string()));
        }

        set_status(tx, &mut event, EventStatus::Swappable)?;
        Ok(event)
    })
}

pub fn disable_swap(db: &Database, event_id: Uuid, owner: Uuid) -> DomainResult<Event> {
    db.with_tx(|tx| {
        let mut event = fetch_owned_event(tx, event_id, owner, "update")?;

        match event.status {
            EventStatus::Swappable | EventStatus::SwapPending => {
                set_status(tx, &mut event, EventStatus::Busy)?;
                Ok(event)
            }
            EventStatus::Completed => Err(DomainError::Validation(
                "event is already completed".to_string(),
            )),
            EventStatus::Busy => Err(DomainError::Validation(
                "event is already busy".to_string(),
            )),
        }
    })
}

/// Fetch an event and require that `owner` owns it.
pub(crate) fn fetch_owned_event(
    conn: &Connection,
    event_id: Uuid,
    owner: Uuid,
    action: &str,
) -> DomainResult<Event> {
    let row = queries::event_by_id(conn, &event_id.to_string())?
        .ok_or_else(|| DomainError::NotFound("event not found".to_string()))?;
    let event = convert::event_from_row(&row)?;

    if event.owner_id != owner {
        return Err(DomainError::Forbidden(format!(
            "you are not authorized to {action} this event"
        )));
    }

    Ok(event)
}

fn set_status(conn: &Connection, event: &mut Event, next: EventStatus) -> DomainResult<()> {
    let now = Utc::now();
    queries::set_event_status(conn, &event.id.to_string(), next.as_str(), &encode_ts(now))?;
    event.status = next;
    event.updated_at = now;
    Ok(())
}

/// Apply the time-based status pass to every row, persisting changes.
/// Idempotent: rows already reflecting the clock are untouched.
fn advance_rows(conn: &Connection, rows: &[EventRow]) -> DomainResult<Vec<Event>> {
    let now = Utc::now();
    let mut events = Vec::with_capacity(rows.len());

    for row in rows {
        let mut event = convert::event_from_row(row)?;
        if let Some(next) =
            status::advanced_status(event.status, event.start_time, event.end_time, now)
        {
            queries::set_event_status(conn, &row.id, next.as_str(), &encode_ts(now))?;
            event.status = next;
            event.updated_at = now;
        }
        events.push(event);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{hours_from_now, insert_event_raw, seed_user, set_status_raw, test_db};
    use chrono::Duration;

    #[test]
    fn create_inserts_busy_event() {
        let db = test_db();
        let owner = seed_user(&db, "ann");

        let event =
            create_event(&db, owner, "standup", hours_from_now(1), hours_from_now(2)).unwrap();

        assert_eq!(event.status, EventStatus::Busy);
        assert_eq!(event.title, "standup");
        assert_eq!(event.owner_id, owner);
    }

    #[test]
    fn create_rejects_empty_title() {
        let db = test_db();
        let owner = seed_user(&db, "ann");

        let err = create_event(&db, owner, "  ", hours_from_now(1), hours_from_now(2))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_equal_bounds() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let t = hours_from_now(1);

        let err = create_event(&db, owner, "standup", t, t).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_past_interval() {
        let db = test_db();
        let owner = seed_user(&db, "ann");

        let err = create_event(&db, owner, "standup", hours_from_now(-2), hours_from_now(-1))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_overlap_with_own_event() {
        let db = test_db();
        let owner = seed_user(&db, "ann");

        create_event(&db, owner, "first", hours_from_now(1), hours_from_now(3)).unwrap();
        let err = create_event(&db, owner, "second", hours_from_now(2), hours_from_now(4))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn create_allows_adjacent_intervals() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let boundary = hours_from_now(3);

        create_event(&db, owner, "first", hours_from_now(1), boundary).unwrap();
        create_event(&db, owner, "second", boundary, hours_from_now(5)).unwrap();
    }

    #[test]
    fn overlap_does_not_cross_owners() {
        let db = test_db();
        let ann = seed_user(&db, "ann");
        let bob = seed_user(&db, "bob");

        create_event(&db, ann, "ann's", hours_from_now(1), hours_from_now(3)).unwrap();
        create_event(&db, bob, "bob's", hours_from_now(1), hours_from_now(3)).unwrap();
    }

    #[test]
    fn update_requires_some_field() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let event =
            create_event(&db, owner, "standup", hours_from_now(1), hours_from_now(2)).unwrap();

        let err = update_event(&db, event.id, owner, EventPatch::default()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn update_lone_start_checked_against_stored_end() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let event =
            create_event(&db, owner, "standup", hours_from_now(1), hours_from_now(2)).unwrap();

        let patch = EventPatch {
            start_time: Some(hours_from_now(3)),
            ..EventPatch::default()
        };
        let err = update_event(&db, event.id, owner, patch).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn update_moves_whole_window() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let event =
            create_event(&db, owner, "standup", hours_from_now(1), hours_from_now(2)).unwrap();

        let patch = EventPatch {
            start_time: Some(hours_from_now(5)),
            end_time: Some(hours_from_now(6)),
            ..EventPatch::default()
        };
        let updated = update_event(&db, event.id, owner, patch).unwrap();
        assert!(updated.start_time > event.start_time);
    }

    #[test]
    fn update_rejects_non_owner() {
        let db = test_db();
        let ann = seed_user(&db, "ann");
        let bob = seed_user(&db, "bob");
        let event =
            create_event(&db, ann, "standup", hours_from_now(1), hours_from_now(2)).unwrap();

        let patch = EventPatch {
            title: Some("hijacked".to_string()),
            ..EventPatch::default()
        };
        let err = update_event(&db, event.id, bob, patch).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[test]
    fn update_overlap_excludes_self() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let event =
            create_event(&db, owner, "standup", hours_from_now(1), hours_from_now(2)).unwrap();

        // Growing the event within its own window must not conflict with itself.
        let patch = EventPatch {
            end_time: Some(hours_from_now(2) + Duration::minutes(30)),
            ..EventPatch::default()
        };
        update_event(&db, event.id, owner, patch).unwrap();
    }

    #[test]
    fn enable_swap_on_busy_event() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let event =
            create_event(&db, owner, "standup", hours_from_now(1), hours_from_now(2)).unwrap();

        let updated = enable_swap(&db, event.id, owner).unwrap();
        assert_eq!(updated.status, EventStatus::Swappable);

        let err = enable_swap(&db, event.id, owner).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn enable_swap_on_completed_event_fails() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let event =
            create_event(&db, owner, "standup", hours_from_now(1), hours_from_now(2)).unwrap();
        set_status_raw(&db, event.id, EventStatus::Completed);

        let err = enable_swap(&db, event.id, owner).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn disable_swap_transitions_and_errors() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let event =
            create_event(&db, owner, "standup", hours_from_now(1), hours_from_now(2)).unwrap();

        enable_swap(&db, event.id, owner).unwrap();
        let updated = disable_swap(&db, event.id, owner).unwrap();
        assert_eq!(updated.status, EventStatus::Busy);

        let err = disable_swap(&db, event.id, owner).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref msg) if msg.contains("busy")));

        set_status_raw(&db, event.id, EventStatus::Completed);
        let err = disable_swap(&db, event.id, owner).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref msg) if msg.contains("completed")));
    }

    #[test]
    fn delete_returns_event_and_removes_row() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let event =
            create_event(&db, owner, "standup", hours_from_now(1), hours_from_now(2)).unwrap();

        let deleted = delete_event(&db, event.id, owner).unwrap();
        assert_eq!(deleted.id, event.id);

        let err = delete_event(&db, event.id, owner).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn delete_rejects_swap_locked_event() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        let event =
            create_event(&db, owner, "standup", hours_from_now(1), hours_from_now(2)).unwrap();
        set_status_raw(&db, event.id, EventStatus::SwapPending);

        let err = delete_event(&db, event.id, owner).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn listing_advances_past_events_to_completed() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        insert_event_raw(
            &db,
            owner,
            "yesterday",
            hours_from_now(-3),
            hours_from_now(-2),
            EventStatus::Swappable,
        );

        let events = list_own_events(&db, owner).unwrap();
        assert_eq!(events[0].status, EventStatus::Completed);

        // Second pass is a no-op.
        let events = list_own_events(&db, owner).unwrap();
        assert_eq!(events[0].status, EventStatus::Completed);
    }

    #[test]
    fn listing_advances_in_progress_swappable_to_busy() {
        let db = test_db();
        let owner = seed_user(&db, "ann");
        insert_event_raw(
            &db,
            owner,
            "happening now",
            hours_from_now(-1),
            hours_from_now(1),
            EventStatus::SwapPending,
        );

        let events = list_own_events(&db, owner).unwrap();
        assert_eq!(events[0].status, EventStatus::Busy);
    }

    #[test]
    fn list_all_events_spans_owners() {
        let db = test_db();
        let ann = seed_user(&db, "ann");
        let bob = seed_user(&db, "bob");
        create_event(&db, ann, "ann's", hours_from_now(1), hours_from_now(2)).unwrap();
        create_event(&db, bob, "bob's", hours_from_now(3), hours_from_now(4)).unwrap();

        let events = list_all_events(&db).unwrap();
        assert_eq!(events.len(), 2);
    }
}
