use chrono::{DateTime, Utc};
use rusqlite::Connection;
use slotswap_db::queries;
use slotswap_types::models::{Event, EventStatus};
use uuid::Uuid;

use crate::convert;
use crate::error::{DomainError, DomainResult};
use crate::interval;

/// Scan `owner`'s non-COMPLETED events for one whose interval overlaps
/// `[start_time, end_time)`, skipping `exclude` if given. Returns the first
/// conflicting event; callers turn it into a `Conflict` error.
pub fn find_conflict(
    conn: &Connection,
    owner: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> DomainResult<Option<Event>> {
    let rows = queries::events_by_owner(conn, &owner.to_string())?;

    for row in &rows {
        let event = convert::event_from_row(row)?;
        if event.status == EventStatus::Completed {
            continue;
        }
        if Some(event.id) == exclude {
            continue;
        }
        if interval::overlaps(event.start_time, event.end_time, start_time, end_time) {
            return Ok(Some(event));
        }
    }

    Ok(None)
}

/// Conflict error naming the clashing event and its interval.
pub fn conflict_error(prefix: &str, conflicting: &Event) -> DomainError {
    DomainError::Conflict(format!(
        "{prefix} overlaps with \"{}\" ({} - {})",
        conflicting.title, conflicting.start_time, conflicting.end_time
    ))
}
