use crate::Database;
use crate::models::{EventRow, SwapRow, SwappableRow, UserRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use slotswap_types::models::{EventStatus, SwapStatus};

impl Database {
    // -- Users --

    pub fn create_user(&self, row: &UserRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, user_name, email, password, refresh_token, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    row.id,
                    row.user_name,
                    row.email,
                    row.password,
                    row.refresh_token,
                    row.created_at,
                    row.updated_at
                ],
            )?;
            Ok(())
        })
    }

    pub fn user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| user_by_email(conn, email))
    }

    pub fn user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| user_by_id(conn, id))
    }

    pub fn set_refresh_token(
        &self,
        id: &str,
        token: Option<&str>,
        updated_at: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET refresh_token = ?2, updated_at = ?3 WHERE id = ?1",
                rusqlite::params![id, token, updated_at],
            )?;
            Ok(())
        })
    }
}

const USER_COLUMNS: &str =
    "id, user_name, email, password, refresh_token, created_at, updated_at";
const EVENT_COLUMNS: &str =
    "id, title, start_time, end_time, owner_id, status, created_at, updated_at";
const SWAP_COLUMNS: &str =
    "id, requester_id, responder_id, my_slot_id, their_slot_id, status, created_at, updated_at";

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        user_name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        refresh_token: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn map_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        title: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        owner_id: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn map_swap(row: &rusqlite::Row<'_>) -> rusqlite::Result<SwapRow> {
    Ok(SwapRow {
        id: row.get(0)?,
        requester_id: row.get(1)?,
        responder_id: row.get(2)?,
        my_slot_id: row.get(3)?,
        their_slot_id: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// -- Users --

pub fn user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"))?;
    let row = stmt.query_row([email], map_user).optional()?;
    Ok(row)
}

pub fn user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
    let row = stmt.query_row([id], map_user).optional()?;
    Ok(row)
}

/// Batch-fetch users for a set of ids.
pub fn users_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<UserRow>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::types::ToSql> =
        ids.iter().map(|id| id as &dyn rusqlite::types::ToSql).collect();

    let rows = stmt
        .query_map(params.as_slice(), map_user)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

// -- Events --

pub fn insert_event(conn: &Connection, row: &EventRow) -> Result<()> {
    conn.execute(
        "INSERT INTO events (id, title, start_time, end_time, owner_id, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            row.id,
            row.title,
            row.start_time,
            row.end_time,
            row.owner_id,
            row.status,
            row.created_at,
            row.updated_at
        ],
    )?;
    Ok(())
}

pub fn event_by_id(conn: &Connection, id: &str) -> Result<Option<EventRow>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"))?;
    let row = stmt.query_row([id], map_event).optional()?;
    Ok(row)
}

pub fn events_by_owner(conn: &Connection, owner_id: &str) -> Result<Vec<EventRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE owner_id = ?1 ORDER BY start_time"
    ))?;
    let rows = stmt
        .query_map([owner_id], map_event)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn all_events(conn: &Connection) -> Result<Vec<EventRow>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY start_time"))?;
    let rows = stmt
        .query_map([], map_event)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Batch-fetch events for a set of ids.
pub fn events_by_ids(conn: &Connection, ids: &[String]) -> Result<Vec<EventRow>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE id IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::types::ToSql> =
        ids.iter().map(|id| id as &dyn rusqlite::types::ToSql).collect();

    let rows = stmt
        .query_map(params.as_slice(), map_event)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

pub fn update_event_fields(
    conn: &Connection,
    id: &str,
    title: &str,
    start_time: &str,
    end_time: &str,
    updated_at: &str,
) -> Result<()> {
    conn.execute(
        "UPDATE events SET title = ?2, start_time = ?3, end_time = ?4, updated_at = ?5
         WHERE id = ?1",
        rusqlite::params![id, title, start_time, end_time, updated_at],
    )?;
    Ok(())
}

pub fn set_event_status(
    conn: &Connection,
    id: &str,
    status: &str,
    updated_at: &str,
) -> Result<()> {
    conn.execute(
        "UPDATE events SET status = ?2, updated_at = ?3 WHERE id = ?1",
        rusqlite::params![id, status, updated_at],
    )?;
    Ok(())
}

/// Hand an event to a new owner, setting its status in the same write.
pub fn transfer_event(
    conn: &Connection,
    id: &str,
    new_owner_id: &str,
    status: &str,
    updated_at: &str,
) -> Result<()> {
    conn.execute(
        "UPDATE events SET owner_id = ?2, status = ?3, updated_at = ?4 WHERE id = ?1",
        rusqlite::params![id, new_owner_id, status, updated_at],
    )?;
    Ok(())
}

pub fn delete_event(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM events WHERE id = ?1", [id])?;
    Ok(())
}

/// Swappable events not owned by `viewer_id`, joined with the owner's
/// display name in a single query (eliminates N+1).
pub fn swappable_events_excluding(
    conn: &Connection,
    viewer_id: &str,
) -> Result<Vec<SwappableRow>> {
    let mut stmt = conn.prepare(
        "SELECT e.id, e.title, e.start_time, e.end_time, e.owner_id, e.status,
                e.created_at, e.updated_at, u.user_name
         FROM events e
         JOIN users u ON e.owner_id = u.id
         WHERE e.status = ?2 AND e.owner_id != ?1
         ORDER BY e.start_time",
    )?;

    let rows = stmt
        .query_map([viewer_id, EventStatus::Swappable.as_str()], |row| {
            Ok(SwappableRow {
                event: map_event(row)?,
                owner_name: row.get(8)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

// -- Swaps --

pub fn insert_swap(conn: &Connection, row: &SwapRow) -> Result<()> {
    conn.execute(
        "INSERT INTO swaps (id, requester_id, responder_id, my_slot_id, their_slot_id, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            row.id,
            row.requester_id,
            row.responder_id,
            row.my_slot_id,
            row.their_slot_id,
            row.status,
            row.created_at,
            row.updated_at
        ],
    )?;
    Ok(())
}

pub fn swap_by_id(conn: &Connection, id: &str) -> Result<Option<SwapRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {SWAP_COLUMNS} FROM swaps WHERE id = ?1"))?;
    let row = stmt.query_row([id], map_swap).optional()?;
    Ok(row)
}

/// The active swap linking this exact (my_slot, their_slot) pair, if any.
pub fn pending_swap_for_pair(
    conn: &Connection,
    my_slot_id: &str,
    their_slot_id: &str,
) -> Result<Option<SwapRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SWAP_COLUMNS} FROM swaps
         WHERE my_slot_id = ?1 AND their_slot_id = ?2 AND status = ?3"
    ))?;
    let row = stmt
        .query_row(
            [my_slot_id, their_slot_id, SwapStatus::Pending.as_str()],
            map_swap,
        )
        .optional()?;
    Ok(row)
}

pub fn set_swap_status(
    conn: &Connection,
    id: &str,
    status: &str,
    updated_at: &str,
) -> Result<()> {
    conn.execute(
        "UPDATE swaps SET status = ?2, updated_at = ?3 WHERE id = ?1",
        rusqlite::params![id, status, updated_at],
    )?;
    Ok(())
}

pub fn swaps_by_requester(conn: &Connection, user_id: &str) -> Result<Vec<SwapRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SWAP_COLUMNS} FROM swaps WHERE requester_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt
        .query_map([user_id], map_swap)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn swaps_by_responder(conn: &Connection, user_id: &str) -> Result<Vec<SwapRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SWAP_COLUMNS} FROM swaps WHERE responder_id = ?1 ORDER BY created_at DESC"
    ))?;
    let rows = stmt
        .query_map([user_id], map_swap)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
