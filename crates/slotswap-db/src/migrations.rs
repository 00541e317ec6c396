use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              TEXT PRIMARY KEY,
            user_name       TEXT NOT NULL,
            email           TEXT NOT NULL UNIQUE,
            password        TEXT NOT NULL,
            refresh_token   TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS events (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            start_time  TEXT NOT NULL,
            end_time    TEXT NOT NULL,
            owner_id    TEXT NOT NULL REFERENCES users(id),
            status      TEXT NOT NULL DEFAULT 'BUSY',
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_owner
            ON events(owner_id, start_time);

        CREATE INDEX IF NOT EXISTS idx_events_status
            ON events(status);

        CREATE TABLE IF NOT EXISTS swaps (
            id              TEXT PRIMARY KEY,
            requester_id    TEXT NOT NULL REFERENCES users(id),
            responder_id    TEXT NOT NULL REFERENCES users(id),
            my_slot_id      TEXT NOT NULL,
            their_slot_id   TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'PENDING',
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_swaps_requester
            ON swaps(requester_id);

        CREATE INDEX IF NOT EXISTS idx_swaps_responder
            ON swaps(responder_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
