use chrono::{DateTime, Duration, Utc};
use slotswap_db::Database;
use slotswap_db::models::{EventRow, UserRow, encode_ts};
use slotswap_db::queries;
use slotswap_types::models::EventStatus;
use uuid::Uuid;

pub(crate) fn test_db() -> Database {
    Database::open_in_memory().unwrap()
}

pub(crate) fn seed_user(db: &Database, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    let now = encode_ts(Utc::now());
    db.create_user(&UserRow {
        id: id.to_string(),
        user_name: name.to_string(),
        email: format!("{name}@example.com"),
        password: "hash".to_string(),
        refresh_token: None,
        created_at: now.clone(),
        updated_at: now,
    })
    .unwrap();
    id
}

pub(crate) fn hours_from_now(h: i64) -> DateTime<Utc> {
    Utc::now() + Duration::hours(h)
}

/// Insert an event row directly, bypassing domain validation. Lets tests
/// stage past intervals and arbitrary statuses.
pub(crate) fn insert_event_raw(
    db: &Database,
    owner: Uuid,
    title: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: EventStatus,
) -> Uuid {
    let id = Uuid::new_v4();
    let now = encode_ts(Utc::now());
    db.with_conn(|conn| {
        queries::insert_event(
            conn,
            &EventRow {
                id: id.to_string(),
                title: title.to_string(),
                start_time: encode_ts(start_time),
                end_time: encode_ts(end_time),
                owner_id: owner.to_string(),
                status: status.as_str().to_string(),
                created_at: now.clone(),
                updated_at: now.clone(),
            },
        )
    })
    .unwrap();
    id
}

pub(crate) fn set_status_raw(db: &Database, event_id: Uuid, status: EventStatus) {
    db.with_conn(|conn| {
        queries::set_event_status(
            conn,
            &event_id.to_string(),
            status.as_str(),
            &encode_ts(Utc::now()),
        )
    })
    .unwrap();
}
