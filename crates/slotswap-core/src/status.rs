use chrono::{DateTime, Utc};
use slotswap_types::models::EventStatus;

/// Time-based status transition for an event, if one applies at `now`.
///
/// An event whose window has started loses its swap availability (a slot in
/// progress can no longer change hands); one whose window has passed becomes
/// COMPLETED. COMPLETED is absorbing. Returns `None` when the status already
/// reflects the clock, which makes repeated application a no-op.
pub fn advanced_status(
    status: EventStatus,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<EventStatus> {
    if status == EventStatus::Completed {
        return None;
    }

    if start_time <= now
        && now < end_time
        && matches!(status, EventStatus::Swappable | EventStatus::SwapPending)
    {
        Some(EventStatus::Busy)
    } else if end_time < now
        && matches!(
            status,
            EventStatus::Swappable | EventStatus::SwapPending | EventStatus::Busy
        )
    {
        Some(EventStatus::Completed)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn future_events_keep_their_status() {
        for status in [
            EventStatus::Busy,
            EventStatus::Swappable,
            EventStatus::SwapPending,
        ] {
            assert_eq!(advanced_status(status, t(10), t(12), t(8)), None);
        }
    }

    #[test]
    fn in_progress_swappable_becomes_busy() {
        assert_eq!(
            advanced_status(EventStatus::Swappable, t(10), t(12), t(11)),
            Some(EventStatus::Busy)
        );
        assert_eq!(
            advanced_status(EventStatus::SwapPending, t(10), t(12), t(11)),
            Some(EventStatus::Busy)
        );
    }

    #[test]
    fn in_progress_busy_stays_busy() {
        assert_eq!(advanced_status(EventStatus::Busy, t(10), t(12), t(11)), None);
    }

    #[test]
    fn past_events_complete() {
        for status in [
            EventStatus::Busy,
            EventStatus::Swappable,
            EventStatus::SwapPending,
        ] {
            assert_eq!(
                advanced_status(status, t(10), t(12), t(13)),
                Some(EventStatus::Completed)
            );
        }
    }

    #[test]
    fn completed_is_absorbing() {
        assert_eq!(
            advanced_status(EventStatus::Completed, t(10), t(12), t(13)),
            None
        );
    }

    #[test]
    fn advancement_is_idempotent() {
        let cases = [
            (EventStatus::Swappable, t(11)),
            (EventStatus::SwapPending, t(11)),
            (EventStatus::Swappable, t(13)),
            (EventStatus::Busy, t(13)),
        ];
        for (status, now) in cases {
            let once = advanced_status(status, t(10), t(12), now).unwrap_or(status);
            let twice = advanced_status(once, t(10), t(12), now).unwrap_or(once);
            assert_eq!(once, twice);
        }
    }
}
