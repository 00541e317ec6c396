use chrono::{DateTime, Utc};

/// Half-open interval intersection: `[a_start, a_end)` overlaps
/// `[b_start, b_end)` iff each starts before the other ends. Adjacent
/// intervals sharing only a boundary instant do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 10, minute, 0).unwrap()
    }

    #[test]
    fn partial_overlap() {
        assert!(overlaps(t(10), t(20), t(15), t(25)));
    }

    #[test]
    fn containment_overlaps() {
        assert!(overlaps(t(10), t(40), t(20), t(30)));
        assert!(overlaps(t(20), t(30), t(10), t(40)));
    }

    #[test]
    fn identical_intervals_overlap() {
        assert!(overlaps(t(10), t(20), t(10), t(20)));
    }

    #[test]
    fn adjacent_intervals_do_not_overlap() {
        assert!(!overlaps(t(10), t(20), t(20), t(30)));
        assert!(!overlaps(t(20), t(30), t(10), t(20)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(t(10), t(20), t(30), t(40)));
    }

    #[test]
    fn symmetric_under_argument_swap() {
        let cases = [
            (t(10), t(20), t(15), t(25)),
            (t(10), t(20), t(20), t(30)),
            (t(0), t(5), t(50), t(55)),
        ];
        for (a, b, c, d) in cases {
            assert_eq!(overlaps(a, b, c, d), overlaps(c, d, a, b));
        }
    }
}
