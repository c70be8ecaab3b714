//! Recency gate.

use crate::pool::FeedRecord;
use chrono::{DateTime, Duration, Utc};

/// Whether `record` may be scored in a run at `now`.
///
/// Never-included records are always eligible. A `last_included` in the
/// future is never eligible: the elapsed time is negative.
pub fn is_eligible(record: &FeedRecord, min_days: u32, now: DateTime<Utc>) -> bool {
    match record.last_included() {
        None => true,
        Some(last) => now.signed_duration_since(last.at()) >= Duration::days(i64::from(min_days)),
    }
}

/// Whole days until `record` becomes eligible, `0` if it already is.
///
/// Partial days round up, so `1` means "eligible within the next day".
pub fn days_until_eligible(record: &FeedRecord, min_days: u32, now: DateTime<Utc>) -> i64 {
    let Some(last) = record.last_included() else {
        return 0;
    };
    let gap = Duration::days(i64::from(min_days));
    let Some(eligible_at) = last.at().checked_add_signed(gap) else {
        return i64::from(min_days);
    };
    let remaining = eligible_at.signed_duration_since(now);
    if remaining <= Duration::zero() {
        return 0;
    }

    let whole = remaining.num_days();
    if remaining > Duration::days(whole) { whole + 1 } else { whole }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_never_included_is_eligible() {
        let record = FeedRecord::new("Fresh", 5.0);
        assert!(is_eligible(&record, 7, now()));
        assert!(is_eligible(&record, u32::MAX, now()));
        assert_eq!(days_until_eligible(&record, 7, now()), 0);
    }

    #[test]
    fn test_recent_inclusion_is_gated() {
        let record = FeedRecord::new("Recent", 5.0).included_at(now() - Duration::days(1));
        assert!(!is_eligible(&record, 7, now()));
        assert_eq!(days_until_eligible(&record, 7, now()), 6);
    }

    #[test]
    fn test_gap_is_inclusive() {
        let record = FeedRecord::new("Exact", 5.0).included_at(now() - Duration::days(7));
        assert!(is_eligible(&record, 7, now()));
        assert_eq!(days_until_eligible(&record, 7, now()), 0);

        let almost = FeedRecord::new("Almost", 5.0)
            .included_at(now() - Duration::days(7) + Duration::seconds(1));
        assert!(!is_eligible(&almost, 7, now()));
        assert_eq!(days_until_eligible(&almost, 7, now()), 1);
    }

    #[test]
    fn test_zero_gap_allows_same_instant() {
        let record = FeedRecord::new("Again", 5.0).included_at(now());
        assert!(is_eligible(&record, 0, now()));
    }

    #[test]
    fn test_future_stamp_is_never_eligible() {
        let record = FeedRecord::new("Future", 5.0).included_at(now() + Duration::hours(2));
        assert!(!is_eligible(&record, 0, now()));
        assert_eq!(days_until_eligible(&record, 0, now()), 1);
    }
}
