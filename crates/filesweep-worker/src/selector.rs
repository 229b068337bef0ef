//! Selects the records that are past the retention window.

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use filesweep_core::config::InvalidTimestampPolicy;
use filesweep_core::result::AppResult;
use filesweep_core::types::FileRecord;

/// Whether a record created at `created_at` is expired at `now`.
///
/// The boundary is inclusive: a record exactly `threshold` old is expired.
pub fn is_expired(created_at: DateTime<Utc>, now: DateTime<Utc>, threshold: Duration) -> bool {
    now - created_at >= threshold
}

/// Result of partitioning a listing.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Records to delete, in listing order.
    pub expired: Vec<FileRecord>,
    /// Number of records kept.
    pub retained: usize,
    /// IDs kept because their timestamp did not parse (skip policy only).
    pub unparsable: Vec<String>,
}

/// Partitions records by age.
#[derive(Debug, Clone, Copy)]
pub struct Selector {
    threshold: Duration,
    policy: InvalidTimestampPolicy,
}

impl Selector {
    /// Create a selector for a retention window.
    pub fn new(threshold: Duration, policy: InvalidTimestampPolicy) -> Self {
        Self { threshold, policy }
    }

    /// Retention window.
    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Partition `records` at `now`.
    ///
    /// Under [`InvalidTimestampPolicy::Abort`] the first malformed timestamp
    /// fails the whole selection.
    pub fn select(&self, records: Vec<FileRecord>, now: DateTime<Utc>) -> AppResult<Selection> {
        let mut selection = Selection::default();
        for record in records {
            let created_at = match record.created_at() {
                Ok(at) => at,
                Err(e) if self.policy == InvalidTimestampPolicy::Skip => {
                    warn!(record_id = %record.id, error = %e.message, "Keeping record with unparsable timestamp");
                    selection.unparsable.push(record.id);
                    selection.retained += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            if is_expired(created_at, now, self.threshold) {
                selection.expired.push(record);
            } else {
                selection.retained += 1;
            }
        }
        Ok(selection)
    }
}

/// Expired subset of `records` at `now`, aborting on a malformed timestamp.
pub fn select_expired(
    records: Vec<FileRecord>,
    now: DateTime<Utc>,
    threshold: Duration,
) -> AppResult<Vec<FileRecord>> {
    Selector::new(threshold, InvalidTimestampPolicy::Abort)
        .select(records, now)
        .map(|s| s.expired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use filesweep_core::error::ErrorKind;
    use filesweep_core::types::format_created_at;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn aged(id: &str, age: Duration) -> FileRecord {
        FileRecord::new(id, format_created_at(now() - age), "db", "col")
    }

    #[test]
    fn boundary_is_inclusive() {
        let six = Duration::hours(6);
        assert!(is_expired(now() - six, now(), six));
        assert!(!is_expired(now() - six + Duration::milliseconds(1), now(), six));
        assert!(is_expired(now() - Duration::hours(7), now(), six));
    }

    #[test]
    fn selects_only_old_records_in_order() {
        let records = vec![
            aged("a", Duration::hours(7)),
            aged("b", Duration::hours(1)),
            aged("c", Duration::hours(6)),
            aged("d", Duration::minutes(359)),
        ];
        let expired = select_expired(records, now(), Duration::hours(6)).unwrap();
        let ids: Vec<_> = expired.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn future_timestamps_are_retained() {
        let records = vec![aged("future", Duration::hours(-2))];
        let selection = Selector::new(Duration::hours(6), InvalidTimestampPolicy::Abort)
            .select(records, now())
            .unwrap();
        assert!(selection.expired.is_empty());
        assert_eq!(selection.retained, 1);
    }

    #[test]
    fn abort_policy_fails_on_first_bad_timestamp() {
        let records = vec![
            aged("a", Duration::hours(7)),
            FileRecord::new("bad", "yesterday", "db", "col"),
        ];
        let err = select_expired(records, now(), Duration::hours(6)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("yesterday"));
    }

    #[test]
    fn skip_policy_keeps_bad_records() {
        let records = vec![
            FileRecord::new("bad", "yesterday", "db", "col"),
            aged("a", Duration::hours(7)),
        ];
        let selection = Selector::new(Duration::hours(6), InvalidTimestampPolicy::Skip)
            .select(records, now())
            .unwrap();
        assert_eq!(selection.expired.len(), 1);
        assert_eq!(selection.unparsable, vec!["bad".to_string()]);
        assert_eq!(selection.retained, 1);
    }
}
