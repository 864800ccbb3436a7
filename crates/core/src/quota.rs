use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::OwnerId;

/// Default per-user daily upload allowance.
pub const DEFAULT_MAX_DAILY: u64 = 10;

/// A snapshot of one user's upload quota for a single UTC calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UploadQuota {
    /// User the quota applies to.
    pub owner: OwnerId,
    /// UTC calendar day the counter covers, `YYYY-MM-DD`.
    pub date: String,
    /// Uploads consumed so far today.
    pub used: u64,
    /// Maximum uploads allowed per day.
    pub max_daily: u64,
    /// Uploads left today.
    pub remaining: u64,
    /// When the counter rolls over to a fresh day (next UTC midnight).
    pub resets_at: DateTime<Utc>,
}

impl UploadQuota {
    /// Build a snapshot for the day containing `now`.
    ///
    /// `remaining` saturates at zero so a counter that somehow exceeded the
    /// ceiling still reports sensibly.
    #[must_use]
    pub fn for_day(owner: impl Into<OwnerId>, now: &DateTime<Utc>, used: u64, max_daily: u64) -> Self {
        Self {
            owner: owner.into(),
            date: day_stamp(now),
            used,
            max_daily,
            remaining: max_daily.saturating_sub(used),
            resets_at: next_day_start(now),
        }
    }

    /// Whether another upload would be allowed right now.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.remaining > 0
    }
}

/// Format the UTC calendar day of `now` as `YYYY-MM-DD`.
///
/// Daily counters embed this stamp in their document id, which is what
/// implements the lazy reset: a new day reads a fresh key (count zero)
/// without any scheduled job, and stale-day counters expire via TTL.
#[must_use]
pub fn day_stamp(now: &DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// First instant of the UTC day after the one containing `now`.
#[must_use]
pub fn next_day_start(now: &DateTime<Utc>) -> DateTime<Utc> {
    let day = now.date_naive() + chrono::Days::new(1);
    day.and_hms_opt(0, 0, 0)
        .map_or_else(|| *now + Duration::days(1), |dt| dt.and_utc())
}

/// Seconds from `now` until the next UTC midnight, used as the TTL for a
/// daily counter so expired days clean themselves up.
#[must_use]
pub fn seconds_until_day_end(now: &DateTime<Utc>) -> u64 {
    let remaining = next_day_start(now).signed_duration_since(*now);
    remaining.num_seconds().max(1).unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn day_stamp_format() {
        assert_eq!(day_stamp(&at("2026-02-10T14:30:00Z")), "2026-02-10");
    }

    #[test]
    fn day_stamp_rolls_over_at_midnight() {
        let before = day_stamp(&at("2026-02-10T23:59:59Z"));
        let after = day_stamp(&at("2026-02-11T00:00:00Z"));
        assert_ne!(before, after);
    }

    #[test]
    fn next_day_start_is_midnight() {
        let next = next_day_start(&at("2026-02-10T14:30:00Z"));
        assert_eq!(next, at("2026-02-11T00:00:00Z"));
    }

    #[test]
    fn seconds_until_day_end_counts_down() {
        assert_eq!(seconds_until_day_end(&at("2026-02-10T23:59:30Z")), 30);
        assert_eq!(seconds_until_day_end(&at("2026-02-10T00:00:00Z")), 86_400);
    }

    #[test]
    fn snapshot_remaining() {
        let now = at("2026-02-10T12:00:00Z");
        let quota = UploadQuota::for_day("user-1", &now, 9, 10);
        assert_eq!(quota.remaining, 1);
        assert!(quota.has_remaining());
        assert_eq!(quota.date, "2026-02-10");
        assert_eq!(quota.resets_at, at("2026-02-11T00:00:00Z"));
    }

    #[test]
    fn snapshot_remaining_saturates() {
        let now = Utc::now();
        let quota = UploadQuota::for_day("user-1", &now, 12, 10);
        assert_eq!(quota.remaining, 0);
        assert!(!quota.has_remaining());
    }

    #[test]
    fn snapshot_serde_roundtrip() {
        let quota = UploadQuota::for_day("user-2", &Utc::now(), 3, 10);
        let json = serde_json::to_string(&quota).unwrap();
        let back: UploadQuota = serde_json::from_str(&json).unwrap();
        assert_eq!(back.used, 3);
        assert_eq!(back.max_daily, 10);
        assert_eq!(back.remaining, 7);
    }
}
