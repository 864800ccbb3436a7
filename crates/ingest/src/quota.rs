use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use glimpse_core::{DEFAULT_MAX_DAILY, OwnerId, UploadQuota, day_stamp, seconds_until_day_end};
use glimpse_state::{BoundedIncrement, Collection, DocKey, DocumentStore, StateError};

/// Outcome of a reservation attempt.
#[derive(Debug, Clone)]
pub enum QuotaDecision {
    /// A slot was taken; `quota` reflects the counter after the reserve.
    Reserved { quota: UploadQuota },
    /// The day's allowance is exhausted; nothing was written.
    Exhausted { quota: UploadQuota },
}

/// Enforces the per-user daily upload allowance.
///
/// Counters are keyed by owner and UTC calendar day and expire at the next
/// UTC midnight, so a new day starts from zero without any reset job. A
/// reservation is a single bounded increment in the store: the ceiling
/// check and the write are one atomic step, so concurrent uploads cannot
/// push the counter past the allowance.
#[derive(Clone)]
pub struct QuotaGate {
    store: Arc<dyn DocumentStore>,
    max_daily: u64,
}

impl QuotaGate {
    /// Create a gate with the default allowance of [`DEFAULT_MAX_DAILY`]
    /// uploads per day.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            max_daily: DEFAULT_MAX_DAILY,
        }
    }

    /// Override the daily allowance.
    #[must_use]
    pub fn with_max_daily(mut self, max_daily: u64) -> Self {
        self.max_daily = max_daily;
        self
    }

    /// The configured daily allowance.
    #[must_use]
    pub fn max_daily(&self) -> u64 {
        self.max_daily
    }

    fn counter_key(owner: &OwnerId, now: &DateTime<Utc>) -> DocKey {
        DocKey::new(Collection::UploadCounters, owner.clone(), day_stamp(now))
    }

    fn day_ttl(now: &DateTime<Utc>) -> Duration {
        Duration::from_secs(seconds_until_day_end(now))
    }

    /// Try to take one upload slot for `owner` on the day containing `now`.
    pub async fn reserve(
        &self,
        owner: &OwnerId,
        now: &DateTime<Utc>,
    ) -> Result<QuotaDecision, StateError> {
        let key = Self::counter_key(owner, now);
        let ceiling = i64::try_from(self.max_daily).unwrap_or(i64::MAX);
        let result = self
            .store
            .increment_below(&key, 1, ceiling, Some(Self::day_ttl(now)))
            .await?;

        let used = result.count().max(0).unsigned_abs();
        let quota = UploadQuota::for_day(owner.clone(), now, used, self.max_daily);
        debug!(owner = %owner, used, accepted = result.is_accepted(), "upload slot reservation");

        Ok(match result {
            BoundedIncrement::Accepted { .. } => QuotaDecision::Reserved { quota },
            BoundedIncrement::CeilingHit { .. } => QuotaDecision::Exhausted { quota },
        })
    }

    /// Return a slot taken by [`reserve`](Self::reserve) after a downstream
    /// failure, so the failed upload does not count against the allowance.
    pub async fn release(&self, owner: &OwnerId, now: &DateTime<Utc>) -> Result<(), StateError> {
        let key = Self::counter_key(owner, now);
        self.store
            .increment(&key, -1, Some(Self::day_ttl(now)))
            .await?;
        Ok(())
    }

    /// Read the current day's usage without reserving anything.
    pub async fn usage(
        &self,
        owner: &OwnerId,
        now: &DateTime<Utc>,
    ) -> Result<UploadQuota, StateError> {
        let key = Self::counter_key(owner, now);
        let used = match self.store.get(&key).await? {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|e| {
                    StateError::Serialization(format!("counter value is not a number: {e}"))
                })?
                .max(0)
                .unsigned_abs(),
            None => 0,
        };
        Ok(UploadQuota::for_day(owner.clone(), now, used, self.max_daily))
    }
}
