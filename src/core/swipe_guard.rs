use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

use crate::core::clock::Clock;
use crate::models::{Swipe, SwipeDirection};

/// Result of the store's atomic append
#[derive(Debug, Clone)]
pub enum AppendOutcome {
    /// Row written; quota and uniqueness both held
    Inserted(Swipe),
    /// The swiper already has `quota` rows for this day; nothing written
    QuotaExhausted { swiped_today: u32 },
    /// A row for (swiper, profile, day) already exists; nothing written
    AlreadySwiped,
}

/// Atomic conditional append of a swipe row
///
/// Implementations must make the quota count and the insert a single
/// atomic step with respect to other appends by the same swiper, and must
/// enforce the one-row-per-(swiper, profile, day) invariant with a
/// uniqueness constraint rather than a separate read. Rejected attempts
/// write nothing and therefore never count toward the quota.
pub trait SwipeStore {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn append_swipe(
        &self,
        swiper_id: i64,
        profile_id: i64,
        direction: SwipeDirection,
        day: NaiveDate,
        quota: u32,
    ) -> Result<AppendOutcome, Self::Error>;
}

/// Rejection reasons for a swipe attempt
#[derive(Debug, Error)]
pub enum SwipeError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error("daily swipe limit exceeded")]
    DailyLimitExceeded,

    #[error("profile already swiped by the user today")]
    DuplicateSwipe,

    #[error(transparent)]
    Store(#[from] E),
}

/// Enforces the per-user daily quota and same-day duplicate rule before a
/// swipe is persisted
///
/// The quota check takes precedence: a user at quota is told so even for a
/// profile they already swiped.
pub struct SwipeGuard<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    daily_quota: u32,
}

impl<S> Clone for SwipeGuard<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
            daily_quota: self.daily_quota,
        }
    }
}

impl<S: SwipeStore> SwipeGuard<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, daily_quota: u32) -> Self {
        Self {
            store,
            clock,
            daily_quota,
        }
    }

    pub fn daily_quota(&self) -> u32 {
        self.daily_quota
    }

    /// Record a swipe, or reject it without writing anything
    pub async fn record_swipe(
        &self,
        swiper_id: i64,
        profile_id: i64,
        direction: SwipeDirection,
    ) -> Result<Swipe, SwipeError<S::Error>> {
        let day = self.clock.today();

        match self
            .store
            .append_swipe(swiper_id, profile_id, direction, day, self.daily_quota)
            .await?
        {
            AppendOutcome::Inserted(swipe) => {
                tracing::debug!(
                    "Recorded swipe: {} -> {} ({}) on {}",
                    swiper_id,
                    profile_id,
                    direction.as_str(),
                    day
                );
                Ok(swipe)
            }
            AppendOutcome::QuotaExhausted { swiped_today } => {
                tracing::info!(
                    "Swipe rejected for {}: {} swipes already today (quota {})",
                    swiper_id,
                    swiped_today,
                    self.daily_quota
                );
                Err(SwipeError::DailyLimitExceeded)
            }
            AppendOutcome::AlreadySwiped => {
                tracing::info!(
                    "Swipe rejected for {}: profile {} already swiped today",
                    swiper_id,
                    profile_id
                );
                Err(SwipeError::DuplicateSwipe)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::sync::Mutex;

    /// Map-backed store with the same atomicity contract as the SQL one
    #[derive(Default)]
    struct MemorySwipeStore {
        rows: Mutex<HashMap<(i64, i64, NaiveDate), SwipeDirection>>,
        next_id: Mutex<i64>,
    }

    impl SwipeStore for MemorySwipeStore {
        type Error = Infallible;

        async fn append_swipe(
            &self,
            swiper_id: i64,
            profile_id: i64,
            direction: SwipeDirection,
            day: NaiveDate,
            quota: u32,
        ) -> Result<AppendOutcome, Self::Error> {
            let mut rows = self.rows.lock().unwrap();

            let swiped_today = rows
                .keys()
                .filter(|(s, _, d)| *s == swiper_id && *d == day)
                .count() as u32;
            if swiped_today >= quota {
                return Ok(AppendOutcome::QuotaExhausted { swiped_today });
            }

            if rows.contains_key(&(swiper_id, profile_id, day)) {
                return Ok(AppendOutcome::AlreadySwiped);
            }

            rows.insert((swiper_id, profile_id, day), direction);
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;

            Ok(AppendOutcome::Inserted(Swipe {
                id: *next_id,
                swiper_id,
                profile_id,
                direction,
                swiped_at: day.and_hms_opt(12, 0, 0).unwrap().and_utc(),
                swipe_day: day,
            }))
        }
    }

    fn guard(quota: u32) -> (SwipeGuard<MemorySwipeStore>, ManualClock) {
        let clock = ManualClock::at(Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap());
        let guard = SwipeGuard::new(
            Arc::new(MemorySwipeStore::default()),
            Arc::new(clock.clone()),
            quota,
        );
        (guard, clock)
    }

    #[tokio::test]
    async fn test_swipe_recorded() {
        let (guard, _) = guard(10);

        let swipe = guard.record_swipe(1, 2, SwipeDirection::Like).await.unwrap();
        assert_eq!(swipe.swiper_id, 1);
        assert_eq!(swipe.profile_id, 2);
        assert_eq!(swipe.direction, SwipeDirection::Like);
    }

    #[tokio::test]
    async fn test_quota_enforced() {
        let (guard, _) = guard(10);

        for profile in 1..=10 {
            guard
                .record_swipe(1, 100 + profile, SwipeDirection::Like)
                .await
                .unwrap();
        }

        let err = guard
            .record_swipe(1, 999, SwipeDirection::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, SwipeError::DailyLimitExceeded));
    }

    #[tokio::test]
    async fn test_duplicate_rejected_regardless_of_direction() {
        let (guard, _) = guard(10);

        guard.record_swipe(1, 2, SwipeDirection::Like).await.unwrap();
        let err = guard
            .record_swipe(1, 2, SwipeDirection::Pass)
            .await
            .unwrap_err();
        assert!(matches!(err, SwipeError::DuplicateSwipe));
    }

    #[tokio::test]
    async fn test_quota_resets_next_day() {
        let (guard, clock) = guard(2);

        guard.record_swipe(1, 10, SwipeDirection::Like).await.unwrap();
        guard.record_swipe(1, 11, SwipeDirection::Pass).await.unwrap();
        assert!(guard.record_swipe(1, 12, SwipeDirection::Like).await.is_err());

        clock.advance_days(1);
        guard.record_swipe(1, 12, SwipeDirection::Like).await.unwrap();
    }

    #[tokio::test]
    async fn test_same_profile_allowed_next_day() {
        let (guard, clock) = guard(10);

        guard.record_swipe(1, 2, SwipeDirection::Like).await.unwrap();
        clock.advance_days(1);
        guard.record_swipe(1, 2, SwipeDirection::Pass).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_attempts_do_not_count() {
        let (guard, _) = guard(3);

        guard.record_swipe(1, 10, SwipeDirection::Like).await.unwrap();
        // Duplicate rejections are not persisted
        for _ in 0..5 {
            assert!(guard.record_swipe(1, 10, SwipeDirection::Like).await.is_err());
        }

        // Two slots must still be free
        guard.record_swipe(1, 11, SwipeDirection::Like).await.unwrap();
        guard.record_swipe(1, 12, SwipeDirection::Like).await.unwrap();
    }

    #[tokio::test]
    async fn test_quota_checked_before_duplicate() {
        let (guard, _) = guard(1);

        guard.record_swipe(1, 2, SwipeDirection::Like).await.unwrap();

        // Already swiped AND at quota: the quota rejection wins
        let err = guard
            .record_swipe(1, 2, SwipeDirection::Like)
            .await
            .unwrap_err();
        assert!(matches!(err, SwipeError::DailyLimitExceeded));
    }
}
