use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, Mutex};

/// Source of "now" for everything day-sensitive
///
/// Swipe quotas and feed dedup both reset at a calendar-day boundary; the
/// boundary is pinned to UTC so the two can never disagree, and so a host
/// timezone change cannot shift it.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current calendar day, truncated in UTC
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock implementation used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
///
/// Lets tests cross day boundaries without sleeping.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::days(days);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_today_truncates_to_utc_day() {
        let late_evening = Utc.with_ymd_and_hms(2024, 3, 14, 23, 59, 59).unwrap();
        let clock = ManualClock::at(late_evening);

        assert_eq!(clock.today(), late_evening.date_naive());

        // One second later it is a different day
        clock.set(late_evening + chrono::Duration::seconds(1));
        assert_eq!(
            clock.today(),
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap().date_naive()
        );
    }

    #[test]
    fn test_advance_days() {
        let start = Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap();
        let clock = ManualClock::at(start);

        clock.advance_days(2);
        assert_eq!(clock.now(), start + chrono::Duration::days(2));
    }

    #[test]
    fn test_system_clock_is_utc() {
        let clock = SystemClock;
        let before = Utc::now();
        let now = clock.now();
        let after = Utc::now();

        assert!(now >= before && now <= after);
    }
}
