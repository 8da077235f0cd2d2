// Global daily generation quota with lazy day rollover

use crate::metrics;
use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;

struct DayCount {
    day: NaiveDate,
    count: u32,
}

/// Process-wide ceiling on external generations per calendar day (UTC).
///
/// The day comparison always happens before the count is read, so the
/// counter resets exactly once per observed day change and no timer task
/// is needed. Cache hits never consume quota.
pub struct QuotaGuard {
    state: Mutex<DayCount>,
    daily_limit: u32,
}

impl QuotaGuard {
    pub fn new(daily_limit: u32) -> Self {
        Self {
            state: Mutex::new(DayCount {
                day: Utc::now().date_naive(),
                count: 0,
            }),
            daily_limit,
        }
    }

    /// True while today's generation budget has headroom.
    pub fn check(&self) -> bool {
        self.check_on(Utc::now().date_naive())
    }

    fn check_on(&self, today: NaiveDate) -> bool {
        let mut state = self.state.lock();
        if state.day != today {
            state.day = today;
            state.count = 0;
            metrics::update_quota_used(0);
        }
        state.count < self.daily_limit
    }

    /// Count one successful external generation.
    pub fn record_usage(&self) {
        let mut state = self.state.lock();
        state.count += 1;
        metrics::update_quota_used(state.count);
    }

    /// `(used, limit)` snapshot for health reporting.
    pub fn usage(&self) -> (u32, u32) {
        let state = self.state.lock();
        (state.count, self.daily_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    #[test]
    fn test_exhausted_after_daily_limit() {
        let quota = QuotaGuard::new(3);
        let today = Utc::now().date_naive();

        for _ in 0..3 {
            assert!(quota.check_on(today));
            quota.record_usage();
        }
        assert!(!quota.check_on(today));
        assert_eq!(quota.usage(), (3, 3));
    }

    #[test]
    fn test_new_day_resets_regardless_of_prior_count() {
        let quota = QuotaGuard::new(1);
        let today = Utc::now().date_naive();
        quota.record_usage();
        assert!(!quota.check_on(today));

        let tomorrow = today.checked_add_days(Days::new(1)).unwrap();
        assert!(quota.check_on(tomorrow));
        assert_eq!(quota.usage(), (0, 1));
    }

    #[test]
    fn test_rollover_happens_once_per_day_change() {
        let quota = QuotaGuard::new(10);
        let today = Utc::now().date_naive();
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap();

        quota.record_usage();
        assert!(quota.check_on(tomorrow));
        quota.record_usage();
        // a second check on the same day must not reset again
        assert!(quota.check_on(tomorrow));
        assert_eq!(quota.usage(), (1, 10));
    }

    #[test]
    fn test_check_does_not_consume() {
        let quota = QuotaGuard::new(2);
        let today = Utc::now().date_naive();
        for _ in 0..5 {
            assert!(quota.check_on(today));
        }
        assert_eq!(quota.usage(), (0, 2));
    }
}
