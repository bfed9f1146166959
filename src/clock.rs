use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Source of the current time for time-gated registry operations.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle and give
/// another to the server.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn starting_now() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Move the clock forward. Past the end of representable time it stays put.
    pub fn advance(&self, seconds: u32) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(later) = now.checked_add_signed(Duration::seconds(i64::from(seconds))) {
            *now = later;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn system_clock_follows_wall_time() {
        let before = Utc::now();
        let now = SystemClock.now();
        assert!(before <= now && now <= Utc::now());
    }

    #[test]
    fn manual_clock_stands_still() {
        let clock = ManualClock::starting_now();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn clones_share_one_reading() {
        let clock = ManualClock::starting_now();
        let handle = clock.clone();
        let start = handle.now();

        clock.advance(90);
        assert_eq!(handle.now(), start + Duration::seconds(90));
        assert_eq!(handle.now(), clock.now());
    }

    #[test]
    fn advance_only_moves_forward() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let clock = ManualClock::starting_at(start);

        clock.advance(0);
        assert_eq!(clock.now(), start);

        let mut last = clock.now();
        for seconds in [1, 59, 3600, 604_800] {
            clock.advance(seconds);
            assert!(clock.now() > last);
            last = clock.now();
        }
        assert_eq!(last, start + Duration::seconds(1 + 59 + 3600 + 604_800));
    }

    #[test]
    fn advance_saturates_at_the_end_of_time() {
        let clock = ManualClock::starting_at(DateTime::<Utc>::MAX_UTC);
        clock.advance(10);
        assert_eq!(clock.now(), DateTime::<Utc>::MAX_UTC);
    }
}
