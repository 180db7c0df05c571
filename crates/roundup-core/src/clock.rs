//! Wall-clock access and the suspend-until primitive.
//!
//! The dispatcher never reads the system clock or sleeps directly; both go
//! through these traits so the decision logic stays independent of how the
//! wait is carried out.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::time::Duration;

/// Source of the current local date and time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The machine's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Blocks the calling thread.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Outcome of [`suspend_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// The target was already at or behind `now`.
    Elapsed,
    Slept(Duration),
}

/// Suspend until `target` on the clock's current day.
///
/// Returns immediately when the target time has passed.
pub fn suspend_until(clock: &dyn Clock, sleeper: &dyn Sleeper, target: NaiveTime) -> Wait {
    let now = clock.now();
    let target_at = now.date().and_time(target);
    match (target_at - now).to_std() {
        Ok(wait) if !wait.is_zero() => {
            tracing::info!(
                "waiting {:.2} hours until {}",
                wait.as_secs_f64() / 3600.0,
                target.format("%H:%M")
            );
            sleeper.sleep(wait);
            Wait::Slept(wait)
        }
        _ => {
            tracing::info!(
                "target time {} has already passed, proceeding immediately",
                target.format("%H:%M")
            );
            Wait::Elapsed
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records requested sleeps instead of blocking.
    #[derive(Default)]
    pub(crate) struct RecordingSleeper {
        pub(crate) slept: RefCell<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) {
            self.slept.borrow_mut().push(duration);
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn sleeps_until_target_later_today() {
        let sleeper = RecordingSleeper::default();
        let wait = suspend_until(
            &FixedClock(at(7, 30)),
            &sleeper,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        );
        assert_eq!(wait, Wait::Slept(Duration::from_secs(30 * 60)));
        assert_eq!(*sleeper.slept.borrow(), vec![Duration::from_secs(1800)]);
    }

    #[test]
    fn passed_target_proceeds_immediately() {
        let sleeper = RecordingSleeper::default();
        let wait = suspend_until(
            &FixedClock(at(9, 0)),
            &sleeper,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        );
        assert_eq!(wait, Wait::Elapsed);
        assert!(sleeper.slept.borrow().is_empty());
    }

    #[test]
    fn exact_target_does_not_sleep() {
        let sleeper = RecordingSleeper::default();
        let wait = suspend_until(
            &FixedClock(at(8, 0)),
            &sleeper,
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        );
        assert_eq!(wait, Wait::Elapsed);
    }

    #[test]
    fn fixed_clock_today() {
        assert_eq!(
            FixedClock(at(23, 59)).today(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
    }
}
