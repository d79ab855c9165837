//! Time source for note timestamps.

use chrono::{DateTime, SubsecRound, Utc};

/// Supplies the current time to the repository.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time at microsecond precision, matching what the store keeps.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
