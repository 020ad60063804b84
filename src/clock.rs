//! Wall-clock access and the per-day key used for dismissals.

use chrono::{Local, NaiveDateTime};

/// Source of "now" for evaluations. Local wall-clock time, no zone attached.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// The machine's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a single moment.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Day key for a moment (e.g., "2024-03-08"). Same calendar day, same key.
pub fn format_date(moment: NaiveDateTime) -> String {
    moment.format("%Y-%m-%d").to_string()
}
