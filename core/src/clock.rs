//! Wall-clock source for report generation.
//!
//! The generator never calls `Local::now()` directly; it asks its clock.
//! Production wiring uses [`SystemClock`]; tests pin time with [`FixedClock`].

use chrono::{Local, NaiveDateTime};

pub trait Clock: Send + Sync {
    /// Current local time, without offset (reports are stamped in local time).
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: NaiveDateTime,
}

impl FixedClock {
    pub fn new(instant: NaiveDateTime) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.instant
    }
}
