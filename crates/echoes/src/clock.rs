/*! Wall-clock source for date and time reporting. */

use chrono::NaiveDateTime;
use std::fmt::Debug;

/// Source of the current local date and time.
pub trait Clock: Debug + Send + Sync + 'static {
  /// The current local date and time.
  fn now(&self) -> NaiveDateTime;
}

/// Local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> NaiveDateTime {
    chrono::Local::now().naive_local()
  }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
  fn now(&self) -> NaiveDateTime {
    self.0
  }
}
