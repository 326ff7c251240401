/*! Browser family and local date-time. */

use std::fmt;
use std::sync::Arc;

use super::Condition;
use crate::clock::Clock;
use crate::platform::Dom;
use crate::types::{BrowserFamily, DateParts, DateTimeParts, Outcome, TimeParts, WebInfoSnapshot};

/// Reports the browser family and the current local date-time.
pub struct WebInfo {
  dom: Arc<dyn Dom>,
  clock: Arc<dyn Clock>,
}

impl fmt::Debug for WebInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WebInfo")
      .field("clock", &self.clock)
      .finish_non_exhaustive()
  }
}

impl WebInfo {
  /// Read the user agent from `dom` and the time from `clock`.
  pub fn new(dom: Arc<dyn Dom>, clock: Arc<dyn Clock>) -> Self {
    Self { dom, clock }
  }

  /// Browser family parsed from the user agent.
  pub fn browser(&self) -> BrowserFamily {
    BrowserFamily::detect(&self.dom.user_agent())
  }

  /// Current local date and time.
  pub fn date_time(&self) -> DateTimeParts {
    DateTimeParts::from(self.clock.now())
  }

  /// Today's date.
  pub fn date(&self) -> DateParts {
    self.date_time().date()
  }

  /// Current time of day.
  pub fn time(&self) -> TimeParts {
    self.date_time().time()
  }

  /// Browser and date-time together, as `check` reports them.
  pub fn snapshot(&self) -> WebInfoSnapshot {
    WebInfoSnapshot {
      browser: self.browser(),
      date_time: self.date_time(),
    }
  }
}

impl Condition for WebInfo {
  fn check(&self) -> Outcome {
    Outcome::Info(self.snapshot())
  }
}
