/*! Browser and wall-clock information reported by the web-info condition. */

use chrono::{Datelike, NaiveDateTime, Timelike};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Browser family detected from a user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display)]
#[ts(export)]
pub enum BrowserFamily {
  #[display("Microsoft Edge")]
  #[serde(rename = "Microsoft Edge")]
  Edge,
  #[display("Opera")]
  Opera,
  #[display("Chrome")]
  Chrome,
  #[display("Firefox")]
  Firefox,
  #[display("Safari")]
  Safari,
  #[display("Internet Explorer")]
  #[serde(rename = "Internet Explorer")]
  InternetExplorer,
  #[display("Unknown")]
  Unknown,
}

impl BrowserFamily {
  /// Classify a user-agent string.
  ///
  /// Chromium derivatives advertise `Chrome` too, so their own tokens are
  /// checked first. Chrome in turn advertises `Safari`.
  pub fn detect(user_agent: &str) -> Self {
    if user_agent.contains("Chrome") {
      if user_agent.contains("Edg") {
        return Self::Edge;
      }
      if user_agent.contains("OPR") {
        return Self::Opera;
      }
      return Self::Chrome;
    }

    if user_agent.contains("Firefox") {
      return Self::Firefox;
    }

    if user_agent.contains("Safari") {
      return Self::Safari;
    }

    if user_agent.contains("MSIE") || user_agent.contains("Trident") {
      return Self::InternetExplorer;
    }

    Self::Unknown
  }
}

/// Calendar date, month is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateParts {
  pub year: i32,
  pub month: u32,
  pub day: u32,
}

/// Wall-clock time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimeParts {
  #[serde(rename = "hour")]
  pub hours: u32,
  pub minutes: u32,
  pub seconds: u32,
  pub milliseconds: u32,
}

/// Full local date-time decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateTimeParts {
  pub year: i32,
  pub month: u32,
  pub day: u32,
  pub hours: u32,
  pub minutes: u32,
  pub seconds: u32,
  pub milliseconds: u32,
}

impl DateTimeParts {
  pub const fn date(&self) -> DateParts {
    DateParts {
      year: self.year,
      month: self.month,
      day: self.day,
    }
  }

  pub const fn time(&self) -> TimeParts {
    TimeParts {
      hours: self.hours,
      minutes: self.minutes,
      seconds: self.seconds,
      milliseconds: self.milliseconds,
    }
  }
}

impl From<NaiveDateTime> for DateTimeParts {
  fn from(dt: NaiveDateTime) -> Self {
    Self {
      year: dt.year(),
      month: dt.month(),
      day: dt.day(),
      hours: dt.hour(),
      minutes: dt.minute(),
      seconds: dt.second(),
      // Leap seconds report nanoseconds past 1e9
      milliseconds: (dt.nanosecond() / 1_000_000).min(999),
    }
  }
}

/// What the web-info condition reports on each check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WebInfoSnapshot {
  pub browser: BrowserFamily,
  #[serde(rename = "date")]
  pub date_time: DateTimeParts,
}


#[cfg(test)]
mod proptests {
  use super::*;
  use proptest::prelude::*;

  proptest! {
    /// Any agent mentioning Chrome and Edg resolves to Edge regardless of the rest.
    #[test]
    fn chrome_with_edg_is_edge(prefix in "[ -~]{0,40}", suffix in "[ -~]{0,40}") {
      let ua = format!("{prefix}Chrome/120 {suffix} Edg/120");
      prop_assert_eq!(BrowserFamily::detect(&ua), BrowserFamily::Edge);
    }

    /// Without any known token the agent is unknown.
    #[test]
    fn tokenless_agent_is_unknown(ua in "[a-z0-9 /;.()]{0,60}") {
      prop_assert_eq!(BrowserFamily::detect(&ua), BrowserFamily::Unknown);
    }
  }
}
