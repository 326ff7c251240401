/*! What a condition reports when checked. */

use super::{Point, ScrollOffset, Size, WebInfoSnapshot};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How a condition turns observed state into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Trigger {
  /// True for as long as the underlying state holds.
  Level,
  /// True for exactly one check per transition, then resets.
  Edge,
}

/// Result of checking a condition.
///
/// Simple predicates report a [`Outcome::Flag`]. Observational conditions
/// report a value, or `Flag(false)` when there is nothing new to report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
#[ts(export)]
pub enum Outcome {
  Flag(bool),
  Position(Point),
  Scroll(ScrollOffset),
  Size(Size),
  Info(WebInfoSnapshot),
}

impl Outcome {
  /// The neutral result every detached condition reports.
  pub const NEUTRAL: Self = Self::Flag(false);

  /// Whether a host script would treat this result as true.
  pub const fn is_truthy(&self) -> bool {
    match self {
      Self::Flag(value) => *value,
      Self::Position(_) | Self::Scroll(_) | Self::Size(_) | Self::Info(_) => true,
    }
  }

  pub const fn as_flag(&self) -> Option<bool> {
    match self {
      Self::Flag(value) => Some(*value),
      Self::Position(_) | Self::Scroll(_) | Self::Size(_) | Self::Info(_) => None,
    }
  }

  pub const fn as_position(&self) -> Option<Point> {
    match self {
      Self::Position(p) => Some(*p),
      Self::Flag(_) | Self::Scroll(_) | Self::Size(_) | Self::Info(_) => None,
    }
  }

  pub const fn as_scroll(&self) -> Option<ScrollOffset> {
    match self {
      Self::Scroll(s) => Some(*s),
      Self::Flag(_) | Self::Position(_) | Self::Size(_) | Self::Info(_) => None,
    }
  }

  pub const fn as_size(&self) -> Option<Size> {
    match self {
      Self::Size(s) => Some(*s),
      Self::Flag(_) | Self::Position(_) | Self::Scroll(_) | Self::Info(_) => None,
    }
  }

  pub const fn as_info(&self) -> Option<WebInfoSnapshot> {
    match self {
      Self::Info(info) => Some(*info),
      Self::Flag(_) | Self::Position(_) | Self::Scroll(_) | Self::Size(_) => None,
    }
  }

  /// JSON value handed across to host script.
  pub fn to_json(&self) -> serde_json::Value {
    serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
  }
}

impl From<bool> for Outcome {
  fn from(value: bool) -> Self {
    Self::Flag(value)
  }
}

impl From<Option<ScrollOffset>> for Outcome {
  fn from(value: Option<ScrollOffset>) -> Self {
    value.map_or(Self::NEUTRAL, Self::Scroll)
  }
}
