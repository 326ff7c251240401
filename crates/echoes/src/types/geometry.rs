/*! Geometry types for pointer, scroll and page measurements. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A 2D point in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }

  /// Position reported before any pointer movement was seen.
  pub const UNKNOWN: Self = Self::new(-1.0, -1.0);
}

/// Document scroll offset, vertical first.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct ScrollOffset {
  pub top: f64,
  pub left: f64,
}

impl ScrollOffset {
  pub const fn new(top: f64, left: f64) -> Self {
    Self { top, left }
  }

  /// Pick the first non-zero offset per axis.
  ///
  /// Browsers disagree on whether the root or the body carries the document
  /// scroll, so both are read and the root wins when it is non-zero.
  pub fn prefer_nonzero(root: Self, body: Self) -> Self {
    let pick = |a: f64, b: f64| if a == 0.0 { b } else { a };
    Self {
      top: pick(root.top, body.top),
      left: pick(root.left, body.left),
    }
  }
}

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, TS)]
#[ts(export)]
pub struct Size {
  pub width: f64,
  pub height: f64,
}

impl Size {
  pub const fn new(width: f64, height: f64) -> Self {
    Self { width, height }
  }
}

/// Box dimensions of a single node, as the three families the DOM exposes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxMetrics {
  pub scroll: Size,
  pub offset: Size,
  pub client: Size,
}

impl BoxMetrics {
  /// Largest width and height across all three families.
  pub fn max_extent(&self) -> Size {
    Size {
      width: self.scroll.width.max(self.offset.width).max(self.client.width),
      height: self
        .scroll
        .height
        .max(self.offset.height)
        .max(self.client.height),
    }
  }

  /// Component-wise maximum of two nodes' extents.
  pub fn document_extent(root: &Self, body: &Self) -> Size {
    let a = root.max_extent();
    let b = body.max_extent();
    Size::new(a.width.max(b.width), a.height.max(b.height))
  }
}
