/*!
Inline colour conditions.

One type covers the four colour conditions. The mode decides the trigger:
`Changed` remembers the last value it saw (edge), `Equals` compares against a
fixed target (level).
*/

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use super::{attached, Condition};
use crate::platform::{Dom, StyleProperty};
use crate::types::{NodeId, Outcome, Trigger};

/// How a [`StyleCondition`] interprets the current value.
#[derive(Debug)]
pub enum StyleMode {
  /// True when the value differs from the last one seen.
  Changed {
    /// Value at the last check, or at construction.
    last_seen: Mutex<String>,
  },
  /// True while the value equals the target.
  Equals {
    /// Value compared against.
    target: String,
  },
}

/// Inline style watch on one element.
pub struct StyleCondition {
  dom: Arc<dyn Dom>,
  node: Option<NodeId>,
  property: StyleProperty,
  mode: StyleMode,
}

impl fmt::Debug for StyleCondition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StyleCondition")
      .field("node", &self.node)
      .field("property", &self.property)
      .field("mode", &self.mode)
      .finish_non_exhaustive()
  }
}

impl StyleCondition {
  /// Edge-triggered watch. The baseline is the value at construction.
  pub fn changed(dom: Arc<dyn Dom>, node: NodeId, property: StyleProperty) -> Self {
    let node = attached(dom.as_ref(), node);
    let baseline = node
      .map(|n| dom.inline_style(n, property))
      .unwrap_or_default();
    Self {
      dom,
      node,
      property,
      mode: StyleMode::Changed {
        last_seen: Mutex::new(baseline),
      },
    }
  }

  /// Level-triggered comparison against a fixed value.
  pub fn equals(
    dom: Arc<dyn Dom>,
    node: NodeId,
    property: StyleProperty,
    target: impl Into<String>,
  ) -> Self {
    let node = attached(dom.as_ref(), node);
    Self {
      dom,
      node,
      property,
      mode: StyleMode::Equals {
        target: target.into(),
      },
    }
  }

  /// Edge-triggered watch on `background-color`.
  pub fn background_color_changed(dom: Arc<dyn Dom>, node: NodeId) -> Self {
    Self::changed(dom, node, StyleProperty::BackgroundColor)
  }

  /// True while `background-color` equals `color`.
  pub fn background_color(dom: Arc<dyn Dom>, node: NodeId, color: impl Into<String>) -> Self {
    Self::equals(dom, node, StyleProperty::BackgroundColor, color)
  }

  /// Edge-triggered watch on `color`.
  pub fn text_color_changed(dom: Arc<dyn Dom>, node: NodeId) -> Self {
    Self::changed(dom, node, StyleProperty::Color)
  }

  /// True while the text colour equals `color`.
  pub fn text_color(dom: Arc<dyn Dom>, node: NodeId, color: impl Into<String>) -> Self {
    Self::equals(dom, node, StyleProperty::Color, color)
  }

  /// The watched property.
  pub const fn property(&self) -> StyleProperty {
    self.property
  }

  /// How the value is interpreted.
  pub const fn mode(&self) -> &StyleMode {
    &self.mode
  }

  /// Whether the element was in the document at construction.
  pub const fn is_attached(&self) -> bool {
    self.node.is_some()
  }
}

impl Condition for StyleCondition {
  fn check(&self) -> Outcome {
    let Some(node) = self.node else {
      return Outcome::NEUTRAL;
    };
    let current = self.dom.inline_style(node, self.property);

    match &self.mode {
      StyleMode::Changed { last_seen } => {
        let mut last = last_seen.lock();
        if *last == current {
          return Outcome::Flag(false);
        }
        *last = current;
        Outcome::Flag(true)
      }
      StyleMode::Equals { target } => Outcome::Flag(current == *target),
    }
  }

  fn trigger(&self) -> Trigger {
    match self.mode {
      StyleMode::Changed { .. } => Trigger::Edge,
      StyleMode::Equals { .. } => Trigger::Level,
    }
  }
}
