/*!
Polled conditions over document state.

Each condition wraps one DOM observation behind [`Condition::check`]. Checking
is read-and-update: edge-triggered conditions consume what they report, so
two consecutive checks can disagree.

| Type | Trigger | Reports |
|---|---|---|
| [`Hover`] | level | pointer over the element |
| [`Click`] | edge | one `true` per click |
| [`StyleCondition`] | edge (`*_changed`) / level (target value) | inline colour state |
| [`MousePosition`] | level | current pointer position |
| [`ScrollPosition`] | edge | new scroll offset, else `false` |
| [`TabFocus`] | level | window focus |
| [`PageSize`] | level | document extent |
| [`WebInfo`] | level | browser family and local date-time |

Conditions built over a node that is not attached to the document are
detached for good: they never install listeners and always report
[`Outcome::NEUTRAL`].
*/

mod element;
mod page;
mod pointer;
mod scroll;
mod style;
mod web_info;
mod window;

pub use element::{Click, Hover};
pub use page::PageSize;
pub use pointer::MousePosition;
pub use scroll::ScrollPosition;
pub(crate) use scroll::ScrollTracker;
pub use style::{StyleCondition, StyleMode};
pub use web_info::WebInfo;
pub use window::TabFocus;

use crate::platform::Dom;
use crate::types::{NodeId, Outcome, Trigger};

/// A polled predicate or observation tied to document state.
pub trait Condition: Send + Sync + 'static {
  /// Observe current state and report it, updating any edge state.
  fn check(&self) -> Outcome;

  /// Whether this condition is level- or edge-triggered.
  fn trigger(&self) -> Trigger {
    Trigger::Level
  }
}

/// Keep the node only if it is currently in the document.
fn attached(dom: &dyn Dom, node: NodeId) -> Option<NodeId> {
  dom.is_attached(node).then_some(node)
}
