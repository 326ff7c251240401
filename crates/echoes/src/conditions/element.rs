/*! Pointer interaction with a single element: hover and click. */

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{attached, Condition};
use crate::platform::{Dom, DomEvent, DomEventKind, EventTarget};
use crate::types::{NodeId, Outcome, Trigger};

/// True while the pointer is over the element or one of its descendants.
pub struct Hover {
  dom: Arc<dyn Dom>,
  node: Option<NodeId>,
}

impl fmt::Debug for Hover {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Hover")
      .field("node", &self.node)
      .finish_non_exhaustive()
  }
}

impl Hover {
  /// Watch `node`. A node outside the document yields a detached condition.
  pub fn new(dom: Arc<dyn Dom>, node: NodeId) -> Self {
    let node = attached(dom.as_ref(), node);
    Self { dom, node }
  }

  /// Whether the element was in the document at construction.
  pub const fn is_attached(&self) -> bool {
    self.node.is_some()
  }
}

impl Condition for Hover {
  fn check(&self) -> Outcome {
    self
      .node
      .is_some_and(|node| self.dom.matches_hover(node))
      .into()
  }
}

/// True exactly once per click on the element.
#[derive(Debug)]
pub struct Click {
  clicked: Arc<AtomicBool>,
  attached: bool,
}

impl Click {
  /// Listen for clicks on `node`. Nothing is installed for a detached node.
  pub fn new(dom: &Arc<dyn Dom>, node: NodeId) -> Self {
    let clicked = Arc::new(AtomicBool::new(false));
    let Some(node) = attached(dom.as_ref(), node) else {
      return Self {
        clicked,
        attached: false,
      };
    };

    let flag = Arc::clone(&clicked);
    dom.add_listener(
      EventTarget::Node(node),
      DomEventKind::Click,
      Arc::new(move |_: &DomEvent| flag.store(true, Ordering::SeqCst)),
    );

    Self {
      clicked,
      attached: true,
    }
  }

  /// Whether the click listener was installed.
  pub const fn is_attached(&self) -> bool {
    self.attached
  }
}

impl Condition for Click {
  fn check(&self) -> Outcome {
    self.clicked.swap(false, Ordering::SeqCst).into()
  }

  fn trigger(&self) -> Trigger {
    Trigger::Edge
  }
}
