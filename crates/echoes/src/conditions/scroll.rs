/*!
Document scroll position.

All [`ScrollPosition`] instances of a context read one shared snapshot, fed by
a single `scroll` listener that is installed when the first instance is built.
Each instance keeps its own last-seen offset, so every instance consumes a
scroll independently.
*/

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::Condition;
use crate::platform::{Dom, DomEvent, DomEventKind, EventTarget};
use crate::types::{NodeId, Outcome, ScrollOffset, Trigger};

/// Shared scroll snapshot owned by a context.
#[derive(Debug, Default)]
pub(crate) struct ScrollTracker {
  value: Mutex<ScrollOffset>,
  installed: AtomicBool,
}

impl ScrollTracker {
  /// Install the document scroll listener unless already installed.
  /// Returns true if this call installed it.
  pub(crate) fn ensure_listener(self: &Arc<Self>, dom: &Arc<dyn Dom>) -> bool {
    if self.installed.swap(true, Ordering::SeqCst) {
      return false;
    }

    let tracker = Arc::clone(self);
    let weak_dom = Arc::downgrade(dom);
    dom.add_listener(
      EventTarget::Document,
      DomEventKind::Scroll,
      Arc::new(move |_: &DomEvent| {
        let Some(dom) = weak_dom.upgrade() else {
          return;
        };
        let offset = ScrollOffset::prefer_nonzero(
          dom.scroll_offset(NodeId::ROOT),
          dom.scroll_offset(NodeId::BODY),
        );
        *tracker.value.lock() = offset;
      }),
    );
    true
  }

  pub(crate) fn get(&self) -> ScrollOffset {
    *self.value.lock()
  }
}

/// Reports the document scroll offset once per change.
#[derive(Debug)]
pub struct ScrollPosition {
  tracker: Arc<ScrollTracker>,
  last_seen: Mutex<ScrollOffset>,
}

impl ScrollPosition {
  pub(crate) fn new(tracker: &Arc<ScrollTracker>, dom: &Arc<dyn Dom>) -> Self {
    tracker.ensure_listener(dom);
    Self {
      tracker: Arc::clone(tracker),
      last_seen: Mutex::new(tracker.get()),
    }
  }

  /// New offset if the document scrolled since this instance last reported.
  pub fn changed(&self) -> Option<ScrollOffset> {
    let current = self.tracker.get();
    let mut last = self.last_seen.lock();
    if *last == current {
      return None;
    }
    *last = current;
    Some(current)
  }

  /// Horizontal offset.
  pub fn scroll_x(&self) -> f64 {
    self.tracker.get().left
  }

  /// Vertical offset.
  pub fn scroll_y(&self) -> f64 {
    self.tracker.get().top
  }

  /// Both axes of the current offset.
  pub fn scroll(&self) -> ScrollOffset {
    self.tracker.get()
  }
}

impl Condition for ScrollPosition {
  fn check(&self) -> Outcome {
    self.changed().into()
  }

  fn trigger(&self) -> Trigger {
    Trigger::Edge
  }
}
