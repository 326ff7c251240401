/*! Window focus. */

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::Condition;
use crate::platform::{Dom, DomEvent, DomEventKind, EventTarget};
use crate::types::Outcome;

/// True while the window has focus.
///
/// Updated by `focus`/`blur` listeners rather than polling. Assumes the window
/// is focused when built.
#[derive(Debug)]
pub struct TabFocus {
  focused: Arc<AtomicBool>,
}

impl TabFocus {
  /// Start tracking. Installs `focus` and `blur` listeners on the window.
  pub fn new(dom: &Arc<dyn Dom>) -> Self {
    let focused = Arc::new(AtomicBool::new(true));

    for (kind, state) in [(DomEventKind::Focus, true), (DomEventKind::Blur, false)] {
      let flag = Arc::clone(&focused);
      dom.add_listener(
        EventTarget::Window,
        kind,
        Arc::new(move |_: &DomEvent| flag.store(state, Ordering::SeqCst)),
      );
    }

    Self { focused }
  }

  /// Whether the window is focused.
  pub fn has_focus(&self) -> bool {
    self.focused.load(Ordering::SeqCst)
  }
}

impl Condition for TabFocus {
  fn check(&self) -> Outcome {
    self.has_focus().into()
  }
}
