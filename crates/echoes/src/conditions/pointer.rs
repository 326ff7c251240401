/*! Pointer position over the document body. */

use parking_lot::Mutex;
use std::sync::Arc;

use super::Condition;
use crate::platform::{Dom, DomEvent, DomEventKind, EventTarget};
use crate::types::{NodeId, Outcome, Point};

#[derive(Debug)]
struct PointerState {
  current: Point,
  /// Position at the last `changed()` that reported movement.
  last_reported: Point,
}

/// Tracks the pointer via `mousemove` on the body.
///
/// Before the first movement the position is [`Point::UNKNOWN`].
#[derive(Debug)]
pub struct MousePosition {
  state: Arc<Mutex<PointerState>>,
}

impl MousePosition {
  /// Start tracking. Installs one `mousemove` listener on the body.
  pub fn new(dom: &Arc<dyn Dom>) -> Self {
    let state = Arc::new(Mutex::new(PointerState {
      current: Point::UNKNOWN,
      last_reported: Point::UNKNOWN,
    }));

    let shared = Arc::clone(&state);
    dom.add_listener(
      EventTarget::Node(NodeId::BODY),
      DomEventKind::MouseMove,
      Arc::new(move |event: &DomEvent| {
        if let Some(client) = event.client {
          shared.lock().current = client;
        }
      }),
    );

    Self { state }
  }

  /// Last seen pointer position.
  pub fn position(&self) -> Point {
    self.state.lock().current
  }

  /// Horizontal client coordinate.
  pub fn x(&self) -> f64 {
    self.position().x
  }

  /// Vertical client coordinate.
  pub fn y(&self) -> f64 {
    self.position().y
  }

  /// New position if the pointer moved since the last reported change.
  pub fn changed(&self) -> Option<Point> {
    let mut state = self.state.lock();
    if state.current == state.last_reported {
      return None;
    }
    state.last_reported = state.current;
    Some(state.current)
  }
}

impl Condition for MousePosition {
  fn check(&self) -> Outcome {
    Outcome::Position(self.position())
  }
}
