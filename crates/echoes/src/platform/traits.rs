/*!
Host document abstraction.

This trait defines the contract between core code and document backends.
Backends (the in-memory [`SimDocument`](super::SimDocument), the browser
`WebDom`) implement it. Core code only uses this trait - never backend types
directly.
*/

use std::fmt;
use std::sync::Arc;

use crate::types::{BoxMetrics, NodeId, Point, ScrollOffset};

/// Listener invoked for each matching DOM event.
pub type Listener = Arc<dyn Fn(&DomEvent) + Send + Sync>;

/// Animation-frame callback, given the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnOnce(f64) + Send>;

/// Callback run once the document has been parsed.
pub type ReadyCallback = Box<dyn FnOnce() + Send>;

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
  /// The global `window`.
  Window,
  /// The `document` itself, above the root element.
  Document,
  /// An element.
  Node(NodeId),
}

/// DOM events conditions listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEventKind {
  /// `click`, bubbling.
  Click,
  /// `mousemove`, carrying client coordinates.
  MouseMove,
  /// `scroll` on the document.
  Scroll,
  /// `focus` on the window.
  Focus,
  /// `blur` on the window.
  Blur,
}

impl DomEventKind {
  /// Event type string as passed to `addEventListener`.
  pub const fn name(self) -> &'static str {
    match self {
      Self::Click => "click",
      Self::MouseMove => "mousemove",
      Self::Scroll => "scroll",
      Self::Focus => "focus",
      Self::Blur => "blur",
    }
  }
}

impl fmt::Display for DomEventKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A dispatched DOM event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomEvent {
  /// Event type.
  pub kind: DomEventKind,
  /// Where the event originated (before bubbling).
  pub target: EventTarget,
  /// Pointer position in client coordinates, for pointer events.
  pub client: Option<Point>,
}

/// Inline style properties conditions can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
  /// `background-color`
  BackgroundColor,
  /// `color`
  Color,
}

impl StyleProperty {
  /// CSS property name.
  pub const fn css_name(self) -> &'static str {
    match self {
      Self::BackgroundColor => "background-color",
      Self::Color => "color",
    }
  }
}

/// Operations on the host document.
///
/// Every method must tolerate unknown or detached nodes by returning a
/// neutral value (`false`, empty string, zeroed metrics) instead of failing.
pub trait Dom: Send + Sync + 'static {
  /// Whether the node is the body or one of its descendants.
  fn is_attached(&self, node: NodeId) -> bool;

  /// Whether the pointer is over the node (`:hover`).
  fn matches_hover(&self, node: NodeId) -> bool;

  /// Inline style value, empty when unset.
  fn inline_style(&self, node: NodeId, property: StyleProperty) -> String;

  /// Add a class to the node's class list.
  fn class_add(&self, node: NodeId, class: &str);

  /// Whether the node's class list contains the class.
  fn class_contains(&self, node: NodeId, class: &str) -> bool;

  /// Remove a class from the node's class list.
  fn class_remove(&self, node: NodeId, class: &str);

  /// Scroll, offset and client dimensions of the node.
  fn metrics(&self, node: NodeId) -> BoxMetrics;

  /// Scroll offset of the node.
  fn scroll_offset(&self, node: NodeId) -> ScrollOffset;

  /// The navigator's user-agent string.
  fn user_agent(&self) -> String;

  /// Attach a listener. Listeners live as long as the document.
  fn add_listener(&self, target: EventTarget, kind: DomEventKind, listener: Listener);

  /// Run the callback once the document is parsed, or now if it already is.
  fn on_ready(&self, callback: ReadyCallback);

  /// Run the callback before the next repaint.
  fn request_animation_frame(&self, callback: FrameCallback);

  /// Follow the owning context's debug flag for backend diagnostics.
  fn set_debug(&self, _state: bool) {}
}
