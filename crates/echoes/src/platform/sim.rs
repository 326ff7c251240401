/*!
In-memory document backend.

`SimDocument` keeps a small node arena (`<html>` root, `<body>`, and any
elements created through it) plus the input state conditions observe: hovered
node, inline styles, class lists, box metrics and scroll offsets. Input is
synthesized through driver methods (`click`, `move_mouse`, `scroll_to`, ...),
which dispatch to registered listeners the way the browser would.

Frames and document-ready are pumped explicitly, so timing-dependent code runs
deterministically.

```ignore
let doc = Arc::new(SimDocument::new());
let button = doc.create_element("button");
doc.append_child(NodeId::BODY, button);

doc.click(button);
doc.advance_frame(16.0);
```
*/

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

use super::traits::{
  Dom, DomEvent, DomEventKind, EventTarget, FrameCallback, Listener, ReadyCallback, StyleProperty,
};
use crate::logging::Logger;
use crate::types::{BoxMetrics, NodeId, Point, ScrollOffset};

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

#[derive(Debug, Default)]
struct SimNode {
  tag: String,
  parent: Option<NodeId>,
  children: Vec<NodeId>,
  classes: Vec<String>,
  style: HashMap<StyleProperty, String>,
  metrics: BoxMetrics,
  scroll: ScrollOffset,
}

impl SimNode {
  fn new(tag: &str) -> Self {
    Self {
      tag: tag.to_string(),
      ..Self::default()
    }
  }
}

struct SimState {
  nodes: Vec<SimNode>,
  hovered: Option<NodeId>,
  listeners: Vec<(EventTarget, DomEventKind, Listener)>,
  frames: Vec<FrameCallback>,
  now_ms: f64,
  ready: bool,
  ready_callbacks: Vec<ReadyCallback>,
  user_agent: String,
}

impl SimState {
  fn node(&self, id: NodeId) -> Option<&SimNode> {
    self.nodes.get(id.0 as usize)
  }

  fn node_mut(&mut self, id: NodeId) -> Option<&mut SimNode> {
    self.nodes.get_mut(id.0 as usize)
  }

  fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.node(id).and_then(|n| n.parent)
  }

  /// Whether `ancestor` is `node` or one of its ancestors.
  fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
    let mut cursor = Some(node);
    while let Some(current) = cursor {
      if current == ancestor {
        return true;
      }
      cursor = self.parent(current);
    }
    false
  }

  fn is_attached(&self, node: NodeId) -> bool {
    self.node(node).is_some() && self.is_inclusive_ancestor(NodeId::BODY, node)
  }

  /// Targets an event visits, innermost first.
  fn propagation_path(&self, target: EventTarget, kind: DomEventKind) -> Vec<EventTarget> {
    let bubbles = !matches!(kind, DomEventKind::Focus | DomEventKind::Blur);
    if !bubbles {
      return vec![target];
    }

    match target {
      EventTarget::Window => vec![EventTarget::Window],
      EventTarget::Document => vec![EventTarget::Document, EventTarget::Window],
      EventTarget::Node(node) => {
        let mut path = Vec::new();
        let mut cursor = Some(node);
        while let Some(current) = cursor {
          path.push(EventTarget::Node(current));
          cursor = self.parent(current);
        }
        if self.is_inclusive_ancestor(NodeId::ROOT, node) {
          path.push(EventTarget::Document);
          path.push(EventTarget::Window);
        }
        path
      }
    }
  }

  fn listeners_for(&self, target: EventTarget, kind: DomEventKind) -> Vec<Listener> {
    self
      .propagation_path(target, kind)
      .into_iter()
      .flat_map(|hop| {
        self
          .listeners
          .iter()
          .filter(move |(t, k, _)| *t == hop && *k == kind)
          .map(|(_, _, l)| Listener::clone(l))
      })
      .collect()
  }
}

/// In-memory [`Dom`] backend with synthetic input.
pub struct SimDocument {
  state: Mutex<SimState>,
  logger: Logger,
}

impl fmt::Debug for SimDocument {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.lock();
    f.debug_struct("SimDocument")
      .field("nodes", &state.nodes.len())
      .field("listeners", &state.listeners.len())
      .field("ready", &state.ready)
      .field("debug", &self.logger.is_debug())
      .finish_non_exhaustive()
  }
}

impl Default for SimDocument {
  fn default() -> Self {
    Self::new()
  }
}

impl SimDocument {
  /// Create a document with an empty body that is still parsing.
  pub fn new() -> Self {
    let mut root = SimNode::new("html");
    root.children.push(NodeId::BODY);
    let mut body = SimNode::new("body");
    body.parent = Some(NodeId::ROOT);

    Self {
      state: Mutex::new(SimState {
        nodes: vec![root, body],
        hovered: None,
        listeners: Vec::new(),
        frames: Vec::new(),
        now_ms: 0.0,
        ready: false,
        ready_callbacks: Vec::new(),
        user_agent: DEFAULT_USER_AGENT.to_string(),
      }),
      logger: Logger::default(),
    }
  }

  /// Whether backend diagnostics are currently logged.
  pub fn is_debug(&self) -> bool {
    self.logger.is_debug()
  }

  // === Tree ===

  /// Create a detached element.
  pub fn create_element(&self, tag: &str) -> NodeId {
    let mut state = self.state.lock();
    #[allow(clippy::cast_possible_truncation)] // Arena never approaches u32::MAX nodes
    let id = NodeId(state.nodes.len() as u32);
    state.nodes.push(SimNode::new(tag));
    id
  }

  /// Move `child` under `parent`. Returns false for unknown nodes, the root,
  /// or moves that would create a cycle.
  pub fn append_child(&self, parent: NodeId, child: NodeId) -> bool {
    let mut state = self.state.lock();
    if child == NodeId::ROOT || state.node(parent).is_none() || state.node(child).is_none() {
      self
        .logger
        .warn(format_args!("Cannot append {child} to {parent}: unknown node or root"));
      return false;
    }
    if state.is_inclusive_ancestor(child, parent) {
      self
        .logger
        .warn(format_args!("Cannot append {child} to {parent}: would form a cycle"));
      return false;
    }

    if let Some(old_parent) = state.parent(child) {
      if let Some(p) = state.node_mut(old_parent) {
        p.children.retain(|id| *id != child);
      }
    }
    if let Some(c) = state.node_mut(child) {
      c.parent = Some(parent);
    }
    if let Some(p) = state.node_mut(parent) {
      p.children.push(child);
    }
    true
  }

  /// Detach a node (and its subtree) from its parent.
  pub fn remove(&self, node: NodeId) {
    if node.is_reserved() {
      return;
    }
    let mut state = self.state.lock();
    let Some(parent) = state.parent(node) else {
      return;
    };
    if let Some(p) = state.node_mut(parent) {
      p.children.retain(|id| *id != node);
    }
    if let Some(n) = state.node_mut(node) {
      n.parent = None;
    }
    if state
      .hovered
      .is_some_and(|h| state.is_inclusive_ancestor(node, h))
    {
      state.hovered = None;
    }
  }

  /// Tag name of a node.
  pub fn tag(&self, node: NodeId) -> Option<String> {
    self.state.lock().node(node).map(|n| n.tag.clone())
  }

  /// Child nodes in document order.
  pub fn children(&self, node: NodeId) -> Vec<NodeId> {
    self
      .state
      .lock()
      .node(node)
      .map(|n| n.children.clone())
      .unwrap_or_default()
  }

  // === Presentation ===

  /// Write an inline style value. An empty value clears it.
  pub fn set_style(&self, node: NodeId, property: StyleProperty, value: &str) {
    let mut state = self.state.lock();
    if let Some(n) = state.node_mut(node) {
      if value.is_empty() {
        n.style.remove(&property);
      } else {
        n.style.insert(property, value.to_string());
      }
    }
  }

  /// Set the box dimensions a node reports.
  pub fn set_metrics(&self, node: NodeId, metrics: BoxMetrics) {
    if let Some(n) = self.state.lock().node_mut(node) {
      n.metrics = metrics;
    }
  }

  /// Replace the navigator's user-agent string.
  pub fn set_user_agent(&self, user_agent: &str) {
    self.state.lock().user_agent = user_agent.to_string();
  }

  // === Input ===

  /// Put the pointer over a node, or nowhere.
  pub fn hover(&self, node: Option<NodeId>) {
    self.state.lock().hovered = node;
  }

  /// Click a node. Dispatches `click` through the node's ancestors.
  pub fn click(&self, node: NodeId) -> usize {
    self.dispatch(DomEvent {
      kind: DomEventKind::Click,
      target: EventTarget::Node(node),
      client: None,
    })
  }

  /// Move the pointer to client coordinates over the body.
  pub fn move_mouse(&self, x: f64, y: f64) -> usize {
    self.dispatch(DomEvent {
      kind: DomEventKind::MouseMove,
      target: EventTarget::Node(NodeId::BODY),
      client: Some(Point::new(x, y)),
    })
  }

  /// Scroll the document element and dispatch `scroll` on the document.
  pub fn scroll_to(&self, top: f64, left: f64) -> usize {
    if let Some(root) = self.state.lock().node_mut(NodeId::ROOT) {
      root.scroll = ScrollOffset::new(top, left);
    }
    self.dispatch(DomEvent {
      kind: DomEventKind::Scroll,
      target: EventTarget::Document,
      client: None,
    })
  }

  /// Set a node's scroll offset without dispatching anything.
  pub fn set_scroll(&self, node: NodeId, offset: ScrollOffset) {
    if let Some(n) = self.state.lock().node_mut(node) {
      n.scroll = offset;
    }
  }

  /// Focus the window. Dispatches `focus` on the window only.
  pub fn focus_window(&self) -> usize {
    self.dispatch(DomEvent {
      kind: DomEventKind::Focus,
      target: EventTarget::Window,
      client: None,
    })
  }

  /// Blur the window. Dispatches `blur` on the window only.
  pub fn blur_window(&self) -> usize {
    self.dispatch(DomEvent {
      kind: DomEventKind::Blur,
      target: EventTarget::Window,
      client: None,
    })
  }

  /// Deliver an event to every listener on its propagation path.
  /// Returns how many listeners ran.
  pub fn dispatch(&self, event: DomEvent) -> usize {
    // Collect first: listeners may call back into the document.
    let listeners = self.state.lock().listeners_for(event.target, event.kind);
    for listener in &listeners {
      listener(&event);
    }
    listeners.len()
  }

  /// Number of listeners attached directly to a target.
  pub fn listener_count(&self, target: EventTarget, kind: DomEventKind) -> usize {
    self
      .state
      .lock()
      .listeners
      .iter()
      .filter(|(t, k, _)| *t == target && *k == kind)
      .count()
  }

  // === Scheduling ===

  /// Mark the document parsed and run pending ready callbacks.
  pub fn finish_parsing(&self) -> usize {
    let callbacks = {
      let mut state = self.state.lock();
      state.ready = true;
      std::mem::take(&mut state.ready_callbacks)
    };
    let count = callbacks.len();
    for callback in callbacks {
      callback();
    }
    count
  }

  /// Whether [`finish_parsing`](Self::finish_parsing) has run.
  pub fn is_ready(&self) -> bool {
    self.state.lock().ready
  }

  /// Run one frame at an absolute timestamp.
  ///
  /// Callbacks requested while the frame runs are queued for the next one.
  pub fn run_frame(&self, timestamp_ms: f64) -> usize {
    let callbacks = {
      let mut state = self.state.lock();
      state.now_ms = timestamp_ms;
      std::mem::take(&mut state.frames)
    };
    let count = callbacks.len();
    for callback in callbacks {
      callback(timestamp_ms);
    }
    count
  }

  /// Advance the frame clock by `delta_ms` and run one frame.
  pub fn advance_frame(&self, delta_ms: f64) -> usize {
    let next = self.state.lock().now_ms + delta_ms;
    self.run_frame(next)
  }

  /// Timestamp of the most recent frame.
  pub fn now_ms(&self) -> f64 {
    self.state.lock().now_ms
  }

  /// Callbacks waiting for the next frame.
  pub fn pending_frames(&self) -> usize {
    self.state.lock().frames.len()
  }
}

impl Dom for SimDocument {
  fn is_attached(&self, node: NodeId) -> bool {
    self.state.lock().is_attached(node)
  }

  fn matches_hover(&self, node: NodeId) -> bool {
    let state = self.state.lock();
    state
      .hovered
      .is_some_and(|h| state.is_attached(h) && state.is_inclusive_ancestor(node, h))
  }

  fn inline_style(&self, node: NodeId, property: StyleProperty) -> String {
    self
      .state
      .lock()
      .node(node)
      .and_then(|n| n.style.get(&property).cloned())
      .unwrap_or_default()
  }

  fn class_add(&self, node: NodeId, class: &str) {
    if let Some(n) = self.state.lock().node_mut(node) {
      if !n.classes.iter().any(|c| c == class) {
        n.classes.push(class.to_string());
      }
    }
  }

  fn class_contains(&self, node: NodeId, class: &str) -> bool {
    self
      .state
      .lock()
      .node(node)
      .is_some_and(|n| n.classes.iter().any(|c| c == class))
  }

  fn class_remove(&self, node: NodeId, class: &str) {
    if let Some(n) = self.state.lock().node_mut(node) {
      n.classes.retain(|c| c != class);
    }
  }

  fn metrics(&self, node: NodeId) -> BoxMetrics {
    self
      .state
      .lock()
      .node(node)
      .map(|n| n.metrics)
      .unwrap_or_default()
  }

  fn scroll_offset(&self, node: NodeId) -> ScrollOffset {
    self
      .state
      .lock()
      .node(node)
      .map(|n| n.scroll)
      .unwrap_or_default()
  }

  fn user_agent(&self) -> String {
    self.state.lock().user_agent.clone()
  }

  fn add_listener(&self, target: EventTarget, kind: DomEventKind, listener: Listener) {
    self.state.lock().listeners.push((target, kind, listener));
  }

  fn on_ready(&self, callback: ReadyCallback) {
    let mut state = self.state.lock();
    if state.ready {
      drop(state);
      callback();
    } else {
      state.ready_callbacks.push(callback);
    }
  }

  fn request_animation_frame(&self, callback: FrameCallback) {
    self.state.lock().frames.push(callback);
  }

  fn set_debug(&self, state: bool) {
    self.logger.set_debug(state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  fn counter() -> (Arc<AtomicUsize>, Listener) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&count);
    (
      count,
      Arc::new(move |_: &DomEvent| {
        c.fetch_add(1, Ordering::SeqCst);
      }),
    )
  }

  mod tree {
    use super::*;

    #[test]
    fn new_document_has_root_and_body() {
      let doc = SimDocument::new();
      assert_eq!(doc.tag(NodeId::ROOT).as_deref(), Some("html"));
      assert_eq!(doc.tag(NodeId::BODY).as_deref(), Some("body"));
      assert_eq!(doc.children(NodeId::ROOT), vec![NodeId::BODY]);
      assert!(doc.is_attached(NodeId::BODY));
      assert!(!doc.is_attached(NodeId::ROOT), "root is outside the body");
    }

    #[test]
    fn created_elements_start_detached() {
      let doc = SimDocument::new();
      let div = doc.create_element("div");
      assert!(!doc.is_attached(div));
      assert!(doc.append_child(NodeId::BODY, div));
      assert!(doc.is_attached(div));
    }

    #[test]
    fn nested_attachment_follows_parent() {
      let doc = SimDocument::new();
      let outer = doc.create_element("div");
      let inner = doc.create_element("span");
      doc.append_child(outer, inner);
      assert!(!doc.is_attached(inner));
      doc.append_child(NodeId::BODY, outer);
      assert!(doc.is_attached(inner));
      doc.remove(outer);
      assert!(!doc.is_attached(inner));
    }

    #[test]
    fn rejects_cycles_and_root_moves() {
      let doc = SimDocument::new();
      let outer = doc.create_element("div");
      let inner = doc.create_element("div");
      doc.append_child(outer, inner);
      assert!(!doc.append_child(inner, outer));
      assert!(!doc.append_child(outer, outer));
      assert!(!doc.append_child(outer, NodeId::ROOT));
      assert!(!doc.append_child(NodeId(99), outer));
    }

    #[test]
    fn reparenting_moves_child() {
      let doc = SimDocument::new();
      let a = doc.create_element("div");
      let b = doc.create_element("div");
      let child = doc.create_element("p");
      doc.append_child(a, child);
      doc.append_child(b, child);
      assert!(doc.children(a).is_empty());
      assert_eq!(doc.children(b), vec![child]);
    }
  }

  mod presentation {
    use super::*;

    #[test]
    fn style_reads_empty_when_unset() {
      let doc = SimDocument::new();
      let div = doc.create_element("div");
      assert_eq!(doc.inline_style(div, StyleProperty::Color), "");
      doc.set_style(div, StyleProperty::Color, "red");
      assert_eq!(doc.inline_style(div, StyleProperty::Color), "red");
      doc.set_style(div, StyleProperty::Color, "");
      assert_eq!(doc.inline_style(div, StyleProperty::Color), "");
    }

    #[test]
    fn class_list_has_set_semantics() {
      let doc = SimDocument::new();
      let div = doc.create_element("div");
      doc.class_add(div, "active");
      doc.class_add(div, "active");
      assert!(doc.class_contains(div, "active"));
      doc.class_remove(div, "active");
      assert!(!doc.class_contains(div, "active"));
    }

    #[test]
    fn unknown_nodes_read_neutral() {
      let doc = SimDocument::new();
      let ghost = NodeId(1234);
      assert_eq!(doc.inline_style(ghost, StyleProperty::BackgroundColor), "");
      assert_eq!(doc.metrics(ghost), BoxMetrics::default());
      assert_eq!(doc.scroll_offset(ghost), ScrollOffset::default());
      assert!(!doc.class_contains(ghost, "x"));
      assert!(!doc.matches_hover(ghost));
    }

    #[test]
    fn hover_matches_ancestors() {
      let doc = SimDocument::new();
      let outer = doc.create_element("div");
      let inner = doc.create_element("span");
      let sibling = doc.create_element("div");
      doc.append_child(NodeId::BODY, outer);
      doc.append_child(outer, inner);
      doc.append_child(NodeId::BODY, sibling);

      doc.hover(Some(inner));
      assert!(doc.matches_hover(inner));
      assert!(doc.matches_hover(outer));
      assert!(doc.matches_hover(NodeId::BODY));
      assert!(!doc.matches_hover(sibling));

      doc.remove(outer);
      assert!(!doc.matches_hover(inner), "removing the subtree clears hover");
    }
  }

  mod dispatch {
    use super::*;

    #[test]
    fn click_bubbles_to_ancestors_document_and_window() {
      let doc = SimDocument::new();
      let button = doc.create_element("button");
      doc.append_child(NodeId::BODY, button);

      let (on_button, l1) = counter();
      let (on_body, l2) = counter();
      let (on_window, l3) = counter();
      doc.add_listener(EventTarget::Node(button), DomEventKind::Click, l1);
      doc.add_listener(EventTarget::Node(NodeId::BODY), DomEventKind::Click, l2);
      doc.add_listener(EventTarget::Window, DomEventKind::Click, l3);

      assert_eq!(doc.click(button), 3);
      assert_eq!(on_button.load(Ordering::SeqCst), 1);
      assert_eq!(on_body.load(Ordering::SeqCst), 1);
      assert_eq!(on_window.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn detached_click_stays_in_subtree() {
      let doc = SimDocument::new();
      let button = doc.create_element("button");
      let (on_window, l) = counter();
      doc.add_listener(EventTarget::Window, DomEventKind::Click, l);
      doc.click(button);
      assert_eq!(on_window.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn focus_does_not_bubble() {
      let doc = SimDocument::new();
      let (on_document, l) = counter();
      doc.add_listener(EventTarget::Document, DomEventKind::Focus, l);
      doc.focus_window();
      assert_eq!(on_document.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn mouse_move_carries_client_position() {
      let doc = SimDocument::new();
      let seen = Arc::new(Mutex::new(None));
      let s = Arc::clone(&seen);
      doc.add_listener(
        EventTarget::Node(NodeId::BODY),
        DomEventKind::MouseMove,
        Arc::new(move |e: &DomEvent| *s.lock() = e.client),
      );
      doc.move_mouse(12.0, 34.0);
      assert_eq!(*seen.lock(), Some(Point::new(12.0, 34.0)));
    }

    #[test]
    fn listeners_may_read_the_document() {
      let doc = Arc::new(SimDocument::new());
      let seen = Arc::new(Mutex::new(ScrollOffset::default()));
      let (d, s) = (Arc::clone(&doc), Arc::clone(&seen));
      doc.add_listener(
        EventTarget::Document,
        DomEventKind::Scroll,
        Arc::new(move |_: &DomEvent| *s.lock() = d.scroll_offset(NodeId::ROOT)),
      );
      doc.scroll_to(200.0, 10.0);
      assert_eq!(*seen.lock(), ScrollOffset::new(200.0, 10.0));
    }
  }

  mod scheduling {
    use super::*;

    #[test]
    fn ready_callbacks_wait_for_parsing() {
      let doc = SimDocument::new();
      let fired = Arc::new(AtomicUsize::new(0));
      let f = Arc::clone(&fired);
      doc.on_ready(Box::new(move || {
        f.fetch_add(1, Ordering::SeqCst);
      }));
      assert_eq!(fired.load(Ordering::SeqCst), 0);
      assert_eq!(doc.finish_parsing(), 1);
      assert_eq!(fired.load(Ordering::SeqCst), 1);
      assert_eq!(doc.finish_parsing(), 0, "ready fires once");
    }

    #[test]
    fn ready_after_parse_runs_immediately() {
      let doc = SimDocument::new();
      doc.finish_parsing();
      let fired = Arc::new(AtomicUsize::new(0));
      let f = Arc::clone(&fired);
      doc.on_ready(Box::new(move || {
        f.fetch_add(1, Ordering::SeqCst);
      }));
      assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn frames_requested_during_a_frame_run_next_frame() {
      let doc = Arc::new(SimDocument::new());
      let stamps = Arc::new(Mutex::new(Vec::new()));
      let (d, s) = (Arc::clone(&doc), Arc::clone(&stamps));
      doc.request_animation_frame(Box::new(move |t| {
        s.lock().push(t);
        let s2 = Arc::clone(&s);
        d.request_animation_frame(Box::new(move |t| s2.lock().push(t)));
      }));

      assert_eq!(doc.advance_frame(16.0), 1);
      assert_eq!(doc.pending_frames(), 1);
      assert_eq!(doc.advance_frame(16.0), 1);
      assert_eq!(*stamps.lock(), vec![16.0, 32.0]);
      assert_eq!(doc.advance_frame(16.0), 0);
    }
  }
}
