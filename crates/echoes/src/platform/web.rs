/*!
Browser backend over `web-sys`.

`WebDom` carries only its diagnostics gate: the window and document are looked
up on every call, and element handles live in a thread-local table indexed by
[`NodeId`]. Register elements with [`WebDom::adopt`] before building
conditions over them.
*/

use std::cell::RefCell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, MouseEvent};

use super::traits::{
  Dom, DomEvent, DomEventKind, EventTarget, FrameCallback, Listener, ReadyCallback, StyleProperty,
};
use crate::logging::Logger;
use crate::types::{BoxMetrics, NodeId, Point, ScrollOffset, Size};

thread_local! {
  /// Adopted elements, indexed by `NodeId - FIRST_ELEMENT`.
  static ELEMENTS: RefCell<Vec<Element>> = const { RefCell::new(Vec::new()) };
}

/// [`Dom`] backend bound to the page's `window` and `document`.
///
/// Failures to attach listeners or schedule frames are logged through the
/// owning context's debug gate.
#[derive(Debug, Clone, Default)]
pub struct WebDom {
  logger: Logger,
}

fn document() -> Option<Document> {
  web_sys::window().and_then(|w| w.document())
}

impl WebDom {
  /// Backend for the current page.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a DOM element and return its handle.
  ///
  /// Adopting the same element twice returns the existing handle.
  pub fn adopt(element: Element) -> NodeId {
    ELEMENTS.with(|cell| {
      let mut elements = cell.borrow_mut();
      let index = elements
        .iter()
        .position(|e| *e == element)
        .unwrap_or_else(|| {
          elements.push(element);
          elements.len() - 1
        });
      #[allow(clippy::cast_possible_truncation)]
      NodeId(index as u32 + NodeId::FIRST_ELEMENT)
    })
  }

  /// Look up the element by CSS selector and adopt it.
  pub fn query(selector: &str) -> Option<NodeId> {
    let element = document()?.query_selector(selector).ok()??;
    Some(Self::adopt(element))
  }

  /// Resolve a handle to its element.
  pub fn element(node: NodeId) -> Option<Element> {
    if node == NodeId::ROOT {
      return document()?.document_element();
    }
    if node == NodeId::BODY {
      return document()?.body().map(Element::from);
    }
    let index = (node.0 - NodeId::FIRST_ELEMENT) as usize;
    ELEMENTS.with(|cell| cell.borrow().get(index).cloned())
  }

  fn html_element(node: NodeId) -> Option<HtmlElement> {
    Self::element(node)?.dyn_into::<HtmlElement>().ok()
  }
}

fn px(value: i32) -> f64 {
  f64::from(value)
}

impl Dom for WebDom {
  fn is_attached(&self, node: NodeId) -> bool {
    let Some(body) = document().and_then(|d| d.body()) else {
      return false;
    };
    Self::element(node).is_some_and(|e| body.contains(Some(e.as_ref())))
  }

  fn matches_hover(&self, node: NodeId) -> bool {
    Self::element(node)
      .and_then(|e| e.matches(":hover").ok())
      .unwrap_or(false)
  }

  fn inline_style(&self, node: NodeId, property: StyleProperty) -> String {
    Self::html_element(node)
      .and_then(|e| e.style().get_property_value(property.css_name()).ok())
      .unwrap_or_default()
  }

  fn class_add(&self, node: NodeId, class: &str) {
    if let Some(e) = Self::element(node) {
      drop(e.class_list().add_1(class));
    }
  }

  fn class_contains(&self, node: NodeId, class: &str) -> bool {
    Self::element(node).is_some_and(|e| e.class_list().contains(class))
  }

  fn class_remove(&self, node: NodeId, class: &str) {
    if let Some(e) = Self::element(node) {
      drop(e.class_list().remove_1(class));
    }
  }

  fn metrics(&self, node: NodeId) -> BoxMetrics {
    let Some(element) = Self::element(node) else {
      return BoxMetrics::default();
    };
    let offset = element
      .dyn_ref::<HtmlElement>()
      .map(|h| Size::new(px(h.offset_width()), px(h.offset_height())))
      .unwrap_or_default();
    BoxMetrics {
      scroll: Size::new(px(element.scroll_width()), px(element.scroll_height())),
      offset,
      client: Size::new(px(element.client_width()), px(element.client_height())),
    }
  }

  fn scroll_offset(&self, node: NodeId) -> ScrollOffset {
    Self::element(node)
      .map(|e| ScrollOffset::new(px(e.scroll_top()), px(e.scroll_left())))
      .unwrap_or_default()
  }

  fn user_agent(&self) -> String {
    web_sys::window()
      .and_then(|w| w.navigator().user_agent().ok())
      .unwrap_or_default()
  }

  fn add_listener(&self, target: EventTarget, kind: DomEventKind, listener: Listener) {
    let js_target: Option<web_sys::EventTarget> = match target {
      EventTarget::Window => web_sys::window().map(Into::into),
      EventTarget::Document => document().map(Into::into),
      EventTarget::Node(node) => Self::element(node).map(Into::into),
    };
    let Some(js_target) = js_target else {
      self
        .logger
        .log(format_args!("No {target:?} to attach a {kind} listener to"));
      return;
    };

    let closure = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
      let client = event
        .dyn_ref::<MouseEvent>()
        .map(|m| Point::new(f64::from(m.client_x()), f64::from(m.client_y())));
      listener(&DomEvent {
        kind,
        target,
        client,
      });
    });

    if js_target
      .add_event_listener_with_callback(kind.name(), closure.as_ref().unchecked_ref())
      .is_err()
    {
      self
        .logger
        .warn(format_args!("Failed to attach {kind} listener to {target:?}"));
      return;
    }
    // Listeners live as long as the page
    closure.forget();
  }

  fn on_ready(&self, callback: ReadyCallback) {
    let Some(doc) = document() else {
      return;
    };
    if doc.ready_state() != "loading" {
      callback();
      return;
    }

    let closure = Closure::once_into_js(move || callback());
    if doc
      .add_event_listener_with_callback("DOMContentLoaded", closure.unchecked_ref())
      .is_err()
    {
      self.logger.warn("Failed to attach DOMContentLoaded listener");
    }
  }

  fn request_animation_frame(&self, callback: FrameCallback) {
    let Some(window) = web_sys::window() else {
      return;
    };
    let closure = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
    if window
      .request_animation_frame(closure.unchecked_ref())
      .is_err()
    {
      self.logger.warn("requestAnimationFrame failed");
    }
  }

  fn set_debug(&self, state: bool) {
    self.logger.set_debug(state);
  }
}
