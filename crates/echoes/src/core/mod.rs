/*!
Core Echoes context - owns the event registry, logger and event broadcasting.

# Module Structure

- `mod.rs` - Echoes struct, builder, registry API, condition constructors
- `registry.rs` - Registry with private fields + insertion + event emission
- `classes.rs` - class-list helpers

# Example

```ignore
let doc = Arc::new(SimDocument::new());
let echoes = Echoes::builder().debug(true).build(doc.clone());

let button = doc.create_element("button");
doc.append_child(NodeId::BODY, button);
echoes.add_event("pressed", echoes.click(button));

doc.click(button);
assert_eq!(echoes.check_event("pressed"), Some(Outcome::Flag(true)));
```
*/

mod classes;
mod registry;

pub(crate) use registry::Registry;

use async_broadcast::{InactiveReceiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::conditions::{
  Click, Condition, Hover, MousePosition, PageSize, ScrollPosition, ScrollTracker, StyleCondition,
  TabFocus, WebInfo,
};
use crate::lifecycle::{Lifecycle, DEFAULT_FPS};
use crate::logging::Logger;
use crate::platform::Dom;
use crate::types::{Event, NodeId, Outcome};

const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Echoes context bound to one document.
///
/// Clone is cheap (Arc bumps) and clones share the registry, debug flag and
/// event channel.
#[derive(Clone)]
pub struct Echoes {
  dom: Arc<dyn Dom>,
  state: Arc<RwLock<Registry>>,
  logger: Logger,
  scroll: Arc<ScrollTracker>,
  clock: Arc<dyn Clock>,
  default_fps: f64,
  events_tx: Sender<Event>,
  events_keepalive: InactiveReceiver<Event>,
}

impl std::fmt::Debug for Echoes {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Echoes")
      .field("events", &self.len())
      .field("debug", &self.is_debug())
      .finish_non_exhaustive()
  }
}

/// Builder for configuring an Echoes context.
///
/// # Example
///
/// ```ignore
/// let echoes = Echoes::builder()
///     .debug(true)
///     .default_fps(30.0)
///     .build(dom);
/// ```
#[derive(Debug, Clone)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct EchoesBuilder {
  debug: bool,
  default_fps: f64,
  clock: Option<Arc<dyn Clock>>,
  event_capacity: usize,
}

impl Default for EchoesBuilder {
  fn default() -> Self {
    Self {
      debug: false,
      default_fps: DEFAULT_FPS,
      clock: None,
      event_capacity: DEFAULT_EVENT_CAPACITY,
    }
  }
}

impl EchoesBuilder {
  /// Log through the `log` facade. Default: false.
  pub const fn debug(mut self, state: bool) -> Self {
    self.debug = state;
    self
  }

  /// Rate for [`Lifecycle::on_update_default`]. Default: 60.
  pub const fn default_fps(mut self, fps: f64) -> Self {
    self.default_fps = fps;
    self
  }

  /// Clock read by [`WebInfo`]. Default: local system time.
  pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
    self.clock = Some(clock);
    self
  }

  /// Capacity of the event channel. The oldest events are dropped when full.
  /// Default: 1024.
  pub const fn event_capacity(mut self, capacity: usize) -> Self {
    self.event_capacity = capacity;
    self
  }

  /// Build a context over `dom`.
  pub fn build(self, dom: Arc<dyn Dom>) -> Echoes {
    let (mut tx, rx) = async_broadcast::broadcast(self.event_capacity.max(1));
    tx.set_overflow(true);

    let logger = Logger::new(self.debug);
    dom.set_debug(self.debug);
    let ready_tx = tx.clone();
    dom.on_ready(Box::new(move || registry::emit(&ready_tx, Event::DocumentReady)));

    let echoes = Echoes {
      dom,
      state: Arc::new(RwLock::new(Registry::new(tx.clone()))),
      logger,
      scroll: Arc::new(ScrollTracker::default()),
      clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
      default_fps: self.default_fps,
      events_tx: tx,
      events_keepalive: rx.deactivate(),
    };
    echoes.logger.log("is now operative");
    echoes
  }
}

impl Echoes {
  /// Create a context over `dom` with default options.
  pub fn new(dom: Arc<dyn Dom>) -> Self {
    Self::builder().build(dom)
  }

  /// Create a builder for configuring a new context.
  pub fn builder() -> EchoesBuilder {
    EchoesBuilder::default()
  }

  /// The document this context observes.
  pub fn dom(&self) -> &Arc<dyn Dom> {
    &self.dom
  }

  /// Subscribe to events from this context.
  pub fn subscribe(&self) -> async_broadcast::Receiver<Event> {
    self.events_keepalive.activate_cloned()
  }

  /// Turn logging on or off for this context, its clones and its document.
  pub fn set_debug(&self, state: bool) {
    self.logger.set_debug(state);
    self.dom.set_debug(state);
  }

  /// Whether logging is on.
  pub fn is_debug(&self) -> bool {
    self.logger.is_debug()
  }

  /// Lifecycle hooks for this context's document.
  pub fn lifecycle(&self) -> Lifecycle {
    Lifecycle::new(Arc::clone(&self.dom), self.logger.clone(), self.default_fps)
  }

  /// Read state. Never check conditions inside the closure.
  #[inline]
  fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
    f(&self.state.read())
  }

  /// Write state. Never check conditions inside the closure.
  #[inline]
  fn write<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
    f(&mut self.state.write())
  }

  // === Registry ===

  /// Register `condition` under `name`.
  ///
  /// Returns false, logging why, when the name is empty or already taken. The
  /// first registration of a name is kept.
  pub fn add_event<C: Condition>(&self, name: &str, condition: C) -> bool {
    match self.write(|r| r.insert(name, Arc::new(condition))) {
      Ok(()) => {
        self
          .logger
          .log(format_args!("The event \"{name}\" has been created"));
        true
      }
      Err(e) => {
        self.logger.error(e);
        false
      }
    }
  }

  /// Check the condition registered under `name`.
  pub fn check_event(&self, name: &str) -> Option<Outcome> {
    self.get_event(name).map(|condition| condition.check())
  }

  /// The condition registered under `name`.
  pub fn get_event(&self, name: &str) -> Option<Arc<dyn Condition>> {
    self
      .read(|r| r.condition(name))
      .map_err(|e| self.logger.error(e))
      .ok()
  }

  /// The condition registered under `name`, as its concrete type.
  ///
  /// ```ignore
  /// echoes.add_event("scroll", echoes.scroll_position());
  /// let scroll = echoes.get_event_as::<ScrollPosition>("scroll")?;
  /// let y = scroll.scroll_y();
  /// ```
  pub fn get_event_as<C: Condition>(&self, name: &str) -> Option<Arc<C>> {
    match self.read(|r| r.downcast::<C>(name)) {
      Ok(Some(condition)) => Some(condition),
      Ok(None) => {
        self.logger.warn(format_args!(
          "The event \"{name}\" is not a {}",
          std::any::type_name::<C>()
        ));
        None
      }
      Err(e) => {
        self.logger.error(e);
        None
      }
    }
  }

  /// Registered names in registration order.
  pub fn event_names(&self) -> Vec<String> {
    self.read(Registry::names)
  }

  /// Number of registered conditions.
  pub fn len(&self) -> usize {
    self.read(Registry::len)
  }

  /// Whether no condition is registered.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Check every registered condition once, in registration order.
  ///
  /// Broadcasts `EventFired` for each truthy outcome and returns how many
  /// fired. Edge-triggered conditions are consumed by the sweep.
  pub fn poll_events(&self) -> usize {
    let entries = self.read(Registry::snapshot);

    let mut fired = 0;
    for (name, condition) in entries {
      let outcome = condition.check();
      if outcome.is_truthy() {
        fired += 1;
        registry::emit(&self.events_tx, Event::EventFired { name, outcome });
      }
    }
    fired
  }

  // === Conditions ===

  /// Pointer over `node` or one of its descendants.
  pub fn hover(&self, node: NodeId) -> Hover {
    self.warn_if_detached(node);
    Hover::new(Arc::clone(&self.dom), node)
  }

  /// One `true` per click on `node`.
  pub fn click(&self, node: NodeId) -> Click {
    self.warn_if_detached(node);
    Click::new(&self.dom, node)
  }

  /// Background colour of `node` changed since the last check.
  pub fn background_color_changed(&self, node: NodeId) -> StyleCondition {
    self.warn_if_detached(node);
    StyleCondition::background_color_changed(Arc::clone(&self.dom), node)
  }

  /// Background colour of `node` equals `color`.
  pub fn background_color(&self, node: NodeId, color: impl Into<String>) -> StyleCondition {
    self.warn_if_detached(node);
    StyleCondition::background_color(Arc::clone(&self.dom), node, color)
  }

  /// Text colour of `node` changed since the last check.
  pub fn text_color_changed(&self, node: NodeId) -> StyleCondition {
    self.warn_if_detached(node);
    StyleCondition::text_color_changed(Arc::clone(&self.dom), node)
  }

  /// Text colour of `node` equals `color`.
  pub fn text_color(&self, node: NodeId, color: impl Into<String>) -> StyleCondition {
    self.warn_if_detached(node);
    StyleCondition::text_color(Arc::clone(&self.dom), node, color)
  }

  /// Pointer position over the body.
  pub fn mouse_position(&self) -> MousePosition {
    MousePosition::new(&self.dom)
  }

  /// Scroll observer sharing this context's single scroll listener.
  pub fn scroll_position(&self) -> ScrollPosition {
    ScrollPosition::new(&self.scroll, &self.dom)
  }

  /// Window focus.
  pub fn tab_focus(&self) -> TabFocus {
    TabFocus::new(&self.dom)
  }

  /// Full document size.
  pub fn page_size(&self) -> PageSize {
    PageSize::new(Arc::clone(&self.dom))
  }

  /// Browser family and local date-time, read from the context's clock.
  pub fn web_info(&self) -> WebInfo {
    WebInfo::new(Arc::clone(&self.dom), Arc::clone(&self.clock))
  }

  fn warn_if_detached(&self, node: NodeId) {
    if !self.dom.is_attached(node) {
      self
        .logger
        .warn(crate::types::EchoesError::DetachedNode(node));
    }
  }
}
