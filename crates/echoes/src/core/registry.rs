/*!
Registry - named conditions in registration order.

All fields are private. Insertion goes through [`Registry::insert`], which
validates the name, keeps the index in step with the entry list and emits
`EventAdded`.
*/

use async_broadcast::Sender;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::conditions::Condition;
use crate::types::{EchoesError, EchoesResult, Event};

struct Entry {
  name: String,
  condition: Arc<dyn Condition>,
  /// Same allocation as `condition`, kept for typed lookups.
  any: Arc<dyn Any + Send + Sync>,
}

pub(crate) struct Registry {
  events_tx: Sender<Event>,
  entries: Vec<Entry>,
  index: HashMap<String, usize>,
}

impl Registry {
  pub(crate) fn new(events_tx: Sender<Event>) -> Self {
    Self {
      events_tx,
      entries: Vec::new(),
      index: HashMap::new(),
    }
  }

  /// Broadcast an event. Drops it silently when nobody is subscribed.
  pub(crate) fn emit(&self, event: Event) {
    emit(&self.events_tx, event);
  }

  /// Register `condition` under `name`. The first registration of a name wins.
  pub(crate) fn insert<C: Condition>(&mut self, name: &str, condition: Arc<C>) -> EchoesResult<()> {
    if name.is_empty() {
      return Err(EchoesError::InvalidEventName);
    }
    if self.index.contains_key(name) {
      return Err(EchoesError::DuplicateEvent(name.to_string()));
    }

    self.index.insert(name.to_string(), self.entries.len());
    self.entries.push(Entry {
      name: name.to_string(),
      condition: Arc::clone(&condition) as Arc<dyn Condition>,
      any: condition,
    });
    self.emit(Event::EventAdded {
      name: name.to_string(),
    });
    Ok(())
  }

  fn entry(&self, name: &str) -> EchoesResult<&Entry> {
    self
      .index
      .get(name)
      .and_then(|&i| self.entries.get(i))
      .ok_or_else(|| EchoesError::UnknownEvent(name.to_string()))
  }

  pub(crate) fn condition(&self, name: &str) -> EchoesResult<Arc<dyn Condition>> {
    self.entry(name).map(|e| Arc::clone(&e.condition))
  }

  /// Typed lookup. `Ok(None)` when the name exists but holds another type.
  pub(crate) fn downcast<C: Condition>(&self, name: &str) -> EchoesResult<Option<Arc<C>>> {
    self
      .entry(name)
      .map(|e| Arc::clone(&e.any).downcast::<C>().ok())
  }

  pub(crate) fn names(&self) -> Vec<String> {
    self.entries.iter().map(|e| e.name.clone()).collect()
  }

  /// Every entry in registration order, for checking outside the lock.
  pub(crate) fn snapshot(&self) -> Vec<(String, Arc<dyn Condition>)> {
    self
      .entries
      .iter()
      .map(|e| (e.name.clone(), Arc::clone(&e.condition)))
      .collect()
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }
}

/// Broadcast on `tx`, logging only when the channel overflows.
pub(crate) fn emit(tx: &Sender<Event>, event: Event) {
  if let Err(e) = tx.try_broadcast(event) {
    if e.is_full() {
      log::error!(
        target: "echoes",
        "Event channel overflow - events are being dropped. \
         Consider a larger event capacity or processing events faster."
      );
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{Outcome, Trigger};

  #[derive(Debug)]
  struct Fixed(bool);

  impl Condition for Fixed {
    fn check(&self) -> Outcome {
      self.0.into()
    }
  }

  #[derive(Debug)]
  struct Once;

  impl Condition for Once {
    fn check(&self) -> Outcome {
      Outcome::NEUTRAL
    }

    fn trigger(&self) -> Trigger {
      Trigger::Edge
    }
  }

  fn registry() -> (Registry, async_broadcast::Receiver<Event>) {
    let (tx, rx) = async_broadcast::broadcast(16);
    (Registry::new(tx), rx)
  }

  #[test]
  fn insert_emits_event_added() {
    let (mut registry, mut rx) = registry();
    registry.insert("ready", Arc::new(Fixed(true))).unwrap();
    assert_eq!(
      rx.try_recv().unwrap(),
      Event::EventAdded {
        name: "ready".into()
      }
    );
  }

  #[test]
  fn duplicate_keeps_first() {
    let (mut registry, _rx) = registry();
    registry.insert("x", Arc::new(Fixed(true))).unwrap();
    assert_eq!(
      registry.insert("x", Arc::new(Fixed(false))),
      Err(EchoesError::DuplicateEvent("x".into()))
    );
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.condition("x").unwrap().check(), Outcome::Flag(true));
  }

  #[test]
  fn empty_name_rejected() {
    let (mut registry, _rx) = registry();
    assert_eq!(
      registry.insert("", Arc::new(Fixed(true))),
      Err(EchoesError::InvalidEventName)
    );
    assert_eq!(registry.len(), 0);
  }

  #[test]
  fn unknown_name_is_an_error() {
    let (registry, _rx) = registry();
    assert!(matches!(
      registry.condition("missing"),
      Err(EchoesError::UnknownEvent(name)) if name == "missing"
    ));
  }

  #[test]
  fn downcast_checks_type() {
    let (mut registry, _rx) = registry();
    registry.insert("once", Arc::new(Once)).unwrap();
    assert!(registry.downcast::<Once>("once").unwrap().is_some());
    assert!(registry.downcast::<Fixed>("once").unwrap().is_none());
    assert!(registry.downcast::<Once>("nope").is_err());
  }

  #[test]
  fn names_keep_registration_order() {
    let (mut registry, _rx) = registry();
    for name in ["c", "a", "b"] {
      registry.insert(name, Arc::new(Fixed(false))).unwrap();
    }
    assert_eq!(registry.names(), ["c", "a", "b"]);
    let snapshot: Vec<String> = registry.snapshot().into_iter().map(|(n, _)| n).collect();
    assert_eq!(snapshot, ["c", "a", "b"]);
  }
}
