/*! Events broadcast to subscribers of an [`Echoes`](crate::Echoes) context. */

use super::Outcome;
use serde::Serialize;
use ts_rs::TS;

/// Events emitted when registry state changes or a polled condition fires.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "event", content = "data")]
#[ts(export)]
pub enum Event {
  /// A condition was registered under a new name.
  #[serde(rename = "event:added")]
  EventAdded { name: String },

  /// A registered condition reported a truthy outcome during a poll sweep.
  #[serde(rename = "event:fired")]
  EventFired { name: String, outcome: Outcome },

  /// The document finished parsing.
  #[serde(rename = "document:ready")]
  DocumentReady,
}
