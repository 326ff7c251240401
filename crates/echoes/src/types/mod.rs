/*! Core types for Echoes.

Regenerate TypeScript types: `cargo test -p echoes export_bindings`
*/

#![allow(missing_docs)]

mod error;
mod event;
mod geometry;
mod ids;
mod info;
mod outcome;

pub use error::{EchoesError, EchoesResult};
pub use event::Event;
pub use geometry::{BoxMetrics, Point, ScrollOffset, Size};
pub use ids::NodeId;
pub use info::{BrowserFamily, DateParts, DateTimeParts, TimeParts, WebInfoSnapshot};
pub use outcome::{Outcome, Trigger};
