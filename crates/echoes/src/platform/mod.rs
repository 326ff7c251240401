/*! Document Abstraction Layer */

mod sim;
mod traits;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod web;

pub use sim::SimDocument;
pub use traits::{
  Dom, DomEvent, DomEventKind, EventTarget, FrameCallback, Listener, ReadyCallback, StyleProperty,
};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use web::WebDom;
