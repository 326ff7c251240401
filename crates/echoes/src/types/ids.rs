/*! Branded ID types for type-safe node references. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Handle to a node in the host document.
///
/// Handles are issued by the [`Dom`](crate::Dom) backend. Two are reserved:
/// [`NodeId::ROOT`] for the document element and [`NodeId::BODY`] for the body.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct NodeId(pub u32);

impl NodeId {
  /// The document element (`<html>`).
  pub const ROOT: Self = Self(0);
  /// The document body (`<body>`).
  pub const BODY: Self = Self(1);

  /// First id available for ordinary elements.
  pub(crate) const FIRST_ELEMENT: u32 = 2;

  /// Whether this is one of the two reserved document nodes.
  pub const fn is_reserved(self) -> bool {
    self.0 < Self::FIRST_ELEMENT
  }
}
