/*! Error types for Echoes operations. */

use super::NodeId;

/// Errors that can occur during Echoes operations.
///
/// None of these are fatal. The public API logs them through the gated logger
/// and degrades to a neutral return value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EchoesError {
  #[error("Invalid event name")]
  InvalidEventName,

  #[error("The event \"{0}\" already exists")]
  DuplicateEvent(String),

  #[error("The event \"{0}\" doesn't exist")]
  UnknownEvent(String),

  #[error("There is no element {0} in the document")]
  DetachedNode(NodeId),

  #[error("Invalid frame rate: {0} (must be a positive, finite number)")]
  InvalidFrameRate(f64),
}

/// Result type for Echoes operations.
pub type EchoesResult<T> = Result<T, EchoesError>;
