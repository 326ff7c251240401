/*!
Debug-gated logging.

Every message goes through the `log` facade under the `echoes` target with an
`ECHOES: ` prefix, but only while the owning context's debug flag is on.
*/

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const PREFIX: &str = "ECHOES";
const TARGET: &str = "echoes";

/// Logger shared by a context and everything it builds. Clone is cheap.
#[derive(Debug, Clone, Default)]
pub(crate) struct Logger {
  debug: Arc<AtomicBool>,
}

impl Logger {
  pub(crate) fn new(debug: bool) -> Self {
    Self {
      debug: Arc::new(AtomicBool::new(debug)),
    }
  }

  pub(crate) fn set_debug(&self, state: bool) {
    self.debug.store(state, Ordering::Relaxed);
  }

  pub(crate) fn is_debug(&self) -> bool {
    self.debug.load(Ordering::Relaxed)
  }

  pub(crate) fn log(&self, message: impl std::fmt::Display) {
    if self.is_debug() {
      log::info!(target: TARGET, "{PREFIX}: {message}");
    }
  }

  pub(crate) fn warn(&self, message: impl std::fmt::Display) {
    if self.is_debug() {
      log::warn!(target: TARGET, "{PREFIX}: {message}");
    }
  }

  pub(crate) fn error(&self, message: impl std::fmt::Display) {
    if self.is_debug() {
      log::error!(target: TARGET, "{PREFIX}: {message}");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn clones_share_the_flag() {
    let logger = Logger::new(false);
    let other = logger.clone();
    assert!(!other.is_debug());
    logger.set_debug(true);
    assert!(other.is_debug());
  }

  #[test]
  fn silent_logger_accepts_messages() {
    let logger = Logger::default();
    logger.log("created");
    logger.warn(format_args!("duplicate {}", 1));
    logger.error("missing");
    assert!(!logger.is_debug());
  }
}
