/*!
Class-list helpers.

Each helper checks that the node is in the document first. A detached node
is reported through the logger and left untouched.
*/

use super::Echoes;
use crate::types::{EchoesError, EchoesResult, NodeId};

impl Echoes {
  fn attached(&self, node: NodeId) -> EchoesResult<NodeId> {
    if self.dom.is_attached(node) {
      Ok(node)
    } else {
      Err(EchoesError::DetachedNode(node))
    }
  }

  /// Add `class` to `node`'s class list.
  pub fn add_class(&self, node: NodeId, class: &str) {
    match self.attached(node) {
      Ok(node) => self.dom.class_add(node, class),
      Err(e) => self.logger.error(e),
    }
  }

  /// Whether `node` has `class`. `None` when the node is detached.
  pub fn has_class(&self, node: NodeId, class: &str) -> Option<bool> {
    self
      .attached(node)
      .map(|node| self.dom.class_contains(node, class))
      .map_err(|e| self.logger.error(e))
      .ok()
  }

  /// Remove `class` from `node`'s class list.
  pub fn remove_class(&self, node: NodeId, class: &str) {
    match self.attached(node) {
      Ok(node) => self.dom.class_remove(node, class),
      Err(e) => self.logger.error(e),
    }
  }
}
