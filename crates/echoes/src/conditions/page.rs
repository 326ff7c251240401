/*! Full document size. */

use std::fmt;
use std::sync::Arc;

use super::Condition;
use crate::platform::Dom;
use crate::types::{BoxMetrics, NodeId, Outcome, Size};

/// Reports the document's full width and height.
///
/// Measured as the largest scroll, offset and client dimension across both
/// the document element and the body, since browsers disagree on which of
/// them carries the document size.
pub struct PageSize {
  dom: Arc<dyn Dom>,
}

impl fmt::Debug for PageSize {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PageSize").finish_non_exhaustive()
  }
}

impl PageSize {
  /// Measure the document behind `dom`.
  pub fn new(dom: Arc<dyn Dom>) -> Self {
    Self { dom }
  }

  /// Current document extent.
  pub fn size(&self) -> Size {
    BoxMetrics::document_extent(
      &self.dom.metrics(NodeId::ROOT),
      &self.dom.metrics(NodeId::BODY),
    )
  }

  /// Document width.
  pub fn width(&self) -> f64 {
    self.size().width
  }

  /// Document height.
  pub fn height(&self) -> f64 {
    self.size().height
  }
}

impl Condition for PageSize {
  fn check(&self) -> Outcome {
    Outcome::Size(self.size())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::SimDocument;

  #[test]
  fn takes_max_across_root_and_body() {
    let doc = Arc::new(SimDocument::new());
    doc.set_metrics(
      NodeId::ROOT,
      BoxMetrics {
        scroll: Size::new(1280.0, 720.0),
        offset: Size::new(1280.0, 720.0),
        client: Size::new(1265.0, 720.0),
      },
    );
    doc.set_metrics(
      NodeId::BODY,
      BoxMetrics {
        scroll: Size::new(1265.0, 4200.0),
        offset: Size::new(1249.0, 4184.0),
        client: Size::new(1249.0, 4184.0),
      },
    );

    let page = PageSize::new(doc.clone());
    assert_eq!(page.size(), Size::new(1280.0, 4200.0));
    assert_eq!(page.width(), 1280.0);
    assert_eq!(page.height(), 4200.0);
    assert_eq!(page.check(), Outcome::Size(Size::new(1280.0, 4200.0)));
  }

  #[test]
  fn empty_document_is_zero_sized() {
    let page = PageSize::new(Arc::new(SimDocument::new()));
    assert_eq!(page.size(), Size::default());
    assert!(page.check().is_truthy());
  }
}
