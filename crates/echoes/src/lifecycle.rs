/*!
Lifecycle hooks: start, awake, and a throttled per-frame update loop.

The update loop rides on animation frames. Each frame asks a [`FrameThrottle`]
whether enough time has passed, calls the update function if so, and requests
the next frame.

The loop itself holds only a weak reference to the document. An update
function that captures the context (or the document) keeps the document
alive through the queued frame, so such a loop runs until
[`UpdateHandle::cancel`] is called.
*/

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::logging::Logger;
use crate::platform::Dom;
use crate::types::{EchoesError, EchoesResult};

/// Update rate used by [`Lifecycle::on_update_default`].
pub const DEFAULT_FPS: f64 = 60.0;

/// Tolerance for frame timestamps that land a hair short of the interval.
pub const FRAME_SLACK_MS: f64 = 1.0;

/// Gate that opens at most once per frame interval.
///
/// Timestamps are supplied by the caller, so the gate works with any frame
/// source. The last firing time starts at 0 and a late frame is not
/// compensated: the next interval counts from the frame that actually fired.
/// A frame up to [`FRAME_SLACK_MS`] early still passes, so a 30 fps gate over
/// 60 Hz frames opens on every second frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameThrottle {
  interval_ms: f64,
  last_ms: f64,
}

impl FrameThrottle {
  /// Throttle to `fps` updates per second. `fps` must be positive and finite.
  pub fn new(fps: f64) -> EchoesResult<Self> {
    if !fps.is_finite() || fps <= 0.0 {
      return Err(EchoesError::InvalidFrameRate(fps));
    }
    Ok(Self {
      interval_ms: 1000.0 / fps,
      last_ms: 0.0,
    })
  }

  /// Milliseconds between updates.
  pub const fn interval_ms(&self) -> f64 {
    self.interval_ms
  }

  /// Timestamp of the last frame that passed the gate.
  pub const fn last_ms(&self) -> f64 {
    self.last_ms
  }

  /// Whether a frame at `now_ms` should run the update. Records it if so.
  pub fn should_fire(&mut self, now_ms: f64) -> bool {
    if now_ms - self.last_ms + FRAME_SLACK_MS < self.interval_ms {
      return false;
    }
    self.last_ms = now_ms;
    true
  }
}

/// Handle to a running update loop.
///
/// Dropping the handle leaves the loop running; call [`cancel`](Self::cancel)
/// to stop it. Cancelling also releases the update function (and whatever it
/// captured) once the pending frame has run. Clones control the same loop.
#[derive(Debug, Clone, Default)]
pub struct UpdateHandle {
  cancelled: Arc<AtomicBool>,
}

impl UpdateHandle {
  /// Stop the loop. The pending frame still arrives but does nothing.
  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::SeqCst);
  }

  /// Whether [`cancel`](Self::cancel) was called on this loop.
  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }
}

/// State carried from one animation frame to the next.
struct UpdateLoop<F> {
  dom: Weak<dyn Dom>,
  throttle: FrameThrottle,
  update: F,
  handle: UpdateHandle,
}

impl<F: FnMut() + Send + 'static> UpdateLoop<F> {
  fn schedule(self) {
    if self.handle.is_cancelled() {
      return;
    }
    let Some(dom) = self.dom.upgrade() else {
      return;
    };
    dom.request_animation_frame(Box::new(move |timestamp| self.frame(timestamp)));
  }

  fn frame(mut self, timestamp: f64) {
    if self.handle.is_cancelled() {
      return;
    }
    if self.throttle.should_fire(timestamp) {
      (self.update)();
    }
    self.schedule();
  }
}

/// Lifecycle hooks bound to one document.
///
/// Obtained from [`Echoes::lifecycle`](crate::Echoes::lifecycle).
pub struct Lifecycle {
  dom: Arc<dyn Dom>,
  logger: Logger,
  default_fps: f64,
}

impl std::fmt::Debug for Lifecycle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Lifecycle")
      .field("default_fps", &self.default_fps)
      .finish_non_exhaustive()
  }
}

impl Lifecycle {
  pub(crate) fn new(dom: Arc<dyn Dom>, logger: Logger, default_fps: f64) -> Self {
    logger.log("Lifecycle is now operative");
    Self {
      dom,
      logger,
      default_fps,
    }
  }

  /// Run `f` once the document has been parsed.
  ///
  /// Runs immediately when the document is already parsed.
  pub fn on_start(&self, f: impl FnOnce() + Send + 'static) {
    self.dom.on_ready(Box::new(f));
  }

  /// Run `f` right away.
  pub fn on_awake(&self, f: impl FnOnce()) {
    f();
  }

  /// Call `f` on animation frames, at most `fps` times per second.
  ///
  /// Returns `None` and logs an error when `fps` is not a positive, finite
  /// number; nothing is scheduled in that case.
  pub fn on_update(&self, f: impl FnMut() + Send + 'static, fps: f64) -> Option<UpdateHandle> {
    let throttle = match FrameThrottle::new(fps) {
      Ok(throttle) => throttle,
      Err(e) => {
        self.logger.error(e);
        return None;
      }
    };

    let handle = UpdateHandle::default();
    UpdateLoop {
      dom: Arc::downgrade(&self.dom),
      throttle,
      update: f,
      handle: handle.clone(),
    }
    .schedule();
    Some(handle)
  }

  /// [`on_update`](Self::on_update) at the context's default rate.
  pub fn on_update_default(&self, f: impl FnMut() + Send + 'static) -> Option<UpdateHandle> {
    self.on_update(f, self.default_fps)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::SimDocument;
  use std::sync::atomic::AtomicUsize;

  fn setup() -> (Arc<SimDocument>, Lifecycle) {
    let doc = Arc::new(SimDocument::new());
    let lifecycle = Lifecycle::new(doc.clone(), Logger::default(), DEFAULT_FPS);
    (doc, lifecycle)
  }

  fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&count);
    (count, move || {
      inner.fetch_add(1, Ordering::SeqCst);
    })
  }

  mod throttle {
    use super::*;

    #[test]
    fn rejects_invalid_rates() {
      for fps in [0.0, -30.0, f64::NAN, f64::INFINITY] {
        assert!(FrameThrottle::new(fps).is_err(), "fps {fps} accepted");
      }
      assert!(matches!(
        FrameThrottle::new(0.0),
        Err(EchoesError::InvalidFrameRate(_))
      ));
    }

    #[test]
    fn thirty_fps_over_sixty_hz_fires_every_other_frame() {
      let mut throttle = FrameThrottle::new(30.0).unwrap();
      let fired: Vec<bool> = (1..=8)
        .map(|i| throttle.should_fire(f64::from(i) * 17.0))
        .collect();
      assert_eq!(
        fired,
        [false, true, false, true, false, true, false, true]
      );
    }

    #[test]
    fn exact_sixty_hz_timestamps_fire_every_other_frame() {
      let mut throttle = FrameThrottle::new(30.0).unwrap();
      let fired = (1..=60)
        .filter(|&i| throttle.should_fire(f64::from(i) * 1000.0 / 60.0))
        .count();
      assert_eq!(fired, 30);
    }

    #[test]
    fn late_frame_resets_the_interval() {
      let mut throttle = FrameThrottle::new(10.0).unwrap();
      assert!(throttle.should_fire(250.0));
      assert_eq!(throttle.last_ms(), 250.0);
      assert!(!throttle.should_fire(340.0));
      assert!(throttle.should_fire(350.0));
    }
  }

  mod hooks {
    use super::*;

    #[test]
    fn on_start_waits_for_parsing() {
      let (doc, lifecycle) = setup();
      let (count, mut bump) = counter();
      lifecycle.on_start(move || bump());
      assert_eq!(count.load(Ordering::SeqCst), 0);

      doc.finish_parsing();
      assert_eq!(count.load(Ordering::SeqCst), 1);
      doc.finish_parsing();
      assert_eq!(count.load(Ordering::SeqCst), 1, "fires once");
    }

    #[test]
    fn on_start_after_parsing_runs_immediately() {
      let (doc, lifecycle) = setup();
      doc.finish_parsing();
      let (count, mut bump) = counter();
      lifecycle.on_start(move || bump());
      assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn on_awake_is_synchronous() {
      let (_doc, lifecycle) = setup();
      let mut ran = false;
      lifecycle.on_awake(|| ran = true);
      assert!(ran);
    }
  }

  mod update_loop {
    use super::*;

    #[test]
    fn thirty_fps_fires_about_every_second_frame() {
      let (doc, lifecycle) = setup();
      let (count, bump) = counter();
      let handle = lifecycle.on_update(bump, 30.0);
      assert!(handle.is_some());

      for _ in 0..60 {
        doc.advance_frame(17.0);
      }
      assert_eq!(count.load(Ordering::SeqCst), 30);
      assert_eq!(doc.pending_frames(), 1, "loop keeps rescheduling");
    }

    #[test]
    fn never_fires_on_frames_closer_than_the_interval() {
      let (doc, lifecycle) = setup();
      let times = Arc::new(parking_lot::Mutex::new(Vec::new()));
      let sink = Arc::clone(&times);
      let observed = Arc::clone(&doc);
      lifecycle.on_update(move || sink.lock().push(observed.now_ms()), 30.0);

      for delta in [5.0, 12.0, 17.0, 3.0, 30.0, 16.0, 16.0, 40.0, 1.0, 33.4] {
        doc.advance_frame(delta);
      }
      let times = times.lock();
      assert!(!times.is_empty());
      assert!(times
        .windows(2)
        .all(|w| w[1] - w[0] >= 1000.0 / 30.0 - FRAME_SLACK_MS));
    }

    #[test]
    fn thirty_fps_over_exact_sixty_hz_frames() {
      let (doc, lifecycle) = setup();
      let (count, bump) = counter();
      lifecycle.on_update(bump, 30.0);
      for i in 1..=60 {
        doc.run_frame(f64::from(i) * 1000.0 / 60.0);
      }
      assert_eq!(count.load(Ordering::SeqCst), 30);
    }

    #[test]
    fn default_rate_is_sixty() {
      let (doc, lifecycle) = setup();
      let (count, bump) = counter();
      lifecycle.on_update_default(bump);
      for _ in 0..10 {
        doc.advance_frame(17.0);
      }
      assert_eq!(count.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn invalid_rate_schedules_nothing() {
      let (doc, lifecycle) = setup();
      let (count, bump) = counter();
      assert!(lifecycle.on_update(bump, 0.0).is_none());
      assert_eq!(doc.pending_frames(), 0);
      doc.advance_frame(100.0);
      assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_stops_rescheduling() {
      let (doc, lifecycle) = setup();
      let (count, bump) = counter();
      let handle = lifecycle.on_update(bump, 60.0).unwrap();
      doc.advance_frame(17.0);
      assert_eq!(count.load(Ordering::SeqCst), 1);

      handle.cancel();
      assert!(handle.is_cancelled());
      doc.advance_frame(17.0);
      doc.advance_frame(17.0);
      assert_eq!(count.load(Ordering::SeqCst), 1);
      assert_eq!(doc.pending_frames(), 0);
    }

    #[test]
    fn loop_alone_does_not_keep_the_document_alive() {
      let (doc, lifecycle) = setup();
      let weak = Arc::downgrade(&doc);
      let (_count, bump) = counter();
      lifecycle.on_update(bump, 60.0);
      drop(lifecycle);
      drop(doc);
      assert!(weak.upgrade().is_none());
    }

    #[test]
    fn cancel_releases_a_captured_document() {
      let (doc, lifecycle) = setup();
      let weak = Arc::downgrade(&doc);
      let captured = Arc::clone(&doc);
      let handle = lifecycle
        .on_update(
          move || {
            captured.now_ms();
          },
          60.0,
        )
        .unwrap();
      drop(lifecycle);

      doc.advance_frame(17.0);
      assert_eq!(doc.pending_frames(), 1);
      handle.cancel();
      doc.advance_frame(17.0);
      assert_eq!(doc.pending_frames(), 0);

      drop(doc);
      assert!(weak.upgrade().is_none());
    }

    #[test]
    fn dropping_the_handle_keeps_running() {
      let (doc, lifecycle) = setup();
      let (count, bump) = counter();
      drop(lifecycle.on_update(bump, 60.0));
      doc.advance_frame(17.0);
      doc.advance_frame(17.0);
      assert_eq!(count.load(Ordering::SeqCst), 2);
    }
  }
}
