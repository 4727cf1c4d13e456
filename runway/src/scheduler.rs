//! Frame and delay scheduling.
//!
//! Scroll notifications are coalesced to at most one pass per display frame.
//! Cancellation is not done through the scheduler: every scheduled wake-up is
//! tagged with the controller's generation, and a reset makes old tags stale.

use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};

/// Default display refresh interval (~60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Source of wake-ups for the controller.
pub trait Scheduler: Send + Sync {
    /// Resolves at the next display frame.
    fn next_frame(&self) -> BoxFuture<'static, ()>;

    /// Resolves once `duration` has elapsed.
    fn delay(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// Scheduler backed by tokio timers with a fixed frame interval.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    frame_interval: Duration,
}

impl TokioScheduler {
    pub fn new(frame_interval: Duration) -> Self {
        Self { frame_interval }
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new(FRAME_INTERVAL)
    }
}

impl Scheduler for TokioScheduler {
    fn next_frame(&self) -> BoxFuture<'static, ()> {
        tokio::time::sleep(self.frame_interval).boxed()
    }

    fn delay(&self, duration: Duration) -> BoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed()
    }
}

/// Scheduler whose wake-ups are already due.
///
/// Useful for headless hosts that pump commands synchronously.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn next_frame(&self) -> BoxFuture<'static, ()> {
        future::ready(()).boxed()
    }

    fn delay(&self, _duration: Duration) -> BoxFuture<'static, ()> {
        future::ready(()).boxed()
    }
}
