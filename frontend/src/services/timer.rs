//! Browser timer for the widget init timeout.

use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};
use vetimport::Timer;

/// `setTimeout` backed [`Timer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

impl Timer for GlooTimer {
    fn sleep(&self, after: Duration) -> LocalBoxFuture<'static, ()> {
        gloo_timers::future::sleep(after).boxed_local()
    }
}
