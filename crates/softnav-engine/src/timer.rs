//! Timers
//!
//! The exit-transition delay is the first suspension point of a
//! navigation; the timer is injected so tests can run without waiting.

use std::future::Future;
use std::time::Duration;

/// Something that can sleep
pub trait Timer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Wall-clock timer on smol's reactor
#[derive(Debug, Clone, Copy, Default)]
pub struct SmolTimer;

impl Timer for SmolTimer {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        async move {
            smol::Timer::after(duration).await;
        }
    }
}

/// Ignores the duration but still yields once to the executor, so other
/// tasks get to run at the same point they would with a real delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateTimer;

impl Timer for ImmediateTimer {
    fn sleep(&self, _duration: Duration) -> impl Future<Output = ()> {
        smol::future::yield_now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_smol_timer_waits() {
        let start = Instant::now();
        smol::block_on(SmolTimer.sleep(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_immediate_timer_does_not_wait() {
        let start = Instant::now();
        smol::block_on(ImmediateTimer.sleep(Duration::from_secs(60)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
