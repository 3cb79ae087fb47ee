//! Leading-Edge Throttle
//!
//! Wraps a zero-argument callback with a cooldown. The very first call runs
//! the callback immediately and arms a one-shot timer; calls made while the
//! timer counts down are dropped. When the timer fires the throttle returns
//! to idle and runs the callback once more on the next cooperative turn (the
//! trailing edge). Every armed window therefore ends with exactly one
//! trailing call, whether or not further calls arrived during it.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use throttle::Throttle;
//!
//! # async fn example() {
//! let throttle = Throttle::new(Duration::from_millis(100), || {
//!     println!("refresh");
//! });
//!
//! throttle.call(); // runs the callback now, arms the timer
//! throttle.call(); // dropped, still cooling
//! // ~100ms later the callback runs once more
//! # }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::yield_now;
use tokio::time::sleep;

/// Flags guarded by the state lock.
#[derive(Debug)]
struct ThrottleState {
    /// True while the one-shot timer is counting down
    pending: bool,
    /// True once the first-ever call has run the callback immediately
    fired_once: bool,
}

struct Inner<F> {
    cooldown: Duration,
    state: Mutex<ThrottleState>,
    callback: F,
}

impl<F> Inner<F> {
    fn lock(&self) -> MutexGuard<'_, ThrottleState> {
        // The callback never runs under the lock, so a poisoned lock holds
        // consistent state and can be recovered.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A throttled wrapper around a callback.
///
/// Cloning shares the cooldown state; all clones gate the same timer.
/// [`call`](Throttle::call) must run inside a tokio runtime.
pub struct Throttle<F> {
    inner: Arc<Inner<F>>,
}

impl<F> Clone for Throttle<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F> Throttle<F>
where
    F: Fn() + Send + Sync + 'static,
{
    /// Wrap `callback` with the given cooldown. Starts idle.
    pub fn new(cooldown: Duration, callback: F) -> Self {
        Self {
            inner: Arc::new(Inner {
                cooldown,
                state: Mutex::new(ThrottleState {
                    pending: false,
                    fired_once: false,
                }),
                callback,
            }),
        }
    }

    /// Invoke the wrapped callback subject to the cooldown.
    ///
    /// While cooling this is a no-op; the call is dropped, not queued. While
    /// idle it runs the callback synchronously if this is the first-ever
    /// call, then arms the timer. A panicking callback unwinds through this
    /// method on the leading edge and aborts the timer task on the trailing
    /// edge; nothing is caught here.
    pub fn call(&self) {
        let fire_now = {
            let mut state = self.inner.lock();
            if state.pending {
                tracing::trace!(target: "throttle", "call dropped during cooldown");
                return;
            }
            let first = !state.fired_once;
            state.fired_once = true;
            state.pending = true;
            first
        };

        if fire_now {
            (self.inner.callback)();
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            sleep(inner.cooldown).await;
            inner.lock().pending = false;
            // Trailing edge runs on the next cooperative turn, not inside
            // the timer wakeup itself.
            yield_now().await;
            (inner.callback)();
        });
    }

    /// The fixed cooldown duration.
    pub fn cooldown(&self) -> Duration {
        self.inner.cooldown
    }

    /// True while the one-shot timer is counting down.
    pub fn is_cooling(&self) -> bool {
        self.inner.lock().pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(cooldown_ms: u64) -> (Throttle<impl Fn() + Send + Sync>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let throttle = Throttle::new(Duration::from_millis(cooldown_ms), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (throttle, count)
    }

    #[tokio::test(start_paused = true)]
    async fn first_call_fires_immediately_and_arms_timer() {
        let (throttle, count) = counting(100);

        throttle.call();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(throttle.is_cooling());
    }

    #[tokio::test(start_paused = true)]
    async fn calls_during_cooldown_are_dropped() {
        let (throttle, count) = counting(100);

        throttle.call();
        for _ in 0..3 {
            sleep(Duration::from_millis(10)).await;
            throttle.call();
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Timer fires at t=100 regardless of the dropped calls
        sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(!throttle.is_cooling());
    }

    #[tokio::test(start_paused = true)]
    async fn lone_first_call_still_gets_trailing_call() {
        let (throttle, count) = counting(100);

        throttle.call();
        sleep(Duration::from_millis(200)).await;

        // Leading edge plus the unconditional trailing edge
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_call_after_first_is_trailing_only() {
        let (throttle, count) = counting(100);

        throttle.call();
        sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        // fired_once is set: no immediate invocation this time
        throttle.call();
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(throttle.is_cooling());

        sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn at_most_one_timer_per_window() {
        let (throttle, count) = counting(100);

        throttle.call();
        for _ in 0..10 {
            throttle.call();
        }
        sleep(Duration::from_millis(500)).await;

        // One leading call, one trailing call, nothing else
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clones_share_cooldown_state() {
        let (throttle, count) = counting(100);
        let clone = throttle.clone();

        throttle.call();
        clone.call();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(clone.is_cooling());

        sleep(Duration::from_millis(200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_windows_each_fire_trailing() {
        let (throttle, count) = counting(50);

        throttle.call();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        throttle.call();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        throttle.call();
        sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn cooldown_accessor() {
        let (throttle, _count) = counting(250);
        assert_eq!(throttle.cooldown(), Duration::from_millis(250));
        assert!(!throttle.is_cooling());
    }
}
