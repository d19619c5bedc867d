use std::time::Duration;

/// Live periodic tick source.
///
/// A tick carries no data; it only tells the owner to re-sample its clock.
/// Handles must stop firing once cancelled or dropped.
pub trait TickHandle {
    /// Number of ticks fired since the previous call.
    fn drain(&mut self) -> usize;
    /// Stop the source. Idempotent.
    fn cancel(&mut self);
    fn is_live(&self) -> bool;
}

/// Factory for tick sources.
pub trait Ticker {
    type Handle: TickHandle;

    fn schedule(&self, period: Duration) -> Self::Handle;
}

#[cfg(any(test, feature = "test-util"))]
pub mod manual {
    use super::{Duration, TickHandle, Ticker};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Default)]
    struct Shared {
        pending: usize,
        live: usize,
        scheduled: usize,
        cancelled: usize,
        last_period: Option<Duration>,
    }

    /// Ticker driven by hand from tests. Clones observe the same counters.
    #[derive(Debug, Clone, Default)]
    pub struct ManualTicker {
        shared: Arc<Mutex<Shared>>,
    }

    impl ManualTicker {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fire one tick on the live handle, if any.
        pub fn fire(&self) {
            self.fire_n(1);
        }

        pub fn fire_n(&self, n: usize) {
            if let Ok(mut s) = self.shared.lock()
                && s.live > 0
            {
                s.pending = s.pending.saturating_add(n);
            }
        }

        /// Handles scheduled and not yet cancelled.
        pub fn live(&self) -> usize {
            self.shared.lock().map(|s| s.live).unwrap_or(0)
        }

        pub fn scheduled(&self) -> usize {
            self.shared.lock().map(|s| s.scheduled).unwrap_or(0)
        }

        pub fn cancelled(&self) -> usize {
            self.shared.lock().map(|s| s.cancelled).unwrap_or(0)
        }

        pub fn last_period(&self) -> Option<Duration> {
            self.shared.lock().ok().and_then(|s| s.last_period)
        }
    }

    impl Ticker for ManualTicker {
        type Handle = ManualTickHandle;

        fn schedule(&self, period: Duration) -> ManualTickHandle {
            if let Ok(mut s) = self.shared.lock() {
                s.live += 1;
                s.scheduled += 1;
                s.pending = 0;
                s.last_period = Some(period);
            }
            ManualTickHandle {
                shared: Arc::clone(&self.shared),
                live: true,
            }
        }
    }

    #[derive(Debug)]
    pub struct ManualTickHandle {
        shared: Arc<Mutex<Shared>>,
        live: bool,
    }

    impl TickHandle for ManualTickHandle {
        fn drain(&mut self) -> usize {
            if !self.live {
                return 0;
            }
            self.shared
                .lock()
                .map(|mut s| std::mem::take(&mut s.pending))
                .unwrap_or(0)
        }

        fn cancel(&mut self) {
            if !self.live {
                return;
            }
            self.live = false;
            if let Ok(mut s) = self.shared.lock() {
                s.live = s.live.saturating_sub(1);
                s.cancelled += 1;
                s.pending = 0;
            }
        }

        fn is_live(&self) -> bool {
            self.live
        }
    }

    impl Drop for ManualTickHandle {
        fn drop(&mut self) {
            self.cancel();
        }
    }
}
