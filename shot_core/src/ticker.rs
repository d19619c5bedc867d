//! Background tick source for live runs.
//!
//! Spawns a thread that sleeps one period at a time and pushes a unit tick
//! into a bounded channel. The thread never touches timer state; the owner
//! drains ticks on its own thread and re-samples the clock.
//!
//! Safety: each `TickThread` owns exactly one thread, which is stopped and
//! joined on `cancel()` or drop, so a finished run cannot leave a live tick
//! behind.
use crossbeam_channel as xch;
use shot_traits::clock::Clock;
use shot_traits::tick::{TickHandle, Ticker};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// `Ticker` backed by one OS thread per scheduled handle.
#[derive(Debug, Clone, Default)]
pub struct ThreadTicker<C> {
    clock: C,
}

impl<C> ThreadTicker<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock + Clone + Send + 'static> Ticker for ThreadTicker<C> {
    type Handle = TickThread;

    fn schedule(&self, period: Duration) -> TickThread {
        TickThread::spawn(period, self.clock.clone())
    }
}

pub struct TickThread {
    rx: xch::Receiver<()>,
    /// Shutdown flag for immediate response (atomic for lock-free check)
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl TickThread {
    pub fn spawn<C: Clock + Send + 'static>(period: Duration, clock: C) -> Self {
        // Capacity 1: ticks coalesce while the owner is busy.
        let (tx, rx) = xch::bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("tick thread received shutdown signal");
                    break;
                }
                clock.sleep(period);
                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                match tx.try_send(()) {
                    Ok(()) | Err(xch::TrySendError::Full(())) => {}
                    Err(xch::TrySendError::Disconnected(())) => {
                        tracing::debug!("tick consumer disconnected, exiting thread");
                        break;
                    }
                }
            }
            tracing::trace!("tick thread exiting cleanly");
        });

        Self {
            rx,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Block until the next tick or `timeout`; returns whether a tick arrived.
    ///
    /// A tick received here is consumed: a later `drain()` will not count it.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.rx.recv_timeout(timeout).is_ok()
    }
}

impl TickHandle for TickThread {
    fn drain(&mut self) -> usize {
        self.rx.try_iter().count()
    }

    fn cancel(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // The thread notices the flag after at most one period of sleep.
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("tick thread joined");
                }
                Err(e) => {
                    tracing::warn!(?e, "tick thread panicked during shutdown");
                }
            }
        }
    }

    fn is_live(&self) -> bool {
        self.join_handle.is_some()
    }
}

impl Drop for TickThread {
    fn drop(&mut self) {
        self.cancel();
    }
}
