//! Time seams shared across the shot timer stack.
//!
//! `Clock` supplies monotonic instants; `Ticker` supplies the cancellable
//! periodic tick that asks the timer engine to re-sample the clock.
pub mod clock;
pub mod tick;

pub use clock::{Clock, MonotonicClock};
pub use tick::{TickHandle, Ticker};

#[cfg(any(test, feature = "test-util"))]
pub use clock::manual::ManualClock;
#[cfg(any(test, feature = "test-util"))]
pub use tick::manual::{ManualTickHandle, ManualTicker};
