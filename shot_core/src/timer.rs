//! Pre-infusion / brew timer.
//!
//! ```text
//!   Idle ──start()──▶ PreInfusion ──(remaining hits 0 on a sample)──▶ Brew
//!    ▲                     │                                          │
//!    └──────── stop() ─────┴──────────────────── stop() ──────────────┘
//! ```
//!
//! Every reading is derived from `clock.now()` minus the phase start
//! instant, so a late or skipped tick delays the display but never skews it.
//! While a run is active the engine holds exactly one tick handle; every
//! exit path cancels it.

use crate::config::TimerCfg;
use crate::error::TimerError;
use crate::ticker::ThreadTicker;
use shot_traits::clock::{Clock, MonotonicClock};
use shot_traits::tick::{TickHandle, Ticker};
use std::time::{Duration, Instant};

/// Observable phase of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    PreInfusion,
    Brew,
}

impl Phase {
    /// Caption for the displayed number.
    pub fn label(self) -> &'static str {
        match self {
            Self::PreInfusion => "PRE-INFUSION",
            Self::Idle | Self::Brew => "SECONDS",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::PreInfusion => "preinfusion",
            Self::Brew => "brew",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy)]
enum RunState {
    Idle,
    PreInfusion { since: Instant },
    Brew { since: Instant },
}

/// Snapshot of what a front end should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerReading {
    pub phase: Phase,
    pub active: bool,
    /// Remaining pre-infusion seconds during pre-infusion, brew seconds otherwise.
    pub display_s: f64,
    pub pre_infusion_remaining_s: f64,
    pub elapsed_s: f64,
}

impl TimerReading {
    pub fn label(&self) -> &'static str {
        self.phase.label()
    }

    /// Fraction of the countdown consumed during pre-infusion, 0 otherwise.
    pub fn pre_infusion_progress(&self, pre_infusion_s: f64) -> f64 {
        if self.phase == Phase::PreInfusion && pre_infusion_s > 0.0 {
            (1.0 - self.pre_infusion_remaining_s / pre_infusion_s).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

pub struct TimerEngine<C: Clock, T: Ticker> {
    clock: C,
    ticker: T,
    period: Duration,
    pre_infusion_s: f64,
    state: RunState,
    elapsed_s: f64,
    /// Brew seconds carried across a phase restart; 0 through a normal run.
    accumulated_s: f64,
    pre_infusion_remaining_s: f64,
    extraction_s: Option<f64>,
    tick: Option<T::Handle>,
}

/// Engine on the real clock with a thread-backed tick.
pub type LiveTimer = TimerEngine<MonotonicClock, ThreadTicker<MonotonicClock>>;

impl LiveTimer {
    pub fn live(cfg: &TimerCfg, pre_infusion_s: f64) -> Self {
        let clock = MonotonicClock::new();
        TimerEngine::new(clock, ThreadTicker::new(clock), cfg, pre_infusion_s)
    }
}

impl<C: Clock, T: Ticker> TimerEngine<C, T> {
    pub fn new(clock: C, ticker: T, cfg: &TimerCfg, pre_infusion_s: f64) -> Self {
        let pre = sanitize_secs(pre_infusion_s);
        Self {
            clock,
            ticker,
            period: cfg.period(),
            pre_infusion_s: pre,
            state: RunState::Idle,
            elapsed_s: 0.0,
            accumulated_s: 0.0,
            pre_infusion_remaining_s: pre,
            extraction_s: None,
            tick: None,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, RunState::Idle)
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            RunState::Idle => Phase::Idle,
            RunState::PreInfusion { .. } => Phase::PreInfusion,
            RunState::Brew { .. } => Phase::Brew,
        }
    }

    pub fn pre_infusion_s(&self) -> f64 {
        self.pre_infusion_s
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Brew time frozen by the last `stop()`, cleared by `reset()`.
    pub fn extraction_s(&self) -> Option<f64> {
        self.extraction_s
    }

    pub fn has_live_tick(&self) -> bool {
        self.tick.as_ref().is_some_and(TickHandle::is_live)
    }

    /// Change the pre-infusion duration. Only allowed while idle; bad values become 0.
    pub fn set_pre_infusion(&mut self, secs: f64) -> Result<(), TimerError> {
        if self.is_active() {
            tracing::warn!("pre-infusion change rejected: run in progress");
            return Err(TimerError::ConfigLocked);
        }
        self.pre_infusion_s = sanitize_secs(secs);
        self.pre_infusion_remaining_s = self.pre_infusion_s;
        tracing::debug!(pre_infusion_s = self.pre_infusion_s, "pre-infusion set");
        Ok(())
    }

    /// Begin a run in pre-infusion and schedule the tick source.
    pub fn start(&mut self) -> Result<TimerReading, TimerError> {
        if self.is_active() {
            tracing::warn!("start rejected: run already active");
            return Err(TimerError::AlreadyActive);
        }
        self.cancel_tick();
        self.elapsed_s = 0.0;
        self.accumulated_s = 0.0;
        self.extraction_s = None;
        self.pre_infusion_remaining_s = self.pre_infusion_s;
        self.state = RunState::PreInfusion {
            since: self.clock.now(),
        };
        self.tick = Some(self.ticker.schedule(self.period));
        tracing::info!(
            pre_infusion_s = self.pre_infusion_s,
            tick_ms = u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX),
            "timer started"
        );
        Ok(self.reading())
    }

    /// Re-read the clock and update derived values, moving from pre-infusion
    /// to brew once the countdown is exhausted.
    pub fn sample(&mut self) -> TimerReading {
        match self.state {
            RunState::Idle => {}
            RunState::PreInfusion { since } => {
                let in_phase = self.clock.secs_since(since);
                let remaining = (self.pre_infusion_s - in_phase).max(0.0);
                if remaining > 0.0 {
                    self.pre_infusion_remaining_s = remaining;
                } else {
                    // Brew starts now; the soak is not part of the brew time.
                    self.pre_infusion_remaining_s = 0.0;
                    self.state = RunState::Brew {
                        since: self.clock.now(),
                    };
                    self.accumulated_s = 0.0;
                    self.elapsed_s = 0.0;
                    tracing::info!(pre_infusion_s = self.pre_infusion_s, "pre-infusion done, brewing");
                }
            }
            RunState::Brew { since } => {
                self.elapsed_s = self.clock.secs_since(since) + self.accumulated_s;
            }
        }
        self.reading()
    }

    /// Consume fired ticks; sample once if any fired.
    pub fn pump(&mut self) -> TimerReading {
        let fired = self.tick.as_mut().map_or(0, TickHandle::drain);
        if fired > 0 {
            self.sample()
        } else {
            self.reading()
        }
    }

    /// End the run and freeze the brew time.
    ///
    /// Stopping during pre-infusion yields 0: no brewing happened.
    pub fn stop(&mut self) -> Result<f64, TimerError> {
        let elapsed = match self.state {
            RunState::Idle => {
                tracing::warn!("stop rejected: no active run");
                return Err(TimerError::NotActive);
            }
            RunState::PreInfusion { .. } => 0.0,
            RunState::Brew { since } => self.clock.secs_since(since) + self.accumulated_s,
        };
        self.cancel_tick();
        self.state = RunState::Idle;
        self.accumulated_s = elapsed;
        self.elapsed_s = elapsed;
        self.extraction_s = Some(elapsed);
        self.pre_infusion_remaining_s = self.pre_infusion_s;
        tracing::info!(extraction_s = elapsed, "timer stopped");
        Ok(elapsed)
    }

    /// Zero everything. Rejected while a run is active.
    pub fn reset(&mut self) -> Result<(), TimerError> {
        if self.is_active() {
            tracing::warn!("reset rejected: run in progress");
            return Err(TimerError::ResetWhileActive);
        }
        self.clear();
        tracing::debug!("timer reset");
        Ok(())
    }

    /// Unconditionally abandon any run and return to idle/zero.
    pub fn teardown(&mut self) {
        if self.is_active() {
            tracing::info!(phase = %self.phase(), "run abandoned");
        }
        self.clear();
    }

    pub fn reading(&self) -> TimerReading {
        let phase = self.phase();
        let display_s = match phase {
            Phase::PreInfusion => self.pre_infusion_remaining_s,
            Phase::Idle | Phase::Brew => self.elapsed_s,
        };
        TimerReading {
            phase,
            active: self.is_active(),
            display_s,
            pre_infusion_remaining_s: self.pre_infusion_remaining_s,
            elapsed_s: self.elapsed_s,
        }
    }

    fn clear(&mut self) {
        self.cancel_tick();
        self.state = RunState::Idle;
        self.elapsed_s = 0.0;
        self.accumulated_s = 0.0;
        self.extraction_s = None;
        self.pre_infusion_remaining_s = self.pre_infusion_s;
    }

    fn cancel_tick(&mut self) {
        if let Some(mut handle) = self.tick.take() {
            handle.cancel();
        }
    }
}

impl<C: Clock, T: Ticker> Drop for TimerEngine<C, T> {
    fn drop(&mut self) {
        self.cancel_tick();
    }
}

fn sanitize_secs(secs: f64) -> f64 {
    if secs.is_finite() { secs.max(0.0) } else { 0.0 }
}
