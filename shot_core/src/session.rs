//! Shot workflow: setup → pull → analyze, plus the history log.
//!
//! `Session` is the single owner of all mutable state. Front ends call its
//! methods in response to user input and read it back to render. Rejected
//! operations return a `SessionError` and leave the session untouched.

use crate::config::{ShotConfiguration, ShotType, TimerCfg};
use crate::error::{SessionError, TimerError};
use crate::evaluator::{ShotResult, evaluate};
use crate::history::History;
use crate::ticker::ThreadTicker;
use crate::timer::{TimerEngine, TimerReading};
use crate::util::{number_or_zero, parse_lenient};
use chrono::{DateTime, Local};
use shot_traits::clock::{Clock, MonotonicClock};
use shot_traits::tick::Ticker;
use std::time::Duration;

/// Screen the user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Setup,
    Pull,
    Analyze,
    History,
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Pull => "pull",
            Self::Analyze => "analyze",
            Self::History => "history",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub struct Session<C: Clock, T: Ticker> {
    config: ShotConfiguration,
    engine: TimerEngine<C, T>,
    step: Step,
    /// Brew time frozen when the pull finished.
    actual_time_s: f64,
    /// Yield for the debrief; prefilled with the target on finish.
    actual_output_g: Option<f64>,
    latest: Option<ShotResult>,
    history: History,
}

/// Session on the real clock with a thread-backed tick.
pub type LiveSession = Session<MonotonicClock, ThreadTicker<MonotonicClock>>;

impl LiveSession {
    pub fn live(config: ShotConfiguration, timer: &TimerCfg) -> Self {
        let clock = MonotonicClock::new();
        Session::new(config, timer, clock, ThreadTicker::new(clock))
    }
}

impl<C: Clock, T: Ticker> Session<C, T> {
    pub fn new(config: ShotConfiguration, timer: &TimerCfg, clock: C, ticker: T) -> Self {
        let engine = TimerEngine::new(clock, ticker, timer, config.pre_infusion_s);
        let mut config = config;
        config.pre_infusion_s = engine.pre_infusion_s();
        Self {
            config,
            engine,
            step: Step::Setup,
            actual_time_s: 0.0,
            actual_output_g: None,
            latest: None,
            history: History::new(),
        }
    }

    pub fn config(&self) -> &ShotConfiguration {
        &self.config
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Result of the current debrief, if `analyze()` ran.
    pub fn latest(&self) -> Option<&ShotResult> {
        self.latest.as_ref()
    }

    pub fn actual_time_s(&self) -> f64 {
        self.actual_time_s
    }

    pub fn actual_output_g(&self) -> Option<f64> {
        self.actual_output_g
    }

    pub fn timer_active(&self) -> bool {
        self.engine.is_active()
    }

    pub fn reading(&self) -> TimerReading {
        self.engine.reading()
    }

    pub fn tick_period(&self) -> Duration {
        self.engine.period()
    }

    pub fn has_live_tick(&self) -> bool {
        self.engine.has_live_tick()
    }

    /// Drive the engine from its tick source; call often while a run is live.
    pub fn pump(&mut self) -> TimerReading {
        self.engine.pump()
    }

    pub fn recommended_grind_time_s(&self) -> Option<f64> {
        self.config.recommended_grind_time_s()
    }

    // ── setup fields ─────────────────────────────────────────────────────────

    pub fn set_shot_type(&mut self, shot_type: ShotType) {
        self.config.shot_type = shot_type;
    }

    pub fn set_grind_size(&mut self, size: i64) {
        self.config.set_grind_size(size);
    }

    pub fn set_calibration_time(&mut self, text: &str) {
        self.config.calibration_time_s = number_or_zero(text);
    }

    /// Unparsable text clears the yield, which disables the recommendation.
    pub fn set_calibration_yield(&mut self, text: &str) {
        self.config.calibration_yield_g = parse_lenient(text);
    }

    pub fn set_pre_infusion(&mut self, text: &str) -> Result<(), SessionError> {
        self.engine.set_pre_infusion(number_or_zero(text))?;
        self.config.pre_infusion_s = self.engine.pre_infusion_s();
        Ok(())
    }

    // ── pull screen ──────────────────────────────────────────────────────────

    pub fn enter_pull(&mut self) -> Result<(), SessionError> {
        self.expect_step(Step::Setup)?;
        self.step = Step::Pull;
        Ok(())
    }

    /// Back to setup. Not allowed mid-run.
    pub fn leave_pull(&mut self) -> Result<(), SessionError> {
        self.expect_step(Step::Pull)?;
        if self.engine.is_active() {
            return Err(SessionError::TimerRunning);
        }
        self.engine.teardown();
        self.step = Step::Setup;
        Ok(())
    }

    pub fn start_timer(&mut self) -> Result<TimerReading, SessionError> {
        self.expect_step(Step::Pull)?;
        Ok(self.engine.start()?)
    }

    /// Stop the run but stay on the pull screen.
    pub fn stop_timer(&mut self) -> Result<f64, SessionError> {
        self.expect_step(Step::Pull)?;
        let t = self.engine.stop()?;
        self.actual_time_s = t;
        Ok(t)
    }

    pub fn reset_timer(&mut self) -> Result<(), SessionError> {
        self.expect_step(Step::Pull)?;
        self.engine.reset()?;
        self.actual_time_s = 0.0;
        Ok(())
    }

    /// Stop (if running), freeze the brew time and move to the debrief with
    /// the output prefilled to the target yield. The engine is left at
    /// idle/zero, so a pull can only be finished once.
    pub fn finish_pull(&mut self) -> Result<f64, SessionError> {
        self.expect_step(Step::Pull)?;
        let t = if self.engine.is_active() {
            self.engine.stop()?
        } else {
            self.engine
                .extraction_s()
                .ok_or(TimerError::NotActive)?
        };
        // The frozen time lives on in the debrief only; the engine goes idle.
        self.engine.teardown();
        self.actual_time_s = t;
        self.actual_output_g = Some(self.config.target_output_g());
        self.latest = None;
        self.step = Step::Analyze;
        tracing::debug!(extraction_s = t, "pull finished");
        Ok(t)
    }

    // ── debrief ──────────────────────────────────────────────────────────────

    /// Override the prefilled yield; unparsable text becomes 0.
    pub fn set_output(&mut self, text: &str) -> Result<(), SessionError> {
        self.expect_step(Step::Analyze)?;
        if self.latest.is_some() {
            return Err(SessionError::AlreadyAnalyzed);
        }
        self.actual_output_g = Some(number_or_zero(text));
        Ok(())
    }

    /// Grade the shot and prepend it to the history.
    pub fn analyze_at(&mut self, at: DateTime<Local>) -> Result<&ShotResult, SessionError> {
        self.expect_step(Step::Analyze)?;
        if self.latest.is_some() {
            return Err(SessionError::AlreadyAnalyzed);
        }
        let output = self.actual_output_g.unwrap_or(0.0);
        let result = evaluate(&self.config, self.actual_time_s, output, at);
        let recorded = self.history.record(result).clone();
        let latest: &ShotResult = self.latest.insert(recorded);
        Ok(latest)
    }

    pub fn analyze(&mut self) -> Result<&ShotResult, SessionError> {
        self.analyze_at(Local::now())
    }

    /// Start over from setup, keeping configuration and history.
    pub fn reset_workflow(&mut self) {
        self.engine.teardown();
        self.step = Step::Setup;
        self.actual_time_s = 0.0;
        self.actual_output_g = None;
        self.latest = None;
    }

    // ── history ──────────────────────────────────────────────────────────────

    /// Reachable from any screen; leaving the pull screen abandons a live run.
    pub fn open_history(&mut self) {
        if self.step == Step::Pull {
            self.engine.teardown();
        }
        self.step = Step::History;
    }

    pub fn close_history(&mut self) -> Result<(), SessionError> {
        self.expect_step(Step::History)?;
        self.step = Step::Setup;
        Ok(())
    }

    pub fn purge_history(&mut self) -> usize {
        self.history.purge()
    }

    /// Abandon any run without changing screens (e.g. on shutdown).
    pub fn teardown(&mut self) {
        self.engine.teardown();
    }

    fn expect_step(&self, expected: Step) -> Result<(), SessionError> {
        if self.step == expected {
            Ok(())
        } else {
            tracing::warn!(%expected, actual = %self.step, "operation rejected on this screen");
            Err(SessionError::WrongStep {
                expected,
                actual: self.step,
            })
        }
    }
}
