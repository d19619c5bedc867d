#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core shot-timing logic (display-agnostic).
//!
//! This crate holds everything a front end needs to time and grade an
//! espresso pull. Time comes in through `shot_traits::Clock` and periodic
//! re-sampling through `shot_traits::Ticker`.
//!
//! ## Architecture
//!
//! - **Timer**: pre-infusion → brew → idle state machine (`timer` module)
//! - **Ticker**: thread-backed tick source for live runs (`ticker` module)
//! - **Evaluator**: time-window classification of a finished shot (`evaluator`)
//! - **Calibration**: linear grind-time recommendation (`calibration`)
//! - **History**: most-recent-first in-memory log (`history`)
//! - **Session**: setup/pull/analyze/history workflow tying it together (`session`)
//!
//! ## Timing
//!
//! Elapsed time is always computed from clock deltas against the phase start
//! instant. Ticks only decide *when* we look at the clock, never *how much*
//! time has passed.

pub mod calibration;
pub mod config;
pub mod conversions;
pub mod error;
pub mod evaluator;
pub mod history;
pub mod session;
pub mod ticker;
pub mod timer;
pub mod util;

pub use calibration::recommend_grind_time;
pub use config::{ShotConfiguration, ShotType, TimerCfg};
pub use error::{SessionError, TimerError};
pub use evaluator::{ShotResult, ShotStatus, classify, evaluate};
pub use history::History;
pub use session::{LiveSession, Session, Step};
pub use ticker::ThreadTicker;
pub use timer::{LiveTimer, Phase, TimerEngine, TimerReading};
