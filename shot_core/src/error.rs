use crate::session::Step;
use thiserror::Error;

/// Rejected timer operations. None of these change engine state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    #[error("timer already running")]
    AlreadyActive,
    #[error("timer is not running")]
    NotActive,
    #[error("cannot reset while the timer is running")]
    ResetWhileActive,
    #[error("pre-infusion can only change while the timer is idle")]
    ConfigLocked,
}

/// Rejected workflow operations. The session stays on its current screen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Timer(#[from] TimerError),
    #[error("not available on the {actual} screen (needs {expected})")]
    WrongStep { expected: Step, actual: Step },
    #[error("timer is running; stop it first")]
    TimerRunning,
    #[error("shot already analyzed; start a new shot")]
    AlreadyAnalyzed,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown shot type '{0}' (expected single or double)")]
pub struct ParseShotTypeError(pub String);
