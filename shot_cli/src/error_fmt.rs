//! Human-readable error descriptions and structured JSON error formatting.

use shot_core::{SessionError, TimerError};

fn timer_hint(te: &TimerError) -> String {
    match te {
        TimerError::AlreadyActive => {
            "What happened: The timer is already running.\nHow to fix: Type `stop` to end the pull, or wait for it to finish.".to_string()
        }
        TimerError::NotActive => {
            "What happened: No pull is running.\nHow to fix: Type `start` first, then `stop` when the cup is full.".to_string()
        }
        TimerError::ResetWhileActive => {
            "What happened: Cannot reset while the timer is running.\nHow to fix: Type `stop` first, then `reset`.".to_string()
        }
        TimerError::ConfigLocked => {
            "What happened: Pre-infusion can only change while the timer is idle.\nHow to fix: Finish or reset the current pull, then set `pre` again.".to_string()
        }
    }
}

/// Map an eyre::Report to a human-readable explanation with a fix hint.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(te) = err.downcast_ref::<TimerError>() {
        return timer_hint(te);
    }
    if let Some(se) = err.downcast_ref::<SessionError>() {
        return describe_session(se);
    }

    // String-based heuristics for errors coming from config or logging init
    let msg = format!("{err:#}");
    let lower = msg.to_ascii_lowercase();

    if lower.contains("invalid configuration") || lower.contains("parse config") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: A value is out of range or has the wrong type.\nHow to fix: Edit the TOML config and try again."
        );
    }
    if lower.contains("read config") {
        return format!(
            "What happened: Could not read the config file ({msg}).\nHow to fix: Check the --config path, or omit it to use defaults."
        );
    }
    if lower.contains("log level") || lower.contains("logging.level") {
        return format!(
            "What happened: Unknown log level ({msg}).\nHow to fix: Use one of error|warn|info|debug|trace."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Short explanation for a rejected workflow step.
pub fn describe_session(se: &SessionError) -> String {
    match se {
        SessionError::Timer(te) => timer_hint(te),
        SessionError::WrongStep { expected, actual } => format!(
            "What happened: That command belongs to the {expected} screen; you are on {actual}.\nHow to fix: Type `status` to see what is available here."
        ),
        SessionError::TimerRunning => {
            "What happened: The timer is still running.\nHow to fix: Type `stop` before leaving the pull screen.".to_string()
        }
        SessionError::AlreadyAnalyzed => {
            "What happened: This shot is already logged.\nHow to fix: Type `new` to set up the next shot.".to_string()
        }
    }
}

/// Stable machine name for the error kind.
fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(se) = err.downcast_ref::<SessionError>() {
        return match se {
            SessionError::Timer(_) => "Timer",
            SessionError::WrongStep { .. } => "WrongStep",
            SessionError::TimerRunning => "TimerRunning",
            SessionError::AlreadyAnalyzed => "AlreadyAnalyzed",
        };
    }
    if err.downcast_ref::<TimerError>().is_some() {
        return "Timer";
    }
    let lower = format!("{err:#}").to_ascii_lowercase();
    if lower.contains("config") {
        return "Config";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({ "reason": reason_name(err), "message": humanize(err) }).to_string()
}
