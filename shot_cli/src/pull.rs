//! Interactive shot session: line commands on stdin, live timer on stdout.
//!
//! A reader thread forwards stdin lines over a channel. The control loop
//! waits on that channel with a timeout of one tick period while the timer
//! runs, pumping the engine and redrawing a single status line between
//! commands.

use crate::error_fmt::describe_session;
use crate::render;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use serde_json::{Value, json};
use shot_core::util::number_or_zero;
use shot_core::{Session, SessionError, ShotType, Step};
use shot_traits::{Clock, Ticker};
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Poll interval while idle; bounds how long Ctrl-C takes to be noticed.
const IDLE_POLL: Duration = Duration::from_millis(200);

pub enum Input {
    Line(String),
    Eof,
}

/// Forward stdin lines to the control loop until EOF or a read error.
pub fn spawn_stdin_reader() -> Receiver<Input> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(l) => {
                    if tx.send(Input::Line(l)).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
        let _ = tx.send(Input::Eof);
    });
    rx
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run the session until `quit`, EOF or the shutdown flag.
pub fn run<C, T, W>(
    session: &mut Session<C, T>,
    input: &Receiver<Input>,
    shutdown: &Arc<AtomicBool>,
    json: bool,
    out: &mut W,
) -> eyre::Result<()>
where
    C: Clock,
    T: Ticker,
    W: Write,
{
    let mut status_drawn = false;
    if !json {
        writeln!(out, "{}", render::setup_text(session.config()))?;
        writeln!(out, "{}", render::step_text(session.step()))?;
    }

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("interrupted, shutting down");
            break;
        }
        let active = session.timer_active();
        let wait = if active { session.tick_period() } else { IDLE_POLL };
        match input.recv_timeout(wait) {
            Ok(Input::Line(line)) => {
                if status_drawn {
                    writeln!(out)?;
                    status_drawn = false;
                }
                if handle_line(session, &line, json, out)? == Flow::Quit {
                    break;
                }
                // Input bursts must not starve the phase handover.
                if session.timer_active() {
                    session.pump();
                }
            }
            Ok(Input::Eof) | Err(RecvTimeoutError::Disconnected) => {
                tracing::debug!("input closed");
                break;
            }
            Err(RecvTimeoutError::Timeout) => {
                if active {
                    let reading = session.pump();
                    if !json {
                        let line = render::reading_line(&reading, session.config().pre_infusion_s);
                        write!(out, "\r{line:<40}")?;
                        out.flush()?;
                        status_drawn = true;
                    }
                }
            }
        }
    }

    if status_drawn {
        writeln!(out)?;
    }
    session.teardown();
    out.flush()?;
    Ok(())
}

/// Something to print after a command: a JSON event or its text form.
struct Reply {
    event: &'static str,
    value: Value,
    text: String,
}

impl Reply {
    fn new(event: &'static str, value: Value, text: String) -> Self {
        Self { event, value, text }
    }

    fn setup<C: Clock, T: Ticker>(session: &Session<C, T>) -> Self {
        let cfg = session.config();
        Self::new("setup", render::setup_json(cfg), render::setup_text(cfg))
    }

    fn step<C: Clock, T: Ticker>(session: &Session<C, T>) -> Self {
        let step = session.step();
        Self::new("step", json!({ "step": step.name() }), render::step_text(step))
    }

    fn write<W: Write>(self, out: &mut W, json: bool) -> std::io::Result<()> {
        if json {
            let mut value = self.value;
            if let Some(obj) = value.as_object_mut() {
                obj.insert("event".to_string(), self.event.into());
                writeln!(out, "{value}")
            } else {
                writeln!(out, "{}", json!({ "event": self.event, "data": value }))
            }
        } else {
            writeln!(out, "{}", self.text)
        }
    }
}

/// Apply one command line. Rejected commands are reported, not returned.
pub fn handle_line<C, T, W>(
    session: &mut Session<C, T>,
    line: &str,
    json: bool,
    out: &mut W,
) -> eyre::Result<Flow>
where
    C: Clock,
    T: Ticker,
    W: Write,
{
    let line = line.trim();
    let (cmd, arg) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, a)| (c, a.trim()));
    let cmd = cmd.to_ascii_lowercase();
    if matches!(cmd.as_str(), "quit" | "exit" | "q") {
        return Ok(Flow::Quit);
    }
    tracing::debug!(cmd = %cmd, arg, "command");

    let replies = match dispatch(session, &cmd, arg) {
        Ok(replies) => replies,
        Err(e) => {
            tracing::debug!(error = %e, "command rejected");
            vec![Reply::new(
                "rejected",
                json!({ "message": e.to_string() }),
                describe_session(&e),
            )]
        }
    };
    for reply in replies {
        reply.write(out, json)?;
    }
    Ok(Flow::Continue)
}

fn dispatch<C: Clock, T: Ticker>(
    session: &mut Session<C, T>,
    cmd: &str,
    arg: &str,
) -> Result<Vec<Reply>, SessionError> {
    let replies = match cmd {
        "" => Vec::new(),
        "single" => {
            session.set_shot_type(ShotType::Single);
            vec![Reply::setup(session)]
        }
        "double" => {
            session.set_shot_type(ShotType::Double);
            vec![Reply::setup(session)]
        }
        "grind" => {
            session.set_grind_size(grind_setting(arg));
            vec![Reply::setup(session)]
        }
        "cal-time" => {
            session.set_calibration_time(arg);
            vec![Reply::setup(session)]
        }
        "cal-yield" => {
            session.set_calibration_yield(arg);
            vec![Reply::setup(session)]
        }
        "pre" => {
            session.set_pre_infusion(arg)?;
            vec![Reply::setup(session)]
        }
        "pull" => {
            session.enter_pull()?;
            vec![Reply::step(session)]
        }
        "start" => {
            let reading = session.start_timer()?;
            let line = render::reading_line(&reading, session.config().pre_infusion_s);
            vec![Reply::new(
                "started",
                render::reading_json(&reading),
                format!("Started. {line}"),
            )]
        }
        "stop" => {
            let t = session.finish_pull()?;
            let g = session.actual_output_g().unwrap_or(0.0);
            vec![
                Reply::new(
                    "stopped",
                    json!({ "extraction_time_s": t, "output_weight_g": g }),
                    format!("Brew time {t:.1}s. Output set to {g:.1}g."),
                ),
                Reply::step(session),
            ]
        }
        "reset" => {
            session.reset_timer()?;
            vec![Reply::step(session)]
        }
        "back" => {
            if session.step() == Step::History {
                session.close_history()?;
            } else {
                session.leave_pull()?;
            }
            vec![Reply::step(session)]
        }
        "output" => {
            session.set_output(arg)?;
            let g = session.actual_output_g().unwrap_or(0.0);
            vec![Reply::new(
                "output",
                json!({ "output_weight_g": g }),
                format!("Output: {g:.1}g"),
            )]
        }
        "analyze" => {
            let r = session.analyze()?;
            vec![Reply::new(
                "result",
                render::result_json(r),
                render::result_text(r),
            )]
        }
        "new" => {
            session.reset_workflow();
            vec![Reply::setup(session), Reply::step(session)]
        }
        "history" => {
            session.open_history();
            let h = session.history();
            vec![
                Reply::new("history", render::history_json(h), render::history_text(h)),
                Reply::step(session),
            ]
        }
        "purge" => {
            let n = session.purge_history();
            vec![Reply::new(
                "purged",
                json!({ "count": n }),
                format!("Purged {n} shot(s)."),
            )]
        }
        "status" => {
            let reading = session.reading();
            vec![
                Reply::setup(session),
                Reply::new(
                    "reading",
                    render::reading_json(&reading),
                    render::reading_line(&reading, session.config().pre_infusion_s),
                ),
                Reply::step(session),
            ]
        }
        "help" | "?" => vec![Reply::new("help", json!({ "help": HELP }), HELP.to_string())],
        other => vec![Reply::new(
            "unknown",
            json!({ "command": other }),
            format!("Unknown command '{other}'. Type `help`."),
        )],
    };
    Ok(replies)
}

/// Grinder settings are integers; fractions truncate and junk becomes 0,
/// which then clamps to the finest setting.
#[allow(clippy::cast_possible_truncation)]
fn grind_setting(text: &str) -> i64 {
    number_or_zero(text) as i64
}

const HELP: &str = "\
Setup:    single | double | grind N | cal-time S | cal-yield G | pre S
Pull:     pull (open timer) | start | stop | reset | back
Debrief:  output G | analyze | new
History:  history | purge | back
Anytime:  status | help | quit";
