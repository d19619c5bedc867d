#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

mod cli;
mod error_fmt;
mod logging;
mod pull;
mod render;

use clap::Parser;
use cli::{Cli, Commands, JSON_MODE, ShotArg};
use eyre::WrapErr;
use shot_core::util::{number_or_zero, parse_lenient};
use shot_core::ticker::TickThread;
use shot_core::{LiveSession, ShotConfiguration, ShotType, TimerCfg};
use shot_traits::{Clock, MonotonicClock};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn main() {
    let _ = color_eyre::install();
    // clap prints usage errors itself and exits with 2
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = run(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::format_error_json(&e));
        } else {
            eprintln!("{}", error_fmt::humanize(&e));
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    let cfg = match &cli.config {
        Some(path) => shot_config::load_file(path)?,
        None => shot_config::Config::default(),
    };
    let _log_guard = logging::init(
        cli.json,
        &cli.log_level,
        cli.log_file.as_deref(),
        &cfg.logging,
    )?;
    tracing::debug!(config = ?cli.config, "configuration loaded");

    let shot: ShotConfiguration = (&cfg).into();
    let timer: TimerCfg = (&cfg.timer).into();

    match cli.cmd {
        Commands::Pull => run_pull(shot, &timer, cli.json),
        Commands::Evaluate {
            time,
            output,
            shot_type,
            grind,
        } => run_evaluate(shot, &time, output.as_deref(), shot_type, grind, cli.json),
        Commands::Recommend {
            cal_time,
            cal_yield,
            shot_type,
        } => run_recommend(shot, &cal_time, &cal_yield, shot_type, cli.json),
        Commands::SelfCheck => run_self_check(&timer, cli.json),
    }
}

fn run_pull(shot: ShotConfiguration, timer: &TimerCfg, json: bool) -> eyre::Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&shutdown);
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "could not install Ctrl-C handler");
        }
    }

    let mut session = LiveSession::live(shot, timer);
    let input = pull::spawn_stdin_reader();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    pull::run(&mut session, &input, &shutdown, json, &mut out)?;
    tracing::info!(shots = session.history().len(), "session ended");
    Ok(())
}

fn apply_overrides(shot: &mut ShotConfiguration, shot_type: Option<ShotArg>, grind: Option<i64>) {
    if let Some(kind) = shot_type {
        shot.shot_type = ShotType::from(kind);
    }
    if let Some(g) = grind {
        shot.set_grind_size(g);
    }
}

fn run_evaluate(
    mut shot: ShotConfiguration,
    time: &str,
    output: Option<&str>,
    shot_type: Option<ShotArg>,
    grind: Option<i64>,
    json: bool,
) -> eyre::Result<()> {
    apply_overrides(&mut shot, shot_type, grind);
    let extraction_s = number_or_zero(time);
    let output_g = output.map_or_else(|| shot.target_output_g(), number_or_zero);
    let result = shot_core::evaluate(&shot, extraction_s, output_g, chrono::Local::now());

    let mut out = std::io::stdout().lock();
    if json {
        writeln!(out, "{}", render::result_json(&result))?;
    } else {
        writeln!(out, "{}", render::result_text(&result))?;
    }
    Ok(())
}

fn run_recommend(
    mut shot: ShotConfiguration,
    cal_time: &str,
    cal_yield: &str,
    shot_type: Option<ShotArg>,
    json: bool,
) -> eyre::Result<()> {
    apply_overrides(&mut shot, shot_type, None);
    shot.calibration_time_s = number_or_zero(cal_time);
    shot.calibration_yield_g = parse_lenient(cal_yield);
    let rec = shot.recommended_grind_time_s();

    let mut out = std::io::stdout().lock();
    if json {
        let v = serde_json::json!({
            "shot_type": shot.shot_type.name(),
            "input_weight_g": shot.input_weight_g(),
            "calibration_time_s": shot.calibration_time_s,
            "calibration_yield_g": shot.calibration_yield_g,
            "recommended_grind_time_s": rec,
        });
        writeln!(out, "{v}")?;
    } else {
        writeln!(out, "{}", render::recommendation_text(rec))?;
    }
    Ok(())
}

/// Confirm the clock advances and the tick source fires within a bound.
fn run_self_check(timer: &TimerCfg, json: bool) -> eyre::Result<()> {
    let clock = MonotonicClock::new();
    let start = clock.now();
    let ticks = TickThread::spawn(timer.period(), clock);
    let bound = timer.period() * 4 + Duration::from_millis(250);
    let fired = ticks.wait(bound);
    drop(ticks);
    let waited_ms = clock.ms_since(start);
    if !fired {
        eyre::bail!("no tick within {}ms (tick_ms = {})", bound.as_millis(), timer.tick_ms);
    }

    let mut out = std::io::stdout().lock();
    if json {
        writeln!(
            out,
            "{}",
            serde_json::json!({ "status": "ok", "tick_ms": timer.tick_ms, "first_tick_ms": waited_ms })
        )
        .wrap_err("write self-check result")?;
    } else {
        writeln!(out, "OK: clock and ticker healthy (first tick after {waited_ms}ms)")
            .wrap_err("write self-check result")?;
    }
    Ok(())
}
