//! Text and JSON rendering for results, history and timer readings.

use serde_json::{Value, json};
use shot_core::{History, Phase, ShotConfiguration, ShotResult, Step, TimerReading};

pub fn result_json(r: &ShotResult) -> Value {
    json!({
        "id": r.id(),
        "timestamp": r.timestamp(),
        "created_at": r.created_at().to_rfc3339(),
        "shot_type": r.shot_type().name(),
        "grind_size": r.grind_size(),
        "grind_time_s": r.grind_time_s(),
        "input_weight_g": r.input_weight_g(),
        "output_weight_g": r.output_weight_g(),
        "extraction_time_s": r.extraction_time_s(),
        "ratio": r.ratio(),
        "status": r.status().name(),
        "feedback": r.feedback(),
        "action": r.action(),
    })
}

pub fn result_text(r: &ShotResult) -> String {
    let mark = if r.status().is_approved() { "[OK]" } else { "[!!]" };
    format!(
        "{mark} {headline}\n  {feedback}\n  Action: {action}\n  Time {t:.1}s | In {input:.1}g | Out {out:.1}g | Ratio 1:{ratio:.2}\n  Grind #{grind} for {grind_t:.1}s ({kind}) at {ts}",
        headline = r.status().headline(),
        feedback = r.feedback(),
        action = r.action(),
        t = r.extraction_time_s(),
        input = r.input_weight_g(),
        out = r.output_weight_g(),
        ratio = r.ratio(),
        grind = r.grind_size(),
        grind_t = r.grind_time_s(),
        kind = r.shot_type(),
        ts = r.timestamp(),
    )
}

pub fn history_json(h: &History) -> Value {
    Value::Array(h.iter().map(result_json).collect())
}

pub fn history_text(h: &History) -> String {
    if h.is_empty() {
        return "No shots logged yet.".to_string();
    }
    let mut out = format!("{} shot(s), newest first:", h.len());
    for r in h.iter() {
        out.push_str(&format!(
            "\n  {ts}  {kind:<6} #{grind:<2} {t:>5.1}s {out_g:>5.1}g  {headline}",
            ts = r.timestamp(),
            kind = r.shot_type().name(),
            grind = r.grind_size(),
            t = r.extraction_time_s(),
            out_g = r.output_weight_g(),
            headline = r.status().headline(),
        ));
    }
    out
}

pub fn recommendation_text(rec: Option<f64>) -> String {
    rec.map_or_else(
        || "Recommended grind time: insufficient data".to_string(),
        |s| format!("Recommended grind time: {s:.1}s"),
    )
}

pub fn setup_json(cfg: &ShotConfiguration) -> Value {
    json!({
        "shot_type": cfg.shot_type.name(),
        "input_weight_g": cfg.input_weight_g(),
        "target_output_g": cfg.target_output_g(),
        "grind_size": cfg.grind_size,
        "calibration_time_s": cfg.calibration_time_s,
        "calibration_yield_g": cfg.calibration_yield_g,
        "recommended_grind_time_s": cfg.recommended_grind_time_s(),
        "pre_infusion_s": cfg.pre_infusion_s,
    })
}

pub fn setup_text(cfg: &ShotConfiguration) -> String {
    let yield_g = cfg
        .calibration_yield_g
        .map_or_else(|| "-".to_string(), |g| format!("{g:.1}g"));
    format!(
        "Shot: {kind} ({input:.0}g in -> {target:.0}g out)\nGrind: #{grind} | Calibration: {cal_t:.1}s -> {yield_g}\n{rec}\nPre-infusion: {pre:.1}s",
        kind = cfg.shot_type,
        input = cfg.input_weight_g(),
        target = cfg.target_output_g(),
        grind = cfg.grind_size,
        cal_t = cfg.calibration_time_s,
        rec = recommendation_text(cfg.recommended_grind_time_s()),
        pre = cfg.pre_infusion_s,
    )
}

pub fn reading_json(r: &TimerReading) -> Value {
    json!({
        "phase": r.phase.name(),
        "label": r.label(),
        "active": r.active,
        "display_s": r.display_s,
        "pre_infusion_remaining_s": r.pre_infusion_remaining_s,
        "elapsed_s": r.elapsed_s,
    })
}

/// One-line status for the live redraw.
pub fn reading_line(r: &TimerReading, pre_infusion_s: f64) -> String {
    match r.phase {
        Phase::PreInfusion => {
            let pct = r.pre_infusion_progress(pre_infusion_s) * 100.0;
            format!("{} {:>5.1}s  [{pct:>3.0}%]", r.label(), r.display_s)
        }
        Phase::Brew | Phase::Idle => format!("{} {:>5.1}s", r.label(), r.display_s),
    }
}

pub fn step_text(step: Step) -> String {
    let hint = match step {
        Step::Setup => "single | double | grind N | cal-time S | cal-yield G | pre S | pull",
        Step::Pull => "start | stop | reset | back",
        Step::Analyze => "output G | analyze | new",
        Step::History => "purge | back",
    };
    format!("[{step}] {hint}")
}
