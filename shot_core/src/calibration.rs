//! Grind-time recommendation from a single calibration run.
//!
//! The grinder is modelled as constant throughput: if `calibration_time_s`
//! produced `calibration_yield_g`, then the dose needs
//! `(dose / yield) * time` seconds.

use crate::util::round_tenth;

/// Recommended grind time in seconds, rounded to one decimal place.
///
/// Returns `None` when the yield is missing, zero, negative or not finite;
/// that is "not enough data", not an error.
pub fn recommend_grind_time(
    calibration_time_s: f64,
    calibration_yield_g: Option<f64>,
    input_weight_g: f64,
) -> Option<f64> {
    let yield_g = calibration_yield_g.filter(|y| y.is_finite() && *y > 0.0)?;
    let t = (input_weight_g / yield_g) * calibration_time_s;
    t.is_finite().then(|| round_tenth(t))
}
