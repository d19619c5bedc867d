//! `From` implementations bridging `shot_config` types to `shot_core` types.

use crate::config::{GRIND_SIZE_MAX, GRIND_SIZE_MIN, ShotConfiguration, ShotType, TimerCfg};

// ── ShotType ─────────────────────────────────────────────────────────────────

impl From<shot_config::ShotKind> for ShotType {
    fn from(k: shot_config::ShotKind) -> Self {
        match k {
            shot_config::ShotKind::Single => Self::Single,
            shot_config::ShotKind::Double => Self::Double,
        }
    }
}

// ── ShotConfiguration ────────────────────────────────────────────────────────

impl From<&shot_config::ShotSection> for ShotConfiguration {
    fn from(c: &shot_config::ShotSection) -> Self {
        Self {
            shot_type: c.shot_type.into(),
            grind_size: c.grind_size.clamp(GRIND_SIZE_MIN, GRIND_SIZE_MAX),
            calibration_time_s: finite_non_negative(c.calibration_time_s),
            calibration_yield_g: c.calibration_yield_g,
            pre_infusion_s: finite_non_negative(c.pre_infusion_s),
        }
    }
}

impl From<&shot_config::Config> for ShotConfiguration {
    fn from(c: &shot_config::Config) -> Self {
        (&c.shot).into()
    }
}

// ── TimerCfg ─────────────────────────────────────────────────────────────────

impl From<&shot_config::TimerSection> for TimerCfg {
    fn from(c: &shot_config::TimerSection) -> Self {
        Self { tick_ms: c.tick_ms }
    }
}

fn finite_non_negative(x: f64) -> f64 {
    if x.is_finite() { x.max(0.0) } else { 0.0 }
}
