#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the shot timer.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - Every section is optional; a missing file or empty document yields the
//!   same defaults the interactive setup screen starts with.
use eyre::WrapErr;
use serde::Deserialize;
use std::path::Path;

/// Dose selection as written in the config file.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ShotKind {
    Single,
    #[default]
    Double,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ShotSection {
    pub shot_type: ShotKind,
    /// Grinder dial setting, recorded with each shot (1..=20).
    pub grind_size: u8,
    /// Grind duration (s) of a previous calibration run.
    pub calibration_time_s: f64,
    /// Grams produced by `calibration_time_s`; absent means no recommendation.
    pub calibration_yield_g: Option<f64>,
    pub pre_infusion_s: f64,
}

impl Default for ShotSection {
    fn default() -> Self {
        Self {
            shot_type: ShotKind::Double,
            grind_size: 5,
            calibration_time_s: 8.0,
            calibration_yield_g: None,
            pre_infusion_s: 10.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TimerSection {
    /// Display refresh period. Elapsed time never depends on it.
    pub tick_ms: u64,
}

impl Default for TimerSection {
    fn default() -> Self {
        Self { tick_ms: 30 }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub shot: ShotSection,
    #[serde(default)]
    pub timer: TimerSection,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let cfg = load_toml(&text).wrap_err_with(|| format!("parse config {}", path.display()))?;
    cfg.validate()
        .wrap_err_with(|| format!("invalid configuration in {}", path.display()))?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Shot
        if !(1..=20).contains(&self.shot.grind_size) {
            eyre::bail!("shot.grind_size must be in [1, 20]");
        }
        if !self.shot.calibration_time_s.is_finite() || self.shot.calibration_time_s < 0.0 {
            eyre::bail!("shot.calibration_time_s must be >= 0");
        }
        if let Some(y) = self.shot.calibration_yield_g
            && !(y.is_finite() && y > 0.0)
        {
            eyre::bail!("shot.calibration_yield_g must be > 0 when set");
        }
        if !self.shot.pre_infusion_s.is_finite() || self.shot.pre_infusion_s < 0.0 {
            eyre::bail!("shot.pre_infusion_s must be >= 0");
        }
        if self.shot.pre_infusion_s > 120.0 {
            eyre::bail!("shot.pre_infusion_s is unreasonably large (>120s)");
        }

        // Timer
        if self.timer.tick_ms == 0 {
            eyre::bail!("timer.tick_ms must be >= 1");
        }
        if self.timer.tick_ms > 1000 {
            eyre::bail!("timer.tick_ms must be <= 1000");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
