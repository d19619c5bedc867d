//! Runtime configuration for a shot.
//!
//! These are the values the setup screen edits. They are separate from the
//! TOML-deserialized config in `shot_config`; see `conversions`.

use crate::calibration::recommend_grind_time;
use crate::error::ParseShotTypeError;
use std::str::FromStr;
use std::time::Duration;

/// Fixed extraction ratio target (output ÷ dose).
pub const TARGET_RATIO: f64 = 2.0;
/// Shortest brew time (s) still graded as a good shot.
pub const MIN_GOOD_TIME_S: f64 = 25.0;
/// Longest brew time (s) still graded as a good shot.
pub const MAX_GOOD_TIME_S: f64 = 30.0;
pub const DEFAULT_PRE_INFUSION_S: f64 = 10.0;
pub const DEFAULT_TICK_MS: u64 = 30;
pub const GRIND_SIZE_MIN: u8 = 1;
pub const GRIND_SIZE_MAX: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShotType {
    Single,
    #[default]
    Double,
}

impl ShotType {
    /// Dose in grams.
    #[inline]
    pub fn input_weight_g(self) -> f64 {
        match self {
            Self::Single => 9.0,
            Self::Double => 18.0,
        }
    }

    /// Target yield in grams: dose × `TARGET_RATIO`.
    #[inline]
    pub fn target_output_g(self) -> f64 {
        self.input_weight_g() * TARGET_RATIO
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
        }
    }
}

impl std::fmt::Display for ShotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShotType {
    type Err = ParseShotTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "double" => Ok(Self::Double),
            _ => Err(ParseShotTypeError(s.to_string())),
        }
    }
}

/// Shot parameters chosen on the setup screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotConfiguration {
    pub shot_type: ShotType,
    /// Recorded with the shot; has no effect on grading.
    pub grind_size: u8,
    /// Grind duration (s) of a previous calibration run.
    pub calibration_time_s: f64,
    /// Grams produced by `calibration_time_s`, if measured.
    pub calibration_yield_g: Option<f64>,
    pub pre_infusion_s: f64,
}

impl Default for ShotConfiguration {
    fn default() -> Self {
        Self {
            shot_type: ShotType::Double,
            grind_size: 5,
            calibration_time_s: 8.0,
            calibration_yield_g: None,
            pre_infusion_s: DEFAULT_PRE_INFUSION_S,
        }
    }
}

impl ShotConfiguration {
    #[inline]
    pub fn input_weight_g(&self) -> f64 {
        self.shot_type.input_weight_g()
    }

    #[inline]
    pub fn target_output_g(&self) -> f64 {
        self.shot_type.target_output_g()
    }

    /// Projected grind time for the current dose, when calibration data allows it.
    pub fn recommended_grind_time_s(&self) -> Option<f64> {
        recommend_grind_time(
            self.calibration_time_s,
            self.calibration_yield_g,
            self.input_weight_g(),
        )
    }

    /// Grind time recorded with a shot: the recommendation, else the calibration time.
    pub fn grind_time_s(&self) -> f64 {
        self.recommended_grind_time_s()
            .unwrap_or(self.calibration_time_s)
    }

    /// Set the grind size, clamping into [`GRIND_SIZE_MIN`, `GRIND_SIZE_MAX`].
    pub fn set_grind_size(&mut self, size: i64) {
        let clamped = size.clamp(i64::from(GRIND_SIZE_MIN), i64::from(GRIND_SIZE_MAX));
        self.grind_size = u8::try_from(clamped).unwrap_or(GRIND_SIZE_MIN);
    }
}

/// Timer engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerCfg {
    /// Tick period in ms; clamped to [1, 1000] when used.
    pub tick_ms: u64,
}

impl Default for TimerCfg {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl TimerCfg {
    pub fn period(&self) -> Duration {
        Duration::from_millis(crate::util::clamp_tick_ms(self.tick_ms))
    }
}
