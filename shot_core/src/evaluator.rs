//! Shot grading.
//!
//! A shot is graded purely on brew time against the [`MIN_GOOD_TIME_S`,
//! `MAX_GOOD_TIME_S`] window; the window bounds are inclusive and the
//! comparison uses the unrounded time.

use crate::config::{MAX_GOOD_TIME_S, MIN_GOOD_TIME_S, ShotConfiguration, ShotType};
use crate::util::round_tenth;
use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotStatus {
    /// Under-extracted: ran shorter than the good window.
    Fast,
    /// Over-extracted: ran longer than the good window.
    Slow,
    Perfect,
}

impl ShotStatus {
    pub fn feedback(self) -> &'static str {
        match self {
            Self::Fast => "TOO FAST. ACIDIC. UNDER-EXTRACTED.",
            Self::Slow => "TOO SLOW. BITTER. OVER-EXTRACTED.",
            Self::Perfect => "SOLID SHOT. GOLDEN RATIO HIT.",
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Self::Fast => "GRIND FINER (-) OR INCREASE DOSE (+)",
            Self::Slow => "GRIND COARSER (+) OR DECREASE DOSE (-)",
            Self::Perfect => "LOCK IT IN. NO CHANGES.",
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            Self::Fast => "TOO FAST",
            Self::Slow => "TOO SLOW",
            Self::Perfect => "PERFECT PULL",
        }
    }

    #[inline]
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Perfect)
    }

    /// Stable lowercase name for structured output.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Slow => "slow",
            Self::Perfect => "perfect",
        }
    }
}

impl std::fmt::Display for ShotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Grade a brew time. First match wins: fast, then slow, else perfect.
#[inline]
pub fn classify(extraction_s: f64) -> ShotStatus {
    if extraction_s < MIN_GOOD_TIME_S {
        ShotStatus::Fast
    } else if extraction_s > MAX_GOOD_TIME_S {
        ShotStatus::Slow
    } else {
        ShotStatus::Perfect
    }
}

/// One graded shot. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotResult {
    id: u64,
    created_at: DateTime<Local>,
    shot_type: ShotType,
    grind_size: u8,
    grind_time_s: f64,
    input_weight_g: f64,
    output_weight_g: f64,
    extraction_time_s: f64,
    status: ShotStatus,
}

impl ShotResult {
    /// Unique token; creation time in ms, kept strictly increasing by `History`.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Creation time as shown in the log (`HH:MM`).
    pub fn timestamp(&self) -> String {
        self.created_at.format("%H:%M").to_string()
    }

    pub fn shot_type(&self) -> ShotType {
        self.shot_type
    }

    pub fn grind_size(&self) -> u8 {
        self.grind_size
    }

    /// Recommended grind time if calibration allowed one, else the calibration time.
    pub fn grind_time_s(&self) -> f64 {
        self.grind_time_s
    }

    pub fn input_weight_g(&self) -> f64 {
        self.input_weight_g
    }

    pub fn output_weight_g(&self) -> f64 {
        self.output_weight_g
    }

    /// Brew time rounded to 0.1 s.
    pub fn extraction_time_s(&self) -> f64 {
        self.extraction_time_s
    }

    pub fn status(&self) -> ShotStatus {
        self.status
    }

    pub fn feedback(&self) -> &'static str {
        self.status.feedback()
    }

    pub fn action(&self) -> &'static str {
        self.status.action()
    }

    /// Achieved extraction ratio (output ÷ dose).
    pub fn ratio(&self) -> f64 {
        if self.input_weight_g > 0.0 {
            self.output_weight_g / self.input_weight_g
        } else {
            0.0
        }
    }

    pub(crate) fn with_id(mut self, id: u64) -> Self {
        self.id = id;
        self
    }
}

/// Grade a finished pull and build its record.
///
/// `extraction_s` is the frozen brew time from the timer engine and
/// `output_g` the yield the user entered (or the prefilled target).
pub fn evaluate(
    config: &ShotConfiguration,
    extraction_s: f64,
    output_g: f64,
    at: DateTime<Local>,
) -> ShotResult {
    let status = classify(extraction_s);
    let result = ShotResult {
        id: u64::try_from(at.timestamp_millis()).unwrap_or(0),
        created_at: at,
        shot_type: config.shot_type,
        grind_size: config.grind_size,
        grind_time_s: config.grind_time_s(),
        input_weight_g: config.input_weight_g(),
        output_weight_g: output_g,
        extraction_time_s: round_tenth(extraction_s),
        status,
    };
    tracing::info!(
        extraction_s = result.extraction_time_s,
        output_g,
        status = status.name(),
        "shot evaluated"
    );
    result
}
