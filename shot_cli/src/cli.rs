//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use shot_core::ShotType;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "shot", version, about = "Espresso shot timer")]
pub struct Cli {
    /// Path to config TOML; built-in defaults are used when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Also write JSON logs to this file (overrides [logging].file)
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ShotArg {
    /// 9 g dose
    Single,
    /// 18 g dose
    Double,
}

impl From<ShotArg> for ShotType {
    fn from(a: ShotArg) -> Self {
        match a {
            ShotArg::Single => ShotType::Single,
            ShotArg::Double => ShotType::Double,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive session: set up, pull, analyze and review shots
    Pull,
    /// Grade a shot from a known brew time and yield
    Evaluate {
        /// Brew time in seconds (pre-infusion excluded)
        #[arg(long, value_name = "SECONDS")]
        time: String,
        /// Yield in grams; defaults to the target for the shot type
        #[arg(long, value_name = "GRAMS")]
        output: Option<String>,
        /// Dose size (overrides config)
        #[arg(long, value_enum)]
        shot_type: Option<ShotArg>,
        /// Grinder setting to record (overrides config)
        #[arg(long, value_name = "N")]
        grind: Option<i64>,
    },
    /// Project a grind time from one calibration run
    Recommend {
        /// Grind duration of the calibration run (s)
        #[arg(long = "cal-time", value_name = "SECONDS")]
        cal_time: String,
        /// Grams produced by that run
        #[arg(long = "cal-yield", value_name = "GRAMS")]
        cal_yield: String,
        /// Dose size (overrides config)
        #[arg(long, value_enum)]
        shot_type: Option<ShotArg>,
    },
    /// Quick health check (clock and tick source)
    SelfCheck,
}
