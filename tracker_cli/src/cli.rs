//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "tracker", version, about = "Solar tracker dashboard CLI")]
pub struct Cli {
    /// Path to config TOML (typed). A missing file means built-in defaults.
    #[arg(long, value_name = "FILE", default_value = "etc/tracker.toml")]
    pub config: PathBuf,

    /// Print results and logs as JSON lines instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging] level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll telemetry and show the dashboard state when done
    Watch {
        /// Stop after this many telemetry payloads
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
        /// Stop after this many milliseconds
        #[arg(long, value_name = "MS")]
        duration_ms: Option<u64>,
    },
    /// Read or replace the device control configuration
    Setting {
        #[command(subcommand)]
        action: SettingAction,
    },
    /// Send a value to the legacy brightness endpoint and print the echo
    Brightness {
        /// JSON value to send; plain text is sent as a string
        #[arg(long, value_name = "JSON")]
        data: String,
    },
    /// One telemetry and one setting round trip against the device
    SelfCheck,
    /// Print backend and config summary without touching the device
    Health,
}

#[derive(Subcommand, Debug)]
pub enum SettingAction {
    /// Fetch the device configuration and print it
    Get,
    /// Replace the device configuration
    Set {
        /// Full configuration object as JSON
        #[arg(long, value_name = "FILE", conflicts_with = "mode", required_unless_present = "mode")]
        file: Option<PathBuf>,
        /// Change only the mode (auto|manual); the rest is taken from the device
        #[arg(long, value_name = "MODE")]
        mode: Option<String>,
    },
}
