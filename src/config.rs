// Command-line configuration.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Terminal dashboard for Juju services and their units")]
pub struct Config {
    /// JSON snapshot holding charm, service and unit records
    pub snapshot: PathBuf,

    /// Seconds between snapshot reloads
    #[arg(long, env = "JUJU_TUI_TICK_RATE", default_value_t = 2)]
    pub tick_rate: u64,

    /// Service to select on startup
    #[arg(long)]
    pub service: Option<String>,

    /// Write logs to this file. Logging is off otherwise, as the terminal
    /// is taken by the dashboard.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_secs(self.tick_rate.max(1))
    }
}
