use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use super::logging::LogDestination;

#[derive(Debug, Parser, Clone, Default)]
#[command(
    name = "batch-panel",
    version,
    about = "Console control panel for the batch lead-generation backend"
)]
pub struct Cli {
    /// RON configuration file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the backend
    #[arg(long)]
    pub base_url: Option<String>,

    /// Delay between progress polls while a job runs
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Stop polling after a failed progress check instead of retrying
    #[arg(long)]
    pub halt_on_poll_error: bool,

    /// Per-request timeout; requests wait indefinitely when unset
    #[arg(long)]
    pub request_timeout_ms: Option<u64>,

    /// Where to write logs
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<LevelFilter>,
}
