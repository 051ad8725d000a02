use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::LevelFilter;
use panel_client::ClientSettings;
use panel_core::{PollErrorPolicy, DEFAULT_POLL_INTERVAL};
use serde::{Deserialize, Serialize};

use super::cli::Cli;
use super::logging::LogDestination;

/// How to react to a failed progress check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PollErrorMode {
    #[default]
    Continue,
    Halt,
}

/// On-disk configuration, written in RON. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub poll_errors: PollErrorMode,
    pub request_timeout_ms: Option<u64>,
    pub log: LogDestination,
    pub log_level: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: ClientSettings::default().base_url,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            poll_errors: PollErrorMode::default(),
            request_timeout_ms: None,
            log: LogDestination::default(),
            log_level: "info".to_string(),
        }
    }
}

/// Fully resolved settings the panel runs with.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub client: ClientSettings,
    pub poll_interval: Duration,
    pub poll_error_policy: PollErrorPolicy,
    pub log: LogDestination,
    pub log_level: LevelFilter,
}

impl PanelConfig {
    /// Reads `path` when given; defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        ron::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(interval) = cli.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        if cli.halt_on_poll_error {
            self.poll_errors = PollErrorMode::Halt;
        }
        if let Some(timeout) = cli.request_timeout_ms {
            self.request_timeout_ms = Some(timeout);
        }
        if let Some(log) = cli.log {
            self.log = log;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level.to_string();
        }
        self
    }

    pub fn resolve(self) -> Result<RunSettings> {
        if self.poll_interval_ms == 0 {
            bail!("poll interval must be greater than zero");
        }
        let log_level = LevelFilter::from_str(&self.log_level)
            .with_context(|| format!("invalid log level {:?}", self.log_level))?;
        Ok(RunSettings {
            client: ClientSettings {
                base_url: self.base_url,
                request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            },
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            poll_error_policy: match self.poll_errors {
                PollErrorMode::Continue => PollErrorPolicy::ContinueAndLog,
                PollErrorMode::Halt => PollErrorPolicy::Halt,
            },
            log: self.log,
            log_level,
        })
    }
}
