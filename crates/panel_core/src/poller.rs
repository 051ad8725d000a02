//! Progress poller lifecycle.
//!
//! The poller never sleeps or fetches by itself; it only decides which
//! [`Effect`] comes next. Each polling run carries a generation number so
//! that answers belonging to an earlier run (for example a poll that was in
//! flight when the operator pressed stop) can be recognised and dropped.

use std::time::Duration;

use crate::Effect;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollerPhase {
    #[default]
    Idle,
    Polling,
    Stopped,
}

/// What to do when a single progress fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollErrorPolicy {
    /// Log the failure and schedule the next poll as usual.
    #[default]
    ContinueAndLog,
    /// Log the failure and stop polling.
    Halt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poller {
    phase: PollerPhase,
    generation: u64,
    interval: Duration,
    policy: PollErrorPolicy,
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, PollErrorPolicy::default())
    }
}

impl Poller {
    pub fn new(interval: Duration, policy: PollErrorPolicy) -> Self {
        Self {
            phase: PollerPhase::Idle,
            generation: 0,
            interval,
            policy,
        }
    }

    pub fn phase(&self) -> PollerPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn policy(&self) -> PollErrorPolicy {
        self.policy
    }

    /// Starts a new polling run with an immediate fetch.
    pub(crate) fn begin(&mut self) -> Effect {
        self.generation += 1;
        self.phase = PollerPhase::Polling;
        Effect::FetchProgress {
            generation: self.generation,
        }
    }

    /// True when a progress answer belongs to the run that is still polling.
    pub(crate) fn accepts_progress(&self, generation: u64) -> bool {
        self.phase == PollerPhase::Polling && generation == self.generation
    }

    /// Results are accepted as long as no newer run (or stop) superseded them.
    pub(crate) fn accepts_results(&self, generation: u64) -> bool {
        generation == self.generation
    }

    pub(crate) fn on_snapshot(&mut self, is_processing: bool) -> Effect {
        if is_processing {
            Effect::SchedulePoll {
                generation: self.generation,
                after: self.interval,
            }
        } else {
            self.phase = PollerPhase::Stopped;
            Effect::FetchResults {
                generation: self.generation,
            }
        }
    }

    /// Returns the next poll when the policy keeps the run alive.
    pub(crate) fn on_error(&mut self) -> Option<Effect> {
        match self.policy {
            PollErrorPolicy::ContinueAndLog => Some(Effect::SchedulePoll {
                generation: self.generation,
                after: self.interval,
            }),
            PollErrorPolicy::Halt => {
                self.phase = PollerPhase::Stopped;
                None
            }
        }
    }

    /// Forced transition used by the stop action. Bumping the generation
    /// orphans whatever poll or results fetch is still in flight.
    pub(crate) fn force_idle(&mut self) {
        self.generation += 1;
        self.phase = PollerPhase::Idle;
    }
}
