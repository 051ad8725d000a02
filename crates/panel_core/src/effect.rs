use std::time::Duration;

use crate::FilterSelection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchStates,
    FetchCities { state: String },
    StartProcessing { filter: FilterSelection },
    StopProcessing,
    /// Fetch progress right away.
    FetchProgress { generation: u64 },
    /// Fetch progress once `after` has elapsed, unless cancelled first.
    SchedulePoll { generation: u64, after: Duration },
    /// Drop the pending poll timer and any poll still in flight.
    CancelPoll,
    FetchResults { generation: u64 },
}
