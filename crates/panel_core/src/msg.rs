use crate::{ProgressSnapshot, RequestError, ResultItem};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Application started; load the filter options.
    Initialize,
    /// Backend answered the state list request.
    StatesLoaded(Result<Vec<String>, RequestError>),
    /// User picked a state (empty string clears the filter).
    StateSelected(String),
    /// Backend answered a city list request.
    CitiesLoaded {
        state: String,
        result: Result<Vec<String>, RequestError>,
    },
    /// User picked a city (empty string clears the filter).
    CitySelected(String),
    /// User clicked Start.
    StartClicked,
    /// Backend answered the start request with its status string.
    StartAcknowledged(Result<String, RequestError>),
    /// User clicked Stop.
    StopClicked,
    /// Backend answered the stop request, optionally with a message.
    StopAcknowledged(Result<Option<String>, RequestError>),
    /// A progress poll completed.
    ProgressReceived {
        generation: u64,
        result: Result<ProgressSnapshot, RequestError>,
    },
    /// User asked for the latest results.
    RefreshResultsClicked,
    /// A results fetch completed.
    ResultsReceived {
        generation: u64,
        result: Result<Vec<ResultItem>, RequestError>,
    },
    NoOp,
}
