use std::fmt;

/// Status string the backend returns when a start request was accepted.
pub const START_SENTINEL: &str = "Processing started";

/// One point-in-time read of the job progress counters.
///
/// Every counter is optional because the backend omits fields it has not
/// computed yet; rendering substitutes 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressSnapshot {
    pub overall_progress: Option<f64>,
    pub total_processed: Option<u64>,
    pub successful: Option<u64>,
    pub failed: Option<u64>,
    pub remaining: Option<u64>,
    pub total: Option<u64>,
    pub is_processing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub title: String,
    pub location: String,
    pub snippet: String,
    pub url: String,
}

/// Optional state/city pair narrowing the scope of a processing job.
/// `None` means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub state: Option<String>,
    pub city: Option<String>,
}

impl FilterSelection {
    pub fn new(state: &str, city: &str) -> Self {
        Self {
            state: normalize_filter(state),
            city: normalize_filter(city),
        }
    }
}

/// Blank input means "no filter".
pub fn normalize_filter(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure: connection refused, reset, timed out.
    Network,
    /// Response body was not the expected JSON shape.
    Parse,
    /// Well-formed but unsuccessful answer from the backend.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RequestError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind {
            ErrorKind::Network => "network error",
            ErrorKind::Parse => "unexpected response",
            ErrorKind::Rejected => "rejected by backend",
        };
        write!(f, "{label}: {}", self.message)
    }
}
