use std::fmt;

use serde::{Deserialize, Serialize};

/// Body of `GET /get_progress`. Any counter may be missing or null.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProgressPayload {
    pub overall_progress: Option<f64>,
    pub total_processed: Option<u64>,
    pub successful: Option<u64>,
    pub failed: Option<u64>,
    pub remaining: Option<u64>,
    pub total: Option<u64>,
    pub is_processing: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ResultPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StartAck {
    #[serde(default)]
    pub status: String,
}

/// Answer to `POST /stop_processing`. The backend gives no guarantees about
/// its shape, so every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StopAck {
    pub message: Option<String>,
    pub vendors_saved: Option<u64>,
    pub results_file: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartRequest<'a> {
    pub state: Option<&'a str>,
    pub city: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatesBody {
    pub states: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CitiesBody {
    pub cities: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultsBody {
    pub results: Option<Vec<ResultPayload>>,
}

/// Error bodies the backend sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    pub kind: FailureKind,
    pub message: String,
}

impl ClientError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Network,
    Timeout,
    HttpStatus(u16),
    Parse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Parse => write!(f, "malformed response"),
        }
    }
}
