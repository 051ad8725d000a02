use std::time::Duration;

use panel_logging::{panel_debug, panel_trace};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{CitiesBody, ErrorBody, ResultsBody, StartRequest, StatesBody};
use crate::{ClientError, FailureKind, ProgressPayload, ResultPayload, StartAck, StopAck};

const STATES_PATH: &str = "api/states";
const CITIES_PATH: &str = "api/cities";
const PROGRESS_PATH: &str = "get_progress";
const START_PATH: &str = "start";
const STOP_PATH: &str = "stop_processing";
const RESULTS_PATH: &str = "get_latest_results";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    /// `None` waits for the backend indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: None,
        }
    }
}

/// The backend's HTTP surface. One call, one request; no retries.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_states(&self) -> Result<Vec<String>, ClientError>;

    async fn fetch_cities(&self, state: &str) -> Result<Vec<String>, ClientError>;

    async fn fetch_progress(&self) -> Result<ProgressPayload, ClientError>;

    /// Blank filters are sent as `null`, meaning unrestricted scope.
    async fn start_processing(
        &self,
        state: Option<&str>,
        city: Option<&str>,
    ) -> Result<StartAck, ClientError>;

    async fn stop_processing(&self) -> Result<StopAck, ClientError>;

    async fn fetch_results(&self) -> Result<Vec<ResultPayload>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(&settings.base_url)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }
        // Endpoint paths are joined relative to the base, so keep its prefix.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(map_reqwest_error)?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        panel_trace!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let body = read_body(response).await?;
        parse_json(&body)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn fetch_states(&self) -> Result<Vec<String>, ClientError> {
        let body: StatesBody = self.get_json(self.endpoint(STATES_PATH)?).await?;
        Ok(body.states)
    }

    async fn fetch_cities(&self, state: &str) -> Result<Vec<String>, ClientError> {
        let mut url = self.endpoint(CITIES_PATH)?;
        url.query_pairs_mut().append_pair("state", state);
        let body: CitiesBody = self.get_json(url).await?;
        Ok(body.cities)
    }

    async fn fetch_progress(&self) -> Result<ProgressPayload, ClientError> {
        self.get_json(self.endpoint(PROGRESS_PATH)?).await
    }

    async fn start_processing(
        &self,
        state: Option<&str>,
        city: Option<&str>,
    ) -> Result<StartAck, ClientError> {
        let request = StartRequest {
            state: state.map(str::trim).filter(|s| !s.is_empty()),
            city: city.map(str::trim).filter(|c| !c.is_empty()),
        };
        let payload = serde_json::to_vec(&request)
            .map_err(|err| ClientError::new(FailureKind::Parse, err.to_string()))?;
        let url = self.endpoint(START_PATH)?;
        panel_debug!("POST {} state={:?} city={:?}", url, request.state, request.city);

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = read_body(response).await?;
        parse_json(&body)
    }

    async fn stop_processing(&self) -> Result<StopAck, ClientError> {
        let url = self.endpoint(STOP_PATH)?;
        panel_debug!("POST {}", url);
        let response = self.client.post(url).send().await.map_err(map_reqwest_error)?;
        let body = read_body(response).await?;
        match serde_json::from_slice(&body) {
            Ok(ack) => Ok(ack),
            Err(err) => {
                panel_debug!("Stop acknowledged with unrecognised body: {}", err);
                Ok(StopAck::default())
            }
        }
    }

    async fn fetch_results(&self) -> Result<Vec<ResultPayload>, ClientError> {
        let body: ResultsBody = self.get_json(self.endpoint(RESULTS_PATH)?).await?;
        Ok(body.results.unwrap_or_default())
    }
}

/// Reads the whole body, turning non-2xx statuses into `HttpStatus` errors.
async fn read_body(response: reqwest::Response) -> Result<Vec<u8>, ClientError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|err| err.error.or(err.message))
            .unwrap_or_else(|| status.to_string());
        return Err(ClientError::new(
            FailureKind::HttpStatus(status.as_u16()),
            message,
        ));
    }
    Ok(body.to_vec())
}

fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(body).map_err(|err| ClientError::new(FailureKind::Parse, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return ClientError::new(FailureKind::InvalidUrl, err.to_string());
    }
    ClientError::new(FailureKind::Network, err.to_string())
}
