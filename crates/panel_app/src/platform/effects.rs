use std::time::Duration;

use panel_client::{
    ClientError, ClientEvent, ClientHandle, FailureKind, ProgressPayload, Request, ResultPayload,
    StopAck,
};
use panel_core::{Effect, ErrorKind, Msg, ProgressSnapshot, RequestError, ResultItem};
use panel_logging::{panel_debug, panel_info};

pub struct EffectRunner {
    client: ClientHandle,
}

impl EffectRunner {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchStates => self.client.send(Request::FetchStates),
                Effect::FetchCities { state } => {
                    self.client.send(Request::FetchCities { state });
                }
                Effect::StartProcessing { filter } => {
                    panel_info!(
                        "StartProcessing state={:?} city={:?}",
                        filter.state,
                        filter.city
                    );
                    self.client.send(Request::StartProcessing {
                        state: filter.state,
                        city: filter.city,
                    });
                }
                Effect::StopProcessing => {
                    panel_info!("StopProcessing");
                    self.client.send(Request::StopProcessing);
                }
                Effect::FetchProgress { generation } => {
                    self.client.poll(generation, Duration::ZERO);
                }
                Effect::SchedulePoll { generation, after } => {
                    panel_debug!("Next poll for generation {} in {:?}", generation, after);
                    self.client.poll(generation, after);
                }
                Effect::CancelPoll => self.client.cancel_poll(),
                Effect::FetchResults { generation } => {
                    self.client.send(Request::FetchResults { generation });
                }
            }
        }
    }

    pub fn try_recv(&self) -> Option<Msg> {
        self.client.try_recv().map(map_event)
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<Msg> {
        self.client.recv_timeout(timeout).map(map_event)
    }
}

fn map_event(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::StatesFetched(result) => Msg::StatesLoaded(result.map_err(map_error)),
        ClientEvent::CitiesFetched { state, result } => Msg::CitiesLoaded {
            state,
            result: result.map_err(map_error),
        },
        ClientEvent::ProgressFetched { generation, result } => Msg::ProgressReceived {
            generation,
            result: result.map(map_progress).map_err(map_error),
        },
        ClientEvent::StartFinished(result) => {
            Msg::StartAcknowledged(result.map(|ack| ack.status).map_err(map_error))
        }
        ClientEvent::StopFinished(result) => {
            Msg::StopAcknowledged(result.map(describe_stop).map_err(map_error))
        }
        ClientEvent::ResultsFetched { generation, result } => Msg::ResultsReceived {
            generation,
            result: result
                .map(|items| items.into_iter().map(map_result).collect())
                .map_err(map_error),
        },
    }
}

fn map_error(err: ClientError) -> RequestError {
    let kind = match err.kind {
        FailureKind::InvalidUrl | FailureKind::Network | FailureKind::Timeout => {
            ErrorKind::Network
        }
        FailureKind::Parse => ErrorKind::Parse,
        FailureKind::HttpStatus(_) => ErrorKind::Rejected,
    };
    RequestError::new(kind, err.message)
}

fn map_progress(payload: ProgressPayload) -> ProgressSnapshot {
    ProgressSnapshot {
        overall_progress: payload.overall_progress,
        total_processed: payload.total_processed,
        successful: payload.successful,
        failed: payload.failed,
        remaining: payload.remaining,
        total: payload.total,
        is_processing: payload.is_processing.unwrap_or(false),
    }
}

fn map_result(payload: ResultPayload) -> ResultItem {
    ResultItem {
        title: payload.title,
        location: payload.location,
        snippet: payload.snippet,
        url: payload.url,
    }
}

fn describe_stop(ack: StopAck) -> Option<String> {
    let saved = match (ack.vendors_saved, ack.results_file) {
        (Some(count), Some(file)) => Some(format!("{count} vendors saved, results in {file}")),
        (Some(count), None) => Some(format!("{count} vendors saved")),
        (None, Some(file)) => Some(format!("results in {file}")),
        (None, None) => None,
    };
    match (ack.message, saved) {
        (Some(message), Some(saved)) => Some(format!("{message} ({saved})")),
        (Some(message), None) => Some(message),
        (None, saved) => saved,
    }
}
