use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use panel_logging::{panel_debug, panel_warn};
use tokio_util::sync::CancellationToken;

use crate::backend::{Backend, ClientSettings, ReqwestBackend};
use crate::{ClientError, FailureKind, ProgressPayload, ResultPayload, StartAck, StopAck};

/// One-shot backend calls. Each produces exactly one [`ClientEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    FetchStates,
    FetchCities {
        state: String,
    },
    StartProcessing {
        state: Option<String>,
        city: Option<String>,
    },
    StopProcessing,
    FetchResults {
        generation: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    StatesFetched(Result<Vec<String>, ClientError>),
    CitiesFetched {
        state: String,
        result: Result<Vec<String>, ClientError>,
    },
    ProgressFetched {
        generation: u64,
        result: Result<ProgressPayload, ClientError>,
    },
    StartFinished(Result<StartAck, ClientError>),
    StopFinished(Result<StopAck, ClientError>),
    ResultsFetched {
        generation: u64,
        result: Result<Vec<ResultPayload>, ClientError>,
    },
}

enum Command {
    Call(Request),
    Poll { generation: u64, delay: Duration },
    CancelPoll,
}

/// Runs backend calls on a background tokio runtime and hands the answers
/// back through a channel the UI thread drains at its own pace.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<Command>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let backend = ReqwestBackend::new(settings)?;
        Self::with_backend(Arc::new(backend)).map_err(|err| {
            ClientError::new(
                FailureKind::Network,
                format!("failed to start client runtime: {err}"),
            )
        })
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("panel-client".to_string())
            .spawn(move || {
                // At most one poll is pending; a new one replaces it.
                let mut poll: Option<CancellationToken> = None;
                while let Ok(command) = cmd_rx.recv() {
                    match command {
                        Command::Call(request) => {
                            let backend = backend.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                handle_request(backend.as_ref(), request, event_tx).await;
                            });
                        }
                        Command::Poll { generation, delay } => {
                            let token = CancellationToken::new();
                            if let Some(previous) = poll.replace(token.clone()) {
                                previous.cancel();
                            }
                            let backend = backend.clone();
                            let event_tx = event_tx.clone();
                            runtime.spawn(async move {
                                run_poll(backend.as_ref(), generation, delay, token, event_tx)
                                    .await;
                            });
                        }
                        Command::CancelPoll => {
                            if let Some(token) = poll.take() {
                                token.cancel();
                            }
                        }
                    }
                }
                panel_debug!("Client command channel closed; shutting down runtime");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn send(&self, request: Request) {
        if self.cmd_tx.send(Command::Call(request)).is_err() {
            panel_warn!("Client runtime is gone; dropping request");
        }
    }

    /// Fetches progress after `delay` (immediately for a zero delay),
    /// cancelling any poll that is still pending.
    pub fn poll(&self, generation: u64, delay: Duration) {
        if self
            .cmd_tx
            .send(Command::Poll { generation, delay })
            .is_err()
        {
            panel_warn!("Client runtime is gone; dropping poll {}", generation);
        }
    }

    /// Cancels the pending poll, including one whose request is in flight.
    pub fn cancel_poll(&self) {
        let _ = self.cmd_tx.send(Command::CancelPoll);
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn run_poll(
    backend: &dyn Backend,
    generation: u64,
    delay: Duration,
    token: CancellationToken,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    let fetch = async {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        backend.fetch_progress().await
    };
    tokio::select! {
        _ = token.cancelled() => {
            panel_debug!("Poll for generation {} cancelled", generation);
        }
        result = fetch => {
            let _ = event_tx.send(ClientEvent::ProgressFetched { generation, result });
        }
    }
}

async fn handle_request(
    backend: &dyn Backend,
    request: Request,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    let event = match request {
        Request::FetchStates => ClientEvent::StatesFetched(backend.fetch_states().await),
        Request::FetchCities { state } => {
            let result = backend.fetch_cities(&state).await;
            ClientEvent::CitiesFetched { state, result }
        }
        Request::StartProcessing { state, city } => ClientEvent::StartFinished(
            backend
                .start_processing(state.as_deref(), city.as_deref())
                .await,
        ),
        Request::StopProcessing => ClientEvent::StopFinished(backend.stop_processing().await),
        Request::FetchResults { generation } => ClientEvent::ResultsFetched {
            generation,
            result: backend.fetch_results().await,
        },
    };
    let _ = event_tx.send(event);
}
