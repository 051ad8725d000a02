use std::io::{self, Write};
use std::time::Duration;

use panel_core::{update, AppState, Msg};

use super::effects::EffectRunner;
use super::ui::{input::HELP_TEXT, render};

/// Owns the application state. Every mutation goes through [`update`];
/// effects are handed to the runner and the view is redrawn when dirty.
pub struct Controller<W: Write> {
    state: AppState,
    effects: EffectRunner,
    out: W,
}

impl<W: Write> Controller<W> {
    pub fn new(state: AppState, effects: EffectRunner, out: W) -> Self {
        Self {
            state,
            effects,
            out,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;
        self.effects.run(effects);
        if was_dirty {
            self.show()?;
        }
        Ok(())
    }

    /// Applies every client answer that has already arrived.
    pub fn pump_client(&mut self) -> io::Result<usize> {
        let mut handled = 0;
        while let Some(msg) = self.effects.try_recv() {
            self.dispatch(msg)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Waits up to `timeout` for one client answer. Returns whether one came.
    pub fn wait_for_client(&mut self, timeout: Duration) -> io::Result<bool> {
        match self.effects.recv_timeout(timeout) {
            Some(msg) => {
                self.dispatch(msg)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn show(&mut self) -> io::Result<()> {
        render::write_view(&mut self.out, &self.state.view())
    }

    pub fn write_help(&mut self) -> io::Result<()> {
        writeln!(self.out, "{HELP_TEXT}")?;
        self.out.flush()
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    use panel_client::{
        Backend, ClientError, ClientHandle, FailureKind, ProgressPayload, ResultPayload,
        StartAck, StopAck,
    };
    use panel_core::{PollErrorPolicy, PollerPhase, ResultsView, START_SENTINEL};

    use super::*;

    /// Backend that replays scripted progress answers and counts calls.
    #[derive(Default)]
    struct ScriptedBackend {
        progress: Mutex<VecDeque<ProgressPayload>>,
        keep_processing: bool,
        fail_stop: bool,
        progress_calls: AtomicUsize,
        results_calls: AtomicUsize,
        stop_calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn with_progress(flags: &[bool]) -> Self {
            Self {
                progress: Mutex::new(
                    flags
                        .iter()
                        .map(|busy| ProgressPayload {
                            overall_progress: Some(if *busy { 50.0 } else { 100.0 }),
                            is_processing: Some(*busy),
                            ..ProgressPayload::default()
                        })
                        .collect(),
                ),
                ..Self::default()
            }
        }
    }

    #[async_trait::async_trait]
    impl Backend for ScriptedBackend {
        async fn fetch_states(&self) -> Result<Vec<String>, ClientError> {
            Ok(vec!["Ohio".into()])
        }

        async fn fetch_cities(&self, _state: &str) -> Result<Vec<String>, ClientError> {
            Ok(vec!["Akron".into()])
        }

        async fn fetch_progress(&self) -> Result<ProgressPayload, ClientError> {
            self.progress_calls.fetch_add(1, Ordering::SeqCst);
            let next = self.progress.lock().unwrap().pop_front();
            Ok(next.unwrap_or(ProgressPayload {
                is_processing: Some(self.keep_processing),
                ..ProgressPayload::default()
            }))
        }

        async fn start_processing(
            &self,
            _state: Option<&str>,
            _city: Option<&str>,
        ) -> Result<StartAck, ClientError> {
            Ok(StartAck {
                status: START_SENTINEL.to_string(),
            })
        }

        async fn stop_processing(&self) -> Result<StopAck, ClientError> {
            self.stop_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_stop {
                Err(ClientError {
                    kind: FailureKind::Network,
                    message: "connection reset".into(),
                })
            } else {
                Ok(StopAck::default())
            }
        }

        async fn fetch_results(&self) -> Result<Vec<ResultPayload>, ClientError> {
            self.results_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ResultPayload {
                title: "Akron Plumbing".into(),
                location: "Akron, OH".into(),
                snippet: "24/7 service".into(),
                url: "https://akron-plumbing.example.com".into(),
            }])
        }
    }

    fn controller(backend: Arc<ScriptedBackend>) -> Controller<Vec<u8>> {
        panel_logging::initialize_for_tests();
        let client = ClientHandle::with_backend(backend).unwrap();
        Controller::new(
            AppState::with_poll_settings(Duration::from_millis(10), PollErrorPolicy::default()),
            EffectRunner::new(client),
            Vec::new(),
        )
    }

    fn pump_until(
        controller: &mut Controller<Vec<u8>>,
        done: impl Fn(&AppState) -> bool,
    ) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if done(controller.state()) {
                return true;
            }
            controller
                .wait_for_client(Duration::from_millis(20))
                .unwrap();
        }
        done(controller.state())
    }

    #[test]
    fn job_polls_until_done_then_fetches_results_once() {
        let backend = Arc::new(ScriptedBackend::with_progress(&[true, true, false]));
        let mut controller = controller(backend.clone());

        controller.dispatch(Msg::StartClicked).unwrap();
        let finished = pump_until(&mut controller, |state| {
            matches!(state.view().results, ResultsView::Items(_))
        });
        assert!(finished);

        // Give a stray poll the chance to show up before counting.
        std::thread::sleep(Duration::from_millis(100));
        controller.pump_client().unwrap();

        assert_eq!(backend.progress_calls.load(Ordering::SeqCst), 3);
        assert_eq!(backend.results_calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.state().poller().phase(), PollerPhase::Stopped);
        assert!(!controller.state().is_busy());

        let output = String::from_utf8(controller.out.clone()).unwrap();
        assert!(output.contains("1. Akron Plumbing (Akron, OH)"));
    }

    #[test]
    fn stop_clears_busy_even_when_backend_fails() {
        let backend = Arc::new(ScriptedBackend {
            keep_processing: true,
            fail_stop: true,
            ..ScriptedBackend::default()
        });
        let mut controller = controller(backend.clone());

        controller.dispatch(Msg::StartClicked).unwrap();
        assert!(pump_until(&mut controller, |state| {
            state.poller().phase() == PollerPhase::Polling && state.is_processing()
        }));

        controller.dispatch(Msg::StopClicked).unwrap();
        assert!(!controller.state().is_busy());
        assert!(!controller.state().view().controls.spinner_visible);

        assert!(pump_until(&mut controller, |state| {
            matches!(state.view().results, ResultsView::Error { .. })
        }));
        assert_eq!(backend.stop_calls.load(Ordering::SeqCst), 1);
        assert!(!controller.state().view().controls.spinner_visible);

        // Polling must not resume after the stop.
        let polls = backend.progress_calls.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(100));
        controller.pump_client().unwrap();
        assert_eq!(backend.progress_calls.load(Ordering::SeqCst), polls);
        assert_eq!(controller.state().poller().phase(), PollerPhase::Idle);
    }

    #[test]
    fn initialization_loads_states_and_checks_progress() {
        let backend = Arc::new(ScriptedBackend::with_progress(&[false]));
        let mut controller = controller(backend.clone());

        controller.dispatch(Msg::Initialize).unwrap();
        assert!(pump_until(&mut controller, |state| {
            state.poller().phase() == PollerPhase::Stopped
                && matches!(state.view().results, ResultsView::Items(_))
        }));

        let view = controller.state().view();
        assert_eq!(view.filters.state_options.len(), 2);
        assert_eq!(backend.progress_calls.load(Ordering::SeqCst), 1);
    }
}
