use panel_logging::{panel_debug, panel_error, panel_info, panel_warn};

use crate::{
    normalize_filter, AppState, Effect, ErrorKind, Msg, RequestError, START_SENTINEL,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Initialize => vec![Effect::FetchStates],
        Msg::StatesLoaded(Ok(states)) => {
            panel_info!("Loaded {} states", states.len());
            state.set_states(states);
            // A job may already be running from before this session started.
            vec![state.poller_mut().begin()]
        }
        Msg::StatesLoaded(Err(err)) => {
            panel_error!("Error initializing: {}", err);
            state.show_error("Failed to initialize application");
            Vec::new()
        }
        Msg::StateSelected(raw) => {
            let selected = normalize_filter(&raw);
            state.select_state(selected.clone());
            match selected {
                Some(name) if state.cached_cities(&name).is_none() => {
                    if state.begin_city_fetch(&name) {
                        vec![Effect::FetchCities { state: name }]
                    } else {
                        Vec::new()
                    }
                }
                _ => Vec::new(),
            }
        }
        Msg::CitiesLoaded {
            state: name,
            result: Ok(cities),
        } => {
            panel_debug!("Loaded {} cities for {}", cities.len(), name);
            state.cache_cities(&name, cities);
            Vec::new()
        }
        Msg::CitiesLoaded {
            state: name,
            result: Err(err),
        } => {
            panel_error!("Error fetching cities for {}: {}", name, err);
            state.abandon_city_fetch(&name);
            state.show_error("Failed to fetch cities");
            Vec::new()
        }
        Msg::CitySelected(raw) => {
            let city = normalize_filter(&raw);
            if !state.select_city(city.clone()) {
                panel_warn!("Ignoring city selection {:?}", city);
                state.set_notice(Some(match city {
                    Some(name) => format!("Unknown city for the selected state: {name}"),
                    None => "Select a state first".to_string(),
                }));
            }
            Vec::new()
        }
        Msg::StartClicked => {
            if state.is_busy() {
                Vec::new()
            } else {
                state.set_start_in_flight(true);
                state.set_notice(None);
                vec![Effect::StartProcessing {
                    filter: state.filter().clone(),
                }]
            }
        }
        Msg::StartAcknowledged(result) => {
            if !state.start_in_flight() {
                // The backend may have started after all; let a progress check decide.
                return match result {
                    Ok(status) if status == START_SENTINEL => {
                        panel_warn!("Backend started processing after stop; checking progress");
                        let check = state.poller_mut().begin();
                        (state, vec![check])
                    }
                    other => {
                        panel_debug!("Start answer arrived after stop; ignoring {:?}", other);
                        (state, Vec::new())
                    }
                };
            }
            state.set_start_in_flight(false);
            match result {
                Ok(status) if status == START_SENTINEL => {
                    panel_info!("Processing started with filter {:?}", state.filter());
                    state.set_processing(true);
                    vec![state.poller_mut().begin()]
                }
                Ok(status) => {
                    let err = RequestError::new(
                        ErrorKind::Rejected,
                        format!("Backend did not start processing: {status}"),
                    );
                    panel_error!("Error processing batch: {}", err);
                    state.set_processing(false);
                    state.show_error(err.message);
                    Vec::new()
                }
                Err(err) => {
                    panel_error!("Error processing batch: {}", err);
                    state.set_processing(false);
                    state.show_error(err.message);
                    Vec::new()
                }
            }
        }
        Msg::StopClicked => {
            // Sent even when the panel looks idle; the backend may still be running.
            state.poller_mut().force_idle();
            state.set_start_in_flight(false);
            state.set_processing(false);
            vec![Effect::CancelPoll, Effect::StopProcessing]
        }
        Msg::StopAcknowledged(Ok(message)) => {
            panel_info!("Processing stopped");
            state.set_notice(message);
            Vec::new()
        }
        Msg::StopAcknowledged(Err(err)) => {
            panel_error!("Error stopping process: {}", err);
            state.set_processing(false);
            state.show_error("Failed to stop processing");
            Vec::new()
        }
        Msg::ProgressReceived { generation, result } => {
            if !state.poller().accepts_progress(generation) {
                panel_debug!(
                    "Dropping progress for generation {} (current {})",
                    generation,
                    state.poller().generation()
                );
                return (state, Vec::new());
            }
            match result {
                Ok(snapshot) => {
                    let is_processing = snapshot.is_processing;
                    state.set_progress(snapshot);
                    state.set_processing(is_processing);
                    state.set_notice(None);
                    vec![state.poller_mut().on_snapshot(is_processing)]
                }
                Err(err) => {
                    panel_error!("Error updating progress: {}", err);
                    match state.poller_mut().on_error() {
                        Some(next) => {
                            state.set_notice(Some(format!(
                                "Progress check failed ({err}); retrying"
                            )));
                            vec![next]
                        }
                        None => {
                            state.set_processing(false);
                            state.show_error(format!("Progress check failed: {}", err.message));
                            Vec::new()
                        }
                    }
                }
            }
        }
        Msg::RefreshResultsClicked => vec![Effect::FetchResults {
            generation: state.poller().generation(),
        }],
        Msg::ResultsReceived { generation, result } => {
            if !state.poller().accepts_results(generation) {
                panel_debug!("Dropping results for generation {}", generation);
                return (state, Vec::new());
            }
            match result {
                Ok(items) => {
                    panel_info!("Received {} results", items.len());
                    state.set_results(items);
                }
                Err(err) => {
                    panel_error!("Error fetching results: {}", err);
                    state.show_error("Failed to fetch results");
                }
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
