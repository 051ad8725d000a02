use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::poller::{PollErrorPolicy, Poller};
use crate::view_model::{
    render_error, render_filters, render_processing, render_progress, render_results,
    AppViewModel,
};
use crate::{FilterSelection, ProgressSnapshot, ResultItem};

/// Content of the results panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsPanel {
    #[default]
    Empty,
    Items(Vec<ResultItem>),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    states: Vec<String>,
    cities_by_state: BTreeMap<String, Vec<String>>,
    pending_cities: BTreeSet<String>,
    filter: FilterSelection,
    processing: bool,
    start_in_flight: bool,
    poller: Poller,
    progress: ProgressSnapshot,
    results: ResultsPanel,
    notice: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_settings(interval: Duration, policy: PollErrorPolicy) -> Self {
        Self {
            poller: Poller::new(interval, policy),
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let results = match &self.results {
            ResultsPanel::Empty => render_results(None),
            ResultsPanel::Items(items) => render_results(Some(items.as_slice())),
            ResultsPanel::Error(message) => render_error(message),
        };
        AppViewModel {
            filters: render_filters(
                &self.states,
                self.selected_cities(),
                &self.filter,
            ),
            progress: render_progress(&self.progress),
            controls: render_processing(self.is_busy()),
            results,
            notice: self.notice.clone(),
            poller: self.poller.phase(),
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Busy while a job runs or while a start request awaits its answer.
    pub fn is_busy(&self) -> bool {
        self.processing || self.start_in_flight
    }

    pub fn cached_cities(&self, state: &str) -> Option<&[String]> {
        self.cities_by_state.get(state).map(Vec::as_slice)
    }

    fn selected_cities(&self) -> &[String] {
        self.filter
            .state
            .as_deref()
            .and_then(|state| self.cached_cities(state))
            .unwrap_or(&[])
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_states(&mut self, states: Vec<String>) {
        self.states = states;
        self.mark_dirty();
    }

    pub(crate) fn select_state(&mut self, state: Option<String>) {
        self.filter.state = state;
        self.filter.city = None;
        self.mark_dirty();
    }

    /// Only a city of the selected state can be chosen; returns false otherwise.
    pub(crate) fn select_city(&mut self, city: Option<String>) -> bool {
        if self.filter.state.is_none() {
            return false;
        }
        if let Some(name) = city.as_deref() {
            if !self.selected_cities().iter().any(|known| known == name) {
                return false;
            }
        }
        self.filter.city = city;
        self.mark_dirty();
        true
    }

    /// Marks a city fetch as in flight. Returns false when one already is.
    pub(crate) fn begin_city_fetch(&mut self, state: &str) -> bool {
        self.pending_cities.insert(state.to_string())
    }

    pub(crate) fn cache_cities(&mut self, state: &str, mut cities: Vec<String>) {
        self.pending_cities.remove(state);
        cities.sort();
        self.cities_by_state.insert(state.to_string(), cities);
        self.mark_dirty();
    }

    pub(crate) fn abandon_city_fetch(&mut self, state: &str) {
        self.pending_cities.remove(state);
    }

    pub(crate) fn start_in_flight(&self) -> bool {
        self.start_in_flight
    }

    pub(crate) fn set_start_in_flight(&mut self, in_flight: bool) {
        self.start_in_flight = in_flight;
        self.mark_dirty();
    }

    pub(crate) fn set_processing(&mut self, processing: bool) {
        self.processing = processing;
        self.mark_dirty();
    }

    pub(crate) fn poller_mut(&mut self) -> &mut Poller {
        &mut self.poller
    }

    pub(crate) fn set_progress(&mut self, snapshot: ProgressSnapshot) {
        self.progress = snapshot;
        self.mark_dirty();
    }

    pub(crate) fn set_results(&mut self, items: Vec<ResultItem>) {
        self.results = if items.is_empty() {
            ResultsPanel::Empty
        } else {
            ResultsPanel::Items(items)
        };
        self.mark_dirty();
    }

    pub(crate) fn show_error(&mut self, message: impl Into<String>) {
        self.results = ResultsPanel::Error(message.into());
        self.mark_dirty();
    }

    pub(crate) fn set_notice(&mut self, notice: Option<String>) {
        self.notice = notice;
        self.mark_dirty();
    }
}
