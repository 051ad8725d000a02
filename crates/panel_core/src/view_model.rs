//! Pure projection of panel state onto a toolkit-independent view-model.

use crate::{FilterSelection, PollerPhase, ProgressSnapshot, ResultItem};

pub const ALL_STATES_LABEL: &str = "All States";
pub const ALL_CITIES_LABEL: &str = "All Cities";
pub const START_LABEL_IDLE: &str = "Process Next Batch";
pub const START_LABEL_BUSY: &str = "Processing...";
pub const EMPTY_RESULTS_TEXT: &str = "No results yet";

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub filters: FilterView,
    pub progress: ProgressView,
    pub controls: ControlsView,
    pub results: ResultsView,
    pub notice: Option<String>,
    pub poller: PollerPhase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Empty value is the "no filter" entry.
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterView {
    pub state_options: Vec<SelectOption>,
    pub selected_state: String,
    pub city_options: Vec<SelectOption>,
    pub selected_city: String,
    pub city_enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressView {
    /// Bar fill in percent. Passed through unclamped.
    pub percent: f64,
    pub percent_label: String,
    pub total_processed: u64,
    pub successful: u64,
    pub failed: u64,
    pub remaining: u64,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsView {
    pub start_enabled: bool,
    pub start_label: String,
    pub stop_visible: bool,
    pub spinner_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Placeholder { message: String },
    Items(Vec<ResultRowView>),
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub title: String,
    pub location: String,
    pub snippet: String,
    pub url: String,
    /// Host part of `url`, when it parses.
    pub link_host: Option<String>,
}

pub fn render_progress(snapshot: &ProgressSnapshot) -> ProgressView {
    let percent = snapshot.overall_progress.unwrap_or(0.0);
    ProgressView {
        percent,
        percent_label: format!("{percent:.1}%"),
        total_processed: snapshot.total_processed.unwrap_or(0),
        successful: snapshot.successful.unwrap_or(0),
        failed: snapshot.failed.unwrap_or(0),
        remaining: snapshot.remaining.unwrap_or(0),
        total: snapshot.total,
    }
}

pub fn render_processing(busy: bool) -> ControlsView {
    ControlsView {
        start_enabled: !busy,
        start_label: if busy {
            START_LABEL_BUSY
        } else {
            START_LABEL_IDLE
        }
        .to_string(),
        stop_visible: busy,
        spinner_visible: busy,
    }
}

pub fn render_results(results: Option<&[ResultItem]>) -> ResultsView {
    match results {
        Some(items) if !items.is_empty() => {
            ResultsView::Items(items.iter().map(result_row).collect())
        }
        _ => ResultsView::Placeholder {
            message: EMPTY_RESULTS_TEXT.to_string(),
        },
    }
}

pub fn render_error(message: &str) -> ResultsView {
    ResultsView::Error {
        message: message.to_string(),
    }
}

pub fn render_filters(
    states: &[String],
    cities: &[String],
    selection: &FilterSelection,
) -> FilterView {
    let city_enabled = selection.state.is_some();
    FilterView {
        state_options: options_with_blank(ALL_STATES_LABEL, states),
        selected_state: selection.state.clone().unwrap_or_default(),
        city_options: if city_enabled {
            options_with_blank(ALL_CITIES_LABEL, cities)
        } else {
            options_with_blank(ALL_CITIES_LABEL, &[])
        },
        selected_city: selection.city.clone().unwrap_or_default(),
        city_enabled,
    }
}

fn options_with_blank(blank_label: &str, values: &[String]) -> Vec<SelectOption> {
    let mut options = Vec::with_capacity(values.len() + 1);
    options.push(SelectOption {
        value: String::new(),
        label: blank_label.to_string(),
    });
    options.extend(values.iter().map(|value| SelectOption {
        value: value.clone(),
        label: value.clone(),
    }));
    options
}

fn result_row(item: &ResultItem) -> ResultRowView {
    let link_host = url::Url::parse(&item.url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(ToOwned::to_owned));
    ResultRowView {
        title: item.title.clone(),
        location: item.location.clone(),
        snippet: item.snippet.clone(),
        url: item.url.clone(),
        link_host,
    }
}
