//! Panel core: pure state machine, progress poller and view-model helpers.
mod effect;
mod model;
mod msg;
mod poller;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use model::{
    normalize_filter, ErrorKind, FilterSelection, ProgressSnapshot, RequestError, ResultItem,
    START_SENTINEL,
};
pub use msg::Msg;
pub use poller::{PollErrorPolicy, Poller, PollerPhase, DEFAULT_POLL_INTERVAL};
pub use state::AppState;
pub use update::update;
pub use view_model::{
    render_error, render_filters, render_processing, render_progress, render_results,
    AppViewModel, ControlsView, FilterView, ProgressView, ResultRowView, ResultsView,
    SelectOption, ALL_CITIES_LABEL, ALL_STATES_LABEL, EMPTY_RESULTS_TEXT, START_LABEL_BUSY,
    START_LABEL_IDLE,
};
