use std::io::{self, Write};

use chrono::Local;
use panel_core::{AppViewModel, FilterView, ProgressView, ResultsView, SelectOption};

const BAR_WIDTH: usize = 30;

pub fn write_view<W: Write>(out: &mut W, view: &AppViewModel) -> io::Result<()> {
    writeln!(out, "---- {} ----", Local::now().format("%H:%M:%S"))?;
    for line in render(view) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    lines.extend(filter_lines(&view.filters));
    lines.push(progress_bar_line(&view.progress));
    lines.push(counts_line(&view.progress));

    let controls = &view.controls;
    let mut status = format!("Status: {}", controls.start_label);
    if controls.spinner_visible {
        status.push_str(" [busy]");
    }
    if controls.stop_visible {
        status.push_str(" | type 'stop' to stop");
    } else if controls.start_enabled {
        status.push_str(" | type 'start' to begin");
    }
    lines.push(status);

    if let Some(notice) = &view.notice {
        lines.push(format!("Notice: {notice}"));
    }

    lines.push("Results:".to_string());
    match &view.results {
        ResultsView::Placeholder { message } => lines.push(format!("  {message}")),
        ResultsView::Error { message } => lines.push(format!("  ERROR: {message}")),
        ResultsView::Items(rows) => {
            for (index, row) in rows.iter().enumerate() {
                lines.push(format!("  {}. {} ({})", index + 1, row.title, row.location));
                if !row.snippet.is_empty() {
                    lines.push(format!("     {}", row.snippet));
                }
                match &row.link_host {
                    Some(host) => lines.push(format!("     Visit {host}: {}", row.url)),
                    None => lines.push(format!("     Visit: {}", row.url)),
                }
            }
        }
    }

    lines
}

fn filter_lines(filters: &FilterView) -> Vec<String> {
    let mut lines = vec![format!(
        "State: {} | City: {}{}",
        selected_label(&filters.state_options, &filters.selected_state),
        selected_label(&filters.city_options, &filters.selected_city),
        if filters.city_enabled { "" } else { " (select a state first)" }
    )];
    lines.push(format!("  States: {}", option_values(&filters.state_options)));
    if filters.city_enabled {
        lines.push(format!("  Cities: {}", option_values(&filters.city_options)));
    }
    lines
}

fn selected_label<'a>(options: &'a [SelectOption], selected: &str) -> &'a str {
    options
        .iter()
        .find(|option| option.value == selected)
        .map(|option| option.label.as_str())
        .unwrap_or("?")
}

fn option_values(options: &[SelectOption]) -> String {
    let values: Vec<&str> = options
        .iter()
        .filter(|option| !option.value.is_empty())
        .map(|option| option.value.as_str())
        .collect();
    if values.is_empty() {
        "(none loaded)".to_string()
    } else {
        values.join(", ")
    }
}

fn progress_bar_line(progress: &ProgressView) -> String {
    // The view passes the percentage through; only the drawing is bounded.
    let fraction = (progress.percent / 100.0).clamp(0.0, 1.0);
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;
    format!(
        "Progress: [{}{}] {}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress.percent_label
    )
}

fn counts_line(progress: &ProgressView) -> String {
    let mut line = format!(
        "Processed {} | Successful {} | Failed {} | Remaining {}",
        progress.total_processed, progress.successful, progress.failed, progress.remaining
    );
    if let Some(total) = progress.total {
        line.push_str(&format!(" | Total {total}"));
    }
    line
}
