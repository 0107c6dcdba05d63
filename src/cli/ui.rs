use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Dimmed text for progress lines and placeholders.
pub fn subtle(text: &str) -> String {
    style(text).dim().to_string()
}

pub fn emphasis(text: &str) -> String {
    style(text).bold().to_string()
}

/// Rounded UTF-8 table with a bold cyan header row.
pub fn table_with_header(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| {
            Cell::new(h)
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
        }));
    table
}

/// Right-aligned number cell; a missing value renders as a grey "N/A".
pub fn number_cell(value: Option<f64>, precision: usize) -> Cell {
    match value {
        Some(v) => Cell::new(format!("{v:.precision$}")).set_alignment(CellAlignment::Right),
        None => Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
    }
}

/// Cell for a total growth multiple, green when it beats `benchmark`.
pub fn multiplier_cell(multiplier: Option<f64>, benchmark: Option<f64>) -> Cell {
    let Some(value) = multiplier else {
        return Cell::new("N/A").fg(Color::Red);
    };
    let cell = Cell::new(format!("x{value:.2}")).set_alignment(CellAlignment::Right);
    match benchmark {
        Some(b) if value >= b => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        Some(_) => cell.fg(Color::Red),
        None => cell,
    }
}

/// Spinner whose message follows the latest pipeline status.
pub fn new_status_spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
