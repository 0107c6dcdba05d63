use super::ui;
use crate::core::align::AlignedRow;
use crate::core::pipeline::{Pipeline, PipelineReport};
use anyhow::{Context, Result};
use comfy_table::Cell;
use std::path::Path;

impl PipelineReport {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::table_with_header(&[
            "Year",
            "Inflation (%)",
            "USD",
            "Index",
            "Stock",
            "Inflation x100",
            "USD x100",
            "Index x100",
            "Stock x100",
        ]);
        for row in &self.rows {
            table.add_row(vec![
                Cell::new(&row.year),
                ui::number_cell(row.inflation_rate, 1),
                ui::number_cell(row.usd, 0),
                ui::number_cell(row.index, 0),
                ui::number_cell(row.stock, 0),
                ui::number_cell(row.inflation_growth, 1),
                ui::number_cell(row.usd_growth, 1),
                ui::number_cell(row.index_growth, 1),
                ui::number_cell(row.stock_growth, 1),
            ]);
        }
        table.to_string()
    }

    /// Total multiple and annual growth of each series, compared to inflation.
    pub fn display_summary(&self) -> String {
        let benchmark = self.summaries.first().and_then(|s| s.multiplier);

        let mut table = ui::table_with_header(&["Series", "Total growth", "Per year (%)"]);
        for (i, summary) in self.summaries.iter().enumerate() {
            let reference = if i == 0 { None } else { benchmark };
            table.add_row(vec![
                Cell::new(&summary.label),
                ui::multiplier_cell(summary.multiplier, reference),
                ui::number_cell(summary.annual_rate, 2),
            ]);
        }
        table.to_string()
    }
}

/// Writes the aligned table as CSV; missing values are left empty.
pub fn export_csv(rows: &[AlignedRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    Ok(())
}

pub async fn run(
    pipeline: &Pipeline<'_>,
    start_year: i32,
    end_year: i32,
    output: Option<&Path>,
) -> Result<()> {
    let pb = ui::new_status_spinner();
    let result = pipeline
        .run(start_year, end_year, |message| {
            pb.println(ui::subtle(message));
            pb.set_message(message.to_string());
        })
        .await;
    pb.finish_and_clear();
    let report = result?;

    println!(
        "Cumulative growth from 100 ({start_year}-{end_year})\n\n{}",
        report.display_as_table()
    );
    println!("\n{}", report.display_summary());

    if let Some(path) = output {
        export_csv(&report.rows, path)?;
        println!(
            "\nExported {} rows to {}",
            report.rows.len(),
            ui::emphasis(&path.display().to_string())
        );
    }
    Ok(())
}
