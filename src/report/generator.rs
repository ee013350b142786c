//! Chart rendering.
//!
//! Charts are written as JSON documents for downstream plotting tools, or
//! as plain-text tables for the terminal.

use super::dispatcher::{ChartRenderer, RenderTarget};
use crate::cli::OutputFormat;
use crate::models::{Chart, EngagementChart, HeatmapChart, SpeakerChart};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Generate a JSON chart document.
pub fn generate_json_chart(chart: &Chart) -> Result<String> {
    serde_json::to_string_pretty(chart).map_err(Into::into)
}

/// Generate a plain-text rendering of a chart.
pub fn generate_text_chart(chart: &Chart) -> String {
    let mut output = String::new();

    let labels = chart.labels();
    output.push_str(&labels.title);
    output.push('\n');
    output.push_str(&"=".repeat(labels.title.chars().count()));
    output.push_str("\n\n");

    match chart {
        Chart::Heatmap(c) => output.push_str(&generate_heatmap_table(c)),
        Chart::Engagement(c) => output.push_str(&generate_engagement_table(c)),
        Chart::Speakers(c) => output.push_str(&generate_speaker_table(c)),
    }

    output
}

fn generate_heatmap_table(chart: &HeatmapChart) -> String {
    let mut table = String::new();

    let label_width = chart
        .row_labels
        .iter()
        .map(|l| l.len())
        .max()
        .unwrap_or(0);
    let cell_width = chart
        .cells
        .iter()
        .flatten()
        .map(|c| c.to_string().len())
        .max()
        .unwrap_or(1)
        .max(2);

    table.push_str(&format!(
        "{} by {} ({})\n",
        chart.scale_label, chart.labels.x_axis, chart.labels.y_axis
    ));
    table.push_str(&" ".repeat(label_width));
    for hour in &chart.column_labels {
        table.push_str(&format!(" {:>width$}", hour, width = cell_width));
    }
    table.push('\n');

    for (label, row) in chart.row_labels.iter().zip(chart.cells.iter()) {
        table.push_str(&format!("{:<width$}", label, width = label_width));
        for count in row {
            table.push_str(&format!(" {:>width$}", count, width = cell_width));
        }
        table.push('\n');
    }

    table.push_str(&format!("\nTotal: {}\n", chart.total()));
    table
}

fn generate_engagement_table(chart: &EngagementChart) -> String {
    let mut table = String::new();

    table.push_str(&format!("{:<10}  {:>12}  {:>8}\n", "Date", chart.labels.y_axis, "Trend"));
    for (i, (day, count)) in chart.days.iter().zip(&chart.active_users).enumerate() {
        let trend = chart
            .fitted
            .get(i)
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| "-".to_string());
        table.push_str(&format!(
            "{:<10}  {:>12}  {:>8}\n",
            day.format("%Y-%m-%d").to_string(),
            count,
            trend
        ));
    }

    if chart.days.is_empty() {
        table.push_str("(no messages)\n");
    }

    table
}

fn generate_speaker_table(chart: &SpeakerChart) -> String {
    let mut table = String::new();

    // Bottom band first, matching the order of `users`.
    let mut headers: Vec<String> = chart.legend.iter().rev().cloned().collect();
    if headers.is_empty() {
        headers.push(crate::analysis::speakers::OTHER_LABEL.to_string());
    }
    let widths: Vec<usize> = headers.iter().map(|h| h.len().max(4)).collect();

    table.push_str(&format!("{} (%)\n", chart.labels.y_axis));
    table.push_str(&format!("{:<7}", "Month"));
    for (header, width) in headers.iter().zip(&widths) {
        table.push_str(&format!("  {:>width$}", header, width = *width));
    }
    table.push('\n');

    for (col, month) in chart.months.iter().enumerate() {
        table.push_str(&format!("{:<7}", month.format("%Y-%m").to_string()));
        let shares = chart
            .shares
            .iter()
            .map(|row| row[col])
            .chain(std::iter::once(chart.other[col]));
        for (share, width) in shares.zip(&widths) {
            table.push_str(&format!("  {:>width$}", share, width = *width));
        }
        table.push('\n');
    }

    if chart.months.is_empty() {
        table.push_str("(no messages)\n");
    }

    table
}

/// Write a chart to a file in the given format.
pub fn write_chart(chart: &Chart, path: &Path, format: OutputFormat) -> Result<()> {
    let content = match format {
        OutputFormat::Json => generate_json_chart(chart)?,
        OutputFormat::Text => generate_text_chart(chart),
    };

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write chart to {}", path.display()))?;

    Ok(())
}

/// Default renderer: files get `format`, the terminal gets text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRenderer {
    format: OutputFormat,
}

impl ReportRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl ChartRenderer for ReportRenderer {
    fn render(&self, chart: &Chart, target: &RenderTarget) -> Result<()> {
        match target {
            RenderTarget::File(path) => write_chart(chart, path, self.format),
            RenderTarget::Display => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                handle
                    .write_all(generate_text_chart(chart).as_bytes())
                    .context("Failed to write chart to stdout")?;
                handle.flush()?;
                Ok(())
            }
        }
    }
}
