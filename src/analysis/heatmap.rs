//! Day-of-week × hour-of-day activity.

use super::Aggregator;
use crate::models::{
    Chart, ChartLabels, HeatmapChart, ReportOutput, HOURS, WEEKDAYS, WEEKDAY_LABELS,
};
use crate::time::LocalizedMessage;

/// Count messages per (weekday, hour) cell.
pub fn heatmap_cells(messages: &[LocalizedMessage]) -> [[u64; HOURS]; WEEKDAYS] {
    let mut cells = [[0u64; HOURS]; WEEKDAYS];

    for msg in messages {
        cells[msg.moment.weekday()][msg.moment.hour()] += 1;
    }

    cells
}

/// Heatmap of room activity.
#[derive(Debug, Clone)]
pub struct HeatmapReport {
    room: String,
}

impl HeatmapReport {
    pub fn new(room: impl Into<String>) -> Self {
        Self { room: room.into() }
    }
}

impl Aggregator for HeatmapReport {
    fn name(&self) -> &'static str {
        "heatmap"
    }

    fn run(&self, messages: &[LocalizedMessage]) -> ReportOutput {
        let cells = heatmap_cells(messages);

        ReportOutput::Chart(Chart::Heatmap(HeatmapChart {
            labels: ChartLabels::new(
                format!("{} room activity", self.room),
                "Hour of day",
                "Day of week",
            ),
            scale_label: "Messages".to_string(),
            row_labels: WEEKDAY_LABELS.iter().map(|d| d.to_string()).collect(),
            column_labels: (0..HOURS).map(|h| h.to_string()).collect(),
            cells,
        }))
    }
}
