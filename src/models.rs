//! Data models for the chatroom analyzer.
//!
//! This module contains the input message records and the finished
//! chart structures handed to the rendering layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of heatmap rows (Monday first).
pub const WEEKDAYS: usize = 7;

/// Number of heatmap columns (hour of day).
pub const HOURS: usize = 24;

/// Row labels for the heatmap, indexed by weekday (0 = Monday).
pub const WEEKDAY_LABELS: [&str; WEEKDAYS] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Top-level shape of a chatroom export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpus {
    /// Messages in the order they appear in the export.
    pub messages: Vec<Message>,
}

/// Sender of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Display name, used as the user identity.
    pub name: String,
}

/// A single chatroom message as exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Raw UTC timestamp string.
    pub date: String,
    /// Who sent it.
    pub from: Sender,
    /// Message body. Attachment-only messages may omit it.
    #[serde(default)]
    pub message: String,
}

impl Message {
    #[cfg(test)]
    pub fn new(date: &str, from: &str, message: &str) -> Self {
        Self {
            date: date.to_string(),
            from: Sender {
                name: from.to_string(),
            },
            message: message.to_string(),
        }
    }

    /// Sender display name.
    pub fn sender(&self) -> &str {
        &self.from.name
    }
}

/// Title and axis captions for a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLabels {
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
}

impl ChartLabels {
    pub fn new(title: impl Into<String>, x_axis: &str, y_axis: &str) -> Self {
        Self {
            title: title.into(),
            x_axis: x_axis.to_string(),
            y_axis: y_axis.to_string(),
        }
    }
}

/// Weekday × hour message counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapChart {
    pub labels: ChartLabels,
    /// Caption for the color scale.
    pub scale_label: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    /// `cells[weekday][hour]`.
    pub cells: [[u64; HOURS]; WEEKDAYS],
}

impl HeatmapChart {
    /// Total number of messages counted in the grid.
    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }
}

/// One sample of the smoothed engagement trend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    /// Day ordinal (fractional), 1 = 0001-01-01.
    pub ordinal: f64,
    pub value: f64,
}

/// Distinct active senders per day plus a fitted trend line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementChart {
    pub labels: ChartLabels,
    /// Days with at least one message, ascending.
    pub days: Vec<NaiveDate>,
    /// Distinct senders on each day of `days`.
    pub active_users: Vec<usize>,
    /// Trend value evaluated at each day of `days`.
    pub fitted: Vec<f64>,
    /// Trend sampled across the whole range.
    pub trend: Vec<TrendPoint>,
}

/// Per-month share of messages for each active user, stacked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakerChart {
    pub labels: ChartLabels,
    /// First day of each month present in the data, ascending.
    pub months: Vec<NaiveDate>,
    /// Active users, most messages first.
    pub users: Vec<String>,
    /// `shares[user][month]`, rounded percentage.
    pub shares: Vec<Vec<u32>>,
    /// Cumulative sum of `shares` down the user axis.
    pub bands: Vec<Vec<u32>>,
    /// Remainder above the last band per month.
    pub other: Vec<u32>,
    /// Legend entries, top band first (ends with the first user).
    pub legend: Vec<String>,
}

/// Finished chart ready for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Chart {
    Heatmap(HeatmapChart),
    Engagement(EngagementChart),
    Speakers(SpeakerChart),
}

impl Chart {
    pub fn labels(&self) -> &ChartLabels {
        match self {
            Chart::Heatmap(c) => &c.labels,
            Chart::Engagement(c) => &c.labels,
            Chart::Speakers(c) => &c.labels,
        }
    }
}

/// What a report produced: either a chart or lines of text, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutput {
    Chart(Chart),
    Text(Vec<String>),
}
