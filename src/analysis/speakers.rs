//! Per-speaker share of messages by month, as a stacked series.
//!
//! Users with more than `min_messages` messages overall get their own band;
//! everyone else is folded into the remainder above the last band.

use super::Aggregator;
use crate::models::{Chart, ChartLabels, ReportOutput, SpeakerChart};
use crate::time::LocalizedMessage;
use chrono::NaiveDate;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Legend entry for everyone without a band of their own.
pub const OTHER_LABEL: &str = "Other";

/// Messages within one month.
#[derive(Debug, Default)]
struct MonthBucket<'a> {
    start: Option<NaiveDate>,
    per_user: HashMap<&'a str, usize>,
    total: usize,
}

/// First pass: per-month and per-user counts.
#[derive(Debug, Default)]
pub struct SpeakerTally<'a> {
    /// Keyed by `YYYYMM`, so iteration is chronological.
    months: BTreeMap<String, MonthBucket<'a>>,
    totals: HashMap<&'a str, usize>,
}

impl<'a> SpeakerTally<'a> {
    pub fn from_messages(messages: &'a [LocalizedMessage]) -> Self {
        let mut tally = SpeakerTally::default();

        for msg in messages {
            let user = msg.sender();
            let bucket = tally.months.entry(msg.moment.month_key()).or_default();
            bucket.start.get_or_insert_with(|| msg.moment.month_start());
            *bucket.per_user.entry(user).or_default() += 1;
            bucket.total += 1;
            *tally.totals.entry(user).or_default() += 1;
        }

        tally
    }

    /// Month start dates in ascending order.
    pub fn month_starts(&self) -> Vec<NaiveDate> {
        self.months.values().filter_map(|b| b.start).collect()
    }
}

/// Users with strictly more than `min_messages` messages, most active first.
///
/// Equal totals are ordered by name so the series order is reproducible.
pub fn rank_active_users(totals: &HashMap<&str, usize>, min_messages: usize) -> Vec<String> {
    let mut ranked: Vec<(&str, usize)> = totals
        .iter()
        .filter(|&(_, &count)| count > min_messages)
        .map(|(&user, &count)| (user, count))
        .collect();

    ranked.sort_by_key(|&(user, count)| (Reverse(count), user));
    ranked.into_iter().map(|(user, _)| user.to_string()).collect()
}

/// `shares[i][j]`: rounded percentage of month `j` sent by user `i`.
pub fn share_matrix(tally: &SpeakerTally<'_>, users: &[String]) -> Vec<Vec<u32>> {
    users
        .iter()
        .map(|user| {
            tally
                .months
                .values()
                .map(|month| {
                    let sent = month.per_user.get(user.as_str()).copied().unwrap_or(0);
                    if month.total == 0 {
                        0
                    } else {
                        (100.0 * sent as f64 / month.total as f64).round() as u32
                    }
                })
                .collect()
        })
        .collect()
}

/// Running sum down the user axis; `bands[i][j] = sum(shares[0..=i][j])`.
pub fn cumulative_bands(shares: &[Vec<u32>]) -> Vec<Vec<u32>> {
    let mut bands: Vec<Vec<u32>> = Vec::with_capacity(shares.len());

    for row in shares {
        let next = match bands.last() {
            Some(prev) => prev.iter().zip(row).map(|(a, b)| a + b).collect(),
            None => row.clone(),
        };
        bands.push(next);
    }

    bands
}

/// Legend entries: first name token of each user then "Other", top band first.
pub fn legend_labels(users: &[String]) -> Vec<String> {
    users
        .iter()
        .map(|user| {
            user.split_whitespace()
                .next()
                .unwrap_or(user.as_str())
                .to_string()
        })
        .chain(std::iter::once(OTHER_LABEL.to_string()))
        .rev()
        .collect()
}

/// Stacked contribution chart.
#[derive(Debug, Clone)]
pub struct SpeakerReport {
    room: String,
    min_messages: usize,
}

impl SpeakerReport {
    pub fn new(room: impl Into<String>, min_messages: usize) -> Self {
        Self {
            room: room.into(),
            min_messages,
        }
    }
}

impl Aggregator for SpeakerReport {
    fn name(&self) -> &'static str {
        "speakers"
    }

    fn run(&self, messages: &[LocalizedMessage]) -> ReportOutput {
        let tally = SpeakerTally::from_messages(messages);
        let users = rank_active_users(&tally.totals, self.min_messages);
        debug!(
            "{} of {} users have more than {} messages",
            users.len(),
            tally.totals.len(),
            self.min_messages
        );

        let shares = share_matrix(&tally, &users);
        let bands = cumulative_bands(&shares);
        let other = match bands.last() {
            Some(top) => top.iter().map(|&v| 100u32.saturating_sub(v)).collect(),
            None => vec![100; tally.months.len()],
        };

        ReportOutput::Chart(Chart::Speakers(SpeakerChart {
            labels: ChartLabels::new(
                format!("{} team contribution", self.room),
                "Month",
                "Percentage of total messages",
            ),
            months: tally.month_starts(),
            legend: legend_labels(&users),
            users,
            shares,
            bands,
            other,
        }))
    }
}
