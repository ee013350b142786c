//! Team engagement: distinct active senders per day, with a smoothed trend.

use super::fit::Polynomial;
use super::Aggregator;
use crate::models::{Chart, ChartLabels, EngagementChart, ReportOutput, TrendPoint};
use crate::time::LocalizedMessage;
use chrono::{Datelike, NaiveDate};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Senders seen on one calendar day.
struct DayBucket<'a> {
    date: NaiveDate,
    senders: HashSet<&'a str>,
}

/// Distinct senders per day, ascending by `YYYYMMDD` key.
pub fn active_users_by_day(messages: &[LocalizedMessage]) -> Vec<(NaiveDate, usize)> {
    let mut buckets: BTreeMap<String, DayBucket<'_>> = BTreeMap::new();

    for msg in messages {
        buckets
            .entry(msg.moment.day_key())
            .or_insert_with(|| DayBucket {
                date: msg.moment.date(),
                senders: HashSet::new(),
            })
            .senders
            .insert(msg.sender());
    }

    buckets
        .into_values()
        .map(|bucket| (bucket.date, bucket.senders.len()))
        .collect()
}

/// Proleptic Gregorian day number, 0001-01-01 = 1.
pub fn day_ordinal(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Upper bound on trend samples for a single chart.
pub const MAX_TREND_SAMPLES: usize = 1_000_000;

/// Evaluate `poly` at `start, start + step, ...` strictly below `end`.
///
/// Returns `None` when the range would need more than
/// [`MAX_TREND_SAMPLES`] points.
pub fn sample_trend(
    poly: &Polynomial,
    start: f64,
    end: f64,
    step: f64,
) -> Option<Vec<TrendPoint>> {
    if !step.is_finite() || step <= 0.0 || end <= start {
        return Some(Vec::new());
    }

    // Tolerance keeps float noise from adding a sample at `end`.
    let count = ((end - start) / step - 1e-9).ceil();
    if !count.is_finite() || count > MAX_TREND_SAMPLES as f64 {
        return None;
    }

    let points = (0..count as usize)
        .map(|i| {
            let ordinal = start + i as f64 * step;
            TrendPoint {
                ordinal,
                value: poly.eval(ordinal),
            }
        })
        .collect();
    Some(points)
}

/// Engagement over time.
#[derive(Debug, Clone)]
pub struct EngagementReport {
    room: String,
    degree: usize,
    step: f64,
}

impl EngagementReport {
    pub fn new(room: impl Into<String>, degree: usize, step: f64) -> Self {
        Self {
            room: room.into(),
            degree,
            step,
        }
    }
}

impl Aggregator for EngagementReport {
    fn name(&self) -> &'static str {
        "engagement"
    }

    fn run(&self, messages: &[LocalizedMessage]) -> ReportOutput {
        let per_day = active_users_by_day(messages);
        debug!("Engagement covers {} days", per_day.len());

        let days: Vec<NaiveDate> = per_day.iter().map(|(date, _)| *date).collect();
        let active_users: Vec<usize> = per_day.iter().map(|(_, count)| *count).collect();

        let xs: Vec<f64> = days.iter().map(|d| day_ordinal(*d)).collect();
        let ys: Vec<f64> = active_users.iter().map(|&c| c as f64).collect();

        let (fitted, trend) = match Polynomial::fit(&xs, &ys, self.degree) {
            Some(poly) => {
                debug!("Fitted degree {} engagement trend", poly.degree());
                let first = xs.iter().copied().fold(f64::INFINITY, f64::min);
                let last = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let fitted = xs.iter().map(|&x| poly.eval(x)).collect();
                let trend = sample_trend(&poly, first - 1.0, last + 1.0, self.step)
                    .unwrap_or_else(|| {
                        warn!(
                            "Trend step {} needs more than {} samples; omitting the trend line",
                            self.step, MAX_TREND_SAMPLES
                        );
                        Vec::new()
                    });
                (fitted, trend)
            }
            None => {
                if !xs.is_empty() {
                    warn!("Could not fit an engagement trend; plotting raw counts only");
                }
                (Vec::new(), Vec::new())
            }
        };

        ReportOutput::Chart(Chart::Engagement(EngagementChart {
            labels: ChartLabels::new(
                format!("{} team engagement", self.room),
                "Month",
                "Active users",
            ),
            days,
            active_users,
            fitted,
            trend,
        }))
    }
}
