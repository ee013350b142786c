//! Timestamp normalization.
//!
//! Raw export timestamps are declared UTC. They are parsed once, shifted
//! into the viewer's time zone and exposed as a [`LocalMoment`] with the
//! calendar keys the aggregators bucket on.

use crate::error::StatError;
use crate::models::Message;
use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc,
};
use chrono_tz::Tz;
use tracing::warn;

/// Date-time layouts tried once any zone suffix has been removed.
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
    "%Y%m%dT%H%M",
];

/// Date-only layouts, read as midnight.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// Zone designators accepted after the time of day.
const ZONE_SUFFIXES: [&str; 4] = [" UTC", " GMT", "Z", "z"];

/// The zone that local calendar values are computed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerZone {
    /// Whatever the host reports as its local zone.
    Local,
    /// An explicit IANA zone.
    Named(Tz),
}

impl ViewerZone {
    /// Resolve a zone name. Empty or `local` selects the host zone.
    pub fn from_name(name: &str) -> Result<Self, StatError> {
        let name = name.trim();
        if name.is_empty() || name.eq_ignore_ascii_case("local") {
            return Ok(ViewerZone::Local);
        }

        name.parse::<Tz>()
            .map(ViewerZone::Named)
            .map_err(|_| StatError::InvalidTimezone(name.to_string()))
    }

    /// Wall-clock time of `instant` in this zone.
    pub fn localize(&self, instant: &DateTime<Utc>) -> NaiveDateTime {
        match self {
            ViewerZone::Local => instant.with_timezone(&Local).naive_local(),
            ViewerZone::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }
}

/// What to do with a message whose timestamp cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampPolicy {
    /// Drop the message and log a warning.
    Skip,
    /// Fail the whole run.
    Abort,
}

/// Drop a trailing zone designator or numeric offset (`+HH`, `+HHMM`,
/// `+HH:MM`) from a timestamp.
fn strip_zone(text: &str) -> &str {
    for suffix in ZONE_SUFFIXES {
        if let Some(rest) = text.strip_suffix(suffix) {
            return rest.trim_end();
        }
    }

    let Some(sep) = text.find(|c: char| c == 'T' || c == 't' || c == ' ') else {
        return text;
    };
    let time = &text[sep + 1..];
    if let Some(pos) = time.rfind(|c: char| c == '+' || c == '-') {
        let digits: String = time[pos + 1..].chars().filter(|&c| c != ':').collect();
        if matches!(digits.len(), 2 | 4) && digits.chars().all(|c| c.is_ascii_digit()) {
            return text[..sep + 1 + pos].trim_end();
        }
    }

    text
}

/// Parse a raw export timestamp as UTC.
///
/// Any offset written in the string is discarded: the wall-clock value is
/// taken to be UTC, since that is what the export declares.
pub fn parse_utc(raw: &str) -> Result<DateTime<Utc>, StatError> {
    let text = strip_zone(raw.trim());
    let mut reason = String::from("empty timestamp");

    for format in DATETIME_FORMATS {
        match NaiveDateTime::parse_from_str(text, format) {
            Ok(naive) => return Ok(Utc.from_utc_datetime(&naive)),
            Err(e) => reason = e.to_string(),
        }
    }

    for format in DATE_FORMATS {
        match NaiveDate::parse_from_str(text, format) {
            Ok(date) => return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))),
            Err(e) => reason = e.to_string(),
        }
    }

    Err(StatError::TimestampParse {
        raw: raw.to_string(),
        reason,
    })
}

/// A message timestamp expressed in the viewer's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalMoment(NaiveDateTime);

impl LocalMoment {
    /// 0 = Monday .. 6 = Sunday.
    pub fn weekday(&self) -> usize {
        self.0.weekday().num_days_from_monday() as usize
    }

    /// 0..=23.
    pub fn hour(&self) -> usize {
        self.0.hour() as usize
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// First day of the month containing this moment.
    pub fn month_start(&self) -> NaiveDate {
        self.0.date().with_day(1).unwrap_or_else(|| self.0.date())
    }

    /// `YYYYMMDD` bucket key.
    pub fn day_key(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// `YYYYMM` bucket key.
    pub fn month_key(&self) -> String {
        self.0.format("%Y%m").to_string()
    }
}

/// A message paired with its normalized timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedMessage {
    pub message: Message,
    pub moment: LocalMoment,
}

impl LocalizedMessage {
    pub fn sender(&self) -> &str {
        self.message.sender()
    }

    pub fn body(&self) -> &str {
        &self.message.message
    }
}

/// Converts raw messages into localized ones under a fixed zone and policy.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    zone: ViewerZone,
    policy: TimestampPolicy,
}

impl Normalizer {
    pub fn new(zone: ViewerZone, policy: TimestampPolicy) -> Self {
        Self { zone, policy }
    }

    /// Localize a single raw timestamp.
    pub fn moment(&self, raw: &str) -> Result<LocalMoment, StatError> {
        let instant = parse_utc(raw)?;
        Ok(LocalMoment(self.zone.localize(&instant)))
    }

    /// Localize every message, applying the timestamp policy to failures.
    pub fn normalize(&self, messages: Vec<Message>) -> Result<Vec<LocalizedMessage>, StatError> {
        let mut localized = Vec::with_capacity(messages.len());
        let mut skipped = 0usize;

        for message in messages {
            match self.moment(&message.date) {
                Ok(moment) => localized.push(LocalizedMessage { message, moment }),
                Err(e) => match self.policy {
                    TimestampPolicy::Abort => return Err(e),
                    TimestampPolicy::Skip => {
                        warn!("Skipping message from {}: {}", message.sender(), e);
                        skipped += 1;
                    }
                },
            }
        }

        if skipped > 0 {
            warn!(
                "Skipped {} message(s) with unparseable timestamps",
                skipped
            );
        }

        Ok(localized)
    }
}
