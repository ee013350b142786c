//! Mapping from report names to aggregators.

use crate::analysis::{
    Aggregator, EngagementReport, HeatmapReport, SpeakerReport, WordFrequencyReport,
};
use crate::config::Config;
use crate::error::StatError;
use std::collections::BTreeMap;

/// Registered reports, keyed by name.
#[derive(Default)]
pub struct ReportRegistry {
    reports: BTreeMap<&'static str, Box<dyn Aggregator>>,
}

impl ReportRegistry {
    /// Registry with every built-in report, configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        let room = config.general.room.as_str();
        let mut registry = Self::default();

        registry.register(Box::new(HeatmapReport::new(room)));
        registry.register(Box::new(EngagementReport::new(
            room,
            config.engagement.degree,
            config.engagement.step,
        )));
        registry.register(Box::new(SpeakerReport::new(
            room,
            config.speakers.min_messages,
        )));
        registry.register(Box::new(WordFrequencyReport::new(
            config.wordfreq.min_count,
            &config.wordfreq.ignore_file,
            config.wordfreq.wordle,
        )));

        registry
    }

    /// Add a report, replacing any report of the same name.
    pub fn register(&mut self, report: Box<dyn Aggregator>) {
        self.reports.insert(report.name(), report);
    }

    /// Registered names in alphabetical order.
    pub fn names(&self) -> Vec<&'static str> {
        self.reports.keys().copied().collect()
    }

    /// Look up a report by exact name.
    pub fn resolve(&self, name: &str) -> Result<&dyn Aggregator, StatError> {
        self.reports
            .get(name)
            .map(|report| &**report)
            .ok_or_else(|| StatError::UnknownReport {
                name: name.to_string(),
                valid: self.names().join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_reports_registered() {
        let registry = ReportRegistry::from_config(&Config::default());
        assert_eq!(
            registry.names(),
            vec!["engagement", "heatmap", "speakers", "wordfreq"]
        );
    }

    #[test]
    fn test_resolve_known_report() {
        let registry = ReportRegistry::from_config(&Config::default());
        let report = registry.resolve("speakers").unwrap();
        assert_eq!(report.name(), "speakers");
    }

    #[test]
    fn test_resolve_unknown_report() {
        let registry = ReportRegistry::from_config(&Config::default());
        let err = registry.resolve("Heatmap").err().unwrap();
        match err {
            StatError::UnknownReport { name, valid } => {
                assert_eq!(name, "Heatmap");
                assert_eq!(valid, "engagement, heatmap, speakers, wordfreq");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = ReportRegistry::default();
        assert!(registry.resolve("heatmap").is_err());
    }
}
