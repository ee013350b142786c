//! Runs the selected report and hands its output on.
//!
//! Charts go to a [`ChartRenderer`]; text goes straight to the text sink.

use crate::analysis::Aggregator;
use crate::models::{Chart, ReportOutput};
use crate::time::LocalizedMessage;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where a finished chart should end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderTarget {
    /// Save to a file.
    File(PathBuf),
    /// Show it to the user.
    Display,
}

impl RenderTarget {
    /// An empty output path means display.
    pub fn from_output(output: &str) -> Self {
        if output.is_empty() {
            RenderTarget::Display
        } else {
            RenderTarget::File(PathBuf::from(output))
        }
    }
}

/// Presentation layer that turns a finished chart into something visible.
pub trait ChartRenderer {
    fn render(&self, chart: &Chart, target: &RenderTarget) -> Result<()>;
}

/// What the dispatcher did with the report output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// A chart was handed to the renderer.
    Rendered(RenderTarget),
    /// Text lines were written to the sink.
    Printed(usize),
}

/// Glue between a report and the renderer or text sink.
pub struct Dispatcher<'a> {
    renderer: &'a dyn ChartRenderer,
    target: RenderTarget,
}

impl<'a> Dispatcher<'a> {
    pub fn new(renderer: &'a dyn ChartRenderer, target: RenderTarget) -> Self {
        Self { renderer, target }
    }

    /// Run `report` over `messages` and deliver the result.
    pub fn dispatch<W: Write>(
        &self,
        report: &dyn Aggregator,
        messages: &[LocalizedMessage],
        out: &mut W,
    ) -> Result<Dispatched> {
        debug!(
            "Running {} over {} messages",
            report.name(),
            messages.len()
        );

        match report.run(messages) {
            ReportOutput::Chart(chart) => {
                info!("Rendering chart: {}", chart.labels().title);
                self.renderer
                    .render(&chart, &self.target)
                    .with_context(|| format!("Failed to render {} chart", report.name()))?;
                Ok(Dispatched::Rendered(self.target.clone()))
            }
            ReportOutput::Text(lines) => {
                for line in &lines {
                    writeln!(out, "{}", line).context("Failed to write report output")?;
                }
                out.flush().context("Failed to write report output")?;
                Ok(Dispatched::Printed(lines.len()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::localized;
    use crate::config::Config;
    use crate::corpus::filter_by_user;
    use crate::models::Message;
    use crate::report::ReportRegistry;
    use crate::time::{Normalizer, TimestampPolicy, ViewerZone};
    use std::cell::RefCell;

    /// Keeps every chart it is given.
    #[derive(Default)]
    struct RecordingRenderer {
        charts: RefCell<Vec<(Chart, RenderTarget)>>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(&self, chart: &Chart, target: &RenderTarget) -> Result<()> {
            self.charts
                .borrow_mut()
                .push((chart.clone(), target.clone()));
            Ok(())
        }
    }

    fn registry() -> ReportRegistry {
        ReportRegistry::from_config(&Config::default())
    }

    #[test]
    fn test_target_from_output() {
        assert_eq!(RenderTarget::from_output(""), RenderTarget::Display);
        assert_eq!(
            RenderTarget::from_output("out.json"),
            RenderTarget::File(PathBuf::from("out.json"))
        );
    }

    #[test]
    fn test_heatmap_end_to_end() {
        let messages = localized(&[
            ("2013-04-01T09:00:00Z", "Bob", "morning"),
            ("2013-04-01T13:00:00Z", "Bob", "lunch"),
            ("2013-04-01T18:00:00Z", "Bob", "evening"),
        ]);
        let renderer = RecordingRenderer::default();
        let dispatcher = Dispatcher::new(&renderer, RenderTarget::Display);
        let registry = registry();
        let mut out = Vec::new();

        let result = dispatcher
            .dispatch(registry.resolve("heatmap").unwrap(), &messages, &mut out)
            .unwrap();

        assert_eq!(result, Dispatched::Rendered(RenderTarget::Display));
        assert!(out.is_empty());

        let charts = renderer.charts.borrow();
        let Chart::Heatmap(chart) = &charts[0].0 else {
            panic!("expected a heatmap");
        };
        for (weekday, row) in chart.cells.iter().enumerate() {
            for (hour, &count) in row.iter().enumerate() {
                let expected = u64::from(weekday == 0 && [9, 13, 18].contains(&hour));
                assert_eq!(count, expected, "cell [{}][{}]", weekday, hour);
            }
        }
    }

    #[test]
    fn test_engagement_end_to_end() {
        let messages = localized(&[
            ("2013-04-01T09:00:00Z", "Alice", "hi"),
            ("2013-04-01T09:05:00Z", "Bob", "hi"),
        ]);
        let renderer = RecordingRenderer::default();
        let target = RenderTarget::File(PathBuf::from("engagement.json"));
        let dispatcher = Dispatcher::new(&renderer, target.clone());
        let registry = registry();
        let mut out = Vec::new();

        let result = dispatcher
            .dispatch(registry.resolve("engagement").unwrap(), &messages, &mut out)
            .unwrap();
        assert_eq!(result, Dispatched::Rendered(target));

        let charts = renderer.charts.borrow();
        let Chart::Engagement(chart) = &charts[0].0 else {
            panic!("expected an engagement chart");
        };
        assert_eq!(chart.active_users, vec![2]);
    }

    #[test]
    fn test_text_report_goes_to_sink() {
        let body = vec!["deploy"; 100].join(" ");
        let messages = localized(&[("2013-04-01T09:00:00Z", "Bob", body.as_str())]);
        let renderer = RecordingRenderer::default();
        let dispatcher = Dispatcher::new(&renderer, RenderTarget::Display);

        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.wordfreq.ignore_file = dir.path().join("ignore.txt").display().to_string();
        let registry = ReportRegistry::from_config(&config);
        let mut out = Vec::new();

        let result = dispatcher
            .dispatch(registry.resolve("wordfreq").unwrap(), &messages, &mut out)
            .unwrap();

        assert_eq!(result, Dispatched::Printed(1));
        assert_eq!(String::from_utf8(out).unwrap(), "deploy 100\n");
        assert!(renderer.charts.borrow().is_empty());
    }

    #[test]
    fn test_user_filter_matches_prefiltered_corpus() {
        let raw = vec![
            Message::new("2013-04-01T09:00:00Z", "Alice", "deploy the build"),
            Message::new("2013-04-01T10:00:00Z", "Bob", "build is red"),
            Message::new("2013-04-02T11:00:00Z", "Alice", "Deploy again"),
            Message::new("2013-04-03T12:00:00Z", "Bob", "green now"),
        ];
        let normalizer = Normalizer::new(ViewerZone::Named(chrono_tz::UTC), TimestampPolicy::Abort);

        let filtered = normalizer
            .normalize(filter_by_user(raw.clone(), "Alice"))
            .unwrap();
        let prefiltered = normalizer
            .normalize(raw.into_iter().filter(|m| m.sender() == "Alice").collect())
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.wordfreq.ignore_file = dir.path().join("ignore.txt").display().to_string();
        config.wordfreq.min_count = 1;
        let registry = ReportRegistry::from_config(&config);
        assert_eq!(registry.names().len(), 4);
        for name in registry.names() {
            let report = registry.resolve(name).unwrap();
            assert_eq!(report.run(&filtered), report.run(&prefiltered), "{}", name);
        }

        let heatmap = registry.resolve("heatmap").unwrap().run(&filtered);
        let ReportOutput::Chart(Chart::Heatmap(chart)) = heatmap else {
            panic!("expected a heatmap");
        };
        assert_eq!(chart.total(), 2);

        let words = registry.resolve("wordfreq").unwrap().run(&filtered);
        assert_eq!(
            words,
            ReportOutput::Text(vec![
                "again 1".to_string(),
                "build 1".to_string(),
                "deploy 2".to_string(),
                "the 1".to_string(),
            ])
        );
    }
}
