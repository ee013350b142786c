//! Aggregation layer.
//!
//! Each report is an [`Aggregator`]: a reduction from the normalized
//! message stream to either a chart or lines of text.

pub mod engagement;
pub mod fit;
pub mod heatmap;
pub mod speakers;
pub mod stopwords;
pub mod wordfreq;

pub use engagement::EngagementReport;
pub use heatmap::HeatmapReport;
pub use speakers::SpeakerReport;
pub use wordfreq::WordFrequencyReport;

use crate::models::ReportOutput;
use crate::time::LocalizedMessage;

/// A named reduction over the normalized message stream.
pub trait Aggregator {
    /// Name the report is selected by.
    fn name(&self) -> &'static str;

    /// Reduce the messages. Produces a chart or text, never both.
    fn run(&self, messages: &[LocalizedMessage]) -> ReportOutput;
}
