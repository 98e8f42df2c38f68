//! Interview results pipeline
//!
//! Turns a raw [`SampleSet`] into everything the results view shows:
//!
//! ```text
//! samples ──► timeline ──► metrics
//!    │
//!    ├──────► distribution
//!    └──────► feedback (per interview mode)
//! ```
//!
//! Every stage is a pure function over borrowed input. Nothing is cached;
//! recomputing from the stored samples is cheap and always agrees with what
//! was shown before.

pub mod distribution;
pub mod feedback;
pub mod metrics;
pub mod timeline;

pub use distribution::EmotionCount;
pub use feedback::{FeedbackItem, FeedbackKind};
pub use metrics::InterviewMetrics;
pub use timeline::TimelinePoint;

use crate::emotion::SampleSet;
use crate::mode::InterviewMode;
use serde::Serialize;

/// Everything derived from one interview run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterviewAnalysis {
    pub mode: InterviewMode,
    pub mode_name: &'static str,
    pub sample_count: usize,
    pub timeline: Vec<TimelinePoint>,
    pub distribution: Vec<EmotionCount>,
    pub feedback: Vec<FeedbackItem>,
    pub metrics: InterviewMetrics,
}

impl InterviewAnalysis {
    pub fn new(samples: &SampleSet, mode: InterviewMode) -> Self {
        let timeline = timeline::build(samples);
        let metrics = InterviewMetrics::from_timeline(&timeline);

        Self {
            mode,
            mode_name: mode.name(),
            sample_count: samples.len(),
            distribution: distribution::tally(samples),
            feedback: feedback::generate(samples, mode),
            timeline,
            metrics,
        }
    }

    pub fn count_of(&self, kind: FeedbackKind) -> usize {
        self.feedback.iter().filter(|f| f.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::EmotionSample;

    #[test]
    fn test_pipeline_wires_every_stage() {
        let samples: SampleSet = [
            ("timestamp_10", EmotionSample::new("happy", "confident")),
            ("timestamp_0", EmotionSample::new("happy", "confident")),
            ("timestamp_20", EmotionSample::new("happy", "confident")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let a = InterviewAnalysis::new(&samples, InterviewMode::General);

        assert_eq!(a.sample_count, 3);
        assert_eq!(a.mode_name, "General Interview");
        assert_eq!(a.timeline.first().map(|p| p.time), Some(0));
        assert_eq!(distribution::total(&a.distribution), 6);
        assert_eq!(a.metrics.confidence, 100);
        assert_eq!(a.count_of(FeedbackKind::Positive), 2);
        assert_eq!(a.count_of(FeedbackKind::Tip), 2);
    }

    #[test]
    fn test_pipeline_does_not_touch_input() {
        let samples: SampleSet = [("timestamp_5".to_string(), EmotionSample::new("sad", "nervous"))]
            .into_iter()
            .collect();
        let before = samples.clone();
        let _ = InterviewAnalysis::new(&samples, InterviewMode::Hr);
        assert_eq!(samples, before);
    }
}
