//! Summary percentages derived from the timeline

use super::timeline::TimelinePoint;
use serde::Serialize;

/// Shown for voice clarity. No signal backs this number yet, so it is a
/// fixed display value and [`InterviewMetrics::voice_clarity_measured`] is
/// always false.
pub const PLACEHOLDER_VOICE_CLARITY: u32 = 78;

/// Highest score in the emotion score table
const MAX_SCORE: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterviewMetrics {
    /// Mean voice score as a percentage of the maximum
    pub confidence: u32,
    /// Share of points with a happy or confident face
    pub positive_expressions: u32,
    pub voice_clarity: u32,
    pub voice_clarity_measured: bool,
    /// Mean of face and voice scores, as a percentage of the maximum
    pub overall_score: u32,
}

impl InterviewMetrics {
    pub fn from_timeline(timeline: &[TimelinePoint]) -> Self {
        Self {
            confidence: confidence(timeline),
            positive_expressions: positive_expressions(timeline),
            voice_clarity: PLACEHOLDER_VOICE_CLARITY,
            voice_clarity_measured: false,
            overall_score: overall_score(timeline),
        }
    }
}

/// floor(mean(voice_score) / 5 * 100), 0 for an empty timeline
pub fn confidence(timeline: &[TimelinePoint]) -> u32 {
    let sum: u64 = timeline.iter().map(|p| p.voice_score as u64).sum();
    percent(sum, timeline.len() as u64 * MAX_SCORE)
}

/// floor(#positive faces / n * 100), 0 for an empty timeline
pub fn positive_expressions(timeline: &[TimelinePoint]) -> u32 {
    let positive = timeline.iter().filter(|p| p.face_emotion.is_positive()).count() as u64;
    percent(positive, timeline.len() as u64)
}

/// floor(sum(face + voice) / 2n * 20), 0 for an empty timeline
pub fn overall_score(timeline: &[TimelinePoint]) -> u32 {
    let sum: u64 = timeline
        .iter()
        .map(|p| p.face_score as u64 + p.voice_score as u64)
        .sum();
    percent(sum, timeline.len() as u64 * 2 * MAX_SCORE)
}

fn percent(part: u64, whole: u64) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part * 100 / whole) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::timeline;
    use crate::emotion::{EmotionSample, SampleSet};

    fn timeline_of(entries: &[(&str, &str, &str)]) -> Vec<TimelinePoint> {
        let s: SampleSet = entries
            .iter()
            .map(|(k, f, v)| (k.to_string(), EmotionSample::new(*f, *v)))
            .collect();
        timeline::build(&s)
    }

    #[test]
    fn test_empty_timeline_is_zero() {
        let m = InterviewMetrics::from_timeline(&[]);
        assert_eq!(m.confidence, 0);
        assert_eq!(m.positive_expressions, 0);
        assert_eq!(m.overall_score, 0);
        assert_eq!(m.voice_clarity, PLACEHOLDER_VOICE_CLARITY);
        assert!(!m.voice_clarity_measured);
    }

    #[test]
    fn test_all_confident_is_full_confidence() {
        let t = timeline_of(&[
            ("timestamp_0", "happy", "confident"),
            ("timestamp_10", "happy", "confident"),
            ("timestamp_20", "happy", "confident"),
        ]);
        let m = InterviewMetrics::from_timeline(&t);
        assert_eq!(m.confidence, 100);
        assert_eq!(m.positive_expressions, 100);
        assert_eq!(m.overall_score, 100);
    }

    #[test]
    fn test_mock_backend_samples() {
        let t = timeline_of(&[
            ("timestamp_0", "happy", "neutral"),
            ("timestamp_10", "neutral", "confident"),
            ("timestamp_20", "thinking", "hesitant"),
            ("timestamp_30", "happy", "confident"),
            ("timestamp_40", "neutral", "neutral"),
        ]);
        let m = InterviewMetrics::from_timeline(&t);
        // voice: 3+5+2+5+3 = 18 -> 18/25 = 72%
        assert_eq!(m.confidence, 72);
        // 2 happy faces of 5
        assert_eq!(m.positive_expressions, 40);
        // face 5+3+3+5+3 = 19, total 37 of 50 -> 74%
        assert_eq!(m.overall_score, 74);
    }

    #[test]
    fn test_percentages_floor() {
        // voice 5+5+1 = 11 of 15 -> 73.3%
        let t = timeline_of(&[
            ("timestamp_0", "sad", "happy"),
            ("timestamp_1", "confident", "happy"),
            ("timestamp_2", "sad", "sad"),
        ]);
        assert_eq!(confidence(&t), 73);
        // 1 of 3 -> 33.3%
        assert_eq!(positive_expressions(&t), 33);
    }
}
