//! Sample set → ordered, scored time series

use crate::emotion::{Emotion, SampleSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    /// Seconds from the start of the recording
    pub time: u64,
    pub face_emotion: Emotion,
    pub voice_emotion: Emotion,
    pub face_score: u32,
    pub voice_score: u32,
}

/// Build the timeline, one point per sample, sorted by time.
///
/// Samples that land on the same second keep their input order.
pub fn build(samples: &SampleSet) -> Vec<TimelinePoint> {
    let mut points: Vec<TimelinePoint> = samples
        .iter()
        .map(|(label, sample)| TimelinePoint {
            time: parse_time(label),
            face_emotion: sample.face.clone(),
            voice_emotion: sample.voice.clone(),
            face_score: sample.face.score(),
            voice_score: sample.voice.score(),
        })
        .collect();

    points.sort_by_key(|p| p.time);
    points
}

/// Seconds encoded in a `timestamp_<secs>` label.
///
/// Reads the leading digits after the first underscore. Missing, malformed,
/// negative or overflowing values all read as 0.
pub fn parse_time(label: &str) -> u64 {
    let Some((_, rest)) = label.split_once('_') else {
        return 0;
    };
    let rest = rest.trim_start();
    if rest.starts_with('-') {
        return 0;
    }
    let rest = rest.strip_prefix('+').unwrap_or(rest);
    let digits: &str = match rest.find(|c: char| !c.is_ascii_digit()) {
        Some(end) => &rest[..end],
        None => rest,
    };
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::EmotionSample;

    fn samples(entries: &[(&str, &str, &str)]) -> SampleSet {
        entries
            .iter()
            .map(|(k, f, v)| (k.to_string(), EmotionSample::new(*f, *v)))
            .collect()
    }

    // ==========================================================================
    // TIME PARSING
    // ==========================================================================

    #[test]
    fn test_parse_time_well_formed() {
        assert_eq!(parse_time("timestamp_0"), 0);
        assert_eq!(parse_time("timestamp_40"), 40);
    }

    #[test]
    fn test_parse_time_malformed_defaults_to_zero() {
        assert_eq!(parse_time("timestamp"), 0);
        assert_eq!(parse_time("timestamp_"), 0);
        assert_eq!(parse_time("timestamp_abc"), 0);
        assert_eq!(parse_time("timestamp_-5"), 0);
        assert_eq!(parse_time("timestamp_99999999999999999999999"), 0);
    }

    #[test]
    fn test_parse_time_reads_leading_digits() {
        assert_eq!(parse_time("timestamp_12s"), 12);
        assert_eq!(parse_time("t_7_extra"), 7);
    }

    // ==========================================================================
    // TIMELINE
    // ==========================================================================

    #[test]
    fn test_one_point_per_sample_sorted() {
        let s = samples(&[
            ("timestamp_30", "happy", "confident"),
            ("timestamp_0", "happy", "neutral"),
            ("timestamp_20", "thinking", "hesitant"),
            ("timestamp_10", "neutral", "confident"),
        ]);
        let timeline = build(&s);

        assert_eq!(timeline.len(), s.len());
        let times: Vec<u64> = timeline.iter().map(|p| p.time).collect();
        assert_eq!(times, vec![0, 10, 20, 30]);
        assert!(timeline.windows(2).all(|w| w[0].time <= w[1].time));
    }

    #[test]
    fn test_scores_follow_table() {
        let s = samples(&[("timestamp_20", "thinking", "hesitant")]);
        let p = &build(&s)[0];
        assert_eq!(p.face_score, 3);
        assert_eq!(p.voice_score, 2);
    }

    #[test]
    fn test_unknown_labels_score_three() {
        let s = samples(&[("timestamp_5", "puzzled", "mumbling")]);
        let p = &build(&s)[0];
        assert_eq!(p.face_emotion.as_str(), "puzzled");
        assert_eq!(p.face_score, 3);
        assert_eq!(p.voice_score, 3);
    }

    #[test]
    fn test_ties_keep_input_order() {
        // Both malformed labels collapse to time 0
        let s = samples(&[
            ("timestamp_10", "happy", "happy"),
            ("bad", "sad", "sad"),
            ("worse_x", "nervous", "nervous"),
        ]);
        let timeline = build(&s);
        assert_eq!(timeline[0].face_emotion, Emotion::Sad);
        assert_eq!(timeline[1].face_emotion, Emotion::Nervous);
        assert_eq!(timeline[2].time, 10);
    }

    #[test]
    fn test_empty_samples() {
        assert!(build(&SampleSet::new()).is_empty());
    }

    #[test]
    fn test_json_field_names() {
        let s = samples(&[("timestamp_0", "happy", "neutral")]);
        let json = serde_json::to_value(&build(&s)[0]).unwrap();
        assert_eq!(json["faceEmotion"], "happy");
        assert_eq!(json["voiceScore"], 3);
    }
}
