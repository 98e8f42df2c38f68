//! Emotion labels and the sample-set contract
//!
//! An analysis backend reports one [`EmotionSample`] per timestamp: the
//! emotion read from the face and the one read from the voice. The wire
//! format is a JSON object keyed by timestamp label:
//!
//! ```text
//! {
//!   "timestamp_0":  { "face": "happy",   "voice": "neutral"   },
//!   "timestamp_10": { "face": "neutral", "voice": "confident" }
//! }
//! ```
//!
//! Labels outside the known palette are kept verbatim. They score as
//! neutral and render in a fallback colour, they are never rejected.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score given to any label missing from the score table
pub const DEFAULT_SCORE: u32 = 3;

/// Display colour for labels outside the palette
pub const FALLBACK_COLOR: &str = "#94a3b8";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Emotion {
    Happy,
    Neutral,
    Confident,
    Hesitant,
    Thinking,
    Sad,
    Nervous,
    /// Anything the backend reported that we don't know about
    Other(String),
}

impl Emotion {
    /// The fixed palette, in display order
    pub const KNOWN: [Emotion; 7] = [
        Emotion::Happy,
        Emotion::Neutral,
        Emotion::Confident,
        Emotion::Hesitant,
        Emotion::Thinking,
        Emotion::Sad,
        Emotion::Nervous,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Neutral => "neutral",
            Emotion::Confident => "confident",
            Emotion::Hesitant => "hesitant",
            Emotion::Thinking => "thinking",
            Emotion::Sad => "sad",
            Emotion::Nervous => "nervous",
            Emotion::Other(s) => s,
        }
    }

    /// Score on the 1-5 scale used by the timeline chart
    pub fn score(&self) -> u32 {
        match self {
            Emotion::Happy | Emotion::Confident => 5,
            Emotion::Neutral | Emotion::Thinking => 3,
            Emotion::Hesitant => 2,
            Emotion::Nervous | Emotion::Sad => 1,
            Emotion::Other(_) => DEFAULT_SCORE,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Emotion::Happy => "#22c55e",
            Emotion::Neutral => "#9b87f5",
            Emotion::Confident => "#3b82f6",
            Emotion::Hesitant => "#f59e0b",
            Emotion::Thinking => "#6b7280",
            Emotion::Sad => "#ef4444",
            Emotion::Nervous => "#f97316",
            Emotion::Other(_) => FALLBACK_COLOR,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Emotion::Other(_))
    }

    /// Counts toward the positive-expression rate
    pub fn is_positive(&self) -> bool {
        matches!(self, Emotion::Happy | Emotion::Confident)
    }
}

impl From<&str> for Emotion {
    fn from(s: &str) -> Self {
        match s {
            "happy" => Emotion::Happy,
            "neutral" => Emotion::Neutral,
            "confident" => Emotion::Confident,
            "hesitant" => Emotion::Hesitant,
            "thinking" => Emotion::Thinking,
            "sad" => Emotion::Sad,
            "nervous" => Emotion::Nervous,
            other => Emotion::Other(other.to_string()),
        }
    }
}

impl From<String> for Emotion {
    fn from(s: String) -> Self {
        match Emotion::from(s.as_str()) {
            Emotion::Other(_) => Emotion::Other(s),
            known => known,
        }
    }
}

impl From<Emotion> for String {
    fn from(e: Emotion) -> Self {
        match e {
            Emotion::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One face/voice observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionSample {
    pub face: Emotion,
    pub voice: Emotion,
}

impl EmotionSample {
    pub fn new(face: impl Into<Emotion>, voice: impl Into<Emotion>) -> Self {
        Self { face: face.into(), voice: voice.into() }
    }
}

/// Samples keyed by timestamp label, in the order the backend produced them
pub type SampleSet = IndexMap<String, EmotionSample>;

/// Parse a sample set from its JSON contract
pub fn parse_samples(json: &str) -> serde_json::Result<SampleSet> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // SCORE TABLE
    // ==========================================================================

    #[test]
    fn test_score_table() {
        assert_eq!(Emotion::Happy.score(), 5);
        assert_eq!(Emotion::Confident.score(), 5);
        assert_eq!(Emotion::Neutral.score(), 3);
        assert_eq!(Emotion::Thinking.score(), 3);
        assert_eq!(Emotion::Hesitant.score(), 2);
        assert_eq!(Emotion::Nervous.score(), 1);
        assert_eq!(Emotion::Sad.score(), 1);
    }

    #[test]
    fn test_unknown_label_scores_midpoint() {
        let e = Emotion::from("bored");
        assert_eq!(e, Emotion::Other("bored".to_string()));
        assert_eq!(e.score(), DEFAULT_SCORE);
        assert_eq!(e.color(), FALLBACK_COLOR);
        assert!(!e.is_known());
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        // The backend contract is lowercase; anything else is an unknown label
        assert!(!Emotion::from("Happy").is_known());
    }

    // ==========================================================================
    // SAMPLE CONTRACT
    // ==========================================================================

    #[test]
    fn test_parse_keeps_input_order() {
        let json = r#"{
            "timestamp_20": {"face": "thinking", "voice": "hesitant"},
            "timestamp_0": {"face": "happy", "voice": "neutral"},
            "timestamp_10": {"face": "neutral", "voice": "confident"}
        }"#;
        let samples = parse_samples(json).unwrap();
        let keys: Vec<&str> = samples.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["timestamp_20", "timestamp_0", "timestamp_10"]);
        assert_eq!(samples["timestamp_0"].face, Emotion::Happy);
    }

    #[test]
    fn test_unknown_label_survives_serialization() {
        let sample = EmotionSample::new("happy", "mumbling");
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(json, r#"{"face":"happy","voice":"mumbling"}"#);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        assert!(parse_samples(r#"{"timestamp_0": {"face": "happy"}}"#).is_err());
    }
}
