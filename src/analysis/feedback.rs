//! Rule-based feedback synthesis
//!
//! Rules fire on how often a label shows up relative to the number of
//! samples `n`. Output order is fixed: cross-cutting rules, then the
//! mode-specific rules, then the closing tip.
//!
//! | Rule | Condition | Kind |
//! |------|-----------|------|
//! | engagement | happy face > n/3 | positive |
//! | voice confidence | confident voice > n/3 | positive |
//! | hesitancy | hesitant voice > n/4 | improvement |
//! | flat affect | neutral face > n/2 | improvement |
//! | technical | thinking face > n/4, plus a tip | positive |
//! | hr | happy face < n/4, plus a tip | improvement |
//! | leadership | a tip, plus confident voice < n/3 | improvement |
//! | general | a tip | tip |
//! | closing | always | tip |

use crate::emotion::{Emotion, SampleSet};
use crate::mode::InterviewMode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Positive,
    Improvement,
    Tip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub text: String,
}

impl FeedbackItem {
    fn new(kind: FeedbackKind, text: &str) -> Self {
        Self { kind, text: text.to_string() }
    }
}

/// A fraction of the sample count, compared without dividing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    pub numerator: usize,
    pub denominator: usize,
}

impl Threshold {
    pub const fn new(numerator: usize, denominator: usize) -> Self {
        Self { numerator, denominator }
    }

    /// `count > total * n/d`
    pub fn exceeded_by(&self, count: usize, total: usize) -> bool {
        count * self.denominator > total * self.numerator
    }

    /// `count < total * n/d`
    pub fn undershot_by(&self, count: usize, total: usize) -> bool {
        count * self.denominator < total * self.numerator
    }
}

pub const ENGAGEMENT_THRESHOLD: Threshold = Threshold::new(1, 3);
pub const VOICE_CONFIDENCE_THRESHOLD: Threshold = Threshold::new(1, 3);
pub const HESITANCY_THRESHOLD: Threshold = Threshold::new(1, 4);
pub const FLAT_AFFECT_THRESHOLD: Threshold = Threshold::new(1, 2);
pub const DELIBERATION_THRESHOLD: Threshold = Threshold::new(1, 4);
pub const WARMTH_THRESHOLD: Threshold = Threshold::new(1, 4);
pub const LEADERSHIP_CONFIDENCE_THRESHOLD: Threshold = Threshold::new(1, 3);

pub const ENGAGEMENT_TEXT: &str =
    "You appeared happy and engaged throughout most of your interview. Great job! 😊";
pub const VOICE_CONFIDENCE_TEXT: &str =
    "Your voice projected confidence for a significant part of the interview. This is excellent!";
pub const HESITANCY_TEXT: &str =
    "You sounded hesitant at times. Try practicing your answers to common questions to build confidence.";
pub const FLAT_AFFECT_TEXT: &str =
    "Your facial expressions were mostly neutral. Consider showing more enthusiasm through your expressions.";
pub const DELIBERATION_TEXT: &str =
    "You showed thoughtful consideration before answering technical questions, which is great for technical interviews.";
pub const THOUGHT_PROCESS_TIP: &str =
    "In technical interviews, it's good to explain your thought process as you work through problems.";
pub const WARMTH_TEXT: &str =
    "HR interviews focus on cultural fit. Try to show more warmth and enthusiasm.";
pub const STAR_TIP: &str =
    "Use the STAR method (Situation, Task, Action, Result) when answering behavioral questions in HR interviews.";
pub const LEADERSHIP_TIP: &str =
    "Leadership interviews assess your ability to influence and inspire. Share concrete examples of how you've led teams.";
pub const LEADERSHIP_CONFIDENCE_TEXT: &str =
    "Leadership roles require confidence. Work on maintaining a confident tone throughout the interview.";
pub const EYE_CONTACT_TIP: &str =
    "Remember to maintain eye contact with the interviewer (or camera) to demonstrate engagement.";
pub const CLOSING_TIP: &str =
    "Vary your tone and pace to keep the interviewer engaged and emphasize key points.";

#[derive(Debug, Default)]
struct LabelCounts {
    happy_face: usize,
    neutral_face: usize,
    thinking_face: usize,
    confident_voice: usize,
    hesitant_voice: usize,
}

impl LabelCounts {
    fn from_samples(samples: &SampleSet) -> Self {
        let mut c = Self::default();
        for s in samples.values() {
            match s.face {
                Emotion::Happy => c.happy_face += 1,
                Emotion::Neutral => c.neutral_face += 1,
                Emotion::Thinking => c.thinking_face += 1,
                _ => {}
            }
            match s.voice {
                Emotion::Confident => c.confident_voice += 1,
                Emotion::Hesitant => c.hesitant_voice += 1,
                _ => {}
            }
        }
        c
    }
}

/// Generate feedback for a sample set. Deterministic for a given input.
pub fn generate(samples: &SampleSet, mode: InterviewMode) -> Vec<FeedbackItem> {
    use FeedbackKind::*;

    let n = samples.len();
    let c = LabelCounts::from_samples(samples);
    let mut feedback = Vec::new();

    if ENGAGEMENT_THRESHOLD.exceeded_by(c.happy_face, n) {
        feedback.push(FeedbackItem::new(Positive, ENGAGEMENT_TEXT));
    }
    if VOICE_CONFIDENCE_THRESHOLD.exceeded_by(c.confident_voice, n) {
        feedback.push(FeedbackItem::new(Positive, VOICE_CONFIDENCE_TEXT));
    }
    if HESITANCY_THRESHOLD.exceeded_by(c.hesitant_voice, n) {
        feedback.push(FeedbackItem::new(Improvement, HESITANCY_TEXT));
    }
    if FLAT_AFFECT_THRESHOLD.exceeded_by(c.neutral_face, n) {
        feedback.push(FeedbackItem::new(Improvement, FLAT_AFFECT_TEXT));
    }

    match mode {
        InterviewMode::Technical => {
            if DELIBERATION_THRESHOLD.exceeded_by(c.thinking_face, n) {
                feedback.push(FeedbackItem::new(Positive, DELIBERATION_TEXT));
            }
            feedback.push(FeedbackItem::new(Tip, THOUGHT_PROCESS_TIP));
        }
        InterviewMode::Hr => {
            if WARMTH_THRESHOLD.undershot_by(c.happy_face, n) {
                feedback.push(FeedbackItem::new(Improvement, WARMTH_TEXT));
            }
            feedback.push(FeedbackItem::new(Tip, STAR_TIP));
        }
        InterviewMode::Leadership => {
            feedback.push(FeedbackItem::new(Tip, LEADERSHIP_TIP));
            if LEADERSHIP_CONFIDENCE_THRESHOLD.undershot_by(c.confident_voice, n) {
                feedback.push(FeedbackItem::new(Improvement, LEADERSHIP_CONFIDENCE_TEXT));
            }
        }
        InterviewMode::General => {
            feedback.push(FeedbackItem::new(Tip, EYE_CONTACT_TIP));
        }
    }

    feedback.push(FeedbackItem::new(Tip, CLOSING_TIP));
    feedback
}
