//! Interview mode catalog
//!
//! Four fixed interview categories, each with its own question pool and
//! feedback rules. The set is closed: adding a mode means adding a variant.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewMode {
    #[default]
    General,
    Technical,
    Hr,
    Leadership,
}

const GENERAL_QUESTIONS: &[&str] = &[
    "Tell me about yourself.",
    "Why are you interested in this position?",
    "What are your greatest strengths and weaknesses?",
    "Where do you see yourself in 5 years?",
    "Describe a challenge you faced at work and how you overcame it.",
];

const TECHNICAL_QUESTIONS: &[&str] = &[
    "Explain your most challenging project and how you approached it.",
    "How do you stay updated with the latest technologies?",
    "Describe your approach to debugging a complex issue.",
    "How do you ensure code quality and performance?",
    "Describe your experience with [specific technology].",
];

const HR_QUESTIONS: &[&str] = &[
    "How do you handle conflict in the workplace?",
    "Describe your ideal work environment.",
    "How do you prioritize tasks when you have multiple deadlines?",
    "Tell me about a time you went above and beyond at work.",
    "How would your colleagues describe your work style?",
];

const LEADERSHIP_QUESTIONS: &[&str] = &[
    "How do you motivate your team?",
    "Describe your leadership style.",
    "How do you handle underperforming team members?",
    "Tell me about a successful project you led.",
    "How do you delegate tasks and responsibilities?",
];

impl InterviewMode {
    pub const ALL: [InterviewMode; 4] = [
        InterviewMode::General,
        InterviewMode::Technical,
        InterviewMode::Hr,
        InterviewMode::Leadership,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            InterviewMode::General => "general",
            InterviewMode::Technical => "technical",
            InterviewMode::Hr => "hr",
            InterviewMode::Leadership => "leadership",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InterviewMode::General => "General Interview",
            InterviewMode::Technical => "Technical Interview",
            InterviewMode::Hr => "HR Interview",
            InterviewMode::Leadership => "Leadership Interview",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InterviewMode::General => "Standard questions suitable for any position",
            InterviewMode::Technical => "For software development and IT positions",
            InterviewMode::Hr => "Focus on cultural fit and soft skills",
            InterviewMode::Leadership => "For management and leadership roles",
        }
    }

    pub fn questions(&self) -> &'static [&'static str] {
        match self {
            InterviewMode::General => GENERAL_QUESTIONS,
            InterviewMode::Technical => TECHNICAL_QUESTIONS,
            InterviewMode::Hr => HR_QUESTIONS,
            InterviewMode::Leadership => LEADERSHIP_QUESTIONS,
        }
    }

    /// Pick one question uniformly at random
    pub fn random_question(&self) -> &'static str {
        self.question_with(&mut rand::thread_rng())
    }

    pub fn question_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        // Every pool is a non-empty const slice
        self.questions().choose(rng).copied().unwrap_or(GENERAL_QUESTIONS[0])
    }

    /// Resolve a stored mode id, falling back to the default for anything unknown.
    /// Stored ids must match exactly; `"HR"` is not `hr`.
    pub fn from_stored(id: &str) -> Self {
        Self::ALL.into_iter().find(|m| m.id() == id).unwrap_or_default()
    }
}

impl fmt::Display for InterviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown interview mode '{0}' (expected one of: general, technical, hr, leadership)")]
pub struct UnknownMode(pub String);

impl FromStr for InterviewMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "general" => Ok(InterviewMode::General),
            "technical" => Ok(InterviewMode::Technical),
            "hr" => Ok(InterviewMode::Hr),
            "leadership" => Ok(InterviewMode::Leadership),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Serializable catalog entry for the UI and `modes` listing
#[derive(Debug, Clone, Serialize)]
pub struct ModeInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub questions: &'static [&'static str],
}

impl From<InterviewMode> for ModeInfo {
    fn from(mode: InterviewMode) -> Self {
        Self {
            id: mode.id(),
            name: mode.name(),
            description: mode.description(),
            questions: mode.questions(),
        }
    }
}

pub fn catalog() -> Vec<ModeInfo> {
    InterviewMode::ALL.iter().copied().map(ModeInfo::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_catalog_is_closed_and_complete() {
        let ids: Vec<&str> = catalog().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["general", "technical", "hr", "leadership"]);
        for mode in InterviewMode::ALL {
            assert_eq!(mode.questions().len(), 5, "{} should have 5 questions", mode);
        }
    }

    #[test]
    fn test_parse_round_trips_ids() {
        for mode in InterviewMode::ALL {
            assert_eq!(mode.id().parse::<InterviewMode>().unwrap(), mode);
        }
        assert_eq!("  HR ".parse::<InterviewMode>().unwrap(), InterviewMode::Hr);
    }

    #[test]
    fn test_unknown_mode_rejected_at_boundary() {
        let err = "sales".parse::<InterviewMode>().unwrap_err();
        assert!(err.to_string().contains("sales"));
    }

    #[test]
    fn test_stored_unknown_mode_defaults_to_general() {
        assert_eq!(InterviewMode::from_stored("sales"), InterviewMode::General);
        assert_eq!(InterviewMode::from_stored("technical"), InterviewMode::Technical);
    }

    #[test]
    fn test_stored_mode_is_case_sensitive() {
        assert_eq!(InterviewMode::from_stored("HR"), InterviewMode::General);
        assert_eq!(InterviewMode::from_stored(" hr"), InterviewMode::General);
        assert_eq!(InterviewMode::from_stored("hr"), InterviewMode::Hr);
    }

    #[test]
    fn test_question_comes_from_mode_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        for mode in InterviewMode::ALL {
            for _ in 0..20 {
                let q = mode.question_with(&mut rng);
                assert!(mode.questions().contains(&q));
            }
        }
    }

    #[test]
    fn test_serde_uses_ids() {
        assert_eq!(serde_json::to_string(&InterviewMode::Hr).unwrap(), "\"hr\"");
        let m: InterviewMode = serde_json::from_str("\"leadership\"").unwrap();
        assert_eq!(m, InterviewMode::Leadership);
    }
}
