//! HRbotics - interview practice with emotion feedback
//!
//! HRbotics takes a recorded practice interview, asks an analysis backend for
//! per-timestamp facial and vocal emotion labels, and turns them into a
//! results view: a scored timeline, an emotion distribution, headline
//! metrics and mode-specific coaching feedback. Results can be exported as
//! SVG, HTML or JSON reports.
//!
//! # Quick Start
//!
//! ```no_run
//! use hrbotics::{InterviewAnalysis, InterviewMode, MockBackend};
//!
//! let samples = MockBackend::samples();
//! let analysis = InterviewAnalysis::new(&samples, InterviewMode::Technical);
//!
//! println!("Overall score: {}/100", analysis.metrics.overall_score);
//! for item in &analysis.feedback {
//!     println!("[{:?}] {}", item.kind, item.text);
//! }
//! ```
//!
//! # Scoring
//!
//! Every face and voice label maps to a 1-5 score:
//!
//! | Label | Score |
//! |-------|-------|
//! | happy, confident | 5 |
//! | neutral, thinking, anything unknown | 3 |
//! | hesitant | 2 |
//! | sad, nervous | 1 |
//!
//! The overall score is the mean of all face and voice scores scaled to 100.
//!
//! # Modules
//!
//! - [`analysis`]: timeline, distribution, metrics and feedback
//! - [`backend`]: where emotion samples come from
//! - [`session`]: recording / upload state for one interview
//! - [`state`]: persisted state in SQLite
//! - [`report`]: SVG, HTML and JSON exporters
//! - [`auth`]: local accounts
//! - [`serve`]: local web UI

pub mod analysis;
pub mod app;
pub mod auth;
pub mod backend;
pub mod config;
pub mod db;
pub mod emotion;
pub mod error;
pub mod mode;
pub mod practice;
pub mod report;
pub mod resume;
pub mod schema;
pub mod serve;
pub mod session;
pub mod state;
pub mod upload;

pub use analysis::{FeedbackItem, FeedbackKind, InterviewAnalysis, InterviewMetrics, TimelinePoint};
pub use app::App;
pub use auth::{Authenticator, LocalAuth, User};
pub use backend::{AnalysisBackend, FileBackend, MockBackend, PendingAnalysis};
pub use config::Settings;
pub use db::{Database, CURRENT_SCHEMA};
pub use emotion::{Emotion, EmotionSample, SampleSet};
pub use error::{Error, Result};
pub use mode::InterviewMode;
pub use practice::PracticeStats;
pub use report::{FeedbackReport, ReportFormat, ReportSurface};
pub use session::InterviewSession;
pub use state::{AppState, StateStore};

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // PUBLIC API TESTS
    // ==========================================================================
    //
    // The quick start above should work from the crate root alone.
    // ==========================================================================

    #[test]
    fn test_quick_start() {
        let samples = MockBackend::samples();
        let analysis = InterviewAnalysis::new(&samples, InterviewMode::Technical);
        assert_eq!(analysis.metrics.overall_score, 74);
        assert_eq!(analysis.feedback.last().map(|f| f.kind), Some(FeedbackKind::Tip));
    }

    #[test]
    fn test_mode_variants() {
        assert_eq!(InterviewMode::ALL.len(), 4);
        assert_eq!(InterviewMode::default(), InterviewMode::General);
    }

    #[test]
    fn test_error_conversions() {
        let e: Error = "sales".parse::<InterviewMode>().unwrap_err().into();
        assert!(e.is_user_error());
        let e: Error = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(!e.is_user_error());
    }
}
