//! Application facade shared by the CLI and the web server
//!
//! Wires [`Settings`] to the state store, the analysis backend and the
//! report exporter so both front ends run the same operations.

use crate::analysis::InterviewAnalysis;
use crate::auth::LocalAuth;
use crate::backend::{AnalysisBackend, MockBackend, PendingAnalysis};
use crate::config::Settings;
use crate::error::Result;
use crate::mode::InterviewMode;
use crate::practice::PracticeStats;
use crate::report::{self, ReportFormat, ReportSurface};
use crate::resume::ResumeAnalysis;
use crate::session::InterviewSession;
use crate::state::StateStore;
use chrono::{Local, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct App {
    settings: Settings,
    store: StateStore,
    backend: Arc<dyn AnalysisBackend>,
}

/// Practice stats as shown on the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct PracticeSummary {
    #[serde(flatten)]
    pub stats: PracticeStats,
    pub weekly_percent: u32,
    pub message: &'static str,
}

impl From<PracticeStats> for PracticeSummary {
    fn from(stats: PracticeStats) -> Self {
        Self {
            weekly_percent: stats.weekly_percent(),
            message: stats.motivational_message(),
            stats,
        }
    }
}

impl App {
    /// Open the database named in `settings` with the mocked backend
    pub fn open(settings: Settings) -> Result<Self> {
        let store = StateStore::init(&settings.db_path)?;
        let backend: Arc<dyn AnalysisBackend> = Arc::new(MockBackend::new().with_delay(settings.analysis_delay));
        let app = Self { settings, store, backend };

        if let Some(goal) = app.settings.weekly_goal {
            if app.store.load()?.practice.weekly_goal != goal {
                app.store.set_weekly_goal(goal)?;
            }
        }
        Ok(app)
    }

    pub fn with_backend(mut self, backend: Arc<dyn AnalysisBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn auth(&self) -> LocalAuth<'_> {
        LocalAuth::new(self.store.db())
    }

    /// Hand the session's video to the backend without waiting
    pub fn start_analysis(&self, session: &InterviewSession) -> Result<PendingAnalysis> {
        Ok(session.analyze(Arc::clone(&self.backend))?)
    }

    /// Wait for a pending analysis, store it and derive the results
    pub fn finish_analysis(&self, pending: PendingAnalysis) -> Result<InterviewAnalysis> {
        let mode = pending.mode();
        let samples = pending.wait()?;
        let analysis = InterviewAnalysis::new(&samples, mode);
        self.store.record_interview(samples, mode, Utc::now())?;
        log::info!(
            "{} analysed: {} sample(s), overall score {}",
            analysis.mode_name,
            analysis.sample_count,
            analysis.metrics.overall_score
        );
        Ok(analysis)
    }

    /// Upload-and-analyse in one call
    pub fn analyze_video(&self, video: &Path, mode: InterviewMode) -> Result<InterviewAnalysis> {
        let mut session = InterviewSession::new(mode);
        session.upload(video)?;
        let pending = self.start_analysis(&session)?;
        self.finish_analysis(pending)
    }

    /// Results of the last stored interview, recomputed from its samples
    pub fn last_results(&self) -> Result<Option<InterviewAnalysis>> {
        Ok(self
            .store
            .load()?
            .last_interview
            .map(|record| InterviewAnalysis::new(&record.samples, record.mode)))
    }

    pub fn report_surface(&self) -> Result<Option<ReportSurface>> {
        Ok(self
            .last_results()?
            .map(|analysis| ReportSurface::interview(analysis, Local::now())))
    }

    /// Export the last interview's report into the report directory
    pub fn export_report(&self, format: ReportFormat) -> Result<PathBuf> {
        let surface = self.report_surface()?;
        Ok(report::export(surface.as_ref(), &self.settings.report_dir, format, Local::now())?)
    }

    pub fn export_resume(&self, analysis: &ResumeAnalysis, format: ReportFormat) -> Result<PathBuf> {
        let surface = ReportSurface::resume(analysis.clone());
        Ok(report::export(Some(&surface), &self.settings.report_dir, format, Local::now())?)
    }

    pub fn practice(&self) -> Result<PracticeSummary> {
        Ok(self.store.load()?.practice.into())
    }

    pub fn set_weekly_goal(&self, goal: u32) -> Result<PracticeSummary> {
        Ok(self.store.set_weekly_goal(goal)?.practice.into())
    }
}
