//! Interview practice session: mode, question and recording state
//!
//! ```text
//!            start_recording          stop_recording(video)
//!   Idle ─────────────────► Recording ─────────────────► Recorded
//!    ▲  └──────────────────── upload(video) ───────────────────┘ │
//!    └──────────────── select_mode / reset ──────────────────────┘
//! ```

use crate::backend::{spawn_analysis, AnalysisBackend, PendingAnalysis};
use crate::mode::InterviewMode;
use crate::upload::{UploadKind, ValidationError};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording { started_at: DateTime<Local> },
    Recorded { video: PathBuf },
}

#[derive(Debug, Clone)]
pub struct InterviewSession {
    mode: InterviewMode,
    question: &'static str,
    recording: RecordingState,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new(InterviewMode::default())
    }
}

impl InterviewSession {
    pub fn new(mode: InterviewMode) -> Self {
        Self {
            mode,
            question: mode.random_question(),
            recording: RecordingState::Idle,
        }
    }

    pub fn mode(&self) -> InterviewMode {
        self.mode
    }

    pub fn question(&self) -> &'static str {
        self.question
    }

    pub fn recording(&self) -> &RecordingState {
        &self.recording
    }

    /// Switch mode. Draws a new question and drops any recording.
    pub fn select_mode(&mut self, mode: InterviewMode) {
        log::debug!("mode {} -> {}", self.mode, mode);
        self.mode = mode;
        self.question = mode.random_question();
        self.recording = RecordingState::Idle;
    }

    pub fn start_recording(&mut self) -> Result<(), ValidationError> {
        if matches!(self.recording, RecordingState::Recording { .. }) {
            return Err(ValidationError::AlreadyRecording);
        }
        self.recording = RecordingState::Recording { started_at: Local::now() };
        Ok(())
    }

    /// Finish a recording; `video` is where the capture was written
    pub fn stop_recording(&mut self, video: PathBuf) -> Result<(), ValidationError> {
        if !matches!(self.recording, RecordingState::Recording { .. }) {
            return Err(ValidationError::NotRecording);
        }
        self.recording = RecordingState::Recorded { video };
        Ok(())
    }

    /// Use an existing video file instead of recording
    pub fn upload(&mut self, video: &Path) -> Result<(), ValidationError> {
        UploadKind::Video.check_path(video)?;
        self.recording = RecordingState::Recorded { video: video.to_path_buf() };
        Ok(())
    }

    pub fn reset(&mut self) {
        self.recording = RecordingState::Idle;
    }

    pub fn video(&self) -> Option<&Path> {
        match &self.recording {
            RecordingState::Recorded { video } => Some(video),
            _ => None,
        }
    }

    /// Hand the recorded video to a backend
    pub fn analyze(&self, backend: Arc<dyn AnalysisBackend>) -> Result<PendingAnalysis, ValidationError> {
        let video = self.video().ok_or(ValidationError::NoVideo)?;
        log::info!("analyzing {} as {}", video.display(), self.mode.name());
        Ok(spawn_analysis(backend, video.to_path_buf(), self.mode))
    }
}
