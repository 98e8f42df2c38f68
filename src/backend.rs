//! Analysis backends
//!
//! A backend turns a recorded video into a [`SampleSet`]. Real inference is
//! out of scope; [`MockBackend`] answers with a fixed set after a delay and
//! [`FileBackend`] replays a sample set saved as JSON. Callers only rely on
//! the sample contract, never on how the samples were produced.

use crate::emotion::{self, EmotionSample, SampleSet};
use crate::mode::InterviewMode;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ANALYSIS_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to read samples from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed sample set in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("analysis worker stopped before producing a result")]
    WorkerLost,
}

pub trait AnalysisBackend: Send + Sync {
    fn analyze(&self, video: &Path, mode: InterviewMode) -> Result<SampleSet, BackendError>;
}

/// Answers every request with the same five samples
#[derive(Debug, Clone)]
pub struct MockBackend {
    pub delay: Duration,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self { delay: DEFAULT_ANALYSIS_DELAY }
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn samples() -> SampleSet {
        [
            ("timestamp_0", "happy", "neutral"),
            ("timestamp_10", "neutral", "confident"),
            ("timestamp_20", "thinking", "hesitant"),
            ("timestamp_30", "happy", "confident"),
            ("timestamp_40", "neutral", "neutral"),
        ]
        .into_iter()
        .map(|(t, face, voice)| (t.to_string(), EmotionSample::new(face, voice)))
        .collect()
    }
}

impl AnalysisBackend for MockBackend {
    fn analyze(&self, video: &Path, mode: InterviewMode) -> Result<SampleSet, BackendError> {
        log::debug!("mock analysis of {} ({} mode)", video.display(), mode);
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(Self::samples())
    }
}

/// Replays a sample set from a JSON file, ignoring the video
#[derive(Debug, Clone)]
pub struct FileBackend {
    pub path: PathBuf,
}

impl FileBackend {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl AnalysisBackend for FileBackend {
    fn analyze(&self, _video: &Path, _mode: InterviewMode) -> Result<SampleSet, BackendError> {
        let json = std::fs::read_to_string(&self.path).map_err(|source| BackendError::Read {
            path: self.path.clone(),
            source,
        })?;
        emotion::parse_samples(&json).map_err(|source| BackendError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// An analysis running on a worker thread.
///
/// Dropping the handle discards the result; the worker still runs to the end.
pub struct PendingAnalysis {
    rx: Receiver<Result<SampleSet, BackendError>>,
    mode: InterviewMode,
}

impl PendingAnalysis {
    pub fn mode(&self) -> InterviewMode {
        self.mode
    }

    /// Block until the backend answers
    pub fn wait(self) -> Result<SampleSet, BackendError> {
        self.rx.recv().unwrap_or(Err(BackendError::WorkerLost))
    }

    /// Non-blocking poll; `None` while the backend is still working
    pub fn try_result(&self) -> Option<Result<SampleSet, BackendError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(BackendError::WorkerLost)),
        }
    }
}

pub fn spawn_analysis(
    backend: Arc<dyn AnalysisBackend>,
    video: PathBuf,
    mode: InterviewMode,
) -> PendingAnalysis {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = backend.analyze(&video, mode);
        // Receiver may be gone if the caller discarded the run
        let _ = tx.send(result);
    });
    PendingAnalysis { rx, mode }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Instant;

    #[test]
    fn test_mock_samples_shape() {
        let samples = MockBackend::samples();
        assert_eq!(samples.len(), 5);
        assert!(samples.keys().all(|k| k.starts_with("timestamp_")));
    }

    #[test]
    fn test_mock_honors_delay() {
        let backend = MockBackend::new().with_delay(Duration::from_millis(30));
        let start = Instant::now();
        let samples = backend.analyze(Path::new("video.webm"), InterviewMode::General).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(samples, MockBackend::samples());
    }

    #[test]
    fn test_spawned_analysis_resolves() {
        let backend: Arc<dyn AnalysisBackend> =
            Arc::new(MockBackend::new().with_delay(Duration::from_millis(5)));
        let pending = spawn_analysis(backend, PathBuf::from("v.webm"), InterviewMode::Technical);
        assert_eq!(pending.mode(), InterviewMode::Technical);
        assert_eq!(pending.wait().unwrap().len(), 5);
    }

    #[test]
    fn test_discarded_analysis_does_not_panic() {
        let backend: Arc<dyn AnalysisBackend> =
            Arc::new(MockBackend::new().with_delay(Duration::from_millis(5)));
        drop(spawn_analysis(backend, PathBuf::from("v.webm"), InterviewMode::General));
        thread::sleep(Duration::from_millis(20));
    }

    #[test]
    fn test_file_backend_reads_contract() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"timestamp_3": {{"face": "sad", "voice": "nervous"}}}}"#).unwrap();

        let samples = FileBackend::new(file.path())
            .analyze(Path::new("ignored"), InterviewMode::General)
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples["timestamp_3"].voice.as_str(), "nervous");
    }

    #[test]
    fn test_file_backend_reports_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = FileBackend::new(file.path())
            .analyze(Path::new("ignored"), InterviewMode::General)
            .unwrap_err();
        assert!(matches!(err, BackendError::Parse { .. }));
    }

    #[test]
    fn test_file_backend_missing_file() {
        let err = FileBackend::new("/nonexistent/samples.json")
            .analyze(Path::new("ignored"), InterviewMode::General)
            .unwrap_err();
        assert!(matches!(err, BackendError::Read { .. }));
    }
}
