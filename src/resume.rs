//! Resume analysis and document submission
//!
//! Neither does real document parsing. The resume analysis is a fixed
//! result naming the uploaded file; a document submission is validated and
//! logged, nothing is delivered.

use crate::upload::{self, UploadKind, ValidationError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub filename: String,
    pub skills: Vec<String>,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

/// Validate a resume upload and return the mock analysis for it
pub fn analyze(name: &str, mime: Option<&str>) -> Result<ResumeAnalysis, ValidationError> {
    UploadKind::Resume.check_name(name, mime)?;
    log::info!("resume analysis for {}", name);
    Ok(ResumeAnalysis::mock(name))
}

pub fn analyze_path(path: &Path) -> Result<ResumeAnalysis, ValidationError> {
    UploadKind::Resume.check_path(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());
    analyze(&name, None)
}

impl ResumeAnalysis {
    fn mock(filename: &str) -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            filename: if filename.is_empty() { "resume".to_string() } else { filename.to_string() },
            skills: owned(&["JavaScript", "React", "Technical Communication"]),
            strengths: owned(&["Strong Technical Skills", "Clear Work History"]),
            improvements: owned(&["Add more quantifiable achievements"]),
        }
    }
}

/// The "send a document" form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentSubmission {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub email: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl DocumentSubmission {
    /// Check every field; the first failure wins
    pub fn validate(&self) -> Result<(), ValidationError> {
        upload::check_title(&self.title)?;
        upload::check_email(&self.email)?;
        let file = self.file.as_deref().ok_or(ValidationError::NoFile)?;
        UploadKind::Document.check_path(file)
    }

    /// Validate and "send". Returns the confirmation text shown to the user.
    pub fn submit(&self) -> Result<String, ValidationError> {
        self.validate()?;
        log::info!(
            "document '{}' queued for {} ({})",
            self.title,
            self.email,
            self.file.as_deref().map(|p| p.display().to_string()).unwrap_or_default()
        );
        Ok(format!("Your document \"{}\" will be sent to {}", self.title.trim(), self.email.trim()))
    }
}
