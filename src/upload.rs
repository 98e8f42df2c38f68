//! Boundary checks for uploaded files and form fields
//!
//! Everything here runs before a request reaches the analysis code. A
//! rejected input comes back as a [`ValidationError`] whose message is fit to
//! show the user as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid file format: {name}. Please upload {expected}.")]
    FileType { name: String, expected: &'static str },
    #[error("File not found: {0}")]
    MissingFile(String),
    #[error("Please upload a document.")]
    NoFile,
    #[error("Title must be at least 2 characters.")]
    TitleTooShort,
    #[error("Please enter a valid email address.")]
    Email,
    #[error("Password must not be empty.")]
    EmptyPassword,
    #[error("Please record or upload a video first.")]
    NoVideo,
    #[error("Recording already in progress.")]
    AlreadyRecording,
    #[error("No recording in progress.")]
    NotRecording,
}

pub const MIN_TITLE_LEN: usize = 2;

/// What kind of upload a file is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Video,
    Resume,
    Document,
}

impl UploadKind {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Video => &["webm", "mp4", "mov", "mkv", "avi", "m4v"],
            UploadKind::Resume => &["pdf", "doc", "docx"],
            UploadKind::Document => &["pdf", "doc", "docx", "txt", "rtf"],
        }
    }

    pub fn mime_types(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Video => &["video/webm", "video/mp4", "video/quicktime", "video/x-matroska"],
            UploadKind::Resume | UploadKind::Document => &[
                "application/pdf",
                "application/msword",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ],
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            UploadKind::Video => "a WEBM, MP4, MOV, MKV or AVI video",
            UploadKind::Resume => "a PDF, DOC, or DOCX file",
            UploadKind::Document => "a PDF, DOC, DOCX, TXT or RTF file",
        }
    }

    /// Accept a file by name, or by declared MIME type when one is given
    pub fn check_name(&self, name: &str, mime: Option<&str>) -> Result<(), ValidationError> {
        if let Some(mime) = mime {
            if self.mime_types().contains(&mime) {
                return Ok(());
            }
        }
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if self.extensions().contains(&ext.as_str()) {
            Ok(())
        } else {
            Err(ValidationError::FileType {
                name: name.to_string(),
                expected: self.expected(),
            })
        }
    }

    /// Check a file on disk: it must exist and have an accepted extension
    pub fn check_path(&self, path: &Path) -> Result<(), ValidationError> {
        if !path.is_file() {
            return Err(ValidationError::MissingFile(path.display().to_string()));
        }
        self.check_name(&path.to_string_lossy(), None)
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

pub fn check_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::Email)
    }
}

pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        Err(ValidationError::EmptyPassword)
    } else {
        Ok(())
    }
}

pub fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().chars().count() < MIN_TITLE_LEN {
        Err(ValidationError::TitleTooShort)
    } else {
        Ok(())
    }
}
