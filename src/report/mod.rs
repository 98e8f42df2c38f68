//! Report export
//!
//! A [`ReportSurface`] is a rendered results view: either an interview
//! report or a resume analysis. Exporting snapshots it into one of three
//! formats, picked by extension:
//!
//! - **SVG**: image of the charts (timeline line chart, distribution bars)
//! - **HTML**: standalone page embedding the SVG plus the feedback text
//! - **JSON**: the report payload
//!
//! # Usage
//!
//! ```ignore
//! use hrbotics::report::{self, ReportFormat, ReportSurface};
//!
//! let surface = ReportSurface::interview(analysis, chrono::Local::now());
//! let path = report::export(Some(&surface), "reports", ReportFormat::Html, chrono::Local::now())?;
//! report::generate("snapshot.svg", &surface)?;
//! ```
//!
//! Files are written to a temporary file next to the target and renamed
//! into place, so a failed export never leaves a partial file behind.

pub mod html;
pub mod json;
pub mod svg;

use crate::analysis::{FeedbackItem, InterviewAnalysis, TimelinePoint};
use crate::resume::ResumeAnalysis;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const INTERVIEW_REPORT_PREFIX: &str = "hrbotics-interview-report";
pub const RESUME_REPORT_PREFIX: &str = "hrbotics-resume-analysis";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("report surface not found")]
    SurfaceNotFound,
    #[error("unknown report format '{0}' (expected svg, html or json)")]
    UnknownFormat(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Payload of an exported interview report
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackReport {
    pub timestamp: String,
    pub overall_score: u32,
    pub emotion_data: Vec<TimelinePoint>,
    pub feedback: Vec<FeedbackItem>,
    pub interview_mode: String,
}

impl FeedbackReport {
    pub fn new(analysis: &InterviewAnalysis, rendered_at: DateTime<Local>) -> Self {
        Self {
            timestamp: rendered_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            overall_score: analysis.metrics.overall_score,
            emotion_data: analysis.timeline.clone(),
            feedback: analysis.feedback.clone(),
            interview_mode: analysis.mode_name.to_string(),
        }
    }
}

/// A rendered report, ready to be snapshotted
#[derive(Debug, Clone)]
pub enum ReportSurface {
    Interview {
        report: FeedbackReport,
        analysis: InterviewAnalysis,
    },
    Resume(ResumeAnalysis),
}

impl ReportSurface {
    pub fn interview(analysis: InterviewAnalysis, rendered_at: DateTime<Local>) -> Self {
        Self::Interview {
            report: FeedbackReport::new(&analysis, rendered_at),
            analysis,
        }
    }

    pub fn resume(analysis: ResumeAnalysis) -> Self {
        Self::Resume(analysis)
    }

    pub fn title(&self) -> String {
        match self {
            Self::Interview { analysis, .. } => format!("{} Report", analysis.mode_name),
            Self::Resume(r) => format!("Resume Analysis: {}", r.filename),
        }
    }

    pub fn file_prefix(&self) -> &'static str {
        match self {
            Self::Interview { .. } => INTERVIEW_REPORT_PREFIX,
            Self::Resume(_) => RESUME_REPORT_PREFIX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Svg,
    Html,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Html => "html",
            Self::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Html => "text/html; charset=utf-8",
            Self::Json => "application/json",
        }
    }

    /// Format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        ext.parse()
    }
}

impl FromStr for ReportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "html" | "htm" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Render `surface` in `format` to any writer
pub fn render<W: Write>(writer: &mut W, surface: &ReportSurface, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Svg => writer.write_all(svg::render(surface).as_bytes())?,
        ReportFormat::Html => html::write(writer, surface)?,
        ReportFormat::Json => json::write(writer, surface)?,
    }
    Ok(())
}

/// Generate a report at `path`, format picked from its extension
pub fn generate<P: AsRef<Path>>(path: P, surface: &ReportSurface) -> Result<()> {
    let path = path.as_ref();
    let format = ReportFormat::from_path(path)?;
    write_atomic(path, surface, format)
}

/// Export the rendered surface into `dir` under a timestamped name
///
/// Returns the path of the written file.
pub fn export<P: AsRef<Path>>(
    surface: Option<&ReportSurface>,
    dir: P,
    format: ReportFormat,
    now: DateTime<Local>,
) -> Result<PathBuf> {
    let surface = surface.ok_or(ExportError::SurfaceNotFound)?;
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let path = dir.join(file_name(surface, format, now));
    write_atomic(&path, surface, format)?;
    log::info!("exported {} report to {}", format, path.display());
    Ok(path)
}

pub fn file_name(surface: &ReportSurface, format: ReportFormat, now: DateTime<Local>) -> String {
    format!("{}-{}.{}", surface.file_prefix(), now.timestamp_millis(), format.extension())
}

fn write_atomic(path: &Path, surface: &ReportSurface, format: ReportFormat) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = io::BufWriter::new(tmp.as_file_mut());
        render(&mut writer, surface, format)?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| ExportError::Io(e.error))?;
    Ok(())
}

/// Escape text for HTML and SVG bodies and attributes
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
