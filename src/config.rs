//! Runtime settings
//!
//! Gathered by the binary from flags and `HRBOTICS_*` environment variables
//! and handed to the library as one value.

use crate::backend::DEFAULT_ANALYSIS_DELAY;
use crate::db::DEFAULT_DB_PATH;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REPORT_DIR: &str = "hrbotics-reports";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub report_dir: PathBuf,
    /// Delay of the mocked analysis backend
    pub analysis_delay: Duration,
    /// Overrides the stored weekly practice goal when set
    pub weekly_goal: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            analysis_delay: DEFAULT_ANALYSIS_DELAY,
            weekly_goal: None,
        }
    }
}

impl Settings {
    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.analysis_delay = Duration::from_millis(ms);
        self
    }
}
