//! Persisted application state
//!
//! Everything the app remembers between runs lives in one [`AppState`]
//! value, stored as a single JSON blob in the `app_state` table together
//! with its schema version. [`StateStore`] is the only code that reads or
//! writes it.
//!
//! Loading never fails on bad data: a missing, malformed or too-new blob
//! yields the default state and a warning. Blobs written with version 0 are
//! the flat key/value layout of the browser build and are migrated on load.

use crate::db::{Database, DbError, CURRENT_SCHEMA};
use crate::emotion::SampleSet;
use crate::mode::InterviewMode;
use crate::practice::{PracticeStats, DEFAULT_WEEKLY_GOAL};
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Row name of the state blob
pub const STATE_KEY: &str = "app_state";

pub const LEGACY_RESULTS_KEY: &str = "virtualhr_interview_results";
pub const LEGACY_MODE_KEY: &str = "virtualhr_interview_mode";
pub const LEGACY_MODE_NAME_KEY: &str = "virtualhr_interview_mode_name";
pub const LEGACY_PRACTICE_KEY: &str = "hrbotics_practice_stats";

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a JSON object of stored keys: {source}")]
    LegacyFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StateError>;

// ============================================================================
// State Model
// ============================================================================

/// The last completed interview, kept so results can be re-rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub samples: SampleSet,
    #[serde(deserialize_with = "mode_or_default")]
    pub mode: InterviewMode,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub version: u32,
    pub last_interview: Option<InterviewRecord>,
    pub practice: PracticeStats,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: CURRENT_SCHEMA.version,
            last_interview: None,
            practice: PracticeStats::default(),
        }
    }
}

fn mode_or_default<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<InterviewMode, D::Error> {
    let id = String::deserialize(d)?;
    Ok(InterviewMode::from_stored(&id))
}

// ============================================================================
// Legacy Layout
// ============================================================================

/// Practice stats as the browser build stored them
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyPracticeStats {
    streak: u32,
    last_practice: String,
    total_sessions: u32,
    weekly_goal: u32,
    weekly_progress: u32,
}

impl Default for LegacyPracticeStats {
    fn default() -> Self {
        Self {
            streak: 0,
            last_practice: String::new(),
            total_sessions: 0,
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            weekly_progress: 0,
        }
    }
}

impl From<LegacyPracticeStats> for PracticeStats {
    fn from(l: LegacyPracticeStats) -> Self {
        Self {
            streak: l.streak,
            last_practice: NaiveDate::parse_from_str(l.last_practice.trim(), "%Y-%m-%d").ok(),
            total_sessions: l.total_sessions,
            weekly_goal: l.weekly_goal.max(1),
            weekly_progress: l.weekly_progress.min(l.weekly_goal.max(1)),
        }
    }
}

/// Outcome of a legacy import, per key
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: Vec<String>,
    pub skipped: Vec<String>,
}

/// Values in a localStorage dump are strings holding JSON; accept already
/// decoded JSON too.
fn legacy_json<T: serde::de::DeserializeOwned>(value: &serde_json::Value) -> Option<T> {
    match value {
        serde_json::Value::String(s) => serde_json::from_str(s).ok(),
        other => serde_json::from_value(other.clone()).ok(),
    }
}

fn legacy_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Fold legacy keys into `state`. Malformed values are skipped one by one.
fn apply_legacy(state: &mut AppState, entries: &IndexMap<String, serde_json::Value>) -> ImportReport {
    let mut report = ImportReport::default();

    let mode = entries
        .get(LEGACY_MODE_KEY)
        .and_then(legacy_text)
        .map(|id| InterviewMode::from_stored(&id));

    if let Some(value) = entries.get(LEGACY_RESULTS_KEY) {
        match legacy_json::<SampleSet>(value) {
            Some(samples) => {
                state.last_interview = Some(InterviewRecord {
                    samples,
                    mode: mode.unwrap_or_default(),
                    recorded_at: None,
                });
                report.imported.push(LEGACY_RESULTS_KEY.to_string());
            }
            None => {
                log::warn!("skipping malformed legacy value for {}", LEGACY_RESULTS_KEY);
                report.skipped.push(LEGACY_RESULTS_KEY.to_string());
            }
        }
    }

    if entries.contains_key(LEGACY_MODE_KEY) {
        match (mode, state.last_interview.as_mut()) {
            (Some(mode), Some(record)) => {
                record.mode = mode;
                report.imported.push(LEGACY_MODE_KEY.to_string());
            }
            _ => report.skipped.push(LEGACY_MODE_KEY.to_string()),
        }
    }

    // The display name is derived from the mode now
    if entries.contains_key(LEGACY_MODE_NAME_KEY) {
        report.skipped.push(LEGACY_MODE_NAME_KEY.to_string());
    }

    if let Some(value) = entries.get(LEGACY_PRACTICE_KEY) {
        match legacy_json::<LegacyPracticeStats>(value) {
            Some(stats) => {
                state.practice = stats.into();
                report.imported.push(LEGACY_PRACTICE_KEY.to_string());
            }
            None => {
                log::warn!("skipping malformed legacy value for {}", LEGACY_PRACTICE_KEY);
                report.skipped.push(LEGACY_PRACTICE_KEY.to_string());
            }
        }
    }

    for key in entries.keys() {
        if ![LEGACY_RESULTS_KEY, LEGACY_MODE_KEY, LEGACY_MODE_NAME_KEY, LEGACY_PRACTICE_KEY]
            .contains(&key.as_str())
        {
            log::debug!("ignoring unrelated stored key {}", key);
        }
    }

    report
}

// ============================================================================
// Store
// ============================================================================

pub struct StateStore {
    db: Database,
}

impl StateStore {
    /// Open or create the database at `path`
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Database::open_at(path)?))
    }

    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Current state. Only database failures are errors; bad data is not.
    pub fn load(&self) -> Result<AppState> {
        let Some(blob) = self.db.get_state(STATE_KEY)? else {
            return Ok(AppState::default());
        };

        let version = u32::try_from(blob.version).unwrap_or(0);
        if !CURRENT_SCHEMA.can_read(version) {
            log::warn!(
                "stored state is version {}, newer than supported {}; using defaults",
                blob.version,
                CURRENT_SCHEMA
            );
            return Ok(AppState::default());
        }

        if version == 0 {
            return Ok(self.migrate_flat(&blob.payload));
        }

        match serde_json::from_str::<AppState>(&blob.payload) {
            Ok(mut state) => {
                state.version = CURRENT_SCHEMA.version;
                Ok(state)
            }
            Err(e) => {
                log::warn!("stored state is malformed ({}); using defaults", e);
                Ok(AppState::default())
            }
        }
    }

    fn migrate_flat(&self, payload: &str) -> AppState {
        let mut state = AppState::default();
        match serde_json::from_str::<IndexMap<String, serde_json::Value>>(payload) {
            Ok(entries) => {
                let report = apply_legacy(&mut state, &entries);
                log::info!("migrated version 0 state ({} keys)", report.imported.len());
            }
            Err(e) => log::warn!("version 0 state is malformed ({}); using defaults", e),
        }
        state
    }

    /// Write the whole state under one key
    pub fn save(&self, state: &AppState) -> Result<()> {
        let payload = serde_json::to_string(state)?;
        self.db.put_state(STATE_KEY, CURRENT_SCHEMA.version, &payload)?;
        log::debug!("saved state ({} bytes)", payload.len());
        Ok(())
    }

    /// Store a finished interview and count today's practice
    pub fn record_interview(&self, samples: SampleSet, mode: InterviewMode, now: DateTime<Utc>) -> Result<AppState> {
        let mut state = self.load()?;
        state.last_interview = Some(InterviewRecord { samples, mode, recorded_at: Some(now) });
        if state.practice.record_session(now.date_naive()) {
            log::info!("practice streak is now {} day(s)", state.practice.streak);
        }
        self.save(&state)?;
        Ok(state)
    }

    pub fn set_weekly_goal(&self, goal: u32) -> Result<AppState> {
        let mut state = self.load()?;
        state.practice.set_weekly_goal(goal);
        self.save(&state)?;
        Ok(state)
    }

    /// Merge a dump of the browser build's stored keys into the current state
    pub fn import_legacy(&self, entries: &IndexMap<String, serde_json::Value>) -> Result<ImportReport> {
        let mut state = self.load()?;
        let report = apply_legacy(&mut state, entries);
        if !report.imported.is_empty() {
            self.save(&state)?;
        }
        log::info!(
            "legacy import: {} imported, {} skipped",
            report.imported.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    pub fn import_legacy_file(&self, path: &Path) -> Result<ImportReport> {
        let text = std::fs::read_to_string(path).map_err(|source| StateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let entries = serde_json::from_str(&text).map_err(|source| StateError::LegacyFormat {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_legacy(&entries)
    }

    /// Forget the stored state. Accounts are kept.
    pub fn reset(&self) -> Result<()> {
        self.db.delete_state(STATE_KEY)?;
        log::info!("state reset");
        Ok(())
    }

    pub fn backup(&self, dest: &Path) -> Result<u64> {
        let bytes = self.db.backup_to(dest)?;
        log::info!("backed up {} to {} ({} bytes)", self.db.path().display(), dest.display(), bytes);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::InterviewAnalysis;
    use crate::backend::MockBackend;
    use chrono::TimeZone;
    use serde_json::json;

    fn temp_store() -> (tempfile::TempDir, StateStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::init(dir.path().join("state.db")).unwrap();
        (dir, store)
    }

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    // ==========================================================================
    // LOAD / SAVE
    // ==========================================================================

    #[test]
    fn test_missing_state_is_default() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load().unwrap(), AppState::default());
    }

    #[test]
    fn test_round_trip_reproduces_results() {
        let (_dir, store) = temp_store();
        let samples = MockBackend::samples();
        let before = InterviewAnalysis::new(&samples, InterviewMode::Technical);

        store.record_interview(samples, InterviewMode::Technical, noon(2024, 5, 6)).unwrap();

        let record = store.load().unwrap().last_interview.unwrap();
        let after = InterviewAnalysis::new(&record.samples, record.mode);
        assert_eq!(after.timeline, before.timeline);
        assert_eq!(after.feedback, before.feedback);
    }

    #[test]
    fn test_malformed_blob_falls_back() {
        let (_dir, store) = temp_store();
        store.db().put_state(STATE_KEY, 1, "{not json").unwrap();
        assert_eq!(store.load().unwrap(), AppState::default());
    }

    #[test]
    fn test_newer_version_falls_back() {
        let (_dir, store) = temp_store();
        let mut state = AppState::default();
        state.practice.streak = 9;
        let payload = serde_json::to_string(&state).unwrap();
        store.db().put_state(STATE_KEY, CURRENT_SCHEMA.version + 1, &payload).unwrap();
        assert_eq!(store.load().unwrap().practice.streak, 0);
    }

    #[test]
    fn test_unknown_stored_mode_is_general() {
        let (_dir, store) = temp_store();
        for stored in ["sales", "HR"] {
            let payload = json!({
                "version": 1,
                "last_interview": {"samples": {}, "mode": stored},
            });
            store.db().put_state(STATE_KEY, 1, &payload.to_string()).unwrap();
            let record = store.load().unwrap().last_interview.unwrap();
            assert_eq!(record.mode, InterviewMode::General, "stored mode {:?}", stored);
        }
    }

    #[test]
    fn test_record_interview_counts_practice() {
        let (_dir, store) = temp_store();
        store.record_interview(MockBackend::samples(), InterviewMode::Hr, noon(2024, 5, 6)).unwrap();
        store.record_interview(MockBackend::samples(), InterviewMode::Hr, noon(2024, 5, 6)).unwrap();
        let state = store.record_interview(MockBackend::samples(), InterviewMode::Hr, noon(2024, 5, 7)).unwrap();

        assert_eq!(state.practice.streak, 2);
        assert_eq!(state.practice.total_sessions, 2);
    }

    #[test]
    fn test_reset_keeps_accounts() {
        let (_dir, store) = temp_store();
        store.db().insert_user("a@example.com", "a", "h").unwrap();
        store.set_weekly_goal(3).unwrap();
        store.reset().unwrap();

        assert_eq!(store.load().unwrap(), AppState::default());
        assert!(store.db().find_user_by_email("a@example.com").unwrap().is_some());
    }

    // ==========================================================================
    // LEGACY MIGRATION
    // ==========================================================================

    fn legacy_dump() -> IndexMap<String, serde_json::Value> {
        let samples = json!({
            "timestamp_0": {"face": "happy", "voice": "neutral"},
            "timestamp_10": {"face": "thinking", "voice": "hesitant"},
        });
        let practice = json!({
            "streak": 3,
            "lastPractice": "2024-05-06",
            "totalSessions": 7,
            "weeklyGoal": 5,
            "weeklyProgress": 2,
        });
        let mut entries = IndexMap::new();
        entries.insert(LEGACY_RESULTS_KEY.to_string(), json!(samples.to_string()));
        entries.insert(LEGACY_MODE_KEY.to_string(), json!("leadership"));
        entries.insert(LEGACY_MODE_NAME_KEY.to_string(), json!("Leadership Interview"));
        entries.insert(LEGACY_PRACTICE_KEY.to_string(), json!(practice.to_string()));
        entries
    }

    #[test]
    fn test_import_legacy_keys() {
        let (_dir, store) = temp_store();
        let report = store.import_legacy(&legacy_dump()).unwrap();
        assert_eq!(report.imported.len(), 3);

        let state = store.load().unwrap();
        let record = state.last_interview.unwrap();
        assert_eq!(record.mode, InterviewMode::Leadership);
        assert_eq!(record.samples.len(), 2);
        assert_eq!(state.practice.streak, 3);

        let legacy_samples = crate::emotion::parse_samples(
            legacy_dump()[LEGACY_RESULTS_KEY].as_str().unwrap(),
        )
        .unwrap();
        let expected = InterviewAnalysis::new(&legacy_samples, InterviewMode::Leadership);
        let imported = InterviewAnalysis::new(&record.samples, record.mode);
        assert_eq!(imported.timeline, expected.timeline);
        assert_eq!(imported.feedback, expected.feedback);
        assert_eq!(state.practice.last_practice, NaiveDate::from_ymd_opt(2024, 5, 6));
    }

    #[test]
    fn test_import_tolerates_malformed_key() {
        let (_dir, store) = temp_store();
        let mut entries = legacy_dump();
        entries.insert(LEGACY_RESULTS_KEY.to_string(), json!("[broken"));

        let report = store.import_legacy(&entries).unwrap();
        assert!(report.skipped.contains(&LEGACY_RESULTS_KEY.to_string()));
        assert!(report.imported.contains(&LEGACY_PRACTICE_KEY.to_string()));

        let state = store.load().unwrap();
        assert!(state.last_interview.is_none());
        assert_eq!(state.practice.total_sessions, 7);
    }

    #[test]
    fn test_version_zero_blob_migrates() {
        let (_dir, store) = temp_store();
        let payload = serde_json::to_string(&legacy_dump()).unwrap();
        store.db().put_state(STATE_KEY, 0, &payload).unwrap();

        let state = store.load().unwrap();
        assert_eq!(state.version, CURRENT_SCHEMA.version);
        assert_eq!(state.practice.total_sessions, 7);
    }

    #[test]
    fn test_import_legacy_file() {
        let (dir, store) = temp_store();
        let path = dir.path().join("localStorage.json");
        std::fs::write(&path, serde_json::to_string(&legacy_dump()).unwrap()).unwrap();
        assert_eq!(store.import_legacy_file(&path).unwrap().imported.len(), 3);

        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(store.import_legacy_file(&path), Err(StateError::LegacyFormat { .. })));
    }
}
