//! Practice streak tracking

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WEEKLY_GOAL: u32 = 5;

const MOTIVATIONAL_MESSAGES: &[&str] = &[
    "Great start! Keep going!",
    "Building habits one day at a time!",
    "You're making excellent progress!",
    "Consistency is key to success!",
    "You're on your way to interview mastery!",
    "Each practice session brings you closer to your dream job!",
    "Your dedication is impressive!",
    "Keep up the fantastic work!",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeStats {
    /// Consecutive days with at least one session
    pub streak: u32,
    pub last_practice: Option<NaiveDate>,
    pub total_sessions: u32,
    pub weekly_goal: u32,
    /// Sessions this ISO week, capped at the goal
    pub weekly_progress: u32,
}

impl Default for PracticeStats {
    fn default() -> Self {
        Self {
            streak: 0,
            last_practice: None,
            total_sessions: 0,
            weekly_goal: DEFAULT_WEEKLY_GOAL,
            weekly_progress: 0,
        }
    }
}

impl PracticeStats {
    /// Count a practice day. Returns false if `today` was already counted.
    pub fn record_session(&mut self, today: NaiveDate) -> bool {
        if self.last_practice == Some(today) {
            return false;
        }

        self.streak = match self.last_practice {
            Some(last) if today.pred_opt() == Some(last) => self.streak + 1,
            _ => 1,
        };

        let same_week = self
            .last_practice
            .map(|last| last.iso_week() == today.iso_week())
            .unwrap_or(false);
        if !same_week {
            self.weekly_progress = 0;
        }

        self.last_practice = Some(today);
        self.total_sessions += 1;
        self.weekly_progress = (self.weekly_progress + 1).min(self.weekly_goal);
        true
    }

    pub fn set_weekly_goal(&mut self, goal: u32) {
        self.weekly_goal = goal.max(1);
        self.weekly_progress = self.weekly_progress.min(self.weekly_goal);
    }

    pub fn weekly_percent(&self) -> u32 {
        if self.weekly_goal == 0 {
            return 0;
        }
        self.weekly_progress * 100 / self.weekly_goal
    }

    pub fn motivational_message(&self) -> &'static str {
        let idx = (self.streak.saturating_sub(1) as usize).min(MOTIVATIONAL_MESSAGES.len() - 1);
        MOTIVATIONAL_MESSAGES[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_session_starts_streak() {
        let mut s = PracticeStats::default();
        assert!(s.record_session(day(2024, 3, 4)));
        assert_eq!(s.streak, 1);
        assert_eq!(s.total_sessions, 1);
        assert_eq!(s.weekly_progress, 1);
    }

    #[test]
    fn test_same_day_counts_once() {
        let mut s = PracticeStats::default();
        s.record_session(day(2024, 3, 4));
        assert!(!s.record_session(day(2024, 3, 4)));
        assert_eq!(s.total_sessions, 1);
    }

    #[test]
    fn test_consecutive_days_extend_streak() {
        let mut s = PracticeStats::default();
        s.record_session(day(2024, 2, 28));
        s.record_session(day(2024, 2, 29));
        s.record_session(day(2024, 3, 1));
        assert_eq!(s.streak, 3);
    }

    #[test]
    fn test_gap_resets_streak() {
        let mut s = PracticeStats::default();
        s.record_session(day(2024, 3, 4));
        s.record_session(day(2024, 3, 5));
        s.record_session(day(2024, 3, 7));
        assert_eq!(s.streak, 1);
        assert_eq!(s.total_sessions, 3);
    }

    #[test]
    fn test_weekly_progress_caps_at_goal() {
        let mut s = PracticeStats::default();
        s.set_weekly_goal(2);
        // Mon..Wed of the same ISO week
        s.record_session(day(2024, 3, 4));
        s.record_session(day(2024, 3, 5));
        s.record_session(day(2024, 3, 6));
        assert_eq!(s.weekly_progress, 2);
        assert_eq!(s.weekly_percent(), 100);
    }

    #[test]
    fn test_weekly_progress_restarts_each_week() {
        let mut s = PracticeStats::default();
        s.record_session(day(2024, 3, 9)); // Saturday
        s.record_session(day(2024, 3, 10)); // Sunday
        s.record_session(day(2024, 3, 11)); // Monday, new ISO week
        assert_eq!(s.weekly_progress, 1);
        assert_eq!(s.streak, 3);
    }

    #[test]
    fn test_motivational_message_by_streak() {
        let mut s = PracticeStats::default();
        assert_eq!(s.motivational_message(), "Great start! Keep going!");
        s.streak = 2;
        assert_eq!(s.motivational_message(), "Building habits one day at a time!");
        s.streak = 500;
        assert_eq!(s.motivational_message(), "Keep up the fantastic work!");
    }

    #[test]
    fn test_missing_fields_default() {
        let s: PracticeStats = serde_json::from_str(r#"{"streak": 4}"#).unwrap();
        assert_eq!(s.streak, 4);
        assert_eq!(s.weekly_goal, DEFAULT_WEEKLY_GOAL);
        assert_eq!(s.last_practice, None);
    }
}
