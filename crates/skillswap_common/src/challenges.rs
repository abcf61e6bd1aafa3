//! Daily and weekly challenges with a completion streak.
//!
//! A challenge's progress belongs to a period (a day or an ISO week). When
//! the period rolls over, progress and completion reset. Completion pays the
//! challenge XP once per period.

use crate::error::{Result, SkillswapError};
use crate::storage::{load_json, save_json, KeyValueStore, StorageKey};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Daily,
    Weekly,
}

impl Cadence {
    /// Period key for `day`: `2026-03-01` or `2026-W09`
    pub fn period_of(&self, day: NaiveDate) -> String {
        match self {
            Cadence::Daily => day.format("%Y-%m-%d").to_string(),
            Cadence::Weekly => {
                let week = day.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub cadence: Cadence,
    pub target: u32,
    pub progress: u32,
    pub xp_reward: u64,
    pub completed: bool,
    /// Period the progress belongs to
    #[serde(default)]
    pub period: Option<String>,
    /// Sources already counted this period
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counted: Vec<String>,
}

impl Challenge {
    fn new(id: &str, title: &str, description: &str, cadence: Cadence, target: u32, xp_reward: u64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            cadence,
            target,
            progress: 0,
            xp_reward,
            completed: false,
            period: None,
            counted: Vec::new(),
        }
    }

    fn roll_over(&mut self, today: NaiveDate) {
        let current = self.cadence.period_of(today);
        if self.period.as_deref() != Some(current.as_str()) {
            if self.progress > 0 || self.completed {
                debug!("Resetting challenge {} for {}", self.id, current);
            }
            self.progress = 0;
            self.completed = false;
            self.counted.clear();
            self.period = Some(current);
        }
    }
}

/// Consecutive days with at least one completed challenge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeStreak {
    pub current: u32,
    pub best: u32,
    pub last_completed: Option<NaiveDate>,
}

impl ChallengeStreak {
    fn record_completion(&mut self, today: NaiveDate) {
        self.current = match self.last_completed {
            Some(last) if last == today => self.current,
            Some(last) if last.succ_opt() == Some(today) => self.current.saturating_add(1),
            _ => 1,
        };
        self.best = self.best.max(self.current);
        self.last_completed = Some(today);
    }

    /// Streak as of `today`: zero once a full day was missed
    pub fn current_as_of(&self, today: NaiveDate) -> u32 {
        match self.last_completed {
            Some(last) if last == today || last.succ_opt() == Some(today) => self.current,
            _ => 0,
        }
    }
}

/// Result of advancing a challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChallengeProgress {
    pub id: String,
    pub progress: u32,
    pub target: u32,
    /// True only on the call that completed it
    pub completed_now: bool,
    /// XP to award; non-zero only when `completed_now`
    pub xp_reward: u64,
    pub streak: u32,
}

/// All available challenges
pub fn all_challenges() -> Vec<Challenge> {
    vec![
        Challenge::new("daily_messages", "Chatterbox", "Send 5 messages today", Cadence::Daily, 5, 20),
        Challenge::new("daily_likes", "Cheerleader", "Like 3 posts today", Cadence::Daily, 3, 10),
        Challenge::new("daily_login", "Show Up", "Log in today", Cadence::Daily, 1, 5),
        Challenge::new("weekly_sessions", "Session Streak", "Complete 2 sessions this week", Cadence::Weekly, 2, 60),
        Challenge::new("weekly_community", "Explorer", "Join a community this week", Cadence::Weekly, 1, 25),
        Challenge::new("weekly_reviews", "Critic", "Review 3 sessions this week", Cadence::Weekly, 3, 40),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeBoard {
    challenges: Vec<Challenge>,
    streak: ChallengeStreak,
}

impl Default for ChallengeBoard {
    fn default() -> Self {
        Self {
            challenges: all_challenges(),
            streak: ChallengeStreak::default(),
        }
    }
}

impl ChallengeBoard {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let stored: Vec<Challenge> = load_json(store, StorageKey::Challenges);
        let mut challenges = all_challenges();
        for saved in stored {
            if let Some(current) = challenges.iter_mut().find(|c| c.id == saved.id) {
                current.progress = saved.progress.min(current.target);
                current.completed = saved.completed;
                current.period = saved.period;
                current.counted = saved.counted;
            }
        }
        Self {
            challenges,
            streak: load_json(store, StorageKey::ChallengeStreak),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        save_json(store, StorageKey::Challenges, &self.challenges);
        save_json(store, StorageKey::ChallengeStreak, &self.streak);
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn challenge(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    pub fn streak(&self) -> &ChallengeStreak {
        &self.streak
    }

    /// Reset every challenge whose period has ended
    pub fn refresh(&mut self, today: NaiveDate) {
        for challenge in &mut self.challenges {
            challenge.roll_over(today);
        }
    }

    /// Add `amount` to a challenge's progress on `today`
    pub fn advance(&mut self, id: &str, amount: u32, today: NaiveDate) -> Result<ChallengeProgress> {
        self.apply(id, amount, None, today)
    }

    /// Add one step for `source`, counting each source once per period
    pub fn advance_distinct(&mut self, id: &str, source: &str, today: NaiveDate) -> Result<ChallengeProgress> {
        self.apply(id, 1, Some(source), today)
    }

    fn apply(&mut self, id: &str, amount: u32, source: Option<&str>, today: NaiveDate) -> Result<ChallengeProgress> {
        let challenge = self
            .challenges
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| SkillswapError::UnknownChallenge(id.to_string()))?;

        challenge.roll_over(today);

        let repeat = match source {
            Some(source) if challenge.counted.iter().any(|c| c == source) => {
                debug!("{} already counted for {}", source, challenge.id);
                true
            }
            Some(source) => {
                challenge.counted.push(source.to_string());
                false
            }
            None => false,
        };

        let mut completed_now = false;
        if !challenge.completed && !repeat {
            challenge.progress = challenge.progress.saturating_add(amount).min(challenge.target);
            if challenge.progress >= challenge.target {
                challenge.completed = true;
                completed_now = true;
            }
        }

        let mut result = ChallengeProgress {
            id: challenge.id.clone(),
            progress: challenge.progress,
            target: challenge.target,
            completed_now,
            xp_reward: if completed_now { challenge.xp_reward } else { 0 },
            streak: 0,
        };

        if completed_now {
            self.streak.record_completion(today);
        }
        result.streak = self.streak.current_as_of(today);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn test_period_keys() {
        assert_eq!(Cadence::Daily.period_of(day(3, 1)), "2026-03-01");
        // 2026-03-01 is a Sunday, end of ISO week 9
        assert_eq!(Cadence::Weekly.period_of(day(3, 1)), "2026-W09");
        assert_eq!(Cadence::Weekly.period_of(day(3, 2)), "2026-W10");
    }

    #[test]
    fn test_completion_pays_once() {
        let mut board = ChallengeBoard::default();
        let p = board.advance("daily_likes", 2, day(3, 2)).unwrap();
        assert!(!p.completed_now);
        assert_eq!(p.xp_reward, 0);

        let p = board.advance("daily_likes", 5, day(3, 2)).unwrap();
        assert!(p.completed_now);
        assert_eq!(p.progress, 3);
        assert_eq!(p.xp_reward, 10);
        assert_eq!(p.streak, 1);

        let p = board.advance("daily_likes", 1, day(3, 2)).unwrap();
        assert!(!p.completed_now);
        assert_eq!(p.xp_reward, 0);
    }

    #[test]
    fn test_distinct_sources_count_once_per_period() {
        let mut board = ChallengeBoard::default();
        board.advance_distinct("daily_likes", "p1", day(3, 2)).unwrap();
        let p = board.advance_distinct("daily_likes", "p1", day(3, 2)).unwrap();
        assert_eq!(p.progress, 1);

        board.advance_distinct("daily_likes", "p2", day(3, 2)).unwrap();
        let p = board.advance_distinct("daily_likes", "p3", day(3, 2)).unwrap();
        assert!(p.completed_now);

        // A new day counts p1 again
        let p = board.advance_distinct("daily_likes", "p1", day(3, 3)).unwrap();
        assert_eq!(p.progress, 1);
        assert_eq!(board.challenge("daily_likes").unwrap().counted, vec!["p1".to_string()]);
    }

    #[test]
    fn test_daily_rolls_over() {
        let mut board = ChallengeBoard::default();
        board.advance("daily_login", 1, day(3, 2)).unwrap();
        assert!(board.challenge("daily_login").unwrap().completed);

        board.refresh(day(3, 3));
        let c = board.challenge("daily_login").unwrap();
        assert!(!c.completed);
        assert_eq!(c.progress, 0);
    }

    #[test]
    fn test_weekly_survives_within_week() {
        let mut board = ChallengeBoard::default();
        board.advance("weekly_sessions", 1, day(3, 2)).unwrap();
        let p = board.advance("weekly_sessions", 1, day(3, 6)).unwrap();
        assert!(p.completed_now);
    }

    #[test]
    fn test_streak_counts_days() {
        let mut board = ChallengeBoard::default();
        board.advance("daily_login", 1, day(3, 2)).unwrap();
        board.advance("daily_login", 1, day(3, 3)).unwrap();
        let p = board.advance("daily_login", 1, day(3, 4)).unwrap();
        assert_eq!(p.streak, 3);

        // Missed 3-5, streak restarts
        let p = board.advance("daily_login", 1, day(3, 6)).unwrap();
        assert_eq!(p.streak, 1);
        assert_eq!(board.streak().best, 3);
        assert_eq!(board.streak().current_as_of(day(3, 9)), 0);
    }

    #[test]
    fn test_unknown_challenge() {
        let mut board = ChallengeBoard::default();
        assert!(matches!(
            board.advance("moonwalk", 1, day(3, 2)),
            Err(SkillswapError::UnknownChallenge(_))
        ));
    }

    #[test]
    fn test_persisted() {
        let mut store = MemoryStore::new();
        let mut board = ChallengeBoard::default();
        board.advance("weekly_reviews", 2, day(3, 2)).unwrap();
        board.advance("daily_login", 1, day(3, 2)).unwrap();
        board.save(&mut store);

        let loaded = ChallengeBoard::load(&store);
        assert_eq!(loaded, board);
        assert_eq!(loaded.challenge("weekly_reviews").unwrap().progress, 2);
        assert_eq!(loaded.streak().current, 1);
    }
}
