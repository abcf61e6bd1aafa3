//! Achievement badges.
//!
//! Achievements are earned, never bought. Each one either tracks progress
//! toward a target or is unlocked directly. Unlocking is one-way and the
//! engine grants the achievement's points exactly once.

use crate::progression::{achievement_progress, ActivityType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What moves an achievement forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracker {
    /// One step per recorded activity of this type
    Activity(ActivityType),
    /// Set to the current daily login streak
    LoginStreak,
    /// Unlocked explicitly, no progress
    Manual,
}

/// A one-time milestone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Points granted on unlock
    pub points: u64,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_progress: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl Achievement {
    fn new(id: &str, name: &str, description: &str, points: u64, target: Option<u32>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            points,
            unlocked: false,
            progress: target.map(|_| 0),
            max_progress: target,
            unlocked_at: None,
        }
    }

    /// Store `value` as progress, clamped to the target
    pub fn set_progress(&mut self, value: u32) {
        if let Some(max) = self.max_progress {
            self.progress = Some(value.min(max));
        }
    }

    /// True once tracked progress has reached the target
    pub fn is_complete(&self) -> bool {
        match (self.progress, self.max_progress) {
            (Some(progress), Some(max)) => progress >= max,
            _ => false,
        }
    }

    /// Lock -> unlocked. Returns false if it was already unlocked.
    pub fn unlock(&mut self, at: DateTime<Utc>) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        self.unlocked_at = Some(at);
        if let Some(max) = self.max_progress {
            self.progress = Some(max);
        }
        true
    }

    /// Progress as 0-100; unlocked achievements are always 100
    pub fn progress_percent(&self) -> u8 {
        if self.unlocked {
            return 100;
        }
        match (self.progress, self.max_progress) {
            (Some(progress), Some(max)) => achievement_progress(progress, max),
            _ => 0,
        }
    }

    pub fn tracker(&self) -> Tracker {
        tracker_for(&self.id)
    }
}

/// All available achievements
pub fn all_achievements() -> Vec<Achievement> {
    vec![
        // Getting started
        Achievement::new("early_adopter", "Early Adopter", "Join during the beta", 20, None),
        Achievement::new("first_connection", "First Connection", "Connect with another learner", 25, Some(1)),
        Achievement::new("skill_collector", "Skill Collector", "Add 5 skills to your profile", 40, Some(5)),

        // Sessions
        Achievement::new("first_session", "First Session", "Complete your first skill session", 50, Some(1)),
        Achievement::new("session_regular", "Session Regular", "Complete 5 skill sessions", 100, Some(5)),

        // Streaks
        Achievement::new("week_streak", "Week Warrior", "Log in 7 days in a row", 75, Some(7)),
        Achievement::new("month_streak", "Monthly Master", "Log in 30 days in a row", 250, Some(30)),

        // Community
        Achievement::new("community_joiner", "Community Joiner", "Join 3 communities", 30, Some(3)),
        Achievement::new("helpful_reviewer", "Helpful Reviewer", "Review 10 sessions", 60, Some(10)),
        Achievement::new("challenge_champion", "Challenge Champion", "Complete 5 challenges", 100, Some(5)),
    ]
}

fn tracker_for(id: &str) -> Tracker {
    match id {
        "first_connection" => Tracker::Activity(ActivityType::ConnectionMade),
        "skill_collector" => Tracker::Activity(ActivityType::SkillAdded),
        "first_session" | "session_regular" => Tracker::Activity(ActivityType::SessionCompleted),
        "week_streak" | "month_streak" => Tracker::LoginStreak,
        "community_joiner" => Tracker::Activity(ActivityType::CommunityJoined),
        "helpful_reviewer" => Tracker::Activity(ActivityType::ReviewGiven),
        "challenge_champion" => Tracker::Activity(ActivityType::ChallengeCompleted),
        _ => Tracker::Manual,
    }
}

/// Overlay stored state onto the current catalog
///
/// Catalog order and definitions win; stored ids no longer in the catalog are dropped.
pub fn merge_with_catalog(stored: Vec<Achievement>) -> Vec<Achievement> {
    let mut merged = all_achievements();
    for saved in stored {
        match merged.iter_mut().find(|a| a.id == saved.id) {
            Some(current) => {
                current.unlocked = saved.unlocked;
                current.unlocked_at = saved.unlocked_at;
                if let Some(progress) = saved.progress {
                    current.set_progress(progress);
                }
                if current.unlocked {
                    current.progress = current.max_progress;
                }
            }
            None => debug!("Dropping retired achievement {}", saved.id),
        }
    }
    merged
}

/// Format unlocked achievements as a single line
pub fn format_achievements(achievements: &[Achievement], max_display: usize) -> String {
    let unlocked: Vec<_> = achievements.iter().filter(|a| a.unlocked).collect();
    if unlocked.is_empty() {
        return String::new();
    }

    let names: Vec<&str> = unlocked.iter().take(max_display).map(|a| a.name.as_str()).collect();
    let line = names.join(", ");
    if unlocked.len() > max_display {
        format!("{} +{} more", line, unlocked.len() - max_display)
    } else {
        line
    }
}

/// Notification line for a fresh unlock
pub fn format_achievement_unlock(ach: &Achievement) -> String {
    format!("Achievement unlocked: {} - {} (+{} XP)", ach.name, ach.description, ach.points)
}
