//! Activity XP
//!
//! Base XP per activity, scaled by the login streak and by the quality of
//! the interaction (session rating, review score).
//!
//! | Activity           | Base XP |
//! |--------------------|---------|
//! | message_sent       | 2       |
//! | comment_posted     | 3       |
//! | daily_login        | 5       |
//! | post_created       | 10      |
//! | review_given       | 10      |
//! | community_joined   | 10      |
//! | connection_made    | 15      |
//! | skill_added        | 20      |
//! | session_scheduled  | 20      |
//! | challenge_completed| 30      |
//! | session_completed  | 50      |

use crate::error::SkillswapError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Streak days per +0.1 bonus step
const STREAK_STEP_DAYS: u32 = 5;
const STREAK_STEP_BONUS: f64 = 0.1;
const MAX_STREAK_MULTIPLIER: f64 = 2.0;

const QUALITY_STEP_BONUS: f64 = 0.1;
const MAX_QUALITY_MULTIPLIER: f64 = 1.5;

/// Things a user does that earn XP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    DailyLogin,
    MessageSent,
    CommentPosted,
    PostCreated,
    ReviewGiven,
    CommunityJoined,
    ConnectionMade,
    SkillAdded,
    SessionScheduled,
    ChallengeCompleted,
    SessionCompleted,
}

impl ActivityType {
    pub const ALL: [ActivityType; 11] = [
        ActivityType::DailyLogin,
        ActivityType::MessageSent,
        ActivityType::CommentPosted,
        ActivityType::PostCreated,
        ActivityType::ReviewGiven,
        ActivityType::CommunityJoined,
        ActivityType::ConnectionMade,
        ActivityType::SkillAdded,
        ActivityType::SessionScheduled,
        ActivityType::ChallengeCompleted,
        ActivityType::SessionCompleted,
    ];

    /// Base XP before any multiplier
    pub fn base_xp(&self) -> u64 {
        match self {
            Self::DailyLogin => 5,
            Self::MessageSent => 2,
            Self::CommentPosted => 3,
            Self::PostCreated => 10,
            Self::ReviewGiven => 10,
            Self::CommunityJoined => 10,
            Self::ConnectionMade => 15,
            Self::SkillAdded => 20,
            Self::SessionScheduled => 20,
            Self::ChallengeCompleted => 30,
            Self::SessionCompleted => 50,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DailyLogin => "daily_login",
            Self::MessageSent => "message_sent",
            Self::CommentPosted => "comment_posted",
            Self::PostCreated => "post_created",
            Self::ReviewGiven => "review_given",
            Self::CommunityJoined => "community_joined",
            Self::ConnectionMade => "connection_made",
            Self::SkillAdded => "skill_added",
            Self::SessionScheduled => "session_scheduled",
            Self::ChallengeCompleted => "challenge_completed",
            Self::SessionCompleted => "session_completed",
        }
    }
}

impl FromStr for ActivityType {
    type Err = SkillswapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        ActivityType::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == normalized)
            .ok_or_else(|| SkillswapError::UnknownActivity(s.to_string()))
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1.0, plus 0.1 for every full 5 days of streak, capped at 2.0
pub fn streak_multiplier(streak_days: u32) -> f64 {
    let steps = (streak_days / STREAK_STEP_DAYS) as f64;
    (1.0 + steps * STREAK_STEP_BONUS).min(MAX_STREAK_MULTIPLIER)
}

/// 1.0 at quality 1, +0.1 per step, capped at 1.5
pub fn quality_multiplier(quality: u8) -> f64 {
    let steps = quality.saturating_sub(1) as f64;
    (1.0 + steps * QUALITY_STEP_BONUS).clamp(1.0, MAX_QUALITY_MULTIPLIER)
}

/// XP earned for one activity
pub fn activity_xp(activity: ActivityType, streak_days: u32, quality: u8) -> u64 {
    let xp = activity.base_xp() as f64 * streak_multiplier(streak_days) * quality_multiplier(quality);
    xp.round() as u64
}

/// Completion percentage of a tracked achievement, clamped to 100
///
/// A zero target has nothing to measure against and reports 0.
pub fn achievement_progress(current: u32, target: u32) -> u8 {
    if target == 0 {
        return 0;
    }
    let pct = (current as f64 / target as f64 * 100.0).round();
    pct.min(100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_login_base_case() {
        assert_eq!(activity_xp(ActivityType::DailyLogin, 0, 1), 5);
    }

    #[test]
    fn test_session_completed_with_bonuses() {
        // round(50 * 1.2 * 1.4)
        assert_eq!(activity_xp(ActivityType::SessionCompleted, 10, 5), 84);
    }

    #[test]
    fn test_streak_multiplier_steps() {
        assert_eq!(streak_multiplier(0), 1.0);
        assert_eq!(streak_multiplier(4), 1.0);
        assert!((streak_multiplier(5) - 1.1).abs() < 1e-9);
        assert!((streak_multiplier(14) - 1.2).abs() < 1e-9);
        assert_eq!(streak_multiplier(50), 2.0);
        assert_eq!(streak_multiplier(365), 2.0);
    }

    #[test]
    fn test_quality_multiplier_bounds() {
        assert_eq!(quality_multiplier(0), 1.0);
        assert_eq!(quality_multiplier(1), 1.0);
        assert!((quality_multiplier(3) - 1.2).abs() < 1e-9);
        assert!((quality_multiplier(5) - 1.4).abs() < 1e-9);
        assert_eq!(quality_multiplier(9), 1.5);
    }

    #[test]
    fn test_achievement_progress() {
        assert_eq!(achievement_progress(5, 5), 100);
        assert_eq!(achievement_progress(0, 5), 0);
        assert_eq!(achievement_progress(6, 5), 100);
        assert_eq!(achievement_progress(1, 3), 33);
        assert_eq!(achievement_progress(2, 3), 67);
        assert_eq!(achievement_progress(3, 0), 0);
    }

    #[test]
    fn test_activity_parse() {
        assert_eq!("daily_login".parse::<ActivityType>().unwrap(), ActivityType::DailyLogin);
        assert_eq!(
            "Session-Completed".parse::<ActivityType>().unwrap(),
            ActivityType::SessionCompleted
        );
        assert!("teleport".parse::<ActivityType>().is_err());
    }

    #[test]
    fn test_every_activity_round_trips_name() {
        for activity in ActivityType::ALL {
            assert_eq!(activity.as_str().parse::<ActivityType>().unwrap(), activity);
        }
    }
}
