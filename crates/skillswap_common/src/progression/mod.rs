//! Progression Module
//!
//! Leveling for SkillSwap users: XP curve, levels, titles and activity XP.
//!
//! ## Level System
//!
//! - Levels 1-99 on a geometric curve (x1.5 per level)
//! - Titles based on level bands
//!
//! ## Activity XP
//!
//! - Base XP per activity type
//! - Streak bonus (+0.1 per 5 days, max x2.0)
//! - Quality bonus (+0.1 per rating step, max x1.5)

pub mod activity;
pub mod levels;

pub use activity::{
    achievement_progress, activity_xp, quality_multiplier, streak_multiplier, ActivityType,
};
pub use levels::{
    level_progress, level_table, required_xp, user_level, user_level_estimate, xp_to_next_level,
    Level, LevelRow, Title, MAX_LEVEL, TITLE_BANDS,
};
