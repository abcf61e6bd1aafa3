//! SkillSwap Common - gamification and social state for SkillSwap
//!
//! Points, levels, achievements and rewards for a skill-exchange app,
//! plus the local social state around them (notifications, feed,
//! communities, challenges, chat) and profile matching.

pub mod achievements;
pub mod app;
pub mod challenges;
pub mod chat;
pub mod communities;
pub mod config;
pub mod error;
pub mod feed;
pub mod gamification;
pub mod matching;
pub mod notifications;
pub mod progression;
pub mod provider;
pub mod rewards;
pub mod storage;

pub use app::{FeedItem, MatchSuggestion, SkillSwap, StatusSnapshot};
pub use config::SkillswapConfig;
pub use error::{Result, SkillswapError};
pub use gamification::{GamificationEngine, GamificationEvent, GamificationState, LoginOutcome};
pub use progression::{ActivityType, Level, Title};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageKey};
