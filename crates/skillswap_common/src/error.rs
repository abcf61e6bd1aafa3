//! Error types for SkillSwap.
//!
//! Only genuine failures live here. Outcomes the user is meant to read
//! (not enough points, blocked conversation) are modeled as values.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillswapError {
    #[error("Unknown achievement: {0}")]
    UnknownAchievement(String),

    #[error("Unknown reward: {0}")]
    UnknownReward(String),

    #[error("Unknown challenge: {0}")]
    UnknownChallenge(String),

    #[error("Unknown activity type: {0}")]
    UnknownActivity(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Unknown community: {0}")]
    UnknownCommunity(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SkillswapError {
    /// Stable exit code for the CLI
    pub fn code(&self) -> i32 {
        match self {
            SkillswapError::UnknownAchievement(_)
            | SkillswapError::UnknownReward(_)
            | SkillswapError::UnknownChallenge(_)
            | SkillswapError::UnknownActivity(_)
            | SkillswapError::UnknownUser(_)
            | SkillswapError::UnknownCommunity(_) => 64,
            SkillswapError::Storage(_) | SkillswapError::Io(_) => 74,
            SkillswapError::Json(_) => 65,
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillswapError>;
