//! Point-purchasable rewards.
//!
//! A reward moves `Locked -> Claimable -> Claimed` as the balance grows and
//! the user claims it. Claiming is one-way and deducts the cost.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reward {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: u64,
    /// Already claimed
    pub unlocked: bool,
    /// Offered at all right now
    pub available: bool,
}

impl Reward {
    fn new(id: &str, name: &str, description: &str, cost: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            cost,
            unlocked: false,
            available: true,
        }
    }

    pub fn status(&self, balance: u64) -> RewardStatus {
        if self.unlocked {
            RewardStatus::Claimed
        } else if !self.available {
            RewardStatus::Unavailable
        } else if balance >= self.cost {
            RewardStatus::Claimable
        } else {
            RewardStatus::Locked
        }
    }
}

/// Where a reward stands against the current balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardStatus {
    Locked,
    Claimable,
    Claimed,
    Unavailable,
}

impl RewardStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Claimable => "claimable",
            Self::Claimed => "claimed",
            Self::Unavailable => "unavailable",
        }
    }
}

/// Result of a claim attempt
///
/// Only `Claimed` changes state. The others are messages for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClaimOutcome {
    Claimed { reward_id: String, cost: u64, balance: u64 },
    InsufficientPoints { reward_id: String, cost: u64, balance: u64 },
    AlreadyClaimed { reward_id: String },
    Unavailable { reward_id: String },
}

impl ClaimOutcome {
    pub fn is_claimed(&self) -> bool {
        matches!(self, ClaimOutcome::Claimed { .. })
    }

    pub fn message(&self) -> String {
        match self {
            Self::Claimed { reward_id, cost, balance } => {
                format!("Claimed {} for {} points ({} left)", reward_id, cost, balance)
            }
            Self::InsufficientPoints { reward_id, cost, balance } => format!(
                "Not enough points for {}: needs {}, you have {} ({} more to go)",
                reward_id,
                cost,
                balance,
                cost.saturating_sub(*balance)
            ),
            Self::AlreadyClaimed { reward_id } => format!("{} is already yours", reward_id),
            Self::Unavailable { reward_id } => format!("{} is not available right now", reward_id),
        }
    }
}

/// All available rewards
pub fn all_rewards() -> Vec<Reward> {
    vec![
        Reward::new("profile_badge", "Profile Badge", "A badge next to your name", 100),
        Reward::new("custom_theme", "Custom Theme", "Unlock extra color themes", 250),
        Reward::new("priority_matching", "Priority Matching", "Appear first in match suggestions for a week", 500),
        Reward::new("featured_profile", "Featured Profile", "Get featured on the discover page", 750),
        Reward::new("mentor_voucher", "Mentor Session", "One free session with a community mentor", 1000),
    ]
}

/// Overlay stored claim state onto the current catalog
pub fn merge_with_catalog(stored: Vec<Reward>) -> Vec<Reward> {
    let mut merged = all_rewards();
    for saved in stored {
        match merged.iter_mut().find(|r| r.id == saved.id) {
            Some(current) => {
                current.unlocked = saved.unlocked;
                current.available = saved.available;
            }
            None => debug!("Dropping retired reward {}", saved.id),
        }
    }
    merged
}
