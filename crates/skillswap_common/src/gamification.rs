//! Gamification engine: points, levels, achievements, rewards, login streak.
//!
//! Every command mutates `GamificationState`, persists the keys it touched
//! and queues `GamificationEvent`s. Callers drain the queue once the command
//! has returned and turn events into side effects (notifications).
//!
//! ## Invariants
//!
//! - Points only grow, except through a successful reward claim
//! - Level is always derived from points, never stored
//! - An achievement unlocks once and pays its points once
//! - A reward is claimed at most once, and only with points >= cost

use crate::achievements::{self, Achievement, Tracker};
use crate::error::{Result, SkillswapError};
use crate::progression::{activity_xp, level_progress, user_level, xp_to_next_level, ActivityType, Level};
use crate::rewards::{self, ClaimOutcome, Reward, RewardStatus};
use crate::storage::{load_json, save_json, try_load_json, KeyValueStore, StorageKey};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Something that happened during a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GamificationEvent {
    PointsAwarded { amount: u64, reason: String, balance: u64 },
    LevelUp { from: u32, to: u32 },
    AchievementUnlocked { id: String, name: String, points: u64 },
    RewardClaimed { id: String, name: String, cost: u64 },
    StreakUpdated { streak: u32 },
}

/// Persisted gamification state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GamificationState {
    pub points: u64,
    pub achievements: Vec<Achievement>,
    pub rewards: Vec<Reward>,
    pub streak: u32,
    pub last_login: Option<NaiveDate>,
}

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            points: 0,
            achievements: achievements::all_achievements(),
            rewards: rewards::all_rewards(),
            streak: 0,
            last_login: None,
        }
    }
}

/// Result of recording a daily login
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub streak: u32,
    pub xp_awarded: u64,
    /// False when this day was already counted
    pub counted: bool,
}

pub struct GamificationEngine<S: KeyValueStore> {
    store: S,
    state: GamificationState,
    events: VecDeque<GamificationEvent>,
    /// Highest level already announced this session
    peak_level: u32,
}

impl<S: KeyValueStore> GamificationEngine<S> {
    /// Load state from `store`, defaulting each key that is missing or corrupt
    pub fn load(store: S) -> Self {
        let state = GamificationState {
            points: load_json(&store, StorageKey::Points),
            achievements: achievements::merge_with_catalog(load_json(&store, StorageKey::Achievements)),
            rewards: rewards::merge_with_catalog(load_json(&store, StorageKey::Rewards)),
            streak: load_json(&store, StorageKey::Streak),
            last_login: try_load_json::<Option<NaiveDate>, _>(&store, StorageKey::LastLogin).flatten(),
        };
        debug!(
            "Loaded gamification state: {} points, streak {}",
            state.points, state.streak
        );
        let peak_level = user_level(state.points);
        Self {
            store,
            state,
            events: VecDeque::new(),
            peak_level,
        }
    }

    pub fn state(&self) -> &GamificationState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn points(&self) -> u64 {
        self.state.points
    }

    pub fn level(&self) -> Level {
        Level::from_xp(self.state.points)
    }

    pub fn level_progress(&self) -> f64 {
        level_progress(self.state.points)
    }

    pub fn xp_to_next_level(&self) -> u64 {
        xp_to_next_level(self.state.points)
    }

    pub fn streak(&self) -> u32 {
        self.state.streak
    }

    pub fn last_login(&self) -> Option<NaiveDate> {
        self.state.last_login
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.state.achievements
    }

    pub fn achievement(&self, id: &str) -> Option<&Achievement> {
        self.state.achievements.iter().find(|a| a.id == id)
    }

    pub fn rewards(&self) -> &[Reward] {
        &self.state.rewards
    }

    pub fn reward_status(&self, id: &str) -> Result<RewardStatus> {
        self.state
            .rewards
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status(self.state.points))
            .ok_or_else(|| SkillswapError::UnknownReward(id.to_string()))
    }

    /// Take every queued event, oldest first
    pub fn drain_events(&mut self) -> Vec<GamificationEvent> {
        self.events.drain(..).collect()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Add points and announce any level crossed. Returns the new balance.
    pub fn add_points(&mut self, amount: u64, reason: &str) -> u64 {
        if amount == 0 {
            return self.state.points;
        }

        let before = user_level(self.state.points);
        self.state.points = self.state.points.saturating_add(amount);
        self.persist(StorageKey::Points);

        debug!("+{} points ({}), balance {}", amount, reason, self.state.points);
        self.events.push_back(GamificationEvent::PointsAwarded {
            amount,
            reason: reason.to_string(),
            balance: self.state.points,
        });

        let after = user_level(self.state.points);
        if after > before && after > self.peak_level {
            info!("Level up: {} -> {}", before, after);
            self.events.push_back(GamificationEvent::LevelUp { from: before, to: after });
            self.peak_level = after;
        }

        self.state.points
    }

    /// Unlock an achievement and pay its points.
    /// Returns false if it was already unlocked.
    pub fn unlock_achievement(&mut self, id: &str) -> Result<bool> {
        let now = Utc::now();
        let ach = self
            .state
            .achievements
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| SkillswapError::UnknownAchievement(id.to_string()))?;

        if !ach.unlock(now) {
            return Ok(false);
        }
        let (name, points) = (ach.name.clone(), ach.points);
        self.persist(StorageKey::Achievements);

        info!("Achievement unlocked: {}", id);
        self.events.push_back(GamificationEvent::AchievementUnlocked {
            id: id.to_string(),
            name,
            points,
        });
        self.add_points(points, &format!("achievement:{}", id));
        Ok(true)
    }

    /// Set tracked progress; reaching the target unlocks.
    /// Returns true if this call unlocked the achievement.
    pub fn update_achievement_progress(&mut self, id: &str, progress: u32) -> Result<bool> {
        let ach = self
            .state
            .achievements
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| SkillswapError::UnknownAchievement(id.to_string()))?;

        if ach.unlocked || ach.max_progress.is_none() {
            return Ok(false);
        }
        ach.set_progress(progress);
        let complete = ach.is_complete();
        self.persist(StorageKey::Achievements);

        if complete {
            self.unlock_achievement(id)
        } else {
            Ok(false)
        }
    }

    /// Advance tracked progress by `by` steps
    pub fn increment_achievement(&mut self, id: &str, by: u32) -> Result<bool> {
        let current = self
            .achievement(id)
            .ok_or_else(|| SkillswapError::UnknownAchievement(id.to_string()))?
            .progress
            .unwrap_or(0);
        self.update_achievement_progress(id, current.saturating_add(by))
    }

    /// Try to buy a reward with points
    pub fn claim_reward(&mut self, id: &str) -> Result<ClaimOutcome> {
        let balance = self.state.points;
        let reward = self
            .state
            .rewards
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| SkillswapError::UnknownReward(id.to_string()))?;

        let reward_id = reward.id.clone();
        let outcome = match reward.status(balance) {
            RewardStatus::Claimed => ClaimOutcome::AlreadyClaimed { reward_id },
            RewardStatus::Unavailable => ClaimOutcome::Unavailable { reward_id },
            RewardStatus::Locked => ClaimOutcome::InsufficientPoints {
                reward_id,
                cost: reward.cost,
                balance,
            },
            RewardStatus::Claimable => {
                reward.unlocked = true;
                let (name, cost) = (reward.name.clone(), reward.cost);
                self.state.points = balance - cost;
                self.persist(StorageKey::Rewards);
                self.persist(StorageKey::Points);

                info!("Reward claimed: {} for {} points", reward_id, cost);
                self.events.push_back(GamificationEvent::RewardClaimed {
                    id: reward_id.clone(),
                    name,
                    cost,
                });
                ClaimOutcome::Claimed {
                    reward_id,
                    cost,
                    balance: self.state.points,
                }
            }
        };

        if !outcome.is_claimed() {
            debug!("Claim rejected: {}", outcome.message());
        }
        Ok(outcome)
    }

    /// Count a login on `today` and pay the daily XP
    ///
    /// Same day: no change. Next day: streak grows. Gap or first login: streak restarts at 1.
    pub fn record_daily_login(&mut self, today: NaiveDate) -> LoginOutcome {
        let streak = match self.state.last_login {
            Some(last) if last >= today => {
                return LoginOutcome {
                    streak: self.state.streak,
                    xp_awarded: 0,
                    counted: false,
                };
            }
            Some(last) if last.succ_opt() == Some(today) => self.state.streak.saturating_add(1),
            _ => 1,
        };

        self.state.streak = streak;
        self.state.last_login = Some(today);
        self.persist(StorageKey::Streak);
        self.persist(StorageKey::LastLogin);
        self.events.push_back(GamificationEvent::StreakUpdated { streak });

        let xp = activity_xp(ActivityType::DailyLogin, streak, 1);
        self.add_points(xp, ActivityType::DailyLogin.as_str());
        self.advance_streak_trackers(streak);

        LoginOutcome {
            streak,
            xp_awarded: xp,
            counted: true,
        }
    }

    /// Pay XP for an activity at the current streak and advance linked achievements
    pub fn record_activity(&mut self, activity: ActivityType, quality: u8) -> u64 {
        let xp = activity_xp(activity, self.state.streak, quality);
        self.add_points(xp, activity.as_str());

        let linked: Vec<String> = self
            .state
            .achievements
            .iter()
            .filter(|a| !a.unlocked && a.tracker() == Tracker::Activity(activity))
            .map(|a| a.id.clone())
            .collect();
        for id in linked {
            if let Err(e) = self.increment_achievement(&id, 1) {
                debug!("Skipping tracker {}: {}", id, e);
            }
        }
        xp
    }

    fn advance_streak_trackers(&mut self, streak: u32) {
        let linked: Vec<(String, u32)> = self
            .state
            .achievements
            .iter()
            .filter(|a| !a.unlocked && a.tracker() == Tracker::LoginStreak)
            .map(|a| (a.id.clone(), a.progress.unwrap_or(0)))
            .collect();
        for (id, best) in linked {
            if let Err(e) = self.update_achievement_progress(&id, best.max(streak)) {
                debug!("Skipping tracker {}: {}", id, e);
            }
        }
    }

    fn persist(&mut self, key: StorageKey) {
        let store = &mut self.store;
        match key {
            StorageKey::Points => save_json(store, key, &self.state.points),
            StorageKey::Achievements => save_json(store, key, &self.state.achievements),
            StorageKey::Rewards => save_json(store, key, &self.state.rewards),
            StorageKey::Streak => save_json(store, key, &self.state.streak),
            StorageKey::LastLogin => save_json(store, key, &self.state.last_login),
            other => debug!("{} is not gamification state", other),
        }
    }
}
