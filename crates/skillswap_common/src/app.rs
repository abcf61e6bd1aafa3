//! Application state for one local user.
//!
//! `SkillSwap` composes the gamification engine with the social state
//! (notifications, feed, communities, challenges, chat) and a data provider.
//! Each command applies its state change and persists it, then
//! `process_events` turns queued gamification events into notifications.

use crate::achievements::format_achievement_unlock;
use crate::challenges::{ChallengeBoard, ChallengeProgress};
use crate::chat::{ChatThread, SendOutcome};
use crate::communities::Communities;
use crate::error::{Result, SkillswapError};
use crate::feed::FeedState;
use crate::gamification::{GamificationEngine, GamificationEvent, LoginOutcome};
use crate::matching::{match_breakdown, MatchBreakdown};
use crate::notifications::{NotificationCenter, NotificationKind, NotificationSettings};
use crate::progression::{ActivityType, Title};
use crate::provider::{DataProvider, Post, UserProfile};
use crate::rewards::ClaimOutcome;
use crate::storage::KeyValueStore;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// One-line summary of the user's progress
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub user_id: String,
    pub points: u64,
    pub level: u32,
    pub title: String,
    pub level_progress: f64,
    pub xp_to_next_level: u64,
    pub streak: u32,
    pub achievements_unlocked: usize,
    pub achievements_total: usize,
    pub rewards_claimed: usize,
    pub unread_notifications: usize,
    pub communities: usize,
    pub best_challenge_streak: u32,
}

/// A feed post as this user sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedItem {
    pub post: Post,
    pub likes: u32,
    pub liked: bool,
    pub saved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSuggestion {
    pub user_id: String,
    pub name: String,
    pub percentage: u8,
}

pub struct SkillSwap<S: KeyValueStore, P: DataProvider> {
    user_id: String,
    engine: GamificationEngine<S>,
    notifications: NotificationCenter,
    feed: FeedState,
    communities: Communities,
    challenges: ChallengeBoard,
    threads: HashMap<String, ChatThread>,
    provider: P,
    outbox: Vec<GamificationEvent>,
}

/// Challenge fed by each activity, if any
fn challenge_for(activity: ActivityType) -> Option<&'static str> {
    match activity {
        ActivityType::MessageSent => Some("daily_messages"),
        ActivityType::SessionCompleted => Some("weekly_sessions"),
        ActivityType::CommunityJoined => Some("weekly_community"),
        ActivityType::ReviewGiven => Some("weekly_reviews"),
        _ => None,
    }
}

impl<S: KeyValueStore, P: DataProvider> SkillSwap<S, P> {
    /// Load all local state for `user_id` from `store`
    pub fn open(store: S, provider: P, user_id: &str, notification_defaults: NotificationSettings) -> Self {
        let notifications = NotificationCenter::load(&store, notification_defaults);
        let feed = FeedState::load(&store);
        let communities = Communities::load(&store);
        let challenges = ChallengeBoard::load(&store);
        let engine = GamificationEngine::load(store);

        Self {
            user_id: user_id.to_string(),
            engine,
            notifications,
            feed,
            communities,
            challenges,
            threads: HashMap::new(),
            provider,
            outbox: Vec::new(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn engine(&self) -> &GamificationEngine<S> {
        &self.engine
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn communities(&self) -> &Communities {
        &self.communities
    }

    pub fn challenges(&self) -> &ChallengeBoard {
        &self.challenges
    }

    pub fn feed_state(&self) -> &FeedState {
        &self.feed
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn into_store(self) -> S {
        self.engine.into_store()
    }

    /// Events handled since the last call, oldest first
    pub fn take_events(&mut self) -> Vec<GamificationEvent> {
        std::mem::take(&mut self.outbox)
    }

    pub fn status(&self) -> StatusSnapshot {
        let level = self.engine.level();
        let achievements = self.engine.achievements();
        StatusSnapshot {
            user_id: self.user_id.clone(),
            points: self.engine.points(),
            level: level.value(),
            title: level.title().to_string(),
            level_progress: self.engine.level_progress(),
            xp_to_next_level: self.engine.xp_to_next_level(),
            streak: self.engine.streak(),
            achievements_unlocked: achievements.iter().filter(|a| a.unlocked).count(),
            achievements_total: achievements.len(),
            rewards_claimed: self.engine.rewards().iter().filter(|r| r.unlocked).count(),
            unread_notifications: self.notifications.unread_count(),
            communities: self.communities.joined().len(),
            best_challenge_streak: self.challenges.streak().best,
        }
    }

    // ========== Gamification commands ==========

    pub fn login(&mut self, today: NaiveDate) -> LoginOutcome {
        let outcome = self.engine.record_daily_login(today);
        if outcome.counted {
            self.advance_challenge_quietly("daily_login", None, today);
        }
        self.process_events();
        outcome
    }

    /// Record an activity and feed its challenge. Returns the activity XP.
    pub fn record_activity(&mut self, activity: ActivityType, quality: u8, today: NaiveDate) -> u64 {
        let xp = self.engine.record_activity(activity, quality);
        if let Some(challenge) = challenge_for(activity) {
            self.advance_challenge_quietly(challenge, None, today);
        }
        self.process_events();
        xp
    }

    pub fn add_points(&mut self, amount: u64, reason: &str) -> u64 {
        let balance = self.engine.add_points(amount, reason);
        self.process_events();
        balance
    }

    pub fn unlock_achievement(&mut self, id: &str) -> Result<bool> {
        let unlocked = self.engine.unlock_achievement(id)?;
        self.process_events();
        Ok(unlocked)
    }

    pub fn claim_reward(&mut self, id: &str) -> Result<ClaimOutcome> {
        let outcome = self.engine.claim_reward(id)?;
        self.process_events();
        Ok(outcome)
    }

    /// Reset challenges whose period ended before `today`
    pub fn refresh_challenges(&mut self, today: NaiveDate) {
        self.challenges.refresh(today);
        self.challenges.save(self.engine.store_mut());
    }

    pub fn advance_challenge(&mut self, id: &str, amount: u32, today: NaiveDate) -> Result<ChallengeProgress> {
        let progress = self.apply_challenge(id, amount, None, today)?;
        self.process_events();
        Ok(progress)
    }

    fn apply_challenge(
        &mut self,
        id: &str,
        amount: u32,
        source: Option<&str>,
        today: NaiveDate,
    ) -> Result<ChallengeProgress> {
        let progress = match source {
            Some(source) => self.challenges.advance_distinct(id, source, today)?,
            None => self.challenges.advance(id, amount, today)?,
        };
        self.challenges.save(self.engine.store_mut());

        if progress.completed_now {
            let title = self
                .challenges
                .challenge(id)
                .map(|c| c.title.clone())
                .unwrap_or_else(|| id.to_string());
            self.notifications.push(
                NotificationKind::Challenge,
                "Challenge complete",
                &format!("{} done (+{} XP)", title, progress.xp_reward),
            );
            self.engine.add_points(progress.xp_reward, &format!("challenge:{}", id));
            self.engine.increment_achievement("challenge_champion", 1)?;
        }
        Ok(progress)
    }

    fn advance_challenge_quietly(&mut self, id: &str, source: Option<&str>, today: NaiveDate) {
        if let Err(e) = self.apply_challenge(id, 1, source, today) {
            debug!("Challenge {} not advanced: {}", id, e);
        }
    }

    /// Turn queued gamification events into notifications
    pub fn process_events(&mut self) {
        for event in self.engine.drain_events() {
            match &event {
                GamificationEvent::LevelUp { to, .. } => {
                    self.notifications.push(
                        NotificationKind::LevelUp,
                        "Level up!",
                        &format!("You reached level {} ({})", to, Title::from_level(*to)),
                    );
                }
                GamificationEvent::AchievementUnlocked { id, .. } => {
                    if let Some(ach) = self.engine.achievement(id) {
                        let body = format_achievement_unlock(ach);
                        self.notifications.push(NotificationKind::Achievement, &ach.name, &body);
                    }
                }
                GamificationEvent::RewardClaimed { name, cost, .. } => {
                    self.notifications.push(
                        NotificationKind::Reward,
                        "Reward claimed",
                        &format!("{} is yours for {} points", name, cost),
                    );
                }
                GamificationEvent::PointsAwarded { .. } | GamificationEvent::StreakUpdated { .. } => {}
            }
            self.outbox.push(event);
        }
        self.notifications.save(self.engine.store_mut());
    }

    // ========== Social commands ==========

    /// Join a community known to the provider. Returns true if newly joined.
    pub fn join_community(&mut self, id: &str, today: NaiveDate) -> Result<bool> {
        let community = self
            .provider
            .fetch_community(id)
            .ok_or_else(|| SkillswapError::UnknownCommunity(id.to_string()))?;

        if !self.communities.join(id) {
            return Ok(false);
        }
        self.communities.save(self.engine.store_mut());
        self.notifications.push(
            NotificationKind::Community,
            "Welcome!",
            &format!("You joined {}", community.name),
        );
        self.record_activity(ActivityType::CommunityJoined, 1, today);
        Ok(true)
    }

    pub fn leave_community(&mut self, id: &str) -> bool {
        let left = self.communities.leave(id);
        if left {
            self.communities.save(self.engine.store_mut());
        }
        left
    }

    /// Flip a like. Each post feeds the daily likes challenge once per day.
    pub fn toggle_like(&mut self, post_id: &str, today: NaiveDate) -> bool {
        let liked = self.feed.toggle_like(post_id);
        self.feed.save(self.engine.store_mut());
        if liked {
            self.advance_challenge_quietly("daily_likes", Some(post_id), today);
            self.process_events();
        }
        liked
    }

    pub fn toggle_save(&mut self, post_id: &str) -> bool {
        let saved = self.feed.toggle_save(post_id);
        self.feed.save(self.engine.store_mut());
        saved
    }

    pub fn feed(&self) -> Vec<FeedItem> {
        self.provider
            .fetch_feed()
            .into_iter()
            .map(|post| FeedItem {
                likes: self.feed.like_count(&post.id, post.likes),
                liked: self.feed.is_liked(&post.id),
                saved: self.feed.is_saved(&post.id),
                post,
            })
            .collect()
    }

    /// Send a chat message; a blocked partner yields an informational outcome
    pub fn send_message(&mut self, partner_id: &str, text: &str, today: NaiveDate) -> Result<SendOutcome> {
        if self.provider.fetch_user(partner_id).is_none() {
            return Err(SkillswapError::UnknownUser(partner_id.to_string()));
        }
        let blocked = self
            .provider
            .fetch_user(&self.user_id)
            .map(|me| me.has_blocked(partner_id))
            .unwrap_or(false);

        let thread = self
            .threads
            .entry(partner_id.to_string())
            .or_insert_with(|| ChatThread::new(&self.user_id, partner_id));
        if blocked {
            thread.block();
        }

        let outcome = thread.send(text);
        if matches!(outcome, SendOutcome::Sent(_)) {
            self.record_activity(ActivityType::MessageSent, 1, today);
        }
        Ok(outcome)
    }

    pub fn thread(&self, partner_id: &str) -> Option<&ChatThread> {
        self.threads.get(partner_id)
    }

    // ========== Matching ==========

    fn profile(&self, id: &str) -> Result<UserProfile> {
        self.provider
            .fetch_user(id)
            .ok_or_else(|| SkillswapError::UnknownUser(id.to_string()))
    }

    pub fn match_between(&self, user_id: &str, other_id: &str) -> Result<MatchBreakdown> {
        let user = self.profile(user_id)?;
        let other = self.profile(other_id)?;
        Ok(match_breakdown(&user.match_profile(), &other.match_profile()))
    }

    /// Best matches for `user_id`, excluding users they blocked
    pub fn suggest_matches(&self, user_id: &str, limit: usize) -> Result<Vec<MatchSuggestion>> {
        let me = self.profile(user_id)?;
        let mut suggestions: Vec<MatchSuggestion> = self
            .provider
            .list_users()
            .into_iter()
            .filter(|u| u.id != me.id && !me.has_blocked(&u.id))
            .map(|u| MatchSuggestion {
                percentage: match_breakdown(&me.match_profile(), &u.match_profile()).percentage(),
                user_id: u.id,
                name: u.name,
            })
            .collect();
        suggestions.sort_by(|a, b| b.percentage.cmp(&a.percentage).then_with(|| a.name.cmp(&b.name)));
        suggestions.truncate(limit);
        Ok(suggestions)
    }

    // ========== Notifications ==========

    pub fn mark_notification_read(&mut self, id: Uuid) -> bool {
        let found = self.notifications.mark_read(id);
        self.notifications.save(self.engine.store_mut());
        found
    }

    pub fn mark_all_notifications_read(&mut self) -> usize {
        let count = self.notifications.mark_all_read();
        self.notifications.save(self.engine.store_mut());
        count
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
        self.notifications.save(self.engine.store_mut());
    }

    /// Toggle a notification category. Returns false for unknown names.
    pub fn set_notification(&mut self, category: &str, on: bool) -> bool {
        let known = self.notifications.settings_mut().set(category, on);
        if known {
            self.notifications.save(self.engine.store_mut());
        }
        known
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;
    use crate::storage::MemoryStore;

    fn app() -> SkillSwap<MemoryStore, MockProvider> {
        SkillSwap::open(MemoryStore::new(), MockProvider::new(), "alex", NotificationSettings::default())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
    }

    #[test]
    fn test_level_up_notifies_once() {
        let mut app = app();
        app.add_points(200, "test");
        let level_ups = app
            .notifications()
            .items()
            .iter()
            .filter(|n| n.kind == NotificationKind::LevelUp)
            .count();
        assert_eq!(level_ups, 1);

        app.add_points(1, "test");
        let level_ups = app
            .notifications()
            .items()
            .iter()
            .filter(|n| n.kind == NotificationKind::LevelUp)
            .count();
        assert_eq!(level_ups, 1);
    }

    #[test]
    fn test_login_completes_daily_challenge() {
        let mut app = app();
        let outcome = app.login(today());
        assert!(outcome.counted);
        assert!(app.challenges().challenge("daily_login").unwrap().completed);
        // 5 login XP + 5 challenge XP
        assert_eq!(app.engine().points(), 10);
    }

    #[test]
    fn test_join_community() {
        let mut app = app();
        assert!(app.join_community("code-newbies", today()).unwrap());
        assert!(!app.join_community("code-newbies", today()).unwrap());
        assert!(app.join_community("nowhere", today()).is_err());
        assert!(app.communities().is_member("code-newbies"));
        // community_joined XP plus the weekly challenge
        assert_eq!(app.engine().points(), 10 + 25);
    }

    #[test]
    fn test_blocked_send_is_not_an_error() {
        let mut app = app();
        let outcome = app.send_message("troll", "hey", today()).unwrap();
        assert!(matches!(outcome, SendOutcome::Blocked { .. }));
        assert_eq!(app.engine().points(), 0);

        let outcome = app.send_message("sam", "hey", today()).unwrap();
        assert!(matches!(outcome, SendOutcome::Sent(_)));
        assert_eq!(app.engine().points(), 2);
        assert!(app.send_message("ghost", "hey", today()).is_err());
    }

    #[test]
    fn test_suggestions_skip_self_and_blocked() {
        let app = app();
        let suggestions = app.suggest_matches("alex", 10).unwrap();
        assert!(suggestions.iter().all(|s| s.user_id != "alex" && s.user_id != "troll"));
        assert!(suggestions.windows(2).all(|w| w[0].percentage >= w[1].percentage));
        assert_eq!(suggestions[0].user_id, "sam");
    }

    #[test]
    fn test_like_feeds_challenge_and_counts() {
        let mut app = app();
        for id in ["p1", "p2", "p3"] {
            assert!(app.toggle_like(id, today()));
        }
        assert!(app.challenges().challenge("daily_likes").unwrap().completed);
        let p1 = app.feed().into_iter().find(|i| i.post.id == "p1").unwrap();
        assert_eq!(p1.likes, 18);
        assert!(p1.liked);
    }

    #[test]
    fn test_relike_does_not_advance_challenge() {
        let mut app = app();
        assert!(app.toggle_like("p1", today()));
        assert!(!app.toggle_like("p1", today()));
        assert!(app.toggle_like("p1", today()));
        assert!(!app.toggle_like("p1", today()));
        assert!(app.toggle_like("p1", today()));

        let likes = app.challenges().challenge("daily_likes").unwrap();
        assert_eq!(likes.progress, 1);
        assert!(!likes.completed);
        assert_eq!(app.engine().points(), 0);
    }

    #[test]
    fn test_claim_rejection_has_message_and_no_notification() {
        let mut app = app();
        let outcome = app.claim_reward("custom_theme").unwrap();
        assert!(!outcome.is_claimed());
        assert!(outcome.message().contains("Not enough points"));
        assert!(app.notifications().items().is_empty());
    }

    #[test]
    fn test_events_are_handed_out_once() {
        let mut app = app();
        app.unlock_achievement("early_adopter").unwrap();
        let events = app.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GamificationEvent::AchievementUnlocked { id, .. } if id == "early_adopter")));
        assert!(app.take_events().is_empty());
    }

    #[test]
    fn test_state_persists_across_open() {
        let mut app = app();
        app.login(today());
        app.join_community("photo-walks", today()).unwrap();
        app.toggle_save("p3");
        app.set_notification("community", false);
        let points = app.engine().points();
        let store = app.into_store();

        let reopened = SkillSwap::open(store, MockProvider::new(), "alex", NotificationSettings::default());
        assert_eq!(reopened.engine().points(), points);
        assert!(reopened.communities().is_member("photo-walks"));
        assert!(reopened.feed_state().is_saved("p3"));
        assert!(!reopened.notifications().settings().community);
        assert_eq!(reopened.status().communities, 1);
    }
}
