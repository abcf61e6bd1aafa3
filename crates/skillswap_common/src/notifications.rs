//! In-app notifications and per-category settings.

use crate::storage::{load_json, save_json, try_load_json, KeyValueStore, StorageKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Oldest notifications are dropped past this many
pub const MAX_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Achievement,
    LevelUp,
    Reward,
    Message,
    Session,
    Community,
    Challenge,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Achievement => "achievement",
            Self::LevelUp => "level_up",
            Self::Reward => "reward",
            Self::Message => "message",
            Self::Session => "session",
            Self::Community => "community",
            Self::Challenge => "challenge",
        }
    }
}

/// Which categories may notify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "enabled")]
    pub achievements: bool,
    #[serde(default = "enabled")]
    pub level_ups: bool,
    #[serde(default = "enabled")]
    pub rewards: bool,
    #[serde(default = "enabled")]
    pub messages: bool,
    #[serde(default = "enabled")]
    pub sessions: bool,
    #[serde(default = "enabled")]
    pub community: bool,
    #[serde(default = "enabled")]
    pub challenges: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            achievements: true,
            level_ups: true,
            rewards: true,
            messages: true,
            sessions: true,
            community: true,
            challenges: true,
        }
    }
}

impl NotificationSettings {
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Achievement => self.achievements,
            NotificationKind::LevelUp => self.level_ups,
            NotificationKind::Reward => self.rewards,
            NotificationKind::Message => self.messages,
            NotificationKind::Session => self.sessions,
            NotificationKind::Community => self.community,
            NotificationKind::Challenge => self.challenges,
        }
    }

    /// Toggle a category by name. Returns false for unknown names.
    pub fn set(&mut self, category: &str, on: bool) -> bool {
        let slot = match category.trim().to_lowercase().replace('-', "_").as_str() {
            "achievements" | "achievement" => &mut self.achievements,
            "level_ups" | "level_up" | "levels" => &mut self.level_ups,
            "rewards" | "reward" => &mut self.rewards,
            "messages" | "message" => &mut self.messages,
            "sessions" | "session" => &mut self.sessions,
            "community" | "communities" => &mut self.community,
            "challenges" | "challenge" => &mut self.challenges,
            _ => return false,
        };
        *slot = on;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// Notification list, newest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationCenter {
    settings: NotificationSettings,
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(settings: NotificationSettings) -> Self {
        Self {
            settings,
            items: Vec::new(),
        }
    }

    /// Load from `store`; `defaults` apply when no settings were saved yet
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, defaults: NotificationSettings) -> Self {
        let settings = try_load_json(store, StorageKey::NotificationSettings).unwrap_or(defaults);
        let mut items: Vec<Notification> = load_json(store, StorageKey::Notifications);
        items.truncate(MAX_NOTIFICATIONS);
        Self { settings, items }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        save_json(store, StorageKey::NotificationSettings, &self.settings);
        save_json(store, StorageKey::Notifications, &self.items);
    }

    pub fn settings(&self) -> &NotificationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut NotificationSettings {
        &mut self.settings
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Add a notification unless its category is muted
    pub fn push(&mut self, kind: NotificationKind, title: &str, body: &str) -> Option<Uuid> {
        if !self.settings.allows(kind) {
            debug!("Muted {} notification: {}", kind.as_str(), title);
            return None;
        }

        let notification = Notification {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
            read: false,
        };
        let id = notification.id;
        self.items.insert(0, notification);
        self.items.truncate(MAX_NOTIFICATIONS);
        Some(id)
    }

    /// Returns false if no such notification exists
    pub fn mark_read(&mut self, id: Uuid) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    /// Returns how many were unread
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for n in self.items.iter_mut().filter(|n| !n.read) {
            n.read = true;
            changed += 1;
        }
        changed
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
