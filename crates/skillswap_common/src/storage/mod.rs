//! Key/value persistence port.
//!
//! State is stored as one JSON document per key, without schema versioning.
//! Reads never fail the caller: a missing or corrupt value falls back to the
//! default and is logged. Writes are fire-and-forget for the same reason.
//! Keys are written independently, so an interrupted sequence of writes can
//! leave them mutually inconsistent.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Backend holding string values under string keys
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Every persisted key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Points,
    Achievements,
    Rewards,
    Streak,
    LastLogin,
    NotificationSettings,
    Notifications,
    JoinedCommunities,
    Challenges,
    ChallengeStreak,
    LikedPosts,
    SavedPosts,
}

impl StorageKey {
    pub const ALL: [StorageKey; 12] = [
        StorageKey::Points,
        StorageKey::Achievements,
        StorageKey::Rewards,
        StorageKey::Streak,
        StorageKey::LastLogin,
        StorageKey::NotificationSettings,
        StorageKey::Notifications,
        StorageKey::JoinedCommunities,
        StorageKey::Challenges,
        StorageKey::ChallengeStreak,
        StorageKey::LikedPosts,
        StorageKey::SavedPosts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Achievements => "achievements",
            Self::Rewards => "rewards",
            Self::Streak => "streak",
            Self::LastLogin => "last_login",
            Self::NotificationSettings => "notification_settings",
            Self::Notifications => "notifications",
            Self::JoinedCommunities => "joined_communities",
            Self::Challenges => "challenges",
            Self::ChallengeStreak => "challenge_streak",
            Self::LikedPosts => "liked_posts",
            Self::SavedPosts => "saved_posts",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read and decode `key`, or `None` if absent or unreadable
pub fn try_load_json<T, S>(store: &S, key: StorageKey) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key.as_str()) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring corrupt value for {}: {}", key, e);
            None
        }
    }
}

/// Read and decode `key`, falling back to `T::default()`
pub fn load_json<T, S>(store: &S, key: StorageKey) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    try_load_json(store, key).unwrap_or_default()
}

/// Encode and write `value` under `key`; failures are logged, not returned
pub fn save_json<T, S>(store: &mut S, key: StorageKey, value: &T)
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = match serde_json::to_string(value) {
        Ok(encoded) => encoded,
        Err(e) => {
            warn!("Failed to encode {}: {}", key, e);
            return;
        }
    };
    if let Err(e) = store.set(key.as_str(), &encoded) {
        warn!("Failed to persist {}: {}", key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let mut names: Vec<_> = StorageKey::ALL.iter().map(|k| k.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), StorageKey::ALL.len());
    }

    #[test]
    fn test_load_missing_is_default() {
        let store = MemoryStore::new();
        let points: u64 = load_json(&store, StorageKey::Points);
        assert_eq!(points, 0);
    }

    #[test]
    fn test_load_corrupt_is_default() {
        let mut store = MemoryStore::new();
        store.set("liked_posts", "{not json").unwrap();
        let liked: Vec<String> = load_json(&store, StorageKey::LikedPosts);
        assert!(liked.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save_json(&mut store, StorageKey::Streak, &7u32);
        assert_eq!(store.get("streak").unwrap().as_deref(), Some("7"));
        let streak: u32 = load_json(&store, StorageKey::Streak);
        assert_eq!(streak, 7);
    }

    #[test]
    fn test_boxed_store() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        save_json(&mut store, StorageKey::Points, &42u64);
        let points: u64 = load_json(&store, StorageKey::Points);
        assert_eq!(points, 42);
    }
}
