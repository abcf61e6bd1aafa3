//! Liked and saved posts.

use crate::storage::{load_json, save_json, KeyValueStore, StorageKey};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    liked: BTreeSet<String>,
    saved: BTreeSet<String>,
}

impl FeedState {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let liked: Vec<String> = load_json(store, StorageKey::LikedPosts);
        let saved: Vec<String> = load_json(store, StorageKey::SavedPosts);
        Self {
            liked: liked.into_iter().collect(),
            saved: saved.into_iter().collect(),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        save_json(store, StorageKey::LikedPosts, &self.liked);
        save_json(store, StorageKey::SavedPosts, &self.saved);
    }

    /// Flip the like on `post_id`. Returns whether it is now liked.
    pub fn toggle_like(&mut self, post_id: &str) -> bool {
        toggle(&mut self.liked, post_id)
    }

    /// Flip the bookmark on `post_id`. Returns whether it is now saved.
    pub fn toggle_save(&mut self, post_id: &str) -> bool {
        toggle(&mut self.saved, post_id)
    }

    pub fn is_liked(&self, post_id: &str) -> bool {
        self.liked.contains(post_id)
    }

    pub fn is_saved(&self, post_id: &str) -> bool {
        self.saved.contains(post_id)
    }

    /// Like count shown for a post, including our own like
    pub fn like_count(&self, post_id: &str, base_likes: u32) -> u32 {
        if self.is_liked(post_id) {
            base_likes.saturating_add(1)
        } else {
            base_likes
        }
    }

    pub fn liked(&self) -> impl Iterator<Item = &str> {
        self.liked.iter().map(String::as_str)
    }

    pub fn saved(&self) -> impl Iterator<Item = &str> {
        self.saved.iter().map(String::as_str)
    }
}

fn toggle(set: &mut BTreeSet<String>, id: &str) -> bool {
    if set.remove(id) {
        false
    } else {
        set.insert(id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_toggle_like() {
        let mut feed = FeedState::default();
        assert!(feed.toggle_like("p1"));
        assert!(feed.is_liked("p1"));
        assert_eq!(feed.like_count("p1", 4), 5);
        assert!(!feed.toggle_like("p1"));
        assert_eq!(feed.like_count("p1", 4), 4);
    }

    #[test]
    fn test_like_and_save_are_independent() {
        let mut feed = FeedState::default();
        feed.toggle_save("p2");
        assert!(feed.is_saved("p2"));
        assert!(!feed.is_liked("p2"));
    }

    #[test]
    fn test_persisted() {
        let mut store = MemoryStore::new();
        let mut feed = FeedState::default();
        feed.toggle_like("p1");
        feed.toggle_save("p3");
        feed.save(&mut store);

        let loaded = FeedState::load(&store);
        assert_eq!(loaded, feed);
        assert_eq!(loaded.saved().collect::<Vec<_>>(), vec!["p3"]);
    }
}
