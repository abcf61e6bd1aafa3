//! Joined communities.

use crate::storage::{load_json, save_json, KeyValueStore, StorageKey};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Communities {
    /// In join order
    joined: Vec<String>,
}

impl Communities {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut joined: Vec<String> = load_json(store, StorageKey::JoinedCommunities);
        let mut seen = std::collections::HashSet::new();
        joined.retain(|id| seen.insert(id.clone()));
        Self { joined }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        save_json(store, StorageKey::JoinedCommunities, &self.joined);
    }

    /// Returns true if this is a new membership
    pub fn join(&mut self, community_id: &str) -> bool {
        if self.is_member(community_id) {
            return false;
        }
        self.joined.push(community_id.to_string());
        true
    }

    /// Returns true if a membership was removed
    pub fn leave(&mut self, community_id: &str) -> bool {
        let before = self.joined.len();
        self.joined.retain(|id| id != community_id);
        self.joined.len() != before
    }

    pub fn is_member(&self, community_id: &str) -> bool {
        self.joined.iter().any(|id| id == community_id)
    }

    pub fn joined(&self) -> &[String] {
        &self.joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_join_leave() {
        let mut c = Communities::default();
        assert!(c.join("rustaceans"));
        assert!(!c.join("rustaceans"));
        assert!(c.is_member("rustaceans"));
        assert!(c.leave("rustaceans"));
        assert!(!c.leave("rustaceans"));
        assert!(c.joined().is_empty());
    }

    #[test]
    fn test_load_dedups() {
        let mut store = MemoryStore::new();
        store
            .set("joined_communities", r#"["a","b","a"]"#)
            .unwrap();
        let c = Communities::load(&store);
        assert_eq!(c.joined(), &["a".to_string(), "b".to_string()]);
    }
}
