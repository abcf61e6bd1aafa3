//! Data provider port.
//!
//! Profiles, posts, skills and communities come from outside the
//! gamification layer. `DataProvider` is the only way the rest of the crate
//! sees them, so a real backend can replace `MockProvider` without touching
//! the formulas.

use crate::matching::MatchProfile;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub wants_to_learn: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub availability: Vec<String>,
    /// Users this user has blocked
    #[serde(default)]
    pub blocked: Vec<String>,
}

impl UserProfile {
    pub fn match_profile(&self) -> MatchProfile<'_> {
        MatchProfile {
            skills: &self.skills,
            wants_to_learn: &self.wants_to_learn,
            interests: &self.interests,
            location: &self.location,
            availability: &self.availability,
        }
    }

    pub fn has_blocked(&self, user_id: &str) -> bool {
        self.blocked.iter().any(|b| b == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub likes: u32,
    #[serde(default)]
    pub community_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub id: String,
    pub name: String,
    pub members: u32,
}

/// Read-only source of social data
pub trait DataProvider {
    fn fetch_user(&self, id: &str) -> Option<UserProfile>;
    fn list_users(&self) -> Vec<UserProfile>;
    /// Newest first
    fn fetch_feed(&self) -> Vec<Post>;
    fn fetch_skill(&self, id: &str) -> Option<Skill>;
    fn list_communities(&self) -> Vec<Community>;

    fn fetch_community(&self, id: &str) -> Option<Community> {
        self.list_communities().into_iter().find(|c| c.id == id)
    }
}

/// Fixed in-memory data set
#[derive(Debug, Clone)]
pub struct MockProvider {
    users: Vec<UserProfile>,
    posts: Vec<Post>,
    skills: Vec<Skill>,
    communities: Vec<Community>,
}

fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn post(id: &str, author: &str, content: &str, likes: u32, community: Option<&str>, day: u32) -> Post {
    Post {
        id: id.to_string(),
        author_id: author.to_string(),
        content: content.to_string(),
        likes,
        community_id: community.map(str::to_string),
        created_at: Utc
            .with_ymd_and_hms(2026, 9, day, 12, 0, 0)
            .single()
            .unwrap_or_default(),
    }
}

fn skill(id: &str, name: &str, category: &str) -> Skill {
    Skill {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
    }
}

fn community(id: &str, name: &str, members: u32) -> Community {
    Community {
        id: id.to_string(),
        name: name.to_string(),
        members,
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    pub fn new() -> Self {
        let users = vec![
            UserProfile {
                id: "alex".to_string(),
                name: "Alex Morgan".to_string(),
                bio: "Backend dev learning to make music".to_string(),
                skills: tags(&["rust", "python", "sql"]),
                wants_to_learn: tags(&["guitar", "spanish"]),
                interests: tags(&["music", "hiking", "coffee"]),
                location: "Berlin".to_string(),
                availability: tags(&["evenings", "weekends"]),
                blocked: tags(&["troll"]),
            },
            UserProfile {
                id: "sam".to_string(),
                name: "Sam Rivera".to_string(),
                bio: "Session guitarist, wants to code".to_string(),
                skills: tags(&["guitar", "music theory"]),
                wants_to_learn: tags(&["python", "rust"]),
                interests: tags(&["music", "coffee"]),
                location: "Berlin".to_string(),
                availability: tags(&["weekends"]),
                ..Default::default()
            },
            UserProfile {
                id: "priya".to_string(),
                name: "Priya Nair".to_string(),
                bio: "Polyglot and home cook".to_string(),
                skills: tags(&["spanish", "cooking", "hindi"]),
                wants_to_learn: tags(&["sql", "photography"]),
                interests: tags(&["travel", "food", "hiking"]),
                location: "Lisbon".to_string(),
                availability: tags(&["mornings", "weekends"]),
                ..Default::default()
            },
            UserProfile {
                id: "kenji".to_string(),
                name: "Kenji Sato".to_string(),
                bio: "Photographer".to_string(),
                skills: tags(&["photography", "lightroom"]),
                wants_to_learn: tags(&["japanese calligraphy"]),
                interests: tags(&["art", "travel"]),
                location: "Tokyo".to_string(),
                availability: tags(&["mornings"]),
                ..Default::default()
            },
            UserProfile {
                id: "troll".to_string(),
                name: "Anonymous".to_string(),
                ..Default::default()
            },
        ];

        let posts = vec![
            post("p5", "priya", "Hosting a tapas night for Spanish practice", 12, Some("language-exchange"), 14),
            post("p4", "sam", "Wrote my first Python script today!", 8, Some("code-newbies"), 13),
            post("p3", "kenji", "Golden hour walk, tips inside", 21, Some("photo-walks"), 12),
            post("p2", "alex", "Looking for a guitar teacher in Berlin", 3, None, 11),
            post("p1", "sam", "Free music theory primer, ask me anything", 17, Some("music-makers"), 10),
        ];

        let skills = vec![
            skill("rust", "Rust", "programming"),
            skill("python", "Python", "programming"),
            skill("sql", "SQL", "programming"),
            skill("guitar", "Guitar", "music"),
            skill("music theory", "Music Theory", "music"),
            skill("spanish", "Spanish", "language"),
            skill("hindi", "Hindi", "language"),
            skill("cooking", "Cooking", "lifestyle"),
            skill("photography", "Photography", "art"),
        ];

        let communities = vec![
            community("code-newbies", "Code Newbies", 1240),
            community("music-makers", "Music Makers", 860),
            community("language-exchange", "Language Exchange", 2310),
            community("photo-walks", "Photo Walks", 415),
        ];

        Self {
            users,
            posts,
            skills,
            communities,
        }
    }

    /// Replace the user list
    pub fn with_users(mut self, users: Vec<UserProfile>) -> Self {
        self.users = users;
        self
    }
}

impl DataProvider for MockProvider {
    fn fetch_user(&self, id: &str) -> Option<UserProfile> {
        self.users.iter().find(|u| u.id == id).cloned()
    }

    fn list_users(&self) -> Vec<UserProfile> {
        self.users.clone()
    }

    fn fetch_feed(&self) -> Vec<Post> {
        let mut posts = self.posts.clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }

    fn fetch_skill(&self, id: &str) -> Option<Skill> {
        let needle = id.trim().to_lowercase();
        self.skills.iter().find(|s| s.id == needle).cloned()
    }

    fn list_communities(&self) -> Vec<Community> {
        self.communities.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_lookups() {
        let provider = MockProvider::new();
        assert_eq!(provider.fetch_user("sam").unwrap().name, "Sam Rivera");
        assert!(provider.fetch_user("nobody").is_none());
        assert_eq!(provider.fetch_skill("Rust").unwrap().category, "programming");
        assert_eq!(provider.fetch_community("photo-walks").unwrap().members, 415);
    }

    #[test]
    fn test_feed_newest_first() {
        let feed = MockProvider::new().fetch_feed();
        assert_eq!(feed.first().unwrap().id, "p5");
        assert!(feed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    #[test]
    fn test_sparse_profile_defaults_empty() {
        let troll = MockProvider::new().fetch_user("troll").unwrap();
        assert_eq!(troll.name, "Anonymous");
        assert!(troll.skills.is_empty());
        assert!(troll.location.is_empty());
        assert!(troll.blocked.is_empty());
    }

    #[test]
    fn test_blocked() {
        let alex = MockProvider::new().fetch_user("alex").unwrap();
        assert!(alex.has_blocked("troll"));
        assert!(!alex.has_blocked("sam"));
    }
}
