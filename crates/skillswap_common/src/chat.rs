//! One-to-one conversation state.
//!
//! There is no transport here. A thread only records what the local user
//! sent and whether the partner is blocked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub sender_id: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// What happened to a send attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent(ChatMessage),
    /// Nothing was sent; `notice` is shown to the user
    Blocked { notice: String },
    /// Whitespace-only text is ignored
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatThread {
    user_id: String,
    partner_id: String,
    messages: Vec<ChatMessage>,
    blocked: bool,
}

impl ChatThread {
    pub fn new(user_id: &str, partner_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            partner_id: partner_id.to_string(),
            messages: Vec::new(),
            blocked: false,
        }
    }

    pub fn partner_id(&self) -> &str {
        &self.partner_id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn block(&mut self) {
        self.blocked = true;
    }

    pub fn unblock(&mut self) {
        self.blocked = false;
    }

    pub fn send(&mut self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Empty;
        }
        if self.blocked {
            debug!("Send to blocked user {} suppressed", self.partner_id);
            return SendOutcome::Blocked {
                notice: format!(
                    "You have blocked {}. Unblock them to send messages.",
                    self.partner_id
                ),
            };
        }

        let message = ChatMessage {
            id: Uuid::new_v4(),
            sender_id: self.user_id.clone(),
            text: text.to_string(),
            sent_at: Utc::now(),
        };
        self.messages.push(message.clone());
        SendOutcome::Sent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send() {
        let mut thread = ChatThread::new("me", "sam");
        match thread.send("  hi there ") {
            SendOutcome::Sent(msg) => {
                assert_eq!(msg.text, "hi there");
                assert_eq!(msg.sender_id, "me");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(thread.messages().len(), 1);
    }

    #[test]
    fn test_blocked_is_informational() {
        let mut thread = ChatThread::new("me", "sam");
        thread.block();
        match thread.send("hello") {
            SendOutcome::Blocked { notice } => assert!(notice.contains("sam")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(thread.messages().is_empty());

        thread.unblock();
        assert!(matches!(thread.send("hello"), SendOutcome::Sent(_)));
    }

    #[test]
    fn test_empty_ignored() {
        let mut thread = ChatThread::new("me", "sam");
        assert_eq!(thread.send("   "), SendOutcome::Empty);
        assert!(thread.messages().is_empty());
    }
}
