//! Session-scoped conversation log
//!
//! The chat history is an explicit value owned by the calling session and
//! passed into the turn handler. It is append-only: one entry per user
//! question and one per produced answer, in strict chronological order.
//! Nothing is persisted across sessions.

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One (speaker, message) pair
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only ordered log of turns for one session
#[derive(Debug)]
pub struct ConversationState {
    session_id: Uuid,
    turns: Vec<ConversationTurn>,
}

impl ConversationState {
    /// Create an empty conversation for a new session
    #[must_use]
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            turns: Vec::new(),
        }
    }

    /// Append a user question
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Role::User, text.into());
    }

    /// Append an assistant answer
    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.push(Role::Assistant, text.into());
    }

    fn push(&mut self, role: Role, text: String) {
        self.turns.push(ConversationTurn {
            role,
            text,
            timestamp: Utc::now(),
        });
    }

    /// Full ordered history for rendering, oldest first
    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let conversation = ConversationState::new();
        assert!(conversation.is_empty());
        assert_eq!(conversation.len(), 0);
    }

    #[test]
    fn test_turns_alternate_in_call_order() {
        let mut conversation = ConversationState::new();
        for i in 0..3 {
            conversation.push_user(format!("question {i}"));
            conversation.push_assistant(format!("answer {i}"));
        }

        assert_eq!(conversation.len(), 6);
        for (idx, turn) in conversation.turns().iter().enumerate() {
            let expected = if idx % 2 == 0 {
                Role::User
            } else {
                Role::Assistant
            };
            assert_eq!(turn.role, expected);
        }
        assert_eq!(conversation.turns()[4].text, "question 2");
        assert_eq!(conversation.turns()[5].text, "answer 2");
    }

    #[test]
    fn test_role_as_str() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }
}
