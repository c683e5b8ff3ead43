//! Focus coach: a short chat with a hosted language model.
//!
//! [`Conversation`] owns the transcript and turns every failure into a
//! calm fallback reply, so the chat never surfaces raw errors. Only an
//! expired authorization changes state: the conversation marks itself
//! unlinked until the user re-links.

pub mod credentials;
mod gemini;

pub use credentials::{Credentials, KeyringStore, MemorySecretStore, SecretStore};
pub use gemini::GeminiClient;

use serde::{Deserialize, Serialize};

use crate::error::CoachError;

pub const GREETING: &str = "I am your Focus Coach. What are we working on today?";
pub const EXPIRED_REPLY: &str = "Account session expired. Please re-link your account.";
pub const GENERIC_FAILURE_REPLY: &str = "Error connecting to wisdom. Re-center and try again.";
pub const EMPTY_REPLY: &str = "Stay focused. That's all that matters.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// A model that continues a chat transcript.
#[allow(async_fn_in_trait)]
pub trait ChatModel {
    /// Reply to `history`, whose last entry is the user's turn.
    async fn reply(&self, history: &[Message]) -> Result<String, CoachError>;
}

/// One chat transcript with its model.
pub struct Conversation<M: ChatModel> {
    model: M,
    history: Vec<Message>,
    linked: bool,
}

impl<M: ChatModel> Conversation<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            history: vec![Message::model(GREETING)],
            linked: true,
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Mark the account as re-linked after the user supplied a new credential.
    pub fn relink(&mut self, model: M) {
        self.model = model;
        self.linked = true;
    }

    /// Send one user turn and return the reply that was appended.
    ///
    /// Blank input is ignored and returns `None`.
    pub async fn send(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        self.history.push(Message::user(text));

        let reply = match self.model.reply(&self.history).await {
            Ok(reply) if reply.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(reply) => reply,
            Err(e) if e.is_authorization_expired() => {
                tracing::warn!("coach authorization expired");
                self.linked = false;
                EXPIRED_REPLY.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "coach request failed");
                GENERIC_FAILURE_REPLY.to_string()
            }
        };
        self.history.push(Message::model(reply.clone()));
        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Replays canned results in order.
    struct Scripted {
        replies: RefCell<Vec<Result<String, CoachError>>>,
        seen: RefCell<Vec<usize>>,
    }

    impl Scripted {
        fn new(mut replies: Vec<Result<String, CoachError>>) -> Self {
            replies.reverse();
            Self {
                replies: RefCell::new(replies),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ChatModel for Scripted {
        async fn reply(&self, history: &[Message]) -> Result<String, CoachError> {
            self.seen.borrow_mut().push(history.len());
            self.replies
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    #[tokio::test]
    async fn conversation_appends_turns() {
        let mut chat = Conversation::new(Scripted::new(vec![Ok("Breathe.".into())]));
        assert_eq!(chat.history()[0].text, GREETING);

        let reply = chat.send("  writing  ").await;
        assert_eq!(reply.as_deref(), Some("Breathe."));
        assert_eq!(chat.history().len(), 3);
        assert_eq!(chat.history()[1], Message::user("writing"));
        assert_eq!(chat.model.seen.borrow()[0], 2);
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let mut chat = Conversation::new(Scripted::new(vec![]));
        assert!(chat.send("   ").await.is_none());
        assert_eq!(chat.history().len(), 1);
    }

    #[tokio::test]
    async fn failures_become_fallback_replies() {
        let mut chat = Conversation::new(Scripted::new(vec![
            Ok("   ".into()),
            Err(CoachError::Http { status: 500 }),
            Err(CoachError::AuthorizationExpired),
        ]));
        assert_eq!(chat.send("a").await.as_deref(), Some(EMPTY_REPLY));
        assert_eq!(chat.send("b").await.as_deref(), Some(GENERIC_FAILURE_REPLY));
        assert!(chat.is_linked());
        assert_eq!(chat.send("c").await.as_deref(), Some(EXPIRED_REPLY));
        assert!(!chat.is_linked());
    }
}
