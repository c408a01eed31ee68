//! crates/social_assistant_core/src/conversation.rs
//!
//! The in-memory, append-only history of one session: messages plus the
//! feedback ratings collected alongside them.

use crate::domain::{Message, Rating};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid rating {0}: must be between 1 and 5")]
    InvalidRating(i64),
}

/// An owned, point-in-time copy of the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConversationSnapshot {
    pub messages: Vec<Message>,
    pub ratings: Vec<Rating>,
}

#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    ratings: Vec<Rating>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_message(&mut self, msg: Message) {
        self.messages.push(msg);
    }

    pub fn append_rating(&mut self, value: i64) -> Result<Rating, StoreError> {
        let rating = Rating::new(value).ok_or(StoreError::InvalidRating(value))?;
        self.ratings.push(rating);
        Ok(rating)
    }

    /// Drops every message and rating.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.ratings.clear();
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            messages: self.messages.clone(),
            ratings: self.ratings.clone(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.ratings.is_empty()
    }

    /// Counts every message, user and assistant alike.
    pub fn total_interactions(&self) -> usize {
        self.messages.len()
    }

    /// Mean of all ratings, or `None` when nothing has been rated yet.
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let sum: u32 = self.ratings.iter().map(|r| u32::from(r.value())).sum();
        Some(f64::from(sum) / self.ratings.len() as f64)
    }
}
