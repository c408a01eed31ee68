//! crates/social_assistant_core/src/session.rs
//!
//! Drives one chat session: tracks the active platform, turns user input into
//! generated replies, collects ratings, and resets the history on request.

use crate::conversation::{ConversationSnapshot, ConversationStore, StoreError};
use crate::domain::{Message, PlatformProfile, Rating};
use crate::generator::{GenerationOutcome, ResponseGenerator};
use crate::platform::{self, CatalogError};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Message content cannot be empty")]
    EmptyInput,
}

/// Where the session is within a single request/response turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingGeneration,
}

/// Everything one session owns. Never shared between sessions.
#[derive(Debug)]
pub struct ConversationState {
    pub store: ConversationStore,
    pub active_platform: PlatformProfile,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            store: ConversationStore::new(),
            active_platform: platform::default_platform(),
        }
    }
}

/// The two messages produced by one submission, plus how generation went.
#[derive(Debug, Clone)]
pub struct Turn {
    pub user_message: Message,
    pub assistant_message: Message,
    pub outcome: GenerationOutcome,
}

/// Summary figures shown next to the chat.
#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub total_interactions: usize,
    pub average_rating: Option<f64>,
}

impl Analytics {
    /// One decimal place followed by a star, or `N/A` when nothing has been rated.
    pub fn average_rating_display(&self) -> String {
        match self.average_rating {
            Some(avg) => format!("{avg:.1} ⭐"),
            None => "N/A".to_string(),
        }
    }
}

pub struct SessionController {
    id: Uuid,
    state: ConversationState,
    phase: SessionPhase,
    generator: ResponseGenerator,
}

impl SessionController {
    pub fn new(generator: ResponseGenerator) -> Self {
        Self::with_id(Uuid::new_v4(), generator)
    }

    pub fn with_id(id: Uuid, generator: ResponseGenerator) -> Self {
        Self {
            id,
            state: ConversationState::default(),
            phase: SessionPhase::Idle,
            generator,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn active_platform(&self) -> PlatformProfile {
        self.state.active_platform
    }

    pub fn title(&self) -> String {
        format!("Social Media AI Assistant - {}", self.state.active_platform.name)
    }

    pub fn select_platform(&mut self, name: &str) -> Result<PlatformProfile, SessionError> {
        let profile = platform::lookup(name)?;
        self.state.active_platform = profile;
        info!(session_id = %self.id, platform = profile.name, "Platform selected");
        Ok(profile)
    }

    /// Records the user's text, asks the model for a reply, and records that too.
    ///
    /// A failed generation is still a completed turn; its error text becomes
    /// the assistant message.
    pub async fn submit_text(&mut self, text: &str) -> Result<Turn, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyInput);
        }
        let platform = self.state.active_platform.name;

        let user_message = Message::user(text, platform);
        self.state.store.append_message(user_message.clone());
        self.phase = SessionPhase::AwaitingGeneration;

        let outcome = self.generator.generate(text, platform).await;

        let assistant_message = Message::assistant(outcome.display_text(), platform);
        self.state.store.append_message(assistant_message.clone());
        self.phase = SessionPhase::Idle;

        info!(
            session_id = %self.id,
            platform,
            failed = outcome.is_failure(),
            "Turn completed"
        );

        Ok(Turn {
            user_message,
            assistant_message,
            outcome,
        })
    }

    /// Stores a rating for the most recently displayed reply.
    pub fn submit_rating(&mut self, value: i64) -> Result<Rating, SessionError> {
        let rating = self.state.store.append_rating(value)?;
        info!(session_id = %self.id, rating = rating.value(), "Rating recorded");
        Ok(rating)
    }

    pub fn has_history(&self) -> bool {
        !self.state.store.is_empty()
    }

    /// Clears the conversation. Returns `false` if there was nothing to clear.
    pub fn reset(&mut self) -> bool {
        if !self.has_history() {
            return false;
        }
        self.state.store.reset();
        info!(session_id = %self.id, "Conversation reset");
        true
    }

    pub fn snapshot(&self) -> ConversationSnapshot {
        self.state.store.snapshot()
    }

    pub fn analytics(&self) -> Analytics {
        Analytics {
            total_interactions: self.state.store.total_interactions(),
            average_rating: self.state.store.average_rating(),
        }
    }
}
