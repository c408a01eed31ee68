//! crates/social_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The core only talks to the outside world through these traits, so the
//! hosted language model can be swapped for any implementation (or a mock).

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, auth).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Request Types
//=========================================================================================

/// One fully-built call to the text generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// The system directive, already templated with tone and length.
    pub system_prompt: String,
    /// The user's text, verbatim.
    pub user_prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Sends a two-turn prompt to the model and returns its raw completion text.
    async fn generate_text(&self, request: GenerationRequest) -> PortResult<String>;
}
