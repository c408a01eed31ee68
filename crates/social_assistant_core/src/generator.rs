//! crates/social_assistant_core/src/generator.rs
//!
//! Turns a user's text plus the selected platform into a prompt for the
//! text generation port, and folds every failure into a displayable outcome.

use crate::platform;
use crate::ports::{GenerationRequest, TextGenerationService};
use std::sync::Arc;
use tracing::{debug, warn};

const SYSTEM_PROMPT_TEMPLATE: &str = "You are a professional social media manager assistant. \
Respond to the user's query in {tone} tone. \
Keep response under {max_length} characters. \
Include platform-specific best practices.";

pub const TEMPERATURE: f32 = 0.7;
/// Upper bound on the model's output tokens, whatever the platform allows.
pub const MAX_OUTPUT_TOKENS: u32 = 1024;
pub const ERROR_PREFIX: &str = "Error generating response: ";

/// The result of one generation attempt.
///
/// Both variants render to plain text for the chat history, but callers can
/// still tell a real completion from a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated(String),
    Failed(String),
}

impl GenerationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, GenerationOutcome::Failed(_))
    }

    /// The text shown to the user in place of the assistant's reply.
    pub fn display_text(&self) -> String {
        match self {
            GenerationOutcome::Generated(text) => text.clone(),
            GenerationOutcome::Failed(reason) => format!("{ERROR_PREFIX}{reason}"),
        }
    }
}

#[derive(Clone)]
pub struct ResponseGenerator {
    service: Arc<dyn TextGenerationService>,
}

impl ResponseGenerator {
    pub fn new(service: Arc<dyn TextGenerationService>) -> Self {
        Self { service }
    }

    /// Builds the request sent for `user_text` on `platform_name`.
    pub fn build_request(
        user_text: &str,
        platform_name: &str,
    ) -> Result<GenerationRequest, platform::CatalogError> {
        let profile = platform::lookup(platform_name)?;
        let system_prompt = SYSTEM_PROMPT_TEMPLATE
            .replace("{tone}", profile.tone)
            .replace("{max_length}", &profile.max_length.to_string());

        Ok(GenerationRequest {
            system_prompt,
            user_prompt: user_text.to_string(),
            temperature: TEMPERATURE,
            max_output_tokens: profile.max_length.min(MAX_OUTPUT_TOKENS),
        })
    }

    /// Generates a reply. Never fails: errors come back as `GenerationOutcome::Failed`.
    pub async fn generate(&self, user_text: &str, platform_name: &str) -> GenerationOutcome {
        let request = match Self::build_request(user_text, platform_name) {
            Ok(request) => request,
            Err(e) => {
                warn!("Refusing to generate: {}", e);
                return GenerationOutcome::Failed(e.to_string());
            }
        };

        debug!(
            platform = platform_name,
            max_output_tokens = request.max_output_tokens,
            "Sending generation request"
        );

        match self.service.generate_text(request).await {
            Ok(text) => GenerationOutcome::Generated(text.trim().to_string()),
            Err(e) => {
                warn!("Generation service failed: {}", e);
                GenerationOutcome::Failed(e.to_string())
            }
        }
    }
}
