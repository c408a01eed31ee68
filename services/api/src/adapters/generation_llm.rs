//! services/api/src/adapters/generation_llm.rs
//!
//! This module contains the adapter for the post-writing LLM.
//! It implements the `TextGenerationService` port from the `core` crate against
//! any OpenAI-compatible chat completions endpoint (Groq by default).

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use social_assistant_core::ports::{
    GenerationRequest, PortError, PortResult, TextGenerationService,
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TextGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiGenerationAdapter {
    /// `None` when no API key was configured; every call then fails soft.
    client: Option<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiGenerationAdapter {
    /// Creates a new `OpenAiGenerationAdapter`.
    pub fn new(client: Option<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    /// Builds the client for `api_base`, or leaves it unset when there is no key.
    pub fn from_settings(api_key: Option<&str>, api_base: &str, model: String) -> Self {
        let client = api_key.map(|key| {
            Client::with_config(
                OpenAIConfig::new()
                    .with_api_key(key)
                    .with_api_base(api_base),
            )
        });
        Self::new(client, model)
    }

    /// A system turn carrying the platform instructions, then the user's text verbatim.
    fn build_chat_request(
        &self,
        request: GenerationRequest,
    ) -> PortResult<CreateChatCompletionRequest> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user_prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_completion_tokens(request.max_output_tokens)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}

/// The text of the first choice. No choices, or a first choice without text, is malformed.
fn first_choice_text<I>(contents: I) -> PortResult<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    contents.into_iter().next().flatten().ok_or_else(|| {
        PortError::MalformedResponse("Generation LLM returned no text content.".to_string())
    })
}

fn map_openai_error(e: OpenAIError) -> PortError {
    match e {
        e @ OpenAIError::JSONDeserialize(..) => PortError::MalformedResponse(e.to_string()),
        other => PortError::Unexpected(other.to_string()),
    }
}

//=========================================================================================
// `TextGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TextGenerationService for OpenAiGenerationAdapter {
    /// Sends the system and user turns as a chat completion and returns the first choice.
    async fn generate_text(&self, request: GenerationRequest) -> PortResult<String> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| PortError::Unauthorized("GROQ_API_KEY is not set".to_string()))?;

        let chat_request = self.build_chat_request(request)?;

        debug!(model = %self.model, "Calling chat completions");

        // Map the error here rather than via `From`, which the orphan rule forbids.
        let response = client
            .chat()
            .create(chat_request)
            .await
            .map_err(map_openai_error)?;

        first_choice_text(response.choices.into_iter().map(|choice| choice.message.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_openai::types::chat::{
        ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessageContent,
    };

    fn request() -> GenerationRequest {
        GenerationRequest {
            system_prompt: "Respond in neutral tone.".to_string(),
            user_prompt: "  Announce our launch!\n#rust  ".to_string(),
            temperature: 0.7,
            max_output_tokens: 280,
        }
    }

    #[tokio::test]
    async fn missing_key_fails_without_network_call() {
        let adapter = OpenAiGenerationAdapter::from_settings(
            None,
            "https://api.groq.com/openai/v1",
            "llama-3.3-70b-specdec".to_string(),
        );

        let err = adapter.generate_text(request()).await.unwrap_err();

        assert_eq!(
            err,
            PortError::Unauthorized("GROQ_API_KEY is not set".to_string())
        );
    }

    #[test]
    fn chat_request_carries_system_and_verbatim_user_turns() {
        let adapter = OpenAiGenerationAdapter::from_settings(
            None,
            "https://api.groq.com/openai/v1",
            "llama-3.3-70b-specdec".to_string(),
        );

        let chat_request = adapter.build_chat_request(request()).unwrap();

        assert_eq!(chat_request.model, "llama-3.3-70b-specdec");
        assert_eq!(chat_request.temperature, Some(0.7));
        assert_eq!(chat_request.max_completion_tokens, Some(280));
        assert_eq!(chat_request.messages.len(), 2);
        match &chat_request.messages[0] {
            ChatCompletionRequestMessage::System(system) => assert_eq!(
                system.content,
                ChatCompletionRequestSystemMessageContent::Text(
                    "Respond in neutral tone.".to_string()
                )
            ),
            other => panic!("expected a system turn, got {:?}", other),
        }
        match &chat_request.messages[1] {
            ChatCompletionRequestMessage::User(user) => assert_eq!(
                user.content,
                ChatCompletionRequestUserMessageContent::Text(
                    "  Announce our launch!\n#rust  ".to_string()
                )
            ),
            other => panic!("expected a user turn, got {:?}", other),
        }
    }

    #[test]
    fn first_choice_text_is_returned_untrimmed() {
        let choices = vec![Some(" first ".to_string()), Some("second".to_string())];
        let text = first_choice_text(choices);
        assert_eq!(text.unwrap(), " first ");
    }

    #[test]
    fn empty_choices_are_malformed() {
        let err = first_choice_text(Vec::<Option<String>>::new()).unwrap_err();
        assert!(matches!(err, PortError::MalformedResponse(_)));
    }

    #[test]
    fn choice_without_content_is_malformed() {
        let err = first_choice_text(vec![None, Some("ignored".to_string())]).unwrap_err();
        assert!(matches!(err, PortError::MalformedResponse(_)));
    }
}
