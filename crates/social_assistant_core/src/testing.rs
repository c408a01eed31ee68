//! Test doubles for the core ports.

use crate::ports::{GenerationRequest, PortError, PortResult, TextGenerationService};
use async_trait::async_trait;
use std::sync::Mutex;

/// A generation service that always answers the same way and records each request.
pub struct ScriptedGenerationService {
    reply: PortResult<String>,
    calls: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerationService {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: PortError) -> Self {
        Self {
            reply: Err(error),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GenerationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerationService for ScriptedGenerationService {
    async fn generate_text(&self, request: GenerationRequest) -> PortResult<String> {
        self.calls.lock().unwrap().push(request);
        self.reply.clone()
    }
}
