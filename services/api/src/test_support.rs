//! Shared fixtures for the service's tests.

use crate::web::state::AppState;
use social_assistant_core::ports::PortError;
use social_assistant_core::testing::ScriptedGenerationService;
use std::sync::Arc;

/// Stands in for the hosted model with a canned reply.
pub fn replying(text: &str) -> Arc<ScriptedGenerationService> {
    Arc::new(ScriptedGenerationService::replying(text))
}

/// Stands in for the hosted model with a canned failure.
pub fn failing(reason: &str) -> Arc<ScriptedGenerationService> {
    Arc::new(ScriptedGenerationService::failing(PortError::Unexpected(
        reason.to_string(),
    )))
}

pub fn app_state(service: Arc<ScriptedGenerationService>) -> Arc<AppState> {
    Arc::new(AppState::new(service))
}
