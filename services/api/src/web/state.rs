//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the registry of live chat sessions.

use social_assistant_core::{ports::TextGenerationService, ResponseGenerator, SessionController};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub generation_adapter: Arc<dyn TextGenerationService>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(generation_adapter: Arc<dyn TextGenerationService>) -> Self {
        Self {
            generation_adapter,
            sessions: SessionRegistry::default(),
        }
    }

    /// A fresh controller wired to the shared generation adapter.
    pub fn new_controller(&self) -> SessionController {
        SessionController::new(ResponseGenerator::new(self.generation_adapter.clone()))
    }
}

//=========================================================================================
// SessionRegistry (One Entry per Live Session)
//=========================================================================================

/// A handle to one session. The lock is held for a whole action, generation included,
/// so a session processes its actions strictly one at a time.
pub type SessionHandle = Arc<Mutex<SessionController>>;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, controller: SessionController) -> (Uuid, SessionHandle) {
        let id = controller.id();
        let handle = Arc::new(Mutex::new(controller));
        self.sessions.lock().await.insert(id, handle.clone());
        (id, handle)
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.lock().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.lock().await.remove(&id)
    }

    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
