pub mod conversation;
pub mod domain;
pub mod generator;
pub mod platform;
pub mod ports;
pub mod session;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use conversation::{ConversationSnapshot, ConversationStore, StoreError};
pub use domain::{Message, PlatformProfile, Rating, Role};
pub use generator::{GenerationOutcome, ResponseGenerator};
pub use platform::CatalogError;
pub use ports::{GenerationRequest, PortError, PortResult, TextGenerationService};
pub use session::{Analytics, SessionController, SessionError, SessionPhase, Turn};
