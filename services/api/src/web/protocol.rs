//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the API server.
//! Every connection owns exactly one chat session.

use crate::web::rest::{AnalyticsResponse, MessageResponse, PlatformResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Switches the platform used for the next submissions.
    SelectPlatform { platform: String },

    /// Submits the user's text for a generated reply.
    SubmitText { content: String },

    /// Rates the most recent reply (1 to 5).
    SubmitRating { value: i64 },

    /// Clears the conversation history and ratings.
    Reset,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once, right after the connection opens.
    SessionStarted {
        session_id: Uuid,
        title: String,
        active_platform: PlatformResponse,
        platforms: Vec<PlatformResponse>,
    },

    PlatformSelected {
        title: String,
        platform: PlatformResponse,
    },

    /// A user or assistant message was added to the history.
    MessageAppended { message: MessageResponse },

    /// The server is waiting on the model. The UI can show a spinner.
    GenerationStarted,

    /// The model call finished; `failed` tells whether the reply is an error description.
    GenerationEnded { failed: bool },

    RatingRecorded {
        value: u8,
        analytics: AnalyticsResponse,
    },

    ConversationReset { analytics: AnalyticsResponse },

    /// Reports a rejected action. The session stays usable.
    Error { message: String },
}
