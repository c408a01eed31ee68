//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::{AppState, SessionHandle};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use social_assistant_core::{
    platform, Analytics, Message, PlatformProfile, Role, SessionController, SessionError, Turn,
};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_platforms_handler,
        create_session_handler,
        get_session_handler,
        delete_session_handler,
        select_platform_handler,
        submit_message_handler,
        submit_rating_handler,
        reset_session_handler,
    ),
    components(
        schemas(
            PlatformResponse,
            CreateSessionResponse,
            SessionView,
            MessageResponse,
            AnalyticsResponse,
            SelectPlatformRequest,
            SubmitMessageRequest,
            TurnResponse,
            RatingRequest,
            RatingResponse,
            ResetResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Social Media Assistant API", description = "Platform-tailored post writing with chat history and feedback.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct PlatformResponse {
    pub name: String,
    pub max_length: u32,
    pub tone: String,
}

impl From<PlatformProfile> for PlatformResponse {
    fn from(profile: PlatformProfile) -> Self {
        Self {
            name: profile.name.to_string(),
            max_length: profile.max_length,
            tone: profile.tone.to_string(),
        }
    }
}

/// A chat history entry as rendered by the client.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct MessageResponse {
    pub id: Uuid,
    /// `user` or `assistant`.
    pub role: String,
    pub content: String,
    pub platform: String,
    pub time: String,
    pub caption: String,
}

impl From<&Message> for MessageResponse {
    fn from(msg: &Message) -> Self {
        let role = match msg.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            id: msg.id,
            role: role.to_string(),
            content: msg.content.clone(),
            platform: msg.platform.clone(),
            time: msg.time.clone(),
            caption: msg.caption(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct AnalyticsResponse {
    pub total_interactions: usize,
    /// `null` until the first rating arrives.
    pub average_rating: Option<f64>,
    /// The average to one decimal place, or `N/A`.
    pub average_rating_display: String,
}

impl From<Analytics> for AnalyticsResponse {
    fn from(analytics: Analytics) -> Self {
        Self {
            average_rating_display: analytics.average_rating_display(),
            total_interactions: analytics.total_interactions,
            average_rating: analytics.average_rating,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub active_platform: PlatformResponse,
}

/// Everything the client needs to draw a session.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SessionView {
    pub session_id: Uuid,
    pub title: String,
    pub active_platform: PlatformResponse,
    pub messages: Vec<MessageResponse>,
    pub ratings: Vec<u8>,
    pub analytics: AnalyticsResponse,
    /// Whether the "Clear Conversation" action should be offered.
    pub can_reset: bool,
}

impl SessionView {
    pub fn from_controller(session: &SessionController) -> Self {
        let snapshot = session.snapshot();
        Self {
            session_id: session.id(),
            title: session.title(),
            active_platform: session.active_platform().into(),
            messages: snapshot.messages.iter().map(MessageResponse::from).collect(),
            ratings: snapshot.ratings.iter().map(|r| r.value()).collect(),
            analytics: session.analytics().into(),
            can_reset: session.has_history(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct SelectPlatformRequest {
    pub platform: String,
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct SubmitMessageRequest {
    pub content: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TurnResponse {
    pub user_message: MessageResponse,
    pub assistant_message: MessageResponse,
    /// True when the assistant message carries an error description instead of a reply.
    pub generation_failed: bool,
}

impl From<&Turn> for TurnResponse {
    fn from(turn: &Turn) -> Self {
        Self {
            user_message: (&turn.user_message).into(),
            assistant_message: (&turn.assistant_message).into(),
            generation_failed: turn.outcome.is_failure(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, ToSchema)]
pub struct RatingRequest {
    pub value: i64,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct RatingResponse {
    pub value: u8,
    pub analytics: AnalyticsResponse,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ResetResponse {
    /// False when the conversation was already empty.
    pub cleared: bool,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Session errors are caller mistakes (bad platform, bad rating, empty text).
fn session_error(e: SessionError) -> HandlerError {
    warn!("Rejected session action: {}", e);
    error_response(StatusCode::BAD_REQUEST, e.to_string())
}

/// Malformed or mistyped bodies get the same 400 contract as session errors.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HandlerError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        error_response(StatusCode::BAD_REQUEST, rejection.body_text())
    })
}

async fn find_session(state: &AppState, session_id: Uuid) -> Result<SessionHandle, HandlerError> {
    state.sessions.get(session_id).await.ok_or_else(|| {
        error_response(
            StatusCode::NOT_FOUND,
            format!("Session not found: {}", session_id),
        )
    })
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the supported platforms in selector order.
#[utoipa::path(
    get,
    path = "/platforms",
    responses(
        (status = 200, description = "All supported platforms", body = [PlatformResponse])
    )
)]
pub async fn list_platforms_handler() -> Json<Vec<PlatformResponse>> {
    Json(platform::all().iter().copied().map(PlatformResponse::from).collect())
}

/// Start a new chat session on the default platform.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = CreateSessionResponse)
    )
)]
pub async fn create_session_handler(State(app_state): State<Arc<AppState>>) -> impl IntoResponse {
    let controller = app_state.new_controller();
    let active_platform = controller.active_platform().into();
    let (session_id, _) = app_state.sessions.insert(controller).await;
    info!("Created session {}", session_id);

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            active_platform,
        }),
    )
}

/// Fetch the history, analytics and settings of a session.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The session to read.")),
    responses(
        (status = 200, description = "Current session view", body = SessionView),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, HandlerError> {
    let handle = find_session(&app_state, session_id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionView::from_controller(&session)))
}

/// End a session and discard its conversation.
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}",
    params(("session_id" = Uuid, Path, description = "The session to end.")),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn delete_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, HandlerError> {
    match app_state.sessions.remove(session_id).await {
        Some(_) => {
            info!("Ended session {}", session_id);
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(error_response(
            StatusCode::NOT_FOUND,
            format!("Session not found: {}", session_id),
        )),
    }
}

/// Change the platform that subsequent messages are written for.
#[utoipa::path(
    put,
    path = "/sessions/{session_id}/platform",
    params(("session_id" = Uuid, Path, description = "The session to update.")),
    request_body = SelectPlatformRequest,
    responses(
        (status = 200, description = "Platform selected", body = PlatformResponse),
        (status = 400, description = "Unknown platform", body = ErrorResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn select_platform_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    payload: Result<Json<SelectPlatformRequest>, JsonRejection>,
) -> Result<Json<PlatformResponse>, HandlerError> {
    let req = json_body(payload)?;
    let handle = find_session(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    let profile = session.select_platform(&req.platform).map_err(session_error)?;
    Ok(Json(profile.into()))
}

/// Submit text and receive the generated reply.
///
/// Generation failures still return 200; the assistant message then carries
/// the error description and `generation_failed` is true.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/messages",
    params(("session_id" = Uuid, Path, description = "The session to write in.")),
    request_body = SubmitMessageRequest,
    responses(
        (status = 200, description = "Turn completed", body = TurnResponse),
        (status = 400, description = "Empty message", body = ErrorResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn submit_message_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    payload: Result<Json<SubmitMessageRequest>, JsonRejection>,
) -> Result<Json<TurnResponse>, HandlerError> {
    let req = json_body(payload)?;
    let handle = find_session(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    let turn = session.submit_text(&req.content).await.map_err(session_error)?;
    Ok(Json(TurnResponse::from(&turn)))
}

/// Rate the most recent reply from 1 to 5.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/ratings",
    params(("session_id" = Uuid, Path, description = "The session being rated.")),
    request_body = RatingRequest,
    responses(
        (status = 200, description = "Rating recorded", body = RatingResponse),
        (status = 400, description = "Rating out of range or malformed body", body = ErrorResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn submit_rating_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    payload: Result<Json<RatingRequest>, JsonRejection>,
) -> Result<Json<RatingResponse>, HandlerError> {
    let req = json_body(payload)?;
    let handle = find_session(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    let rating = session.submit_rating(req.value).map_err(session_error)?;
    Ok(Json(RatingResponse {
        value: rating.value(),
        analytics: session.analytics().into(),
    }))
}

/// Clear the conversation history and ratings.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/reset",
    params(("session_id" = Uuid, Path, description = "The session to clear.")),
    responses(
        (status = 200, description = "Reset processed", body = ResetResponse),
        (status = 404, description = "Unknown session", body = ErrorResponse)
    )
)]
pub async fn reset_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ResetResponse>, HandlerError> {
    let handle = find_session(&app_state, session_id).await?;
    let mut session = handle.lock().await;
    Ok(Json(ResetResponse {
        cleared: session.reset(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/platforms",
            "/sessions",
            "/sessions/{session_id}",
            "/sessions/{session_id}/platform",
            "/sessions/{session_id}/messages",
            "/sessions/{session_id}/ratings",
            "/sessions/{session_id}/reset",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "{expected}");
        }
    }

    #[test]
    fn message_response_carries_caption_and_role() {
        let msg = Message::new(Role::Assistant, "Hello", "LinkedIn");
        let response = MessageResponse::from(&msg);
        assert_eq!(response.role, "assistant");
        assert_eq!(response.caption, format!("LinkedIn - {}", msg.time));
        assert_eq!(response.id, msg.id);
    }
}
