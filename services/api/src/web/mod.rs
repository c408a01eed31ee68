pub mod protocol;
pub mod rest;
pub mod state;
pub mod ws_handler;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

// Re-export the main handlers to make them easily accessible
// to the binary that builds the web server router.
pub use rest::{
    create_session_handler, delete_session_handler, get_session_handler, list_platforms_handler,
    reset_session_handler, select_platform_handler, submit_message_handler, submit_rating_handler,
};
pub use ws_handler::ws_handler;

use state::AppState;

/// All API routes, with the shared state attached.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/platforms", get(list_platforms_handler))
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/{session_id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/{session_id}/platform", put(select_platform_handler))
        .route("/sessions/{session_id}/messages", post(submit_message_handler))
        .route("/sessions/{session_id}/ratings", post(submit_rating_handler))
        .route("/sessions/{session_id}/reset", post(reset_session_handler))
        .route("/ws", get(ws_handler))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_state, failing, replying};
    use crate::web::rest::{
        CreateSessionResponse, ErrorResponse, PlatformResponse, RatingResponse, ResetResponse,
        SessionView, TurnResponse,
    };
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use serde::de::DeserializeOwned;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn call(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
        serde_json::from_slice(bytes).unwrap()
    }

    async fn create_session(state: &Arc<AppState>) -> Uuid {
        let (status, body) = call(state, Method::POST, "/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        parse::<CreateSessionResponse>(&body).session_id
    }

    #[tokio::test]
    async fn platforms_are_listed_in_selector_order() {
        let state = app_state(replying("x"));

        let (status, body) = call(&state, Method::GET, "/platforms", None).await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<String> = parse::<Vec<PlatformResponse>>(&body)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Twitter/X", "Facebook", "LinkedIn", "Instagram", "General"]);
    }

    #[tokio::test]
    async fn new_session_starts_empty_on_general() {
        let state = app_state(replying("x"));
        let id = create_session(&state).await;

        let (status, body) = call(&state, Method::GET, &format!("/sessions/{id}"), None).await;

        assert_eq!(status, StatusCode::OK);
        let view: SessionView = parse(&body);
        assert_eq!(view.session_id, id);
        assert_eq!(view.active_platform.name, "General");
        assert_eq!(view.title, "Social Media AI Assistant - General");
        assert!(view.messages.is_empty());
        assert_eq!(view.analytics.average_rating, None);
        assert_eq!(view.analytics.average_rating_display, "N/A");
        assert!(!view.can_reset);
    }

    #[tokio::test]
    async fn twitter_submission_with_failing_model_is_still_a_turn() {
        let service = failing("quota exceeded");
        let state = app_state(service.clone());
        let id = create_session(&state).await;

        let (status, _) = call(
            &state,
            Method::PUT,
            &format!("/sessions/{id}/platform"),
            Some(json!({ "platform": "Twitter/X" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            &state,
            Method::POST,
            &format!("/sessions/{id}/messages"),
            Some(json!({ "content": "Announce our new product launch" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let turn: TurnResponse = parse(&body);
        assert!(turn.generation_failed);
        assert!(turn
            .assistant_message
            .content
            .starts_with("Error generating response: "));
        assert_eq!(turn.user_message.role, "user");
        assert_eq!(turn.assistant_message.platform, "Twitter/X");
        assert_eq!(service.calls()[0].max_output_tokens, 280);
    }

    #[tokio::test]
    async fn ratings_update_the_average() {
        let state = app_state(replying("Great post"));
        let id = create_session(&state).await;
        let uri = format!("/sessions/{id}/ratings");

        for value in [4, 5] {
            let (status, _) = call(&state, Method::POST, &uri, Some(json!({ "value": value }))).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (_, body) = call(&state, Method::POST, &uri, Some(json!({ "value": 3 }))).await;
        let rating: RatingResponse = parse(&body);

        assert_eq!(rating.value, 3);
        assert_eq!(rating.analytics.average_rating, Some(4.0));
        assert_eq!(rating.analytics.average_rating_display, "4.0 ⭐");
    }

    #[tokio::test]
    async fn caller_mistakes_are_rejected_with_400() {
        let state = app_state(replying("x"));
        let id = create_session(&state).await;

        let cases = [
            ("ratings", Method::POST, json!({ "value": 6 })),
            ("ratings", Method::POST, json!({ "value": 0 })),
            ("platform", Method::PUT, json!({ "platform": "MySpace" })),
            ("messages", Method::POST, json!({ "content": "   " })),
            ("ratings", Method::POST, json!({ "value": 2.5 })),
            ("ratings", Method::POST, json!({ "value": "3" })),
            ("ratings", Method::POST, json!({ "rating": 3 })),
            ("messages", Method::POST, json!({ "text": "hello" })),
        ];
        for (path, method, body) in cases {
            let (status, bytes) =
                call(&state, method, &format!("/sessions/{id}/{path}"), Some(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{path}: {body}");
            assert!(!parse::<ErrorResponse>(&bytes).error.is_empty());
        }
    }

    #[tokio::test]
    async fn two_turns_then_reset_clears_history() {
        let state = app_state(replying("Done"));
        let id = create_session(&state).await;

        for content in ["first", "second"] {
            call(
                &state,
                Method::POST,
                &format!("/sessions/{id}/messages"),
                Some(json!({ "content": content })),
            )
            .await;
        }
        let (_, body) = call(&state, Method::GET, &format!("/sessions/{id}"), None).await;
        let view: SessionView = parse(&body);
        assert_eq!(view.messages.len(), 4);
        assert_eq!(view.analytics.total_interactions, 4);
        assert!(view.can_reset);

        let (status, body) = call(&state, Method::POST, &format!("/sessions/{id}/reset"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(parse::<ResetResponse>(&body).cleared);

        let (_, body) = call(&state, Method::GET, &format!("/sessions/{id}"), None).await;
        let view: SessionView = parse(&body);
        assert!(view.messages.is_empty());
        assert!(view.ratings.is_empty());
    }

    #[tokio::test]
    async fn sessions_are_isolated_and_can_be_ended() {
        let state = app_state(replying("Hi"));
        let first = create_session(&state).await;
        let second = create_session(&state).await;

        call(
            &state,
            Method::POST,
            &format!("/sessions/{first}/messages"),
            Some(json!({ "content": "only in first" })),
        )
        .await;

        let (_, body) = call(&state, Method::GET, &format!("/sessions/{second}"), None).await;
        assert!(parse::<SessionView>(&body).messages.is_empty());

        let (status, _) = call(&state, Method::DELETE, &format!("/sessions/{first}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.sessions.count().await, 1);

        let (status, _) = call(&state, Method::GET, &format!("/sessions/{first}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
