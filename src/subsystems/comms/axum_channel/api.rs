//! Axum handlers for `/api/*` routes.
//!
//! Every handler goes through [`CommsState`](super::super::CommsState), so
//! replies are resolved (and logged) on the supervisor task like console
//! input.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::subsystems::agents::{FALLBACK_REPLY, KNOWLEDGE_TABLE, hadith::not_found_reply};
use crate::subsystems::comms::CommsEvent;
use super::AxumState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
pub(super) struct MessageRequest {
    message: String,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Deserialize)]
pub(super) struct AskRequest {
    #[serde(default)]
    question: String,
}

/// Build a JSON error response body.
fn json_error(code: &str, msg: impl std::fmt::Display) -> Json<serde_json::Value> {
    Json(json!({ "error": code, "message": format!("{msg}") }))
}

fn timeout_response(what: &str) -> Response {
    (
        StatusCode::GATEWAY_TIMEOUT,
        json_error("timeout", format!("{what} request timed out")),
    )
        .into_response()
}

/// GET /api/health
pub(super) async fn health(State(state): State<AxumState>) -> Response {
    match tokio::time::timeout(REQUEST_TIMEOUT, state.comms.stats()).await {
        Ok(Ok(stats)) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "hadiths": stats.hadiths,
                "knowledge_entries": stats.knowledge_entries,
            })),
        )
            .into_response(),
        Ok(Err(e)) => {
            warn!(channel_id = %state.channel_id, "health request failed: {e}");
            (StatusCode::BAD_GATEWAY, json_error("internal", e)).into_response()
        }
        Err(_) => timeout_response("health"),
    }
}

/// POST /api/message: one chat turn. Issues a session id when the client
/// has none yet.
pub(super) async fn message(
    State(state): State<AxumState>,
    Json(req): Json<MessageRequest>,
) -> Response {
    let session_id = match req.session_id.filter(|s| !s.trim().is_empty()) {
        Some(id) => id,
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            state.comms.report_event(CommsEvent::SessionStarted {
                channel_id: state.channel_id.to_string(),
                session_id: id.clone(),
            });
            id
        }
    };

    match tokio::time::timeout(
        REQUEST_TIMEOUT,
        state
            .comms
            .send_message(&state.channel_id, Some(session_id.clone()), req.message),
    )
    .await
    {
        Ok(Ok(reply)) => {
            let body = json!({
                "session_id": session_id,
                "reply": reply.as_deref().unwrap_or(FALLBACK_REPLY),
            });
            (StatusCode::OK, Json(body)).into_response()
        }
        Ok(Err(e)) => {
            warn!(channel_id = %state.channel_id, "message send failed: {e}");
            (StatusCode::BAD_GATEWAY, json_error("internal", e)).into_response()
        }
        Err(_) => timeout_response("message"),
    }
}

/// POST /api/ask: stateless question/answer.
pub(super) async fn ask(
    State(state): State<AxumState>,
    Json(req): Json<AskRequest>,
) -> Response {
    if req.question.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Question required" }))).into_response();
    }

    match tokio::time::timeout(
        REQUEST_TIMEOUT,
        state.comms.send_message(&state.channel_id, None, req.question.clone()),
    )
    .await
    {
        Ok(Ok(reply)) => (
            StatusCode::OK,
            Json(json!({
                "question": req.question,
                "answer": reply.as_deref().unwrap_or(FALLBACK_REPLY),
            })),
        )
            .into_response(),
        Ok(Err(e)) => {
            warn!(channel_id = %state.channel_id, "ask failed: {e}");
            (StatusCode::BAD_GATEWAY, json_error("internal", e)).into_response()
        }
        Err(_) => timeout_response("ask"),
    }
}

/// GET /api/knowledge: the fixed question list, in table order.
pub(super) async fn knowledge() -> Response {
    let entries: Vec<_> = KNOWLEDGE_TABLE
        .iter()
        .map(|e| json!({ "key": e.key, "question": e.question }))
        .collect();
    (StatusCode::OK, Json(entries)).into_response()
}

/// GET /api/hadith/random
pub(super) async fn random_hadith(State(state): State<AxumState>) -> Response {
    match tokio::time::timeout(REQUEST_TIMEOUT, state.comms.random_hadith()).await {
        Ok(Ok(Some(hadith))) => (StatusCode::OK, Json(hadith)).into_response(),
        Ok(Ok(None)) => (StatusCode::NOT_FOUND, json_error("not_found", "hadith corpus is empty")).into_response(),
        Ok(Err(e)) => {
            warn!(channel_id = %state.channel_id, "random hadith failed: {e}");
            (StatusCode::BAD_GATEWAY, json_error("internal", e)).into_response()
        }
        Err(_) => timeout_response("hadith"),
    }
}

/// GET /api/hadith/{number}
pub(super) async fn hadith_by_number(
    State(state): State<AxumState>,
    Path(number): Path<u64>,
) -> Response {
    match tokio::time::timeout(REQUEST_TIMEOUT, state.comms.hadith_by_number(number)).await {
        Ok(Ok(Some(hadith))) => (StatusCode::OK, Json(hadith)).into_response(),
        Ok(Ok(None)) => (StatusCode::NOT_FOUND, json_error("not_found", not_found_reply(number))).into_response(),
        Ok(Err(e)) => {
            warn!(channel_id = %state.channel_id, "hadith lookup failed: {e}");
            (StatusCode::BAD_GATEWAY, json_error("internal", e)).into_response()
        }
        Err(_) => timeout_response("hadith"),
    }
}
