use axum::{Json, body::Bytes, extract::State, response::Html};
use serde_json::{Value, json};

use crate::consts::FALLBACK_ANSWER;
use crate::upstream::Reply;

use super::AppState;
use super::error::ApiError;
use super::models::{ChatRequest, ChatResponse};

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// `POST /api/chat`: one question in, one answer out. Single attempt, no retry.
pub async fn chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = ChatRequest::from_body(&body).map_err(|e| {
        log::warn!("rejecting chat request body: {e}");
        ApiError::InvalidBody
    })?;
    let question = request.question_text();
    log::info!("relaying question ({} chars)", question.chars().count());

    match state.upstream.ask(&question).await {
        Ok(Reply::Answer(answer)) => Ok(Json(ChatResponse { answer })),
        Ok(Reply::NoAnswer(_)) => Ok(Json(ChatResponse {
            answer: FALLBACK_ANSWER.to_string(),
        })),
        Ok(Reply::Rejected(rejection)) => {
            log::warn!("{rejection}");
            Err(ApiError::Rejected(rejection))
        }
        Err(e) => {
            log::error!("Gemini API error: {e:#}");
            Err(ApiError::UpstreamFailed)
        }
    }
}

/// Any method on `/api/chat` other than POST. The body is never read.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// `GET /`: the voice bot page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
