use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::ALLOW},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::consts::{METHOD_NOT_ALLOWED, UPSTREAM_FAILED};
use crate::upstream::Rejection;

use super::models::ErrorResponse;

/// Everything the relay can answer with instead of `{"answer": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", METHOD_NOT_ALLOWED)]
    MethodNotAllowed,
    #[error("Invalid JSON body")]
    InvalidBody,
    #[error("{}", UPSTREAM_FAILED)]
    UpstreamFailed,
    #[error("{0}")]
    Rejected(Rejection),
    #[error("Not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidBody => StatusCode::BAD_REQUEST,
            Self::UpstreamFailed => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Rejected(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        if matches!(self, Self::MethodNotAllowed) {
            return (status, [(ALLOW, HeaderValue::from_static("POST"))], body).into_response();
        }
        (status, body).into_response()
    }
}
