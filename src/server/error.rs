use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use thiserror::Error;
use tracing::error;

/// The external services this proxy talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    GitHub,
    Devin,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::GitHub => write!(f, "GitHub"),
            Upstream::Devin => write!(f, "Devin"),
        }
    }
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} API error: request failed: {source}")]
    Transport {
        service: Upstream,
        #[source]
        source: reqwest::Error,
    },
    #[error("{service} API error: {status} - {body}")]
    Status {
        service: Upstream,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("{service} API error: invalid response body: {source}")]
    Decode {
        service: Upstream,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    pub fn service(&self) -> Upstream {
        match self {
            UpstreamError::Transport { service, .. }
            | UpstreamError::Status { service, .. }
            | UpstreamError::Decode { service, .. } => *service,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("Session not found")]
    SessionNotFound(String),
    #[error("{0} is required")]
    MissingCredential(&'static str),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MissingCredential(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            ApiError::Upstream(e) => error!("{}", e),
            ApiError::SessionNotFound(id) => error!("Unknown session requested: {}", id),
            ApiError::MissingCredential(name) => error!("Request missing credential: {}", name),
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
