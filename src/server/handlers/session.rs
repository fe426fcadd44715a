use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::server::{
    config::AppState,
    error::ApiError,
    services::{session_status::describe_session, SessionStatusResponse},
};

#[derive(Deserialize)]
pub struct SessionStatusParams {
    #[serde(default)]
    pub devin_api_key: Option<String>,
}

pub async fn get_session_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(params): Query<SessionStatusParams>,
) -> Result<Json<SessionStatusResponse>, ApiError> {
    let record = state
        .sessions
        .get(&session_id)
        .await
        .ok_or_else(|| ApiError::SessionNotFound(session_id.clone()))?;
    let devin_api_key = state.devin_api_key(params.devin_api_key)?;

    let details = state.devin.get_session(&devin_api_key, &session_id).await?;
    info!(
        "Session {} reports status {}",
        session_id,
        details.status_or_unknown()
    );

    let response = describe_session(
        &state.confidence,
        &session_id,
        state.devin.session_url(&session_id),
        record,
        &details,
    )
    .await;

    Ok(Json(response))
}
