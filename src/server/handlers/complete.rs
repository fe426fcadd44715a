use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use super::SessionActionResponse;
use crate::server::{
    config::AppState,
    error::ApiError,
    models::{session::STATUS_IMPLEMENTING, SessionRecord},
    services::prompts::{implementation_prompt, PROCEED_WITH_IMPLEMENTATION},
};

pub const IMPLEMENTING_MESSAGE: &str = "Devin is working on completing the issue";

#[derive(Deserialize)]
pub struct CompleteRequest {
    pub repo: String,
    pub issue_number: u64,
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default)]
    pub devin_api_key: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Asks Devin to implement an issue, continuing a known session when one is
/// given and starting a fresh one otherwise.
pub async fn complete_issue(
    State(state): State<AppState>,
    Json(request): Json<CompleteRequest>,
) -> Result<Json<SessionActionResponse>, ApiError> {
    info!("Completing issue {}#{}", request.repo, request.issue_number);
    let devin_api_key = state.devin_api_key(request.devin_api_key)?;

    let mut known_session = None;
    if let Some(id) = request.session_id {
        if state.sessions.contains(&id).await {
            known_session = Some(id);
        } else {
            info!("Session {} is unknown, starting a new one", id);
        }
    }

    let session_id = match known_session {
        Some(session_id) => {
            state
                .devin
                .send_message(&devin_api_key, &session_id, PROCEED_WITH_IMPLEMENTATION)
                .await?;
            state
                .sessions
                .update_status(&session_id, STATUS_IMPLEMENTING)
                .await;
            session_id
        }
        None => {
            let github_token = state.github_token(request.github_token)?;
            let issue = state
                .github_issue
                .get_issue(&request.repo, request.issue_number, &github_token)
                .await?;

            let prompt = implementation_prompt(&issue, &request.repo);
            let created = state
                .devin
                .create_session(&devin_api_key, &prompt, &state.repo_url(&request.repo))
                .await?;

            state
                .sessions
                .put(
                    created.session_id.clone(),
                    SessionRecord::implementing(request.repo, request.issue_number),
                )
                .await;
            created.session_id
        }
    };

    Ok(Json(SessionActionResponse {
        session_id,
        status: STATUS_IMPLEMENTING.to_string(),
        message: IMPLEMENTING_MESSAGE.to_string(),
    }))
}
