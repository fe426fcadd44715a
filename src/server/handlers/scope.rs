use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use super::SessionActionResponse;
use crate::server::{
    config::AppState,
    error::ApiError,
    models::SessionRecord,
    services::prompts::scope_prompt,
};

pub const SCOPING_MESSAGE: &str = "Devin is analyzing the issue";

#[derive(Deserialize)]
pub struct ScopeRequest {
    pub repo: String,
    pub issue_number: u64,
    #[serde(default)]
    pub github_token: Option<String>,
    #[serde(default)]
    pub devin_api_key: Option<String>,
}

/// Starts a Devin session that scores and plans a GitHub issue.
pub async fn scope_issue(
    State(state): State<AppState>,
    Json(request): Json<ScopeRequest>,
) -> Result<Json<SessionActionResponse>, ApiError> {
    info!("Scoping issue {}#{}", request.repo, request.issue_number);
    let github_token = state.github_token(request.github_token)?;
    let devin_api_key = state.devin_api_key(request.devin_api_key)?;

    let issue = state
        .github_issue
        .get_issue(&request.repo, request.issue_number, &github_token)
        .await?;

    let prompt = scope_prompt(&issue, &request.repo);
    let created = state
        .devin
        .create_session(&devin_api_key, &prompt, &state.repo_url(&request.repo))
        .await?;

    let record = SessionRecord::scoping(request.repo, request.issue_number);
    let status = record.status.clone();
    state.sessions.put(created.session_id.clone(), record).await;

    Ok(Json(SessionActionResponse {
        session_id: created.session_id,
        status,
        message: SCOPING_MESSAGE.to_string(),
    }))
}
