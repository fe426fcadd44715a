use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::server::{config::AppState, error::ApiError};

#[derive(Deserialize)]
pub struct ListIssuesParams {
    pub repo: String,
    #[serde(default)]
    pub github_token: Option<String>,
}

/// Proxies the open-issue list for a repository unchanged.
pub async fn list_issues(
    State(state): State<AppState>,
    Query(params): Query<ListIssuesParams>,
) -> Result<Json<Value>, ApiError> {
    info!("Listing open issues for {}", params.repo);
    let token = state.github_token(params.github_token)?;

    let issues = state
        .github_issue
        .list_open_issues(&params.repo, &token)
        .await?;

    Ok(Json(issues))
}
