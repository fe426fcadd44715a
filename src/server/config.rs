use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::configuration::Settings;
use crate::server::{
    error::ApiError,
    handlers::{
        complete::complete_issue, health::healthz, issues::list_issues, scope::scope_issue,
        session::get_session_status,
    },
    services::{ConfidenceCache, DevinService, GitHubIssueService, SessionRegistry},
};

/// Credentials used when a request doesn't carry its own.
#[derive(Debug, Clone, Default)]
pub struct DefaultCredentials {
    pub github_token: Option<Secret<String>>,
    pub devin_api_key: Option<Secret<String>>,
}

#[derive(Clone)]
pub struct AppState {
    pub github_issue: Arc<GitHubIssueService>,
    pub devin: Arc<DevinService>,
    pub sessions: SessionRegistry,
    pub confidence: Arc<ConfidenceCache>,
    pub credentials: Arc<DefaultCredentials>,
    pub github_web_base: Arc<str>,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let timeout = settings.http.timeout();

        Ok(Self {
            github_issue: Arc::new(GitHubIssueService::new(
                settings.github.api_base.clone(),
                timeout,
            )?),
            devin: Arc::new(DevinService::new(
                settings.devin.api_base.clone(),
                settings.devin.app_base.clone(),
                timeout,
            )?),
            sessions: SessionRegistry::new(),
            confidence: Arc::new(ConfidenceCache::new(settings.cache.path.clone())),
            credentials: Arc::new(DefaultCredentials {
                github_token: settings.github.token.clone(),
                devin_api_key: settings.devin.api_key.clone(),
            }),
            github_web_base: settings.github.web_base.trim_end_matches('/').into(),
        })
    }

    pub fn github_token(&self, supplied: Option<String>) -> Result<String, ApiError> {
        pick_credential(supplied, &self.credentials.github_token, "github_token")
    }

    pub fn devin_api_key(&self, supplied: Option<String>) -> Result<String, ApiError> {
        pick_credential(supplied, &self.credentials.devin_api_key, "devin_api_key")
    }

    /// Clone URL handed to Devin for `repo` (`owner/name`).
    pub fn repo_url(&self, repo: &str) -> String {
        format!("{}/{}", self.github_web_base, repo)
    }
}

fn pick_credential(
    supplied: Option<String>,
    fallback: &Option<Secret<String>>,
    name: &'static str,
) -> Result<String, ApiError> {
    let present = |value: &String| !value.trim().is_empty();

    supplied
        .filter(present)
        .or_else(|| {
            fallback
                .as_ref()
                .map(|s| s.expose_secret().clone())
                .filter(present)
        })
        .ok_or(ApiError::MissingCredential(name))
}

pub fn configure_app(settings: &Settings) -> anyhow::Result<Router> {
    let state = AppState::from_settings(settings)?;
    Ok(app_router(state))
}

async fn log_request(request: Request, next: Next) -> Response {
    info!("{} {}", request.method(), request.uri().path());
    next.run(request).await
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/issues", get(list_issues))
        .route("/api/scope", post(scope_issue))
        .route("/api/complete", post(complete_issue))
        .route("/api/session/:session_id", get(get_session_status))
        .layer(middleware::from_fn(log_request))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
