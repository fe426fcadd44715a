#![allow(dead_code)]

use axum_test::TestServer;
use issue_scope_proxy::{app_router, configuration::Settings, AppState};
use serde_json::{json, Value};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const REPO: &str = "owner/repo";

pub struct TestApp {
    pub server: TestServer,
    pub github: MockServer,
    pub devin: MockServer,
    pub cache_path: PathBuf,
    _cache_dir: TempDir,
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> TestApp {
    init_logging();

    let github = MockServer::start().await;
    let devin = MockServer::start().await;
    let cache_dir = tempfile::tempdir().expect("Failed to create cache dir");
    let cache_path = cache_dir.path().join("confidence_scores.json");

    let mut settings = Settings::default();
    settings.github.api_base = github.uri();
    settings.devin.api_base = format!("{}/v1", devin.uri());
    settings.cache.path = cache_path.clone();
    settings.http.timeout_secs = 5;
    customize(&mut settings);

    let state = AppState::from_settings(&settings).expect("Failed to build app state");
    let server = TestServer::new(app_router(state)).expect("Failed to start test server");

    TestApp {
        server,
        github,
        devin,
        cache_path,
        _cache_dir: cache_dir,
    }
}

pub fn issue_json(number: u64) -> Value {
    json!({
        "number": number,
        "title": "Crash on startup",
        "body": "The app panics when the config file is missing.",
        "state": "open",
        "html_url": format!("https://github.com/{}/issues/{}", REPO, number),
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z",
        "labels": []
    })
}

impl TestApp {
    pub async fn mock_issue(&self, number: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{}/issues/{}", REPO, number)))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(number)))
            .mount(&self.github)
            .await;
    }

    pub async fn mock_create_session(&self, session_id: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/sessions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "session_id": session_id })),
            )
            .mount(&self.devin)
            .await;
    }

    pub fn session_body(status: &str, messages: &[&str]) -> Value {
        let messages: Vec<Value> = messages
            .iter()
            .map(|m| json!({ "type": "devin_message", "message": m }))
            .collect();
        json!({ "status": status, "messages": messages })
    }

    pub async fn scope(&self, number: u64) -> Value {
        let response = self
            .server
            .post("/api/scope")
            .json(&json!({
                "repo": REPO,
                "issue_number": number,
                "github_token": "gh-token",
                "devin_api_key": "devin-key"
            }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    pub async fn status(&self, session_id: &str) -> axum_test::TestResponse {
        self.server
            .get(&format!("/api/session/{}", session_id))
            .add_query_param("devin_api_key", "devin-key")
            .await
    }
}
