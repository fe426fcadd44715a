use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::upstream::{bearer, decode_json, send_checked};
use crate::server::error::{Upstream, UpstreamError};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "issue-scope-proxy";

#[derive(Debug, Clone)]
pub struct GitHubIssueService {
    client: Client,
    api_base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubIssue {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub state: String,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub labels: Vec<serde_json::Value>,
}

impl GitHubIssueService {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn get(&self, url: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("Authorization", bearer(token))
            .header("Accept", GITHUB_ACCEPT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    /// `repo` is the `owner/name` slug.
    pub async fn get_issue(
        &self,
        repo: &str,
        issue_number: u64,
        token: &str,
    ) -> Result<GitHubIssue, UpstreamError> {
        let url = format!("{}/repos/{}/issues/{}", self.api_base, repo, issue_number);
        debug!("Fetching issue: {}", url);

        let response = send_checked(Upstream::GitHub, self.get(&url, token)).await?;
        decode_json(Upstream::GitHub, response).await
    }

    /// Open issues for `repo`, returned exactly as GitHub sent them.
    pub async fn list_open_issues(
        &self,
        repo: &str,
        token: &str,
    ) -> Result<serde_json::Value, UpstreamError> {
        let url = format!("{}/repos/{}/issues", self.api_base, repo);
        debug!("Listing open issues: {}", url);

        let request = self.get(&url, token).query(&[("state", "open")]);
        let response = send_checked(Upstream::GitHub, request).await?;
        decode_json(Upstream::GitHub, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    fn issue_json(number: u64) -> serde_json::Value {
        json!({
            "number": number,
            "title": "Crash on startup",
            "body": null,
            "state": "open",
            "html_url": format!("https://github.com/owner/repo/issues/{}", number),
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-02T00:00:00Z",
            "labels": [{"name": "bug"}]
        })
    }

    fn service(server: &MockServer) -> GitHubIssueService {
        GitHubIssueService::new(server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn get_issue_sends_github_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/12"))
            .and(header("Authorization", "Bearer gh-token"))
            .and(header("Accept", GITHUB_ACCEPT))
            .and(header("X-GitHub-Api-Version", GITHUB_API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(12)))
            .expect(1)
            .mount(&server)
            .await;

        let issue = service(&server)
            .get_issue("owner/repo", 12, "gh-token")
            .await
            .unwrap();

        assert_eq!(issue.number, 12);
        assert_eq!(issue.title, "Crash on startup");
        assert!(issue.body.is_none());
        assert_eq!(issue.labels.len(), 1);
    }

    #[tokio::test]
    async fn list_open_issues_passes_body_through() {
        let server = MockServer::start().await;
        let body = json!([issue_json(1), {"number": 2, "anything": "else"}]);
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues"))
            .and(query_param("state", "open"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&server)
            .await;

        let issues = service(&server)
            .list_open_issues("owner/repo", "gh-token")
            .await
            .unwrap();

        assert_eq!(issues, body);
    }

    #[tokio::test]
    async fn non_success_status_is_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/owner/repo/issues/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let err = service(&server)
            .get_issue("owner/repo", 404, "gh-token")
            .await
            .unwrap_err();

        match err {
            UpstreamError::Status {
                service,
                status,
                body,
            } => {
                assert_eq!(service, Upstream::GitHub);
                assert_eq!(status.as_u16(), 404);
                assert_eq!(body, "Not Found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
