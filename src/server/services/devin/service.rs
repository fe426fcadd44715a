use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use super::types::{CreateSessionRequest, CreateSessionResponse, SendMessageRequest, SessionDetails};
use crate::server::error::{Upstream, UpstreamError};
use crate::server::services::upstream::{bearer, decode_json, send_checked};

/// Thin client for the Devin sessions API. The API key travels with each
/// call since callers supply their own.
#[derive(Debug, Clone)]
pub struct DevinService {
    client: Client,
    api_base: String,
    app_base: String,
}

impl DevinService {
    pub fn new(
        api_base: impl Into<String>,
        app_base: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            app_base: app_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Browser link for a session.
    pub fn session_url(&self, session_id: &str) -> String {
        format!("{}/sessions/{}", self.app_base, session_id)
    }

    pub async fn create_session(
        &self,
        api_key: &str,
        prompt: &str,
        repo_url: &str,
    ) -> Result<CreateSessionResponse, UpstreamError> {
        let url = format!("{}/sessions", self.api_base);
        debug!("Creating Devin session for {}", repo_url);

        let request = self
            .client
            .post(&url)
            .header("Authorization", bearer(api_key))
            .json(&CreateSessionRequest {
                prompt,
                repo_path_or_url: repo_url,
            });

        let response = send_checked(Upstream::Devin, request).await?;
        let created: CreateSessionResponse = decode_json(Upstream::Devin, response).await?;
        info!("Created Devin session {}", created.session_id);

        Ok(created)
    }

    pub async fn send_message(
        &self,
        api_key: &str,
        session_id: &str,
        message: &str,
    ) -> Result<(), UpstreamError> {
        let url = format!("{}/sessions/{}/message", self.api_base, session_id);
        debug!("Sending message to Devin session {}", session_id);

        let request = self
            .client
            .post(&url)
            .header("Authorization", bearer(api_key))
            .json(&SendMessageRequest { message });

        send_checked(Upstream::Devin, request).await?;
        Ok(())
    }

    pub async fn get_session(
        &self,
        api_key: &str,
        session_id: &str,
    ) -> Result<SessionDetails, UpstreamError> {
        let url = format!("{}/sessions/{}", self.api_base, session_id);
        debug!("Fetching Devin session {}", session_id);

        let request = self
            .client
            .get(&url)
            .header("Authorization", bearer(api_key));

        let response = send_checked(Upstream::Devin, request).await?;
        decode_json(Upstream::Devin, response).await
    }
}
