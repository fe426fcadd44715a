use serde::{Deserialize, Serialize};

/// Message type Devin uses for text it authored itself.
pub const DEVIN_MESSAGE_TYPE: &str = "devin_message";

#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub prompt: &'a str,
    pub repo_path_or_url: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionMessage {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionDetails {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<SessionMessage>>,
}

impl SessionDetails {
    pub fn status_or_unknown(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }

    /// Devin's own messages in order, one per line.
    pub fn agent_transcript(&self) -> String {
        self.messages
            .iter()
            .flatten()
            .filter(|m| m.kind.as_deref() == Some(DEVIN_MESSAGE_TYPE))
            .map(|m| m.message.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
