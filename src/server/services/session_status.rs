use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::confidence::parse_confidence_and_plan;
use super::confidence_cache::ConfidenceCache;
use super::devin::SessionDetails;
use crate::server::models::{
    session::{STATUS_IMPLEMENTING, STATUS_SCOPING},
    ConfidenceRecord, SessionKind, SessionRecord,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    /// Status recorded by this proxy; shadows the agent-reported one.
    pub status: String,
    pub agent_status: String,
    pub session_url: String,
    pub repo: String,
    pub issue_number: u64,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_plan: Option<String>,
    pub should_poll: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub confidence_score: Option<i64>,
    pub action_plan: Option<String>,
    pub should_poll: bool,
}

impl Resolution {
    fn keep_polling() -> Self {
        Self {
            should_poll: true,
            ..Self::default()
        }
    }

    fn settled(record: ConfidenceRecord) -> Self {
        Self {
            confidence_score: Some(record.confidence_score),
            action_plan: record.action_plan,
            should_poll: false,
        }
    }
}

/// Whether an agent-reported status means the session is still working.
pub fn is_active_status(status: &str) -> bool {
    status == STATUS_SCOPING || status == STATUS_IMPLEMENTING
}

/// Decides what confidence data to report for a session and whether the
/// caller should poll again.
///
/// A cached record for the session's repo/issue always wins. Scope sessions
/// otherwise try to extract a score from the agent's messages and cache it;
/// any failure there means "poll again". Other sessions poll while the agent
/// reports an active status.
pub async fn resolve(
    cache: &ConfidenceCache,
    session_id: &str,
    record: &SessionRecord,
    details: &SessionDetails,
) -> Resolution {
    let key = record.cache_key();

    match cache.get(&key).await {
        Ok(Some(cached)) => {
            debug!("Using cached confidence for {}", key);
            return Resolution::settled(cached);
        }
        Ok(None) => {}
        Err(e) => warn!("Could not read confidence cache for {}: {}", key, e),
    }

    match record.kind {
        SessionKind::Scope => extract_and_cache(cache, &key, session_id, details).await,
        SessionKind::Complete => Resolution {
            should_poll: is_active_status(details.status_or_unknown()),
            ..Resolution::default()
        },
    }
}

async fn extract_and_cache(
    cache: &ConfidenceCache,
    key: &str,
    session_id: &str,
    details: &SessionDetails,
) -> Resolution {
    let transcript = details.agent_transcript();
    if transcript.is_empty() {
        debug!("No agent messages yet for session {}", session_id);
        return Resolution::keep_polling();
    }

    let analysis = parse_confidence_and_plan(&transcript);
    let Some(confidence_score) = analysis.confidence_score else {
        debug!("No confidence score yet for session {}", session_id);
        return Resolution::keep_polling();
    };

    let record = ConfidenceRecord {
        confidence_score,
        action_plan: analysis.action_plan,
        session_id: session_id.to_string(),
    };

    match cache.insert_if_absent(key, record).await {
        Ok(stored) => {
            info!(
                "Session {} scored {} for {}",
                session_id, stored.confidence_score, key
            );
            Resolution::settled(stored)
        }
        Err(e) => {
            error!("Failed to store confidence for {}: {}", key, e);
            Resolution::keep_polling()
        }
    }
}

/// Builds the status payload for a known session from freshly fetched
/// agent details.
pub async fn describe_session(
    cache: &ConfidenceCache,
    session_id: &str,
    session_url: String,
    record: SessionRecord,
    details: &SessionDetails,
) -> SessionStatusResponse {
    let resolution = resolve(cache, session_id, &record, details).await;

    SessionStatusResponse {
        session_id: session_id.to_string(),
        status: record.status,
        agent_status: details.status_or_unknown().to_string(),
        session_url,
        repo: record.repo,
        issue_number: record.issue_number,
        kind: record.kind,
        confidence_score: resolution.confidence_score,
        action_plan: resolution.action_plan,
        should_poll: resolution.should_poll,
    }
}
