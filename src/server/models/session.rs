use serde::{Deserialize, Serialize};

pub const STATUS_SCOPING: &str = "scoping";
pub const STATUS_IMPLEMENTING: &str = "implementing";

/// What a session was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Scope,
    Complete,
}

/// Local bookkeeping for an agent session started through this proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub repo: String,
    pub issue_number: u64,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
}

impl SessionRecord {
    pub fn scoping(repo: impl Into<String>, issue_number: u64) -> Self {
        Self {
            repo: repo.into(),
            issue_number,
            status: STATUS_SCOPING.to_string(),
            kind: SessionKind::Scope,
        }
    }

    pub fn implementing(repo: impl Into<String>, issue_number: u64) -> Self {
        Self {
            repo: repo.into(),
            issue_number,
            status: STATUS_IMPLEMENTING.to_string(),
            kind: SessionKind::Complete,
        }
    }

    /// Key under which the confidence cache stores results for this issue.
    pub fn cache_key(&self) -> String {
        cache_key(&self.repo, self.issue_number)
    }
}

pub fn cache_key(repo: &str, issue_number: u64) -> String {
    format!("{}:{}", repo, issue_number)
}

/// Cached outcome of a scoping run for one repo/issue pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceRecord {
    pub confidence_score: i64,
    pub action_plan: Option<String>,
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cache_key_joins_repo_and_issue() {
        let record = SessionRecord::scoping("owner/repo", 42);
        assert_eq!(record.cache_key(), "owner/repo:42");
    }

    #[test]
    fn record_serializes_kind_as_type() {
        let record = SessionRecord::implementing("owner/repo", 7);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "repo": "owner/repo",
                "issue_number": 7,
                "status": "implementing",
                "type": "complete"
            })
        );
    }
}
