use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::server::models::SessionRecord;

/// In-memory index of the agent sessions this process has started.
///
/// Entries live for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, session_id: impl Into<String>, record: SessionRecord) {
        self.sessions.write().await.insert(session_id.into(), record);
    }

    pub async fn get(&self, session_id: &str) -> Option<SessionRecord> {
        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    /// Returns false when the session is unknown.
    pub async fn update_status(&self, session_id: &str, status: impl Into<String>) -> bool {
        match self.sessions.write().await.get_mut(session_id) {
            Some(record) => {
                record.status = status.into();
                true
            }
            None => false,
        }
    }
}
