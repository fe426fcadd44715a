pub mod complete;
pub mod health;
pub mod issues;
pub mod scope;
pub mod session;

use serde::{Deserialize, Serialize};

/// Body returned when a session is started or nudged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionActionResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
}
