pub mod confidence;
pub mod confidence_cache;
pub mod devin;
pub mod github_issue;
pub mod prompts;
pub mod session_registry;
pub mod session_status;
pub(crate) mod upstream;

pub use confidence::{parse_confidence_and_plan, ScopeAnalysis};
pub use confidence_cache::{CacheError, ConfidenceCache};
pub use devin::DevinService;
pub use github_issue::{GitHubIssue, GitHubIssueService};
pub use session_registry::SessionRegistry;
pub use session_status::SessionStatusResponse;
