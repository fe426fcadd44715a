pub mod session;

pub use session::{cache_key, ConfidenceRecord, SessionKind, SessionRecord};
