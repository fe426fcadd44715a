mod service;
mod types;

pub use service::DevinService;
pub use types::*;
