pub mod configuration;
pub mod server;

pub use configuration::{get_configuration, Settings};
pub use server::{app_router, configure_app, AppState};
