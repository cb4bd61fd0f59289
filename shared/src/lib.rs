pub mod config;
pub mod directory;
pub mod errors;
pub mod memory;
pub mod request;
pub mod types;
pub mod users;
pub mod views;

use config::Config;
use directory::UserDirectory;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub directory: Arc<dyn UserDirectory>,
    pub config: Config,
}

impl AppState {
    pub fn new(directory: Arc<dyn UserDirectory>, config: Config) -> Arc<Self> {
        Arc::new(Self { directory, config })
    }
}
