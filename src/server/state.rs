//! Shared application state

use crate::config::Config;
use crate::core::lifecycle::LifecycleManager;
use std::sync::Arc;

/// State shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<LifecycleManager>,
    pub config: Config,
}
