pub mod auth;
pub mod config;
pub mod error;
pub mod relay;
pub mod routes;
pub mod store;

use std::sync::Arc;

use config::Config;
use relay::ChannelRegistry;
use store::kv::{KeyValueStore, MemoryStore};

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub kv: Arc<dyn KeyValueStore>,
    pub channels: Arc<ChannelRegistry>,
    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by the in-memory session store and an empty registry.
    pub fn in_memory(config: Config) -> Self {
        Self {
            kv: Arc::new(MemoryStore::new()),
            channels: Arc::new(ChannelRegistry::new()),
            config: Arc::new(config),
        }
    }
}
