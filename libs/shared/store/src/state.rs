use shared_config::AppConfig;

use crate::memory::MemoryStore;
use crate::seed;

/// Shared application state handed to every router: configuration plus the
/// in-memory dataset. Wrapped in an `Arc` by the binary.
#[derive(Debug)]
pub struct AppState {
    pub config: AppConfig,
    pub store: MemoryStore,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            store: MemoryStore::new(),
        }
    }

    /// State preloaded with the demo dataset the portals expect.
    pub fn seeded(config: AppConfig) -> Self {
        let store = MemoryStore::new();
        seed::load_demo_data(&store);
        Self { config, store }
    }
}
