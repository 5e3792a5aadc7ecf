use crate::config::TrackerConfig;
use crate::store::EntryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TrackerConfig>,
    pub store: Arc<EntryStore>,
}

impl AppState {
    pub fn new(config: Arc<TrackerConfig>, store: EntryStore) -> Self {
        Self {
            config,
            store: Arc::new(store),
        }
    }
}
