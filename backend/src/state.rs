use std::sync::Arc;

use crate::{config::Config, repositories::RequestStore, services::BulkTransitionEngine};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RequestStore>,
    pub engine: BulkTransitionEngine,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn RequestStore>, config: Config) -> Self {
        let engine = BulkTransitionEngine::new(config.bulk_dispatch, config.store_call_timeout);
        Self {
            store,
            engine,
            config,
        }
    }

    pub fn store(&self) -> &dyn RequestStore {
        self.store.as_ref()
    }
}
