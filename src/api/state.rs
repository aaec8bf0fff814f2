//! API server state

use std::sync::Arc;

use crate::store::Store;

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Store every handler executes its statement against
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}
