//! Application state for the web layer.

use std::sync::Arc;

use crate::store::MemoryStore;
use crate::validation::ValidationConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The record store every handler reads and writes
    pub store: Arc<MemoryStore>,

    /// Driver validation policy
    pub validation: Arc<ValidationConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: MemoryStore, validation: ValidationConfig) -> Self {
        Self {
            store: Arc::new(store),
            validation: Arc::new(validation),
        }
    }
}
