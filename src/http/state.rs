use crate::pipeline::Pipeline;
use crate::store::FileStore;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Upload/transcribe/analyze orchestrator
    pub pipeline: Arc<Pipeline>,
    /// The upload directory
    pub store: Arc<FileStore>,
}

impl AppState {
    pub fn new(pipeline: Arc<Pipeline>, store: Arc<FileStore>) -> Self {
        Self { pipeline, store }
    }
}
