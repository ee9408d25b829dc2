pub mod config;
pub mod http;
pub mod pipeline;
pub mod services;
pub mod store;

pub use config::Config;
pub use http::{create_router, AppState};
pub use pipeline::{Pipeline, PipelineError, UploadOutcome};
pub use services::{Analysis, Analyzer, SentimentLabel, SentimentResult, Synthesizer, Transcriber};
pub use store::{FileStore, StoredFile};
