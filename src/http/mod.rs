//! HTTP surface of the service:
//! - GET  /                    - listing page with result document contents
//! - POST /upload              - multipart audio upload (field `audio_data`)
//! - POST /upload_text         - form text submission (field `text`)
//! - GET  /uploads/:filename   - stream a stored file
//! - GET  /upload/:filename    - legacy: stream a file from the working directory
//! - GET  /health              - health check

mod handlers;
mod render;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
