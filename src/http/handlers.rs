use super::render;
use super::state::AppState;
use crate::pipeline::PipelineError;
use crate::store::sanitize_filename;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UploadTextForm {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

/// Map a pipeline failure to an explicit status instead of the silent
/// redirect the listing page would otherwise get.
fn pipeline_error(e: PipelineError) -> Response {
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else if matches!(e, PipelineError::Store(_)) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::BAD_GATEWAY
    };

    error!("Pipeline request failed: {}", e);
    error_response(status, e.to_string())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
/// Render the listing page with result document contents
pub async fn index(State(state): State<AppState>) -> Response {
    match state.store.listing() {
        Ok(files) => Html(render::index_page(&files)).into_response(),
        Err(e) => {
            error!("Failed to build listing: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to build listing: {}", e),
            )
        }
    }
}

/// POST /upload
/// Store an uploaded recording, transcribe and analyze it
pub async fn upload_audio(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) if field.name() == Some("audio_data") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => {
                        upload = Some((filename, bytes.to_vec()));
                        break;
                    }
                    Err(e) => {
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            format!("Failed to read upload: {}", e),
                        );
                    }
                }
            }
            Ok(Some(_)) => continue,
            Ok(None) => break,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Malformed multipart request: {}", e),
                );
            }
        }
    }

    let Some((filename, bytes)) = upload else {
        return pipeline_error(PipelineError::MissingFile);
    };

    info!("Received upload {:?} ({} bytes)", filename, bytes.len());

    match state.pipeline.process_recording(&filename, &bytes).await {
        Ok(outcome) => {
            info!(
                "Upload processed: {} / {}",
                outcome.recording_filename, outcome.result_filename
            );
            Redirect::to("/").into_response()
        }
        Err(e) => pipeline_error(e),
    }
}

/// POST /upload_text
/// Synthesize speech from submitted text and analyze it
pub async fn upload_text(
    State(state): State<AppState>,
    axum::extract::Form(form): axum::extract::Form<UploadTextForm>,
) -> Response {
    match state.pipeline.process_text(&form.text).await {
        Ok(outcome) => {
            info!(
                "Text submission processed: {} / {}",
                outcome.recording_filename, outcome.result_filename
            );
            Redirect::to("/").into_response()
        }
        Err(e) => pipeline_error(e),
    }
}

/// GET /uploads/:filename
/// Stream a stored file by name
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    match state.store.read(&filename) {
        Ok(Some(bytes)) => {
            ([(header::CONTENT_TYPE, content_type(&filename))], bytes).into_response()
        }
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("File {} not found", filename),
        ),
        Err(e) => {
            error!("Failed to read {}: {}", filename, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read {}: {}", filename, e),
            )
        }
    }
}

/// GET /upload/:filename
/// Legacy route: stream a file from the process working directory
pub async fn serve_legacy(Path(filename): Path<String>) -> Response {
    let Some(name) = sanitize_filename(&filename) else {
        return error_response(StatusCode::NOT_FOUND, format!("File {} not found", filename));
    };

    match tokio::fs::read(name).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(name))], bytes).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => error_response(
            StatusCode::NOT_FOUND,
            format!("File {} not found", filename),
        ),
        Err(e) => {
            error!("Failed to read {}: {}", filename, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read {}: {}", filename, e),
            )
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn content_type(filename: &str) -> &'static str {
    match filename.rsplit_once('.').map(|(_, ext)| ext) {
        Some(ext) if ext.eq_ignore_ascii_case("wav") => "audio/wav",
        Some(ext) if ext.eq_ignore_ascii_case("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
