//! Pipeline orchestration for both directions of the service.
//!
//! Audio in: store the recording, transcribe it, analyze the transcript,
//! persist the combined result document. Text in: synthesize speech, store
//! it, analyze the input text, persist. Each stage failure is reported as a
//! typed error so callers can map it to a status code instead of swallowing
//! it in a silent redirect.

use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::services::{Analyzer, Synthesizer, Transcriber};
use crate::store::{allowed_file, FileStore};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no audio file provided")]
    MissingFile,

    #[error("uploaded file is empty")]
    EmptyFile,

    #[error("file type not allowed: {0}")]
    DisallowedExtension(String),

    #[error("no text provided")]
    EmptyText,

    #[error("speech synthesis produced no audio")]
    EmptySynthesis,

    #[error("transcription failed: {0}")]
    Transcription(#[source] anyhow::Error),

    #[error("speech synthesis failed: {0}")]
    Synthesis(#[source] anyhow::Error),

    #[error("analysis failed: {0}")]
    Analysis(#[source] anyhow::Error),

    #[error("storage failed: {0}")]
    Store(#[source] anyhow::Error),
}

impl PipelineError {
    /// Client input errors, as opposed to upstream or storage failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingFile
                | PipelineError::EmptyFile
                | PipelineError::DisallowedExtension(_)
                | PipelineError::EmptyText
        )
    }
}

/// Filenames produced by a successful pipeline run.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub recording_filename: String,
    pub result_filename: String,
}

pub struct Pipeline {
    store: Arc<FileStore>,
    transcriber: Arc<dyn Transcriber>,
    synthesizer: Arc<dyn Synthesizer>,
    analyzer: Arc<dyn Analyzer>,
}

impl Pipeline {
    pub fn new(
        store: Arc<FileStore>,
        transcriber: Arc<dyn Transcriber>,
        synthesizer: Arc<dyn Synthesizer>,
        analyzer: Arc<dyn Analyzer>,
    ) -> Self {
        Self {
            store,
            transcriber,
            synthesizer,
            analyzer,
        }
    }

    /// Audio-in path: validate, store, transcribe, analyze, persist.
    ///
    /// `original_name` is the client-supplied filename, used only for the
    /// extension check; the stored name is always a generated stamp.
    pub async fn process_recording(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<UploadOutcome, PipelineError> {
        if original_name.is_empty() {
            return Err(PipelineError::MissingFile);
        }
        if bytes.is_empty() {
            return Err(PipelineError::EmptyFile);
        }
        if !allowed_file(original_name) {
            return Err(PipelineError::DisallowedExtension(original_name.to_string()));
        }

        let filename = format!("{}.wav", FileStore::generate_stamp());
        self.store
            .save_recording(&filename, bytes)
            .map_err(PipelineError::Store)?;

        // Transcribe from the stored copy, not the request buffer, so what
        // was persisted is exactly what was recognized.
        let stored = self
            .store
            .read_recording(&filename)
            .map_err(PipelineError::Store)?;

        let transcript = self
            .transcriber
            .transcribe(&stored)
            .await
            .map_err(PipelineError::Transcription)?;

        info!("Transcript for {}: {} characters", filename, transcript.len());

        let result_filename = self.analyze_and_persist(&filename, &transcript).await?;

        info!("Recording {} processed and analyzed", filename);

        Ok(UploadOutcome {
            recording_filename: filename,
            result_filename,
        })
    }

    /// Text-in path: validate, synthesize, store, analyze, persist.
    pub async fn process_text(&self, text: &str) -> Result<UploadOutcome, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::EmptyText);
        }

        let audio = self
            .synthesizer
            .synthesize(text)
            .await
            .map_err(PipelineError::Synthesis)?;

        if audio.is_empty() {
            error!("Speech synthesis returned no audio");
            return Err(PipelineError::EmptySynthesis);
        }

        let filename = format!("tr_{}.wav", FileStore::generate_stamp());
        self.store
            .save_recording(&filename, &audio)
            .map_err(PipelineError::Store)?;

        // The analysis runs over the original input text, not the audio.
        let result_filename = self.analyze_and_persist(&filename, text).await?;

        info!("Text submission synthesized as {} and analyzed", filename);

        Ok(UploadOutcome {
            recording_filename: filename,
            result_filename,
        })
    }

    /// Shared tail of both paths: analyze the text and write the result
    /// document pairing it with the recording.
    async fn analyze_and_persist(
        &self,
        recording_filename: &str,
        text: &str,
    ) -> Result<String, PipelineError> {
        let analysis = self
            .analyzer
            .analyze(text)
            .await
            .map_err(PipelineError::Analysis)?;

        let document = format!("{}{}", text, analysis.render());

        self.store
            .save_result(recording_filename, &document)
            .map_err(PipelineError::Store)
    }
}
