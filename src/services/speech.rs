//! Speech-to-text client for the cloud `speech:longrunningrecognize` API.
//!
//! Long-form recognition is asynchronous on the server side: the initial
//! request returns an operation, which we poll until it completes. The whole
//! exchange is bounded by a fixed 90 second deadline.

use anyhow::{bail, Context, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::Transcriber;

/// Upper bound on the full recognize-and-poll exchange.
const RECOGNIZE_DEADLINE: Duration = Duration::from_secs(90);

/// Delay between operation polls.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

pub struct SpeechClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct LongRunningRecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    language_code: &'static str,
    model: &'static str,
    audio_channel_count: u32,
    enable_word_confidence: bool,
    enable_word_time_offsets: bool,
}

impl RecognitionConfig {
    /// Fixed recognition configuration: single channel, long-form model,
    /// English.
    fn fixed() -> Self {
        Self {
            language_code: "en-US",
            model: "latest_long",
            audio_channel_count: 1,
            enable_word_confidence: true,
            enable_word_time_offsets: true,
        }
    }
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    /// Base64-encoded audio bytes.
    content: String,
}

#[derive(Debug, Deserialize)]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    error: Option<OperationError>,
    response: Option<LongRunningRecognizeResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LongRunningRecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Debug, Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<RecognitionAlternative>,
}

#[derive(Debug, Deserialize)]
struct RecognitionAlternative {
    #[serde(default)]
    transcript: String,
}

impl SpeechClient {
    pub fn new(http: reqwest::Client, endpoint: String, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }

    async fn start_recognition(&self, audio: &[u8]) -> Result<Operation> {
        let request = LongRunningRecognizeRequest {
            config: RecognitionConfig::fixed(),
            audio: RecognitionAudio {
                content: base64::engine::general_purpose::STANDARD.encode(audio),
            },
        };

        let url = format!(
            "{}/v1/speech:longrunningrecognize?key={}",
            self.endpoint, self.api_key
        );

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send recognize request")?
            .error_for_status()
            .context("Recognize request rejected")?;

        Ok(response
            .json()
            .await
            .context("Failed to decode recognize operation")?)
    }

    async fn poll_operation(&self, name: &str) -> Result<Operation> {
        let url = format!("{}/v1/operations/{}?key={}", self.endpoint, name, self.api_key);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to poll recognize operation")?
            .error_for_status()
            .context("Operation poll rejected")?;

        Ok(response
            .json()
            .await
            .context("Failed to decode operation status")?)
    }

    async fn recognize(&self, audio: &[u8]) -> Result<String> {
        let mut operation = self.start_recognition(audio).await?;
        debug!("Recognition operation started: {}", operation.name);

        while !operation.done {
            tokio::time::sleep(POLL_INTERVAL).await;
            operation = self.poll_operation(&operation.name).await?;
        }

        if let Some(err) = operation.error {
            bail!("Recognition failed ({}): {}", err.code, err.message);
        }

        let response = operation
            .response
            .context("Recognition operation completed without a response")?;

        // One line per recognition result, best alternative only.
        let mut transcript = String::new();
        for result in &response.results {
            if let Some(alt) = result.alternatives.first() {
                transcript.push_str(&alt.transcript);
                transcript.push('\n');
            }
        }

        info!(
            "Transcribed {} bytes of audio into {} characters",
            audio.len(),
            transcript.len()
        );

        Ok(transcript)
    }
}

#[async_trait::async_trait]
impl Transcriber for SpeechClient {
    async fn transcribe(&self, audio: &[u8]) -> Result<String> {
        tokio::time::timeout(RECOGNIZE_DEADLINE, self.recognize(audio))
            .await
            .context("Recognition deadline (90s) exceeded")?
    }
}
