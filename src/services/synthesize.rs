//! Text-to-speech client for the cloud `text:synthesize` API.

use anyhow::{Context, Result};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tracing::info;

use super::Synthesizer;

pub struct SynthesisClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechRequest {
    input: SynthesisInput,
    voice: VoiceSelectionParams,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelectionParams {
    language_code: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeSpeechResponse {
    /// Base64-encoded audio bytes.
    #[serde(default)]
    audio_content: String,
}

impl SynthesisClient {
    pub fn new(http: reqwest::Client, endpoint: String, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl Synthesizer for SynthesisClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let request = SynthesizeSpeechRequest {
            input: SynthesisInput {
                text: text.to_string(),
            },
            voice: VoiceSelectionParams {
                language_code: "en-GB",
            },
            audio_config: AudioConfig {
                audio_encoding: "LINEAR16",
            },
        };

        let url = format!("{}/v1/text:synthesize?key={}", self.endpoint, self.api_key);

        let response: SynthesizeSpeechResponse = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send synthesize request")?
            .error_for_status()
            .context("Synthesize request rejected")?
            .json()
            .await
            .context("Failed to decode synthesize response")?;

        let audio = base64::engine::general_purpose::STANDARD
            .decode(response.audio_content)
            .context("Synthesized audio was not valid base64")?;

        // An empty response is the caller's signal to skip persistence;
        // anything non-empty must at least parse as LINEAR16 WAV.
        if !audio.is_empty() {
            validate_wav(&audio)?;
        }

        info!(
            "Synthesized {} characters of text into {} bytes of audio",
            text.len(),
            audio.len()
        );

        Ok(audio)
    }
}

/// Boundary check on the decoded synthesis output: it must carry a
/// readable WAV header before it is handed on for storage.
fn validate_wav(audio: &[u8]) -> Result<()> {
    let reader = hound::WavReader::new(Cursor::new(audio))
        .context("Synthesized audio is not a valid WAV stream")?;

    let spec = reader.spec();
    info!(
        "Synthesized WAV: {}Hz, {} channels, {} bits",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    );

    Ok(())
}
