//! Analysis strategies: cloud sentiment scoring or a generative model.
//!
//! A deployment runs exactly one of these, selected by configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Analysis, Analyzer, SentimentLabel, SentimentResult};

/// Fixed instruction prepended to the transcript for the generative strategy.
const ANALYSIS_INSTRUCTION: &str =
    "Briefly summarize the following transcript and describe its overall sentiment:";

// ============================================================================
// Sentiment API strategy
// ============================================================================

pub struct SentimentClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentRequest {
    document: Document,
    encoding_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    #[serde(rename = "type")]
    doc_type: &'static str,
    content: String,
    language_code: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeSentimentResponse {
    document_sentiment: DocumentSentiment,
}

#[derive(Debug, Deserialize)]
struct DocumentSentiment {
    #[serde(default)]
    score: f32,
    #[serde(default)]
    magnitude: f32,
}

impl SentimentClient {
    pub fn new(http: reqwest::Client, endpoint: String, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl Analyzer for SentimentClient {
    async fn analyze(&self, text: &str) -> Result<Analysis> {
        let request = AnalyzeSentimentRequest {
            document: Document {
                doc_type: "PLAIN_TEXT",
                content: text.to_string(),
                language_code: "en",
            },
            encoding_type: "UTF8",
        };

        let url = format!(
            "{}/v2/documents:analyzeSentiment?key={}",
            self.endpoint, self.api_key
        );

        let response: AnalyzeSentimentResponse = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send sentiment request")?
            .error_for_status()
            .context("Sentiment request rejected")?
            .json()
            .await
            .context("Failed to decode sentiment response")?;

        let sentiment = response.document_sentiment;
        let result = SentimentResult {
            score: sentiment.score,
            magnitude: sentiment.magnitude,
            label: SentimentLabel::classify(sentiment.score, sentiment.magnitude),
        };

        info!(
            "Sentiment analysis result: score={} magnitude={} label={}",
            result.score, result.magnitude, result.label
        );

        Ok(Analysis::Sentiment(result))
    }
}

// ============================================================================
// Generative model strategy
// ============================================================================

pub struct GenerativeClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerativeClient {
    pub fn new(http: reqwest::Client, endpoint: String, model: String, api_key: String) -> Self {
        Self {
            http,
            endpoint,
            model,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl Analyzer for GenerativeClient {
    async fn analyze(&self, text: &str) -> Result<Analysis> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{}\n\n{}", ANALYSIS_INSTRUCTION, text),
                }],
            }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );

        let response: GenerateContentResponse = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send generate request")?
            .error_for_status()
            .context("Generate request rejected")?
            .json()
            .await
            .context("Failed to decode generate response")?;

        // Whatever the model produced, verbatim. The format is not validated.
        let generated = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .context("Generative response contained no candidates")?;

        info!("Generative analysis produced {} characters", generated.len());

        Ok(Analysis::Generated(generated))
    }
}
