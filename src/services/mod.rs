//! External cloud capabilities behind narrow traits.
//!
//! The orchestrator only sees these traits; production implementations are
//! REST clients for the cloud speech/language APIs, and tests substitute
//! in-process fakes.

mod analyze;
mod speech;
mod synthesize;

pub use analyze::{GenerativeClient, SentimentClient};
pub use speech::SpeechClient;
pub use synthesize::SynthesisClient;

use anyhow::Result;
use std::fmt;

/// Converts recorded audio bytes into a transcript.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8]) -> Result<String>;
}

/// Converts text into synthesized speech audio bytes.
#[async_trait::async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Produces an analysis judgment for a transcript or input text.
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Analysis>;
}

/// Sentiment classification label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Classify by the product of score and magnitude. Both bounds are
    /// strict: a product of exactly 0.75 is neutral, as is exactly -0.75.
    pub fn classify(score: f32, magnitude: f32) -> Self {
        let weighted = score * magnitude;
        if weighted > 0.75 {
            SentimentLabel::Positive
        } else if weighted < -0.75 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Neutral => "NEUTRAL",
            SentimentLabel::Negative => "NEGATIVE",
        };
        f.write_str(s)
    }
}

/// Per-request sentiment judgment. Never persisted on its own, only
/// rendered into a result document.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentResult {
    pub score: f32,
    pub magnitude: f32,
    pub label: SentimentLabel,
}

/// Output of an analysis strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Sentiment(SentimentResult),
    /// Free-text response from the generative strategy, unvalidated.
    Generated(String),
}

impl Analysis {
    /// Render the analysis section appended to a result document.
    pub fn render(&self) -> String {
        match self {
            Analysis::Sentiment(s) => format!(
                "\nSentiment Analysis:\nScore: {}\nMagnitude: {}\nOverall Sentiment: {}\n",
                s.score, s.magnitude, s.label
            ),
            Analysis::Generated(text) => format!("\nAnalysis:\n{}\n", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_bounds_are_strict() {
        // Exactly 0.75 is not positive, exactly -0.75 is not negative.
        assert_eq!(SentimentLabel::classify(1.0, 0.75), SentimentLabel::Neutral);
        assert_eq!(
            SentimentLabel::classify(-1.0, 0.75),
            SentimentLabel::Neutral
        );
        assert_eq!(
            SentimentLabel::classify(0.9, 0.9),
            SentimentLabel::Positive
        );
        assert_eq!(
            SentimentLabel::classify(-0.9, 0.9),
            SentimentLabel::Negative
        );
        assert_eq!(SentimentLabel::classify(0.0, 5.0), SentimentLabel::Neutral);
    }

    #[test]
    fn sentiment_render_matches_document_layout() {
        let analysis = Analysis::Sentiment(SentimentResult {
            score: 0.5,
            magnitude: 1.2,
            label: SentimentLabel::Neutral,
        });
        let text = analysis.render();
        assert!(text.starts_with("\nSentiment Analysis:\n"));
        assert!(text.contains("Score: 0.5\n"));
        assert!(text.contains("Magnitude: 1.2\n"));
        assert!(text.contains("Overall Sentiment: NEUTRAL\n"));
    }
}
