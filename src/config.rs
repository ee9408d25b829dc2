use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub upload_dir: String,
}

/// Cloud speech endpoints. Overridable so tests can point at a local server.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_recognize_endpoint")]
    pub recognize_endpoint: String,
    #[serde(default = "default_synthesize_endpoint")]
    pub synthesize_endpoint: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            recognize_endpoint: default_recognize_endpoint(),
            synthesize_endpoint: default_synthesize_endpoint(),
        }
    }
}

/// Which analysis capability produces the result document's analysis section.
/// The two strategies are alternatives, never composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStrategy {
    Sentiment,
    Generative,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_strategy")]
    pub strategy: AnalysisStrategy,
    #[serde(default = "default_sentiment_endpoint")]
    pub sentiment_endpoint: String,
    #[serde(default = "default_generative_endpoint")]
    pub generative_endpoint: String,
    #[serde(default = "default_generative_model")]
    pub generative_model: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            sentiment_endpoint: default_sentiment_endpoint(),
            generative_endpoint: default_generative_endpoint(),
            generative_model: default_generative_model(),
        }
    }
}

fn default_recognize_endpoint() -> String {
    "https://speech.googleapis.com".to_string()
}

fn default_synthesize_endpoint() -> String {
    "https://texttospeech.googleapis.com".to_string()
}

fn default_sentiment_endpoint() -> String {
    "https://language.googleapis.com".to_string()
}

fn default_generative_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_generative_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_strategy() -> AnalysisStrategy {
    AnalysisStrategy::Sentiment
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("VOICE_NOTES").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
