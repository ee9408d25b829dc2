use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use voice_notes::config::AnalysisStrategy;
use voice_notes::services::{
    Analyzer, GenerativeClient, SentimentClient, SpeechClient, SynthesisClient,
};
use voice_notes::{create_router, AppState, Config, FileStore, Pipeline};

#[derive(Debug, Parser)]
#[command(name = "voice-notes", about = "Transcribe, synthesize and analyze voice notes")]
struct Args {
    /// Config file (extension inferred)
    #[arg(long, default_value = "config/voice-notes")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} starting", cfg.service.name);
    info!(
        "HTTP server will bind to {}:{}",
        cfg.service.http.bind, cfg.service.http.port
    );
    info!("Upload directory: {}", cfg.store.upload_dir);

    let store = Arc::new(FileStore::new(&cfg.store.upload_dir)?);
    let http_client = reqwest::Client::new();

    // Cloud credentials come from the environment, never from config files.
    let api_key =
        std::env::var("GOOGLE_API_KEY").context("GOOGLE_API_KEY environment variable not set")?;

    let transcriber = Arc::new(SpeechClient::new(
        http_client.clone(),
        cfg.speech.recognize_endpoint.clone(),
        api_key.clone(),
    ));
    let synthesizer = Arc::new(SynthesisClient::new(
        http_client.clone(),
        cfg.speech.synthesize_endpoint.clone(),
        api_key.clone(),
    ));

    let analyzer: Arc<dyn Analyzer> = match cfg.analysis.strategy {
        AnalysisStrategy::Sentiment => {
            info!("Analysis strategy: sentiment API");
            Arc::new(SentimentClient::new(
                http_client.clone(),
                cfg.analysis.sentiment_endpoint.clone(),
                api_key,
            ))
        }
        AnalysisStrategy::Generative => {
            info!(
                "Analysis strategy: generative model {}",
                cfg.analysis.generative_model
            );
            let gemini_key = std::env::var("GEMINI_API_KEY")
                .context("GEMINI_API_KEY environment variable not set")?;
            Arc::new(GenerativeClient::new(
                http_client,
                cfg.analysis.generative_endpoint.clone(),
                cfg.analysis.generative_model.clone(),
                gemini_key,
            ))
        }
    };

    let pipeline = Arc::new(Pipeline::new(
        Arc::clone(&store),
        transcriber,
        synthesizer,
        analyzer,
    ));

    let state = AppState::new(pipeline, store);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
