// Shared test support: in-process fake services injected through the
// capability traits, plus helpers for building a wired-up app.
#![allow(dead_code)]

use anyhow::Result;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use voice_notes::services::{Analysis, Analyzer, SentimentLabel, SentimentResult};
use voice_notes::{AppState, FileStore, Pipeline, Synthesizer, Transcriber};

#[derive(Default)]
pub struct FakeTranscriber {
    pub transcript: String,
    pub calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.transcript.clone())
    }
}

#[derive(Default)]
pub struct FakeSynthesizer {
    /// Returned audio; leave empty to simulate a synthesis that yields nothing.
    pub audio: Vec<u8>,
    pub calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Synthesizer for FakeSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.audio.clone())
    }
}

pub struct FakeAnalyzer {
    pub analysis: Analysis,
    pub calls: AtomicUsize,
}

impl Default for FakeAnalyzer {
    fn default() -> Self {
        Self {
            analysis: Analysis::Sentiment(SentimentResult {
                score: 0.2,
                magnitude: 0.5,
                label: SentimentLabel::Neutral,
            }),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl Analyzer for FakeAnalyzer {
    async fn analyze(&self, _text: &str) -> Result<Analysis> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.analysis.clone())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<FileStore>,
    pub transcriber: Arc<FakeTranscriber>,
    pub synthesizer: Arc<FakeSynthesizer>,
    pub analyzer: Arc<FakeAnalyzer>,
}

/// Wire a pipeline and app state over a temp directory with fake services.
pub fn build_app(
    upload_dir: &Path,
    transcriber: FakeTranscriber,
    synthesizer: FakeSynthesizer,
    analyzer: FakeAnalyzer,
) -> Result<TestApp> {
    let store = Arc::new(FileStore::new(upload_dir)?);
    let transcriber = Arc::new(transcriber);
    let synthesizer = Arc::new(synthesizer);
    let analyzer = Arc::new(analyzer);

    let pipeline = Arc::new(Pipeline::new(
        Arc::clone(&store),
        Arc::clone(&transcriber) as Arc<dyn Transcriber>,
        Arc::clone(&synthesizer) as Arc<dyn Synthesizer>,
        Arc::clone(&analyzer) as Arc<dyn Analyzer>,
    ));

    let state = AppState::new(pipeline, Arc::clone(&store));

    Ok(TestApp {
        state,
        store,
        transcriber,
        synthesizer,
        analyzer,
    })
}

/// A small valid mono 16kHz WAV file, built in memory.
pub fn sample_wav() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).expect("create WAV writer");
        for i in 0..1600i32 {
            let sample = ((i as f32 * 0.05).sin() * 8000.0) as i16;
            writer.write_sample(sample).expect("write sample");
        }
        writer.finalize().expect("finalize WAV");
    }

    cursor.into_inner()
}

/// Count regular files in a directory.
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).count())
        .unwrap_or(0)
}
