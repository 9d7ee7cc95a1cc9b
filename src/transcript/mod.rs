// Transcript loading
//
// The transcriber runs outside this tool and leaves its result as JSON. This
// module reads that JSON into service-agnostic segments through one source per
// transcriber format:
// - WhisperCpp: whisper.cpp `-oj` output
// - OpenAI: OpenAI Whisper Python output
//
// To support another transcriber:
// 1. Add the service-specific structures for its JSON
// 2. Implement TranscriptMapper for them
// 3. Add a TranscriptFormat variant and wire it into the factory

pub mod openai;
pub mod whisper_cpp;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::config::TranscriptFormat;
use crate::error::{CuesyncError, Result};
use crate::sync::Segment;

pub use openai::{OpenAIMapper, OpenAIWhisperOutput, OpenAISource};
pub use whisper_cpp::{WhisperCppMapper, WhisperCppOutput, WhisperCppSource};

/// Service-agnostic transcription result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Full transcript text; carried along but not used for timing
    pub text: String,
    pub language: Option<String>,
    pub segments: Vec<Segment>,
}

/// Converts a service-specific transcription into a `Transcript`
pub trait TranscriptMapper<T> {
    fn to_transcript(service_output: T) -> Result<Transcript>;
}

/// Loads transcripts written by an external transcriber
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Read and convert the transcript at `path`
    async fn load(&self, path: &Path) -> Result<Transcript>;

    /// Format handled by this source
    fn format(&self) -> TranscriptFormat;
}

/// Source that inspects the JSON to pick the matching format
pub struct AutoSource;

impl AutoSource {
    pub fn parse(content: &str) -> Result<Transcript> {
        let value: serde_json::Value = serde_json::from_str(content)?;

        if value.get("transcription").is_some() {
            debug!("Detected whisper.cpp transcript layout");
            WhisperCppMapper::to_transcript(serde_json::from_value(value)?)
        } else if value.get("segments").is_some() {
            debug!("Detected OpenAI Whisper transcript layout");
            OpenAIMapper::to_transcript(serde_json::from_value(value)?)
        } else {
            Err(CuesyncError::UnsupportedFormat(
                "transcript JSON has neither 'transcription' nor 'segments'".to_string(),
            ))
        }
    }
}

#[async_trait]
impl TranscriptSource for AutoSource {
    async fn load(&self, path: &Path) -> Result<Transcript> {
        let content = read_transcript_file(path).await?;
        Self::parse(&content)
    }

    fn format(&self) -> TranscriptFormat {
        TranscriptFormat::Auto
    }
}

/// Factory for creating transcript sources
pub struct TranscriptSourceFactory;

impl TranscriptSourceFactory {
    /// Create a source for the configured format
    pub fn create_source(format: TranscriptFormat) -> Box<dyn TranscriptSource> {
        match format {
            TranscriptFormat::Auto => Box::new(AutoSource),
            TranscriptFormat::WhisperCpp => Box::new(WhisperCppSource),
            TranscriptFormat::OpenAI => Box::new(OpenAISource),
        }
    }
}

pub(crate) async fn read_transcript_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CuesyncError::FileNotFound(path.display().to_string()));
    }
    info!("Loading transcript: {}", path.display());
    Ok(fs::read_to_string(path).await?)
}
