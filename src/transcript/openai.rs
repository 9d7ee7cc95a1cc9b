// OpenAI Whisper JSON output (`whisper --output_format json`)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::TranscriptFormat;
use crate::error::Result;
use crate::sync::Segment;
use super::{Transcript, TranscriptMapper, TranscriptSource, read_transcript_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperOutput {
    #[serde(default)]
    pub text: String,
    pub segments: Vec<OpenAIWhisperSegment>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Segment bounds in seconds; the decoder statistics are not needed here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperSegment {
    #[serde(default)]
    pub id: Option<u64>,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

pub struct OpenAIMapper;

impl TranscriptMapper<OpenAIWhisperOutput> for OpenAIMapper {
    fn to_transcript(whisper_output: OpenAIWhisperOutput) -> Result<Transcript> {
        let segments = whisper_output
            .segments
            .iter()
            .map(|seg| Segment::new(seg.start, seg.end))
            .collect();

        let text = if whisper_output.text.trim().is_empty() {
            whisper_output
                .segments
                .iter()
                .map(|seg| seg.text.trim())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            whisper_output.text.trim().to_string()
        };

        Ok(Transcript {
            text,
            language: whisper_output.language,
            segments,
        })
    }
}

pub struct OpenAISource;

impl OpenAISource {
    pub fn parse(content: &str) -> Result<Transcript> {
        let output: OpenAIWhisperOutput = serde_json::from_str(content)?;
        OpenAIMapper::to_transcript(output)
    }
}

#[async_trait]
impl TranscriptSource for OpenAISource {
    async fn load(&self, path: &Path) -> Result<Transcript> {
        let content = read_transcript_file(path).await?;
        Self::parse(&content)
    }

    fn format(&self) -> TranscriptFormat {
        TranscriptFormat::OpenAI
    }
}
