// whisper.cpp JSON output (`whisper-cli -oj`)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::TranscriptFormat;
use crate::error::Result;
use crate::sync::Segment;
use super::{Transcript, TranscriptMapper, TranscriptSource, read_transcript_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOutput {
    #[serde(default)]
    pub result: Option<WhisperCppResult>,
    pub transcription: Vec<WhisperCppSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppResult {
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppSegment {
    #[serde(default)]
    pub timestamps: Option<WhisperCppTimestamps>,
    pub offsets: WhisperCppOffsets,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppTimestamps {
    pub from: String,
    pub to: String,
}

/// Segment bounds in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOffsets {
    pub from: i64,
    pub to: i64,
}

pub struct WhisperCppMapper;

impl TranscriptMapper<WhisperCppOutput> for WhisperCppMapper {
    fn to_transcript(whisper_output: WhisperCppOutput) -> Result<Transcript> {
        let text = whisper_output
            .transcription
            .iter()
            .map(|seg| seg.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let segments = whisper_output
            .transcription
            .iter()
            .map(|seg| Segment::new(seg.offsets.from as f64 / 1000.0, seg.offsets.to as f64 / 1000.0))
            .collect();

        Ok(Transcript {
            text,
            language: whisper_output.result.map(|r| r.language),
            segments,
        })
    }
}

pub struct WhisperCppSource;

impl WhisperCppSource {
    pub fn parse(content: &str) -> Result<Transcript> {
        let output: WhisperCppOutput = serde_json::from_str(content)?;
        WhisperCppMapper::to_transcript(output)
    }
}

#[async_trait]
impl TranscriptSource for WhisperCppSource {
    async fn load(&self, path: &Path) -> Result<Transcript> {
        let content = read_transcript_file(path).await?;
        Self::parse(&content)
    }

    fn format(&self) -> TranscriptFormat {
        TranscriptFormat::WhisperCpp
    }
}
