use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{CuesyncError, Result};
use crate::sync::SyncStrategy;
use crate::sync::overlap::MIN_RENDERABLE_DURATION;

// Default values for optional configuration fields
fn default_delay() -> f64 {
    2.0
}

fn default_reading_speed() -> f64 {
    0.8
}

fn default_max_chars() -> usize {
    40
}

fn default_max_line_chars() -> usize {
    35
}

fn default_min_cue_duration() -> f64 {
    0.1
}

fn default_true() -> bool {
    true
}

fn default_extension() -> String {
    "srt".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub transcript: TranscriptConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Synchronization method: Basic, Delayed or Smart
    #[serde(default)]
    pub method: SyncMethod,
    /// Seconds added to speech timing to cover pipeline latency
    #[serde(default = "default_delay")]
    pub delay: f64,
    /// Reading speed multiplier for the smart method (higher = shorter cues)
    #[serde(default = "default_reading_speed")]
    pub reading_speed: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMethod {
    /// Basic: Use transcription timings verbatim, one sentence per segment
    Basic,
    /// Delayed: Shift timings by the delay and enforce a minimum display time
    Delayed,
    /// Smart: Shift start by the delay and size cues by reading time
    #[default]
    Smart,
}

impl SyncMethod {
    pub fn parse(method: &str) -> Result<Self> {
        match method.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "delayed" => Ok(Self::Delayed),
            "smart" => Ok(Self::Smart),
            _ => Err(CuesyncError::Config(format!(
                "Invalid sync method '{}'. Valid methods: basic, delayed, smart",
                method
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Maximum characters per cue for length-based splitting
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    /// Maximum characters per display line before wrapping onto two lines
    #[serde(default = "default_max_line_chars")]
    pub max_line_chars: usize,
    /// Duration (seconds) given to a cue whose computed interval collapsed
    #[serde(default = "default_min_cue_duration")]
    pub min_cue_duration: f64,
    /// Append a period to basic-method sentences lacking one
    #[serde(default = "default_true")]
    pub terminate_sentences: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptFormat {
    /// Detect the format from the JSON structure
    #[default]
    Auto,
    /// whisper.cpp `-oj` output (millisecond offsets)
    WhisperCpp,
    /// OpenAI Whisper JSON output (second offsets)
    OpenAI,
}

impl TranscriptFormat {
    pub fn parse(format: &str) -> Result<Self> {
        match format.to_lowercase().replace(['-', '_', '.'], "").as_str() {
            "auto" => Ok(Self::Auto),
            "whispercpp" => Ok(Self::WhisperCpp),
            "openai" => Ok(Self::OpenAI),
            _ => Err(CuesyncError::Config(format!(
                "Invalid transcript format '{}'. Valid formats: auto, whisper-cpp, openai",
                format
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptConfig {
    /// Transcript JSON layout produced by the transcriber
    #[serde(default)]
    pub format: TranscriptFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Extension used for generated subtitle files
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Replace existing subtitle files
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            method: SyncMethod::default(),
            delay: default_delay(),
            reading_speed: default_reading_speed(),
        }
    }
}

impl SyncConfig {
    /// Build the strategy described by this configuration
    pub fn strategy(&self) -> Result<SyncStrategy> {
        let strategy = match self.method {
            SyncMethod::Basic => SyncStrategy::Basic,
            SyncMethod::Delayed => SyncStrategy::Delayed { delay: self.delay },
            SyncMethod::Smart => SyncStrategy::Smart {
                delay: self.delay,
                reading_speed: self.reading_speed,
            },
        };
        strategy.validate()?;
        Ok(strategy)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            max_line_chars: default_max_line_chars(),
            min_cue_duration: default_min_cue_duration(),
            terminate_sentences: true,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_chars == 0 {
            return Err(CuesyncError::Config("max_chars must be positive".to_string()));
        }
        if self.max_line_chars == 0 {
            return Err(CuesyncError::Config("max_line_chars must be positive".to_string()));
        }
        if !self.min_cue_duration.is_finite() || self.min_cue_duration < MIN_RENDERABLE_DURATION {
            return Err(CuesyncError::Config(format!(
                "min_cue_duration must be at least {}s, got {}",
                MIN_RENDERABLE_DURATION, self.min_cue_duration
            )));
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            overwrite: true,
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CuesyncError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| CuesyncError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CuesyncError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| CuesyncError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        self.sync.strategy()?;
        self.layout.validate()?;
        if self.output.extension.trim().is_empty() {
            return Err(CuesyncError::Config("output extension must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.sync.strategy().unwrap(),
            SyncStrategy::Smart {
                delay: 2.0,
                reading_speed: 0.8
            }
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [sync]
            method = "Delayed"
            delay = 1.5

            [layout]
            max_chars = 32
            "#,
        )
        .unwrap();

        assert_eq!(config.sync.strategy().unwrap(), SyncStrategy::Delayed { delay: 1.5 });
        assert_eq!(config.layout.max_chars, 32);
        assert_eq!(config.layout.max_line_chars, 35);
        assert_eq!(config.transcript.format, TranscriptFormat::Auto);
        assert_eq!(config.output.extension, "srt");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.sync.method = SyncMethod::Basic;
        config.layout.max_line_chars = 42;
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.sync.method, SyncMethod::Basic);
        assert_eq!(loaded.layout.max_line_chars, 42);
    }

    #[test]
    fn test_invalid_values_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sync]\nreading_speed = -1.0\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(CuesyncError::Config(_))));

        std::fs::write(&path, "[layout]\nmin_cue_duration = 0.0001\n").unwrap();
        assert!(matches!(Config::from_file(&path), Err(CuesyncError::Config(_))));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(SyncMethod::parse("SMART").unwrap(), SyncMethod::Smart);
        assert!(SyncMethod::parse("fast").is_err());
        assert_eq!(TranscriptFormat::parse("whisper-cpp").unwrap(), TranscriptFormat::WhisperCpp);
        assert_eq!(TranscriptFormat::parse("OpenAI").unwrap(), TranscriptFormat::OpenAI);
        assert!(TranscriptFormat::parse("vtt").is_err());
    }
}
