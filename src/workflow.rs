use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{CuesyncError, Result};
use crate::subtitle::{CueSequence, read_srt, write_srt};
use crate::sync::{SyncOutcome, synchronize};
use crate::transcript::{TranscriptSource, TranscriptSourceFactory};

/// Counts reported after a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Workflow {
    config: Config,
    source: Box<dyn TranscriptSource>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let source = TranscriptSourceFactory::create_source(config.transcript.format);
        Self::with_source(config, source)
    }

    /// Create a workflow reading transcripts through a custom source
    pub fn with_source(config: Config, source: Box<dyn TranscriptSource>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, source })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Synchronize one transcript with its translation and write the SRT file
    pub async fn sync_file<P: AsRef<Path>, Q: AsRef<Path>, R: AsRef<Path>>(
        &self,
        transcript_path: P,
        text_path: Q,
        output_path: R,
    ) -> Result<SyncOutcome> {
        let transcript_path = transcript_path.as_ref();
        let text_path = text_path.as_ref();
        let output_path = output_path.as_ref();
        info!(
            "Synchronizing {} with {}",
            transcript_path.display(),
            text_path.display()
        );

        if output_path.exists() && !self.config.output.overwrite {
            return Err(CuesyncError::Config(format!(
                "Output file {} exists and overwrite is disabled",
                output_path.display()
            )));
        }

        let transcript = self.source.load(transcript_path).await?;
        debug!(
            "Transcript has {} segments (language: {})",
            transcript.segments.len(),
            transcript.language.as_deref().unwrap_or("unknown")
        );

        let text = read_translation(text_path).await?;
        let strategy = self.config.sync.strategy()?;
        let outcome = synchronize(&transcript.segments, &text, &strategy, &self.config.layout)?;

        for diagnostic in &outcome.diagnostics {
            debug!("{}", diagnostic);
        }

        write_srt(&outcome.cues, output_path).await?;
        Ok(outcome)
    }

    /// Synchronize every transcript in a directory that has a translation for `language`.
    ///
    /// A transcript `name.json` pairs with `name.<language>.txt` and produces
    /// `name.<language>.<ext>`. Failures are logged and counted, not propagated.
    pub async fn process_directory<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        language: &str,
        output_dir: Option<Q>,
    ) -> Result<BatchSummary> {
        let input_dir = input_dir.as_ref();
        info!("Processing directory: {}", input_dir.display());

        if !input_dir.is_dir() {
            return Err(CuesyncError::Config("Input path is not a directory".to_string()));
        }

        let output_dir = output_dir.map(|dir| dir.as_ref().to_path_buf());
        if let Some(dir) = &output_dir {
            fs::create_dir_all(dir).await?;
        }

        let mut transcripts: Vec<PathBuf> = WalkDir::new(input_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| {
                p.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            })
            .collect();
        transcripts.sort();

        info!("Found {} transcript files", transcripts.len());

        let mut summary = BatchSummary::default();
        for transcript_path in transcripts {
            let Some(stem) = transcript_path.file_stem().and_then(|s| s.to_str()) else {
                summary.skipped += 1;
                continue;
            };
            let parent = transcript_path.parent().unwrap_or(input_dir);

            let text_path = parent.join(format!("{}.{}.txt", stem, language));
            if !text_path.exists() {
                debug!("No {} translation for {}, skipping", language, transcript_path.display());
                summary.skipped += 1;
                continue;
            }

            let output_name = format!("{}.{}.{}", stem, language, self.config.output.extension);
            let output_path = output_dir
                .as_deref()
                .unwrap_or(parent)
                .join(output_name);

            match self.sync_file(&transcript_path, &text_path, &output_path).await {
                Ok(outcome) => {
                    info!(
                        "Successfully processed: {} ({} cues)",
                        transcript_path.display(),
                        outcome.cues.len()
                    );
                    summary.processed += 1;
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", transcript_path.display(), e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Batch complete: {} processed, {} skipped, {} failed",
            summary.processed, summary.skipped, summary.failed
        );
        Ok(summary)
    }
}

/// Read an SRT file and verify its cue ordering.
///
/// Independent of any sync configuration.
pub async fn check_file<P: AsRef<Path>>(srt_path: P) -> Result<CueSequence> {
    let srt_path = srt_path.as_ref();
    info!("Checking subtitle file: {}", srt_path.display());

    let cues = read_srt(srt_path).await?;
    cues.validate()?;
    Ok(cues)
}

async fn read_translation(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(CuesyncError::FileNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path).await?;
    Ok(content.trim_start_matches('\u{feff}').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SyncMethod, TranscriptFormat};
    use crate::sync::Segment;
    use crate::transcript::{MockTranscriptSource, Transcript};

    fn mock_source(segments: Vec<Segment>) -> Box<dyn TranscriptSource> {
        let mut source = MockTranscriptSource::new();
        source.expect_load().returning(move |_| {
            Ok(Transcript {
                text: String::new(),
                language: Some("en".to_string()),
                segments: segments.clone(),
            })
        });
        source.expect_format().return_const(TranscriptFormat::Auto);
        Box::new(source)
    }

    #[tokio::test]
    async fn test_sync_file_writes_srt() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = dir.path().join("movie.ja.txt");
        let output_path = dir.path().join("out").join("movie.ja.srt");
        std::fs::write(&text_path, "First sentence. Second one").unwrap();

        let mut config = Config::default();
        config.sync.method = SyncMethod::Basic;
        let workflow = Workflow::with_source(
            config,
            mock_source(vec![Segment::new(0.0, 1.5), Segment::new(2.0, 3.0)]),
        )
        .unwrap();

        let outcome = workflow
            .sync_file(dir.path().join("movie.json"), &text_path, &output_path)
            .await
            .unwrap();
        assert_eq!(outcome.cues.len(), 2);

        let written = std::fs::read_to_string(&output_path).unwrap();
        assert_eq!(
            written,
            "1\n00:00:00,000 --> 00:00:01,500\nFirst sentence.\n\n\
             2\n00:00:02,000 --> 00:00:03,000\nSecond one.\n\n"
        );
    }

    #[tokio::test]
    async fn test_sync_file_respects_overwrite_flag() {
        let dir = tempfile::tempdir().unwrap();
        let text_path = dir.path().join("a.txt");
        let output_path = dir.path().join("a.srt");
        std::fs::write(&text_path, "hello").unwrap();
        std::fs::write(&output_path, "keep me").unwrap();

        let mut config = Config::default();
        config.output.overwrite = false;
        let workflow = Workflow::with_source(config, mock_source(vec![Segment::new(0.0, 1.0)])).unwrap();

        let result = workflow.sync_file("a.json", &text_path, &output_path).await;
        assert!(matches!(result, Err(CuesyncError::Config(_))));
        assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "keep me");
    }

    #[tokio::test]
    async fn test_missing_translation_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let workflow = Workflow::with_source(Config::default(), mock_source(vec![])).unwrap();

        let result = workflow
            .sync_file("t.json", dir.path().join("missing.txt"), dir.path().join("o.srt"))
            .await;
        assert!(matches!(result, Err(CuesyncError::FileNotFound(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = Config::default();
        config.layout.max_line_chars = 0;
        assert!(Workflow::new(config).is_err());
    }
}
