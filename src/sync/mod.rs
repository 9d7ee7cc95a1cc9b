// Subtitle synchronization engine
//
// Turns speech-timed segments plus one block of translated text into an
// ordered, non-overlapping cue sequence:
// - segmenter: splits the translation into per-cue chunks
// - timing: assigns each chunk a display interval for the chosen strategy
// - overlap: enforces ordering between neighbouring cues
// - wrap: breaks long cue text into two display lines
//
// The engine is pure; reading inputs and writing SRT files lives in the workflow.

pub mod overlap;
pub mod segmenter;
pub mod timing;
pub mod wrap;

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

pub use overlap::resolve_overlaps;
pub use segmenter::{split_by_length, split_sentences};
pub use timing::{TimedChunk, compute_timings};
pub use wrap::wrap_lines;

use crate::config::LayoutConfig;
use crate::error::{CuesyncError, Result};
use crate::subtitle::{Cue, CueSequence};

/// A speech-timed interval reported by the transcriber, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }
}

/// How cue timing is derived from the speech segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncStrategy {
    /// Segment times verbatim, text split on sentence boundaries
    Basic,
    /// Segment times shifted by `delay`, with a minimum display duration
    Delayed { delay: f64 },
    /// Shifted start, duration from text length and reading speed
    Smart { delay: f64, reading_speed: f64 },
}

impl SyncStrategy {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Basic => Ok(()),
            Self::Delayed { delay } => validate_delay(delay),
            Self::Smart { delay, reading_speed } => {
                validate_delay(delay)?;
                if !reading_speed.is_finite() || reading_speed <= 0.0 {
                    return Err(CuesyncError::Config(format!(
                        "reading_speed must be positive, got {}",
                        reading_speed
                    )));
                }
                if !(timing::SECONDS_PER_CHAR / reading_speed).is_finite() {
                    return Err(CuesyncError::Config(format!(
                        "reading_speed {} is too small to compute a reading time",
                        reading_speed
                    )));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for SyncStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Delayed { delay } => write!(f, "delayed (delay: {}s)", delay),
            Self::Smart { delay, reading_speed } => {
                write!(f, "smart (delay: {}s, reading speed: {})", delay, reading_speed)
            }
        }
    }
}

fn validate_delay(delay: f64) -> Result<()> {
    if !delay.is_finite() || delay < 0.0 {
        return Err(CuesyncError::Config(format!(
            "delay must be a non-negative number of seconds, got {}",
            delay
        )));
    }
    Ok(())
}

/// Non-fatal notes about adjustments made while building cues.
///
/// `segment` is the position of the segment/chunk pair the note refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Segments left over after every chunk was placed
    UnmatchedSegments { count: usize },
    /// Chunks left over after every segment was used
    UnmatchedChunks { count: usize },
    /// Interval collapsed and was given the minimum cue duration
    DurationFloored { segment: usize, start: f64, end: f64 },
    /// End pulled back to the next cue's start
    OverlapClamped { segment: usize, from: f64, to: f64 },
    /// Cue removed because it had no room before the next cue
    CueDropped { segment: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmatchedSegments { count } => write!(f, "{} segment(s) had no text and were skipped", count),
            Self::UnmatchedChunks { count } => write!(f, "{} text chunk(s) had no segment and were dropped", count),
            Self::DurationFloored { segment, start, end } => {
                write!(f, "segment {}: duration floored to {:.3}-{:.3}", segment, start, end)
            }
            Self::OverlapClamped { segment, from, to } => {
                write!(f, "segment {}: end clamped from {:.3} to {:.3}", segment, from, to)
            }
            Self::CueDropped { segment } => write!(f, "segment {}: cue dropped, no room before next cue", segment),
        }
    }
}

/// Result of a synchronization run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    pub cues: CueSequence,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build a cue sequence from speech segments and translated text.
///
/// Inputs are validated up front; on error nothing is returned. Empty text is
/// not an error and yields an empty sequence.
pub fn synchronize(
    segments: &[Segment],
    text: &str,
    strategy: &SyncStrategy,
    layout: &LayoutConfig,
) -> Result<SyncOutcome> {
    strategy.validate()?;
    layout.validate()?;
    validate_segments(segments)?;

    info!("Synchronizing {} segments using {} strategy", segments.len(), strategy);

    let chunks = split_text(text, strategy, layout);
    if chunks.is_empty() {
        warn!("Translated text is empty, no cues generated");
        return Ok(SyncOutcome::default());
    }

    let mut diagnostics = Vec::new();
    if segments.len() > chunks.len() {
        let count = segments.len() - chunks.len();
        warn!("{} segments have no matching text chunk and will be skipped", count);
        diagnostics.push(Diagnostic::UnmatchedSegments { count });
    } else if chunks.len() > segments.len() {
        let count = chunks.len() - segments.len();
        warn!("{} text chunks have no matching segment and will be dropped", count);
        diagnostics.push(Diagnostic::UnmatchedChunks { count });
    }

    let timed = compute_timings(segments, &chunks, strategy, layout.min_cue_duration, &mut diagnostics);
    if let Some(chunk) = timed.iter().find(|t| !t.start.is_finite() || !t.end.is_finite()) {
        return Err(CuesyncError::invalid_input(
            chunk.segment,
            format!("computed interval {} - {} is out of range", chunk.start, chunk.end),
        ));
    }
    let resolved = resolve_overlaps(timed, &mut diagnostics);

    let cues: Vec<Cue> = resolved
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| Cue {
            index: i + 1,
            start: chunk.start,
            end: chunk.end,
            lines: wrap_lines(&chunk.text, layout.max_line_chars),
        })
        .collect();

    let cues = CueSequence::from(cues);
    cues.validate()?;

    debug!("Synchronization produced {} diagnostics", diagnostics.len());
    info!("Generated {} cues", cues.len());

    Ok(SyncOutcome { cues, diagnostics })
}

fn split_text(text: &str, strategy: &SyncStrategy, layout: &LayoutConfig) -> Vec<String> {
    match strategy {
        SyncStrategy::Basic => split_sentences(text)
            .into_iter()
            .map(|mut sentence| {
                if layout.terminate_sentences && !sentence.ends_with('.') {
                    sentence.push('.');
                }
                sentence
            })
            .collect(),
        SyncStrategy::Delayed { .. } | SyncStrategy::Smart { .. } => split_by_length(text, layout.max_chars),
    }
}

fn validate_segments(segments: &[Segment]) -> Result<()> {
    let mut previous_start = 0.0;

    for (index, segment) in segments.iter().enumerate() {
        if !segment.start.is_finite() || !segment.end.is_finite() {
            return Err(CuesyncError::invalid_input(
                index,
                format!("segment times must be finite ({} - {})", segment.start, segment.end),
            ));
        }
        if segment.start < 0.0 {
            return Err(CuesyncError::invalid_input(
                index,
                format!("segment starts before zero ({})", segment.start),
            ));
        }
        if segment.end <= segment.start {
            return Err(CuesyncError::invalid_input(
                index,
                format!("segment end {} is not after start {}", segment.end, segment.start),
            ));
        }
        if segment.start < previous_start {
            return Err(CuesyncError::invalid_input(
                index,
                format!(
                    "segment start {} precedes previous segment start {}",
                    segment.start, previous_start
                ),
            ));
        }
        previous_start = segment.start;
    }

    Ok(())
}
