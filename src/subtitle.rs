use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

use crate::error::{CuesyncError, Result};
use crate::timestamp::{format_timestamp, parse_timestamp, to_millis};

/// One subtitle display unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub lines: Vec<String>,
}

impl Cue {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Ordered, non-overlapping cues with contiguous 1-based indices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CueSequence {
    cues: Vec<Cue>,
}

impl From<Vec<Cue>> for CueSequence {
    fn from(cues: Vec<Cue>) -> Self {
        Self { cues }
    }
}

impl Deref for CueSequence {
    type Target = [Cue];

    fn deref(&self) -> &Self::Target {
        &self.cues
    }
}

impl CueSequence {
    /// Check every sequence invariant, reporting the first violation.
    pub fn validate(&self) -> Result<()> {
        for (position, cue) in self.cues.iter().enumerate() {
            if cue.index != position + 1 {
                return Err(CuesyncError::invalid_input(
                    position,
                    format!("cue index {} does not match position {}", cue.index, position + 1),
                ));
            }
            if !cue.start.is_finite() || !cue.end.is_finite() {
                return Err(CuesyncError::invalid_input(
                    position,
                    format!("cue {} has a time outside the representable range", cue.index),
                ));
            }
            if !(cue.start < cue.end) {
                return Err(CuesyncError::invalid_input(
                    position,
                    format!("cue {} ends at {} which is not after its start {}", cue.index, cue.end, cue.start),
                ));
            }
            if cue.lines.is_empty() || cue.lines.len() > 2 {
                return Err(CuesyncError::invalid_input(
                    position,
                    format!("cue {} has {} lines, expected 1 or 2", cue.index, cue.lines.len()),
                ));
            }
        }

        for (position, pair) in self.cues.windows(2).enumerate() {
            if pair[0].end > pair[1].start {
                return Err(CuesyncError::invalid_input(
                    position,
                    format!(
                        "cue {} ends at {} after cue {} starts at {}",
                        pair[0].index, pair[0].end, pair[1].index, pair[1].start
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Render the cues as an SRT document.
    pub fn to_srt(&self) -> String {
        let mut srt_content = String::new();

        for cue in &self.cues {
            srt_content.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                cue.index,
                format_timestamp(cue.start),
                format_timestamp(cue.end),
                cue.text()
            ));
        }

        srt_content
    }

    /// Read an SRT document.
    ///
    /// Accepts a leading BOM, CRLF line endings and extra blank lines between
    /// blocks. Times are kept at millisecond precision.
    pub fn parse_srt(content: &str) -> Result<Self> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut cues = Vec::new();
        let mut lines = content.lines().map(|l| l.trim_end_matches('\r')).enumerate().peekable();

        loop {
            // skip blank lines between blocks
            while matches!(lines.peek(), Some((_, l)) if l.trim().is_empty()) {
                lines.next();
            }

            let Some((index_line_no, index_line)) = lines.next() else {
                break;
            };
            let index: usize = index_line
                .trim()
                .parse()
                .map_err(|_| CuesyncError::parse(index_line_no + 1, format!("invalid cue index '{}'", index_line.trim())))?;

            let (time_line_no, time_line) = lines
                .next()
                .ok_or_else(|| CuesyncError::parse(index_line_no + 2, "missing time range"))?;
            let (start, end) = parse_time_range(time_line).map_err(|e| match e {
                CuesyncError::Parse { message, .. } => CuesyncError::parse(time_line_no + 1, message),
                other => other,
            })?;

            let mut text_lines = Vec::new();
            while let Some((_, line)) = lines.peek() {
                if line.trim().is_empty() {
                    break;
                }
                text_lines.push(line.trim().to_string());
                lines.next();
            }

            if text_lines.is_empty() {
                return Err(CuesyncError::parse(time_line_no + 2, format!("cue {} has no text", index)));
            }

            cues.push(Cue {
                index,
                start,
                end,
                lines: text_lines,
            });
        }

        debug!("Parsed {} cues from SRT content", cues.len());
        Ok(Self { cues })
    }

    /// Same sequence with times truncated to what an SRT file can carry.
    pub fn quantized(&self) -> Self {
        let cues = self
            .cues
            .iter()
            .map(|cue| Cue {
                start: to_millis(cue.start) as f64 / 1000.0,
                end: to_millis(cue.end) as f64 / 1000.0,
                ..cue.clone()
            })
            .collect();
        Self { cues }
    }
}

fn parse_time_range(line: &str) -> Result<(f64, f64)> {
    let (start, end) = line
        .split_once("-->")
        .ok_or_else(|| CuesyncError::parse(0, format!("invalid time range '{}'", line.trim())))?;
    Ok((parse_timestamp(start)?, parse_timestamp(end)?))
}

/// Write the cue sequence to an SRT file
pub async fn write_srt<P: AsRef<Path>>(cues: &CueSequence, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("Generating SRT file: {}", output_path.display());

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    fs::write(output_path, cues.to_srt()).await?;

    info!("SRT file generated successfully ({} cues)", cues.len());
    Ok(())
}

/// Read and parse an SRT file
pub async fn read_srt<P: AsRef<Path>>(input_path: P) -> Result<CueSequence> {
    let input_path = input_path.as_ref();
    if !input_path.exists() {
        return Err(CuesyncError::FileNotFound(input_path.display().to_string()));
    }

    let content = fs::read_to_string(input_path).await?;
    CueSequence::parse_srt(&content)
}
