use tracing::debug;

use super::overlap::MIN_RENDERABLE_DURATION;
use super::segmenter::char_length;
use super::{Diagnostic, Segment, SyncStrategy};

/// Seconds of display time budgeted per character at reading speed 1.0
pub const SECONDS_PER_CHAR: f64 = 0.15;

/// Minimum display time for a delayed cue
pub const DELAYED_MIN_DURATION: f64 = 3.0;

/// Minimum display time for a smart cue
pub const SMART_MIN_DURATION: f64 = 2.0;

/// Gap kept before the next segment when a smart cue runs long
pub const SMART_GAP: f64 = 0.5;

/// A chunk of text with its candidate display interval, before overlap resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedChunk {
    pub segment: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Assign a display interval to each (segment, chunk) pair.
///
/// Pairs beyond the shorter of the two lists are ignored; the caller reports them.
/// `segments` is the full list so that smart timing can look ahead past the last
/// paired segment.
pub fn compute_timings(
    segments: &[Segment],
    chunks: &[String],
    strategy: &SyncStrategy,
    min_cue_duration: f64,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<TimedChunk> {
    segments
        .iter()
        .zip(chunks)
        .enumerate()
        .map(|(i, (segment, chunk))| {
            let (start, mut end) = candidate_interval(segments, i, segment, char_length(chunk), strategy);

            // a smart clamp can leave a sliver shorter than one SRT tick
            if end - start < MIN_RENDERABLE_DURATION {
                debug!(
                    "Segment {}: interval {:.3}-{:.3} collapsed, flooring to {:.3}s",
                    i, start, end, min_cue_duration
                );
                end = start + min_cue_duration;
                diagnostics.push(Diagnostic::DurationFloored { segment: i, start, end });
            }

            TimedChunk {
                segment: i,
                start,
                end,
                text: chunk.clone(),
            }
        })
        .collect()
}

fn candidate_interval(
    segments: &[Segment],
    i: usize,
    segment: &Segment,
    chunk_length: usize,
    strategy: &SyncStrategy,
) -> (f64, f64) {
    match *strategy {
        SyncStrategy::Basic => (segment.start, segment.end),
        SyncStrategy::Delayed { delay } => {
            let start = segment.start + delay;
            let mut end = segment.end + delay;

            let min_duration = DELAYED_MIN_DURATION.max(chunk_length as f64 * SECONDS_PER_CHAR);
            if end - start < min_duration {
                end = start + min_duration;
            }
            (start, end)
        }
        SyncStrategy::Smart { delay, reading_speed } => {
            let start = segment.start + delay;
            let reading_time_per_char = SECONDS_PER_CHAR / reading_speed;
            let required_duration = SMART_MIN_DURATION.max(chunk_length as f64 * reading_time_per_char);
            let mut end = start + required_duration;

            if let Some(next) = segments.get(i + 1) {
                let next_start = next.start + delay;
                if end > next_start {
                    end = next_start - SMART_GAP;
                }
            }
            (start, end)
        }
    }
}
