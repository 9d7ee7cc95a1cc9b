use tracing::{debug, warn};

use super::Diagnostic;
use super::timing::TimedChunk;

/// Shortest duration that still renders as a distinct SRT interval
pub const MIN_RENDERABLE_DURATION: f64 = 0.001;

/// Enforce `end <= next.start` across the timed chunks.
///
/// Ends are pulled back to the next start; starts never move. Overlap-freedom
/// takes priority over any minimum duration, so a clamped cue may end up
/// shorter than its strategy's floor. A cue left without a renderable duration
/// (the next cue starts less than a millisecond after it) is dropped.
pub fn resolve_overlaps(timed: Vec<TimedChunk>, diagnostics: &mut Vec<Diagnostic>) -> Vec<TimedChunk> {
    let next_starts: Vec<Option<f64>> = timed
        .iter()
        .skip(1)
        .map(|t| Some(t.start))
        .chain(std::iter::once(None))
        .collect();

    let mut resolved = Vec::with_capacity(timed.len());

    for (mut chunk, next_start) in timed.into_iter().zip(next_starts) {
        if let Some(next_start) = next_start {
            if chunk.end > next_start {
                debug!(
                    "Segment {}: end {:.3} overlaps next start {:.3}, clamping",
                    chunk.segment, chunk.end, next_start
                );
                diagnostics.push(Diagnostic::OverlapClamped {
                    segment: chunk.segment,
                    from: chunk.end,
                    to: next_start,
                });
                chunk.end = next_start;
            }
        }

        if chunk.end - chunk.start < MIN_RENDERABLE_DURATION {
            warn!(
                "Dropping cue for segment {}: no room before the next cue at {:.3}",
                chunk.segment, chunk.start
            );
            diagnostics.push(Diagnostic::CueDropped { segment: chunk.segment });
            continue;
        }

        resolved.push(chunk);
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(segment: usize, start: f64, end: f64) -> TimedChunk {
        TimedChunk {
            segment,
            start,
            end,
            text: format!("chunk {}", segment),
        }
    }

    #[test]
    fn test_non_overlapping_input_untouched() {
        let mut diagnostics = Vec::new();
        let input = vec![chunk(0, 0.0, 1.0), chunk(1, 1.0, 2.0), chunk(2, 2.5, 3.0)];
        let resolved = resolve_overlaps(input.clone(), &mut diagnostics);
        assert_eq!(resolved, input);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_clamps_end_and_keeps_start() {
        let mut diagnostics = Vec::new();
        let resolved = resolve_overlaps(vec![chunk(0, 2.0, 5.0), chunk(1, 3.0, 6.0)], &mut diagnostics);
        assert_eq!((resolved[0].start, resolved[0].end), (2.0, 3.0));
        assert_eq!((resolved[1].start, resolved[1].end), (3.0, 6.0));
        assert_eq!(
            diagnostics,
            vec![Diagnostic::OverlapClamped { segment: 0, from: 5.0, to: 3.0 }]
        );
    }

    #[test]
    fn test_clamp_may_shrink_below_floor() {
        let mut diagnostics = Vec::new();
        let resolved = resolve_overlaps(vec![chunk(0, 1.0, 4.0), chunk(1, 1.05, 4.0)], &mut diagnostics);
        assert_eq!(resolved.len(), 2);
        assert!((resolved[0].end - 1.05).abs() < 1e-12);
    }

    #[test]
    fn test_shared_start_drops_earlier_cue() {
        let mut diagnostics = Vec::new();
        let resolved = resolve_overlaps(
            vec![chunk(0, 0.0, 2.0), chunk(1, 1.0, 3.0), chunk(2, 1.0, 4.0)],
            &mut diagnostics,
        );
        let segments: Vec<usize> = resolved.iter().map(|c| c.segment).collect();
        assert_eq!(segments, vec![0, 2]);
        assert_eq!(resolved[0].end, 1.0);
        assert!(diagnostics.contains(&Diagnostic::CueDropped { segment: 1 }));
    }

    #[test]
    fn test_output_never_overlaps() {
        let mut diagnostics = Vec::new();
        let input: Vec<TimedChunk> = (0..50)
            .map(|i| {
                let start = i as f64 * 0.7;
                chunk(i, start, start + 3.0 - (i % 4) as f64 * 0.5)
            })
            .collect();
        let resolved = resolve_overlaps(input, &mut diagnostics);
        for pair in resolved.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert!(resolved.iter().all(|c| c.start < c.end));
    }
}
