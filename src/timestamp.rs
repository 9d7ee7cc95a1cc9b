use crate::error::{CuesyncError, Result};

/// Tolerance (in milliseconds) applied before truncation so that values sitting
/// on the millisecond grid survive binary floating point, e.g. 4.35 s.
const MS_TOLERANCE: f64 = 1e-6;

/// Convert a time offset in seconds to whole milliseconds, truncating.
///
/// Negative and non-finite inputs clamp to zero.
pub fn to_millis(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0 + MS_TOLERANCE).floor() as u64
}

/// Format time in seconds to SRT time format (HH:MM:SS,mmm)
pub fn format_timestamp(seconds: f64) -> String {
    let total_milliseconds = to_millis(seconds);
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

/// Parse an SRT timestamp (HH:MM:SS,mmm) back into seconds.
///
/// A period is accepted in place of the comma since some tools emit it.
pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
    let invalid = |what: &str| CuesyncError::parse(0, format!("{} in timestamp '{}'", what, timestamp));

    let trimmed = timestamp.trim();
    let (clock, millis) = trimmed
        .split_once([',', '.'])
        .ok_or_else(|| invalid("missing millisecond separator"))?;

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return Err(invalid("expected HH:MM:SS"));
    }

    let field = |s: &str, name: &str| -> Result<u64> {
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid(&format!("invalid {}", name)));
        }
        s.parse::<u64>().map_err(|_| invalid(&format!("invalid {}", name)))
    };

    let hours = field(parts[0], "hours")?;
    let minutes = field(parts[1], "minutes")?;
    let seconds = field(parts[2], "seconds")?;
    if millis.len() != 3 {
        return Err(invalid("milliseconds must have three digits"));
    }
    let millis = field(millis, "milliseconds")?;

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid("minutes and seconds must be below 60"));
    }

    let total_ms = hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
        .ok_or_else(|| invalid("hours out of range"))?;
    Ok(total_ms as f64 / 1000.0)
}
