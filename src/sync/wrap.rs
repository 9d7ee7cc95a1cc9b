use super::segmenter::char_length;

/// Break a cue's text into at most two display lines.
///
/// Text within `max_line_chars` is returned as a single line. Longer text is
/// split at the middle word; a single word always stays on one line.
pub fn wrap_lines(text: &str, max_line_chars: usize) -> Vec<String> {
    if char_length(text) <= max_line_chars {
        return vec![text.to_string()];
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 2 {
        return vec![text.trim().to_string()];
    }

    let mid_point = words.len() / 2;
    vec![words[..mid_point].join(" "), words[mid_point..].join(" ")]
}
