/// Split text into chunks of whole words, each at most `max_chars` characters.
///
/// Words are packed greedily; a word that does not fit closes the current chunk.
/// A single word longer than `max_chars` becomes a chunk of its own.
pub fn split_by_length(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_length = 0;

    for word in text.split_whitespace() {
        let word_length = word.chars().count();

        if current.is_empty() {
            current.push(word);
            current_length = word_length;
        } else if current_length + 1 + word_length <= max_chars {
            current.push(word);
            current_length += 1 + word_length;
        } else {
            chunks.push(current.join(" "));
            current = vec![word];
            current_length = word_length;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Split text on the literal ". " sequence, dropping empty pieces.
///
/// Whitespace inside a sentence is collapsed so a cue never carries stray line breaks.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(". ")
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Number of characters the chunk occupies on screen.
pub fn char_length(text: &str) -> usize {
    text.chars().count()
}
