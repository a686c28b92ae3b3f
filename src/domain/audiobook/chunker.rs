use super::Segment;

/// Split text into segments of at most `max_len` bytes, breaking only between words.
///
/// Whitespace runs collapse to a single space. A word longer than `max_len`
/// is the one case that gets cut, at char boundaries, since no request could
/// carry it whole.
pub fn split_into_segments(text: &str, max_len: usize) -> Vec<Segment> {
    let max_len = max_len.max(1);
    let mut texts: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        for piece in split_long_word(word, max_len) {
            let separator = usize::from(!current.is_empty());
            if !current.is_empty() && current.len() + separator + piece.len() > max_len {
                texts.push(std::mem::take(&mut current));
            }

            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(piece);
        }
    }

    if !current.is_empty() {
        texts.push(current);
    }

    texts
        .into_iter()
        .enumerate()
        .map(|(index, text)| Segment { index, text })
        .collect()
}

/// Keep the first `length` characters of `text`; `0` keeps everything
pub fn truncate_chars(text: &str, length: usize) -> &str {
    if length == 0 {
        return text;
    }

    match text.char_indices().nth(length) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

fn split_long_word(word: &str, max_len: usize) -> Vec<&str> {
    if word.len() <= max_len {
        return vec![word];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (index, ch) in word.char_indices() {
        if index > start && index + ch.len_utf8() - start > max_len {
            pieces.push(&word[start..index]);
            start = index;
        }
    }
    pieces.push(&word[start..]);

    pieces
}
