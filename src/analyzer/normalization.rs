// WHY: standalone text helpers shared by the statistics, ending and keyword stages
// Lengths are counted in Unicode scalar values, never bytes

/// Characters that terminate a sentence
pub const TERMINAL_PUNCTUATION: &[char] = &['.', '!', '?'];

/// ASCII and typographic quotation marks delimiting dialogue
pub const QUOTATION_MARKS: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Length in characters
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub fn is_terminal_punctuation(ch: char) -> bool {
    TERMINAL_PUNCTUATION.contains(&ch)
}

pub fn contains_terminal_punctuation(text: &str) -> bool {
    text.contains(TERMINAL_PUNCTUATION)
}

/// Trim, drop a trailing run of terminal punctuation, trim again
pub fn strip_trailing_terminals(sentence: &str) -> &str {
    sentence
        .trim()
        .trim_end_matches(TERMINAL_PUNCTUATION)
        .trim()
}

/// Remove every quotation mark, wherever it occurs
pub fn strip_quotation_marks(text: &str) -> String {
    text.chars().filter(|c| !QUOTATION_MARKS.contains(c)).collect()
}

/// Prefix of `text` left after cutting `tail_chars` characters off its end
/// WHY: saturates to the empty string when the tail is longer than the text
pub fn without_last_chars(text: &str, tail_chars: usize) -> &str {
    let keep = char_len(text).saturating_sub(tail_chars);
    match text.char_indices().nth(keep) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Byte index of the character following the one starting at `byte_idx`
pub fn next_char_boundary(text: &str, byte_idx: usize) -> usize {
    byte_idx
        + text[byte_idx..]
            .chars()
            .next()
            .map_or(1, char::len_utf8)
}
