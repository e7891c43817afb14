// WHY: Sentence-final word frequencies approximate verb-ending style. Short grammatical
// fragments split off by spacing are merged back onto the true ending by looking back
// up to two words.

use serde::Serialize;

use super::normalization::{
    char_len, contains_terminal_punctuation, is_terminal_punctuation, strip_quotation_marks,
    strip_trailing_terminals, without_last_chars,
};
use super::segmenter::DialogueSpan;
use super::tally::rank_by_frequency;

/// One ending with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndingRecord {
    pub word: String,
    pub count: usize,
}

/// Independent ending tables for dialogue and narration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EndingTables {
    pub dialogue: Vec<EndingRecord>,
    pub narrative: Vec<EndingRecord>,
}

impl EndingTables {
    pub fn dialogue_total(&self) -> usize {
        self.dialogue.iter().map(|r| r.count).sum()
    }

    pub fn narrative_total(&self) -> usize {
        self.narrative.iter().map(|r| r.count).sum()
    }
}

/// The ending key of one sentence, if it has one
///
/// A two-character final word absorbs a one-character word before it together with
/// the word before that, or otherwise just the preceding word, provided no terminal
/// punctuation occurs earlier in the sentence. Single-character endings are never
/// returned.
pub fn sentence_ending(sentence: &str) -> Option<String> {
    let clean = strip_trailing_terminals(sentence);
    let words: Vec<&str> = clean.split_whitespace().collect();
    let last = *words.last()?;
    let n = words.len();

    if char_len(last) == 2 && n > 1 {
        if char_len(words[n - 2]) == 1 && n > 2 {
            if let Some(merged) = merged_tail(clean, &words[n - 3..]) {
                return Some(merged);
            }
        }
        if let Some(merged) = merged_tail(clean, &words[n - 2..]) {
            return Some(merged);
        }
    }

    (char_len(last) > 1).then(|| last.to_string())
}

/// Space-joined tail, unless terminal punctuation precedes it
fn merged_tail(clean: &str, tail: &[&str]) -> Option<String> {
    let joined = tail.join(" ");
    let preceding = without_last_chars(clean, char_len(&joined));
    (!contains_terminal_punctuation(preceding)).then_some(joined)
}

/// Ranked endings of already-split sentences
///
/// Sentences are taken as given and are not re-split on inner `.`, `!` or `?`.
/// Narrative sentences come from the segmenter's `[.!?]+\s+` split, so text like
/// `넓다.바다를` stays one sentence, and an inner mark such as the point in `3.5km`
/// blocks the lookback merge.
pub fn analyze_endings<S: AsRef<str>>(sentences: &[S]) -> Vec<EndingRecord> {
    rank_by_frequency(sentences.iter().filter_map(|s| sentence_ending(s.as_ref())))
        .into_iter()
        .map(|(word, count)| EndingRecord { word, count })
        .collect()
}

/// Sentences spoken inside dialogue spans: quotation marks removed, then split on
/// every terminal mark since one span may hold several sentences
pub fn dialogue_sentences(spans: &[DialogueSpan]) -> Vec<String> {
    spans
        .iter()
        .flat_map(|span| {
            let unquoted = strip_quotation_marks(&span.text);
            unquoted
                .trim()
                .split(is_terminal_punctuation)
                .filter(|piece| !piece.trim().is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn analyze_dialogue_endings(spans: &[DialogueSpan]) -> Vec<EndingRecord> {
    analyze_endings(&dialogue_sentences(spans))
}
