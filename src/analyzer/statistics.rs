use serde::Serialize;

use super::normalization::char_len;
use super::segmenter::{DialogueKind, Segmentation};

/// Structural counts for one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub char_count: usize,
    pub sentence_count: usize,
    pub dialogue_count: usize,
    pub double_quote_count: usize,
    pub single_quote_count: usize,
    /// Dash-prefixed and box-delimited lines combined
    pub special_dialogue_count: usize,
    pub narrative_sentence_count: usize,
    pub paragraph_count: usize,
    /// Mean length in characters of trimmed sentences; `None` when there are no sentences
    pub average_sentence_length: Option<f64>,
}

/// Style ratios over the sentence count; every field is `None` when there are no sentences
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleRatios {
    pub dialogue_ratio: Option<f64>,
    pub description_ratio: Option<f64>,
    pub short_sentence_ratio: Option<f64>,
    pub long_sentence_ratio: Option<f64>,
}

/// Sentence length thresholds, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthThresholds {
    /// Sentences at or below this length are short
    pub short_max: usize,
    /// Sentences at or above this length are long
    pub long_min: usize,
}

impl Default for LengthThresholds {
    fn default() -> Self {
        Self {
            short_max: 20,
            long_min: 50,
        }
    }
}

/// Visible character count: blank lines are dropped, the remaining lines are
/// joined without separators, interior whitespace is kept
pub fn char_count(text: &str) -> usize {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(char_len)
        .sum()
}

pub fn calculate(
    text: &str,
    segmentation: &Segmentation,
    thresholds: LengthThresholds,
) -> (Statistics, StyleRatios) {
    let sentence_count = segmentation.sentence_count();
    let dialogue_count = segmentation.dialogue_spans.len();
    let narrative_count = segmentation.narrative_sentences.len();

    let lengths: Vec<usize> = segmentation.sentences().map(|s| char_len(s.trim())).collect();
    let total_length: usize = lengths.iter().sum();
    let short = lengths.iter().filter(|&&len| len <= thresholds.short_max).count();
    let long = lengths.iter().filter(|&&len| len >= thresholds.long_min).count();

    let statistics = Statistics {
        char_count: char_count(text),
        sentence_count,
        dialogue_count,
        double_quote_count: segmentation.count_kind(|k| k == DialogueKind::DoubleQuoted),
        single_quote_count: segmentation.count_kind(|k| k == DialogueKind::SingleQuoted),
        special_dialogue_count: segmentation.count_kind(DialogueKind::is_special),
        narrative_sentence_count: narrative_count,
        paragraph_count: segmentation.paragraphs.len(),
        average_sentence_length: ratio(total_length, sentence_count),
    };

    let style = StyleRatios {
        dialogue_ratio: ratio(dialogue_count, sentence_count),
        description_ratio: ratio(narrative_count, sentence_count),
        short_sentence_ratio: ratio(short, sentence_count),
        long_sentence_ratio: ratio(long, sentence_count),
    };

    (statistics, style)
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}
