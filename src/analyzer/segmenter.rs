// WHY: Dialogue-aware segmentation of Korean prose into dialogue spans, narrative
// sentences and paragraphs. Every pattern runs on the regex-automata meta engine,
// and a rejected quote never rescans the whitespace run in front of it, so
// search time stays linear in the document length.

use anyhow::Result;
use regex_automata::{meta::Regex, Input, PatternID};
use serde::Serialize;
use tracing::debug;

use super::normalization::next_char_boundary;

/// Internal stand-in for a `***` section divider line
/// WHY: ASCII record separator never occurs in manuscript prose and is not whitespace
const SECTION_DIVIDER: &str = "\u{1E}";

/// How matched dialogue is taken out of the text before narrative splitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialogueRemoval {
    /// Remove the first occurrence of each span's literal text, span by span.
    /// If the same text also appears as ordinary narration, the earliest
    /// occurrence is the one removed, wherever the dialogue actually was.
    #[default]
    FirstOccurrence,
    /// Remove exactly the byte ranges where the spans were matched
    ByPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialogueKind {
    DoubleQuoted,
    SingleQuoted,
    SpecialDash,
    SpecialBox,
}

impl DialogueKind {
    pub fn is_special(self) -> bool {
        matches!(self, DialogueKind::SpecialDash | DialogueKind::SpecialBox)
    }
}

/// A unit of direct speech or internal monologue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogueSpan {
    /// Raw matched text, including any leading whitespace the pattern consumed
    pub text: String,
    pub kind: DialogueKind,
    /// Byte offset of the match in the source document
    pub start: usize,
    /// Byte offset one past the match
    pub end: usize,
}

/// Segmenter output: the three streams every later stage consumes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Segmentation {
    /// Double-quoted spans, then single-quoted spans, then special spans
    pub dialogue_spans: Vec<DialogueSpan>,
    /// Trimmed, non-empty narrative sentences in document order
    pub narrative_sentences: Vec<String>,
    /// Trimmed, non-empty paragraphs in document order
    pub paragraphs: Vec<String>,
}

impl Segmentation {
    /// All logical sentences: narrative sentences followed by trimmed dialogue
    pub fn sentences(&self) -> impl Iterator<Item = &str> {
        self.narrative_sentences
            .iter()
            .map(String::as_str)
            .chain(self.dialogue_spans.iter().map(|span| span.text.trim()))
    }

    pub fn sentence_count(&self) -> usize {
        self.dialogue_spans.len() + self.narrative_sentences.len()
    }

    pub fn count_kind(&self, predicate: impl Fn(DialogueKind) -> bool) -> usize {
        self.dialogue_spans
            .iter()
            .filter(|span| predicate(span.kind))
            .count()
    }
}

pub struct Segmenter {
    double_quote: Regex,
    single_quote: Regex,
    special: Regex,
    narrative_boundary: Regex,
    divider_line: Regex,
    paragraph_break: Regex,
    removal: DialogueRemoval,
}

impl Segmenter {
    pub fn new(removal: DialogueRemoval) -> Result<Self> {
        // Compositional pattern components
        let double_marks = "\"\u{201C}\u{201D}";
        let single_marks = "'\u{2018}\u{2019}";
        let line_start = r"(?:^|\n)\s*";

        let double_quote = format!(r"\s*[{double_marks}][^{double_marks}]*[{double_marks}]");
        let single_quote = format!(r"\s*[{single_marks}][^{single_marks}]*[{single_marks}]");

        // Dash lines run to the first terminal mark; box lines close on the first ┘
        let dash_line = format!(r"{line_start}-[^.\n]+[.!?]");
        let box_line = format!(r"{line_start}┌[^┘]+┘");

        Ok(Self {
            double_quote: Regex::new(&double_quote)?,
            single_quote: Regex::new(&single_quote)?,
            // WHY: one leftmost-first scan so dash and box lines interleave in document order
            special: Regex::new_many(&[dash_line.as_str(), box_line.as_str()])?,
            narrative_boundary: Regex::new(r"[.!?]+\s+")?,
            divider_line: Regex::new(r"(?m)^[ \t]*\*\*\*[ \t\r]*$")?,
            paragraph_break: Regex::new(r"\n\s*\n\s*\n")?,
            removal,
        })
    }

    pub fn segment(&self, text: &str) -> Segmentation {
        let dialogue_spans = self.extract_dialogue(text);
        let remainder = self.remove_dialogue(text, &dialogue_spans);
        let narrative_sentences = self.split_narrative(&remainder);
        let paragraphs = self.split_paragraphs(text);

        debug!(
            dialogue = dialogue_spans.len(),
            narrative = narrative_sentences.len(),
            paragraphs = paragraphs.len(),
            "Segmented document of {} bytes",
            text.len()
        );

        Segmentation {
            dialogue_spans,
            narrative_sentences,
            paragraphs,
        }
    }

    /// Run the four dialogue passes in their fixed order
    pub fn extract_dialogue(&self, text: &str) -> Vec<DialogueSpan> {
        let mut spans = find_quoted(&self.double_quote, text, DialogueKind::DoubleQuoted);
        spans.extend(find_quoted(&self.single_quote, text, DialogueKind::SingleQuoted));
        spans.extend(self.special.find_iter(text).map(|mat| DialogueSpan {
            text: text[mat.range()].to_string(),
            kind: special_kind(mat.pattern()),
            start: mat.start(),
            end: mat.end(),
        }));
        spans
    }

    /// Working copy of the document with dialogue taken out
    pub fn remove_dialogue(&self, text: &str, spans: &[DialogueSpan]) -> String {
        match self.removal {
            DialogueRemoval::FirstOccurrence => spans
                .iter()
                .fold(text.to_string(), |working, span| working.replacen(&span.text, "", 1)),
            DialogueRemoval::ByPosition => remove_ranges(text, spans),
        }
    }

    pub fn split_narrative(&self, text: &str) -> Vec<String> {
        split_on(&self.narrative_boundary, text)
            .into_iter()
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Paragraphs break on two or more blank lines and on `***` divider lines
    pub fn split_paragraphs(&self, text: &str) -> Vec<String> {
        let marked = replace_all(&self.divider_line, text, SECTION_DIVIDER);

        split_on(&self.paragraph_break, &marked)
            .into_iter()
            .flat_map(|chunk| chunk.split(SECTION_DIVIDER))
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn special_kind(pattern: PatternID) -> DialogueKind {
    if pattern.as_usize() == 0 {
        DialogueKind::SpecialDash
    } else {
        DialogueKind::SpecialBox
    }
}

/// Quoted spans that are not immediately followed by `)`
/// WHY: the meta engine has no lookahead. A rejected candidate restarts the scan one
/// character past its opening mark: every earlier start only adds leading whitespace
/// to the same rejected match, so this is where a backtracking `(?!\))` would next succeed
fn find_quoted(pattern: &Regex, text: &str, kind: DialogueKind) -> Vec<DialogueSpan> {
    let mut spans = Vec::new();
    let mut position = 0;

    while position < text.len() {
        let Some(mat) = pattern.find(Input::new(text).range(position..)) else {
            break;
        };

        if text[mat.end()..].starts_with(')') {
            position = next_char_boundary(text, opening_mark(text, mat.start(), mat.end()));
            continue;
        }

        spans.push(DialogueSpan {
            text: text[mat.range()].to_string(),
            kind,
            start: mat.start(),
            end: mat.end(),
        });
        position = mat.end().max(next_char_boundary(text, mat.start()));
    }

    spans
}

/// Byte offset of the quote mark after a match's leading whitespace
fn opening_mark(text: &str, start: usize, end: usize) -> usize {
    let matched = &text[start..end];
    start + (matched.len() - matched.trim_start().len())
}

/// Drop the union of all span ranges from the text
fn remove_ranges(text: &str, spans: &[DialogueSpan]) -> String {
    let mut ranges: Vec<(usize, usize)> = spans.iter().map(|s| (s.start, s.end)).collect();
    ranges.sort_unstable();

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for (start, end) in ranges {
        if start > cursor {
            result.push_str(&text[cursor..start]);
        }
        cursor = cursor.max(end);
    }
    if cursor < text.len() {
        result.push_str(&text[cursor..]);
    }
    result
}

/// Pieces of `text` between matches of `pattern`
pub(crate) fn split_on<'t>(pattern: &Regex, text: &'t str) -> Vec<&'t str> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for mat in pattern.find_iter(text) {
        pieces.push(&text[last..mat.start()]);
        last = mat.end();
    }
    pieces.push(&text[last..]);
    pieces
}

fn replace_all(pattern: &Regex, text: &str, replacement: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for mat in pattern.find_iter(text) {
        result.push_str(&text[last..mat.start()]);
        result.push_str(replacement);
        last = mat.end();
    }
    result.push_str(&text[last..]);
    result
}
