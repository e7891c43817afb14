// WHY: Single entry point composing the pure analysis stages. Patterns are compiled
// once per analyzer and the analyzer is shared read-only across threads.

use anyhow::Result;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::debug;

pub mod endings;
pub mod entities;
pub mod keywords;
pub mod normalization;
pub mod particles;
pub mod segmenter;
pub mod statistics;
pub mod tally;

// Re-export core types
pub use endings::{analyze_dialogue_endings, analyze_endings, sentence_ending, EndingRecord, EndingTables};
pub use entities::{Entity, EntityCategory, EntityExtractor, EntityInventory};
pub use keywords::{extract_keywords, Keyword, DEFAULT_KEYWORD_LIMIT};
pub use segmenter::{DialogueKind, DialogueRemoval, DialogueSpan, Segmentation, Segmenter};
pub use statistics::{char_count, LengthThresholds, Statistics, StyleRatios};

/// Tunable analysis parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    pub dialogue_removal: DialogueRemoval,
    /// Sentences of at most this many characters count as short
    pub short_sentence_max_chars: usize,
    /// Sentences of at least this many characters count as long
    pub long_sentence_min_chars: usize,
    pub keyword_limit: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        let thresholds = LengthThresholds::default();
        Self {
            dialogue_removal: DialogueRemoval::default(),
            short_sentence_max_chars: thresholds.short_max,
            long_sentence_min_chars: thresholds.long_min,
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
        }
    }
}

impl AnalyzerConfig {
    fn thresholds(&self) -> LengthThresholds {
        LengthThresholds {
            short_max: self.short_sentence_max_chars,
            long_min: self.long_sentence_min_chars,
        }
    }
}

/// Complete analysis of one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub statistics: Statistics,
    pub style: StyleRatios,
    pub entities: EntityInventory,
    pub endings: EndingTables,
    pub keywords: Vec<Keyword>,
}

/// Prose analyzer holding compiled patterns and configuration
pub struct ProseAnalyzer {
    config: AnalyzerConfig,
    segmenter: Segmenter,
    extractor: EntityExtractor,
}

impl ProseAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        Ok(Self {
            segmenter: Segmenter::new(config.dialogue_removal)?,
            extractor: EntityExtractor::new()?,
            config,
        })
    }

    pub fn with_default_config() -> Result<Self> {
        Self::new(AnalyzerConfig::default())
    }

    /// Analyze one document; total over every input, including the empty string
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let segmentation = self.segmenter.segment(text);
        let (statistics, style) =
            statistics::calculate(text, &segmentation, self.config.thresholds());
        let entities = self.extractor.extract(text, &segmentation.paragraphs);
        let endings = EndingTables {
            dialogue: analyze_dialogue_endings(&segmentation.dialogue_spans),
            narrative: analyze_endings(&segmentation.narrative_sentences),
        };
        let keywords = extract_keywords(text, self.config.keyword_limit);

        debug!(
            "Analyzed {} chars: {} sentences, {} entities, {} keywords",
            statistics.char_count,
            statistics.sentence_count,
            entities.len(),
            keywords.len()
        );

        AnalysisResult {
            statistics,
            style,
            entities,
            endings,
            keywords,
        }
    }
}

static DEFAULT_ANALYZER: OnceLock<ProseAnalyzer> = OnceLock::new();

/// Analyzer with the default configuration, compiled on first use
pub fn default_analyzer() -> &'static ProseAnalyzer {
    DEFAULT_ANALYZER.get_or_init(|| {
        ProseAnalyzer::with_default_config().expect("built-in analysis patterns must compile")
    })
}

/// Analyze `text` with the default configuration
pub fn analyze(text: &str) -> AnalysisResult {
    default_analyzer().analyze(text)
}
