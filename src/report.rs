// WHY: Human-facing summary panel in Korean plus a machine-readable JSON rendering.
// Missing averages and ratios are shown as "데이터 없음" rather than NaN.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;

use crate::analyzer::{AnalysisResult, EndingRecord, EntityCategory};

const NO_DATA: &str = "데이터 없음";
const NO_RESULTS: &str = "검색 결과가 없습니다.";

/// Percentage with one decimal place, or the no-data marker
pub fn format_ratio(ratio: Option<f64>) -> String {
    ratio.map_or_else(|| NO_DATA.to_string(), |r| format!("{:.1}%", r * 100.0))
}

/// Average sentence length with one decimal place, or the no-data marker
pub fn format_average(average: Option<f64>) -> String {
    average.map_or_else(|| NO_DATA.to_string(), |a| format!("{a:.1}자"))
}

/// Text summary panel for one analysis
pub struct TextReport<'a> {
    pub title: Option<&'a str>,
    pub result: &'a AnalysisResult,
}

impl<'a> TextReport<'a> {
    pub fn new(result: &'a AnalysisResult) -> Self {
        Self { title: None, result }
    }

    pub fn titled(title: &'a str, result: &'a AnalysisResult) -> Self {
        Self {
            title: Some(title),
            result,
        }
    }

    fn write_statistics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.result.statistics;
        let style = &self.result.style;

        writeln!(f, "[기본 통계]")?;
        writeln!(f, "글자수: {}자", stats.char_count)?;
        writeln!(f, "문단수: {}개", stats.paragraph_count)?;
        writeln!(f, "문장수: {}개", stats.sentence_count)?;
        writeln!(f, "대화문: {}개", stats.dialogue_count)?;
        writeln!(f, "  - 직접대사: {}개", stats.double_quote_count)?;
        writeln!(f, "  - 내적독백: {}개", stats.single_quote_count)?;
        writeln!(f, "  - 특수대사: {}개", stats.special_dialogue_count)?;
        writeln!(f, "평균 문장 길이: {}", format_average(stats.average_sentence_length))?;
        writeln!(f, "대화문 비율: {}", format_ratio(style.dialogue_ratio))?;
        writeln!(f, "묘사문 비율: {}", format_ratio(style.description_ratio))?;
        writeln!(f, "짧은 문장: {}", format_ratio(style.short_sentence_ratio))?;
        writeln!(f, "긴 문장: {}", format_ratio(style.long_sentence_ratio))
    }

    fn write_entities(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[개체명]")?;
        for (category, entities) in self.result.entities.by_category() {
            writeln!(f, "{} ({}개)", category.label(), entities.len())?;
            if entities.is_empty() {
                writeln!(f, "  {NO_RESULTS}")?;
                continue;
            }
            for entity in entities {
                let appearance = entity
                    .first_appearance
                    .map_or_else(|| "등장 없음".to_string(), |p| format!("{p}문단 첫 등장"));
                writeln!(f, "  {} {}회 ({})", entity.name, entity.frequency, appearance)?;
            }
        }
        Ok(())
    }

    fn write_endings(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let endings = &self.result.endings;
        writeln!(f, "[어미 분석]")?;
        writeln!(f, "묘사문: {}회", endings.narrative_total())?;
        writeln!(f, "대화문: {}회", endings.dialogue_total())?;
        write_ending_table(f, "1. 묘사문 어미", &endings.narrative)?;
        write_ending_table(f, "2. 대화문 어미", &endings.dialogue)
    }

    fn write_keywords(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[주요 단어]")?;
        if self.result.keywords.is_empty() {
            return writeln!(f, "  {NO_RESULTS}");
        }
        for keyword in &self.result.keywords {
            writeln!(f, "  {} {}회", keyword.word, keyword.count)?;
        }
        Ok(())
    }
}

fn write_ending_table(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    records: &[EndingRecord],
) -> fmt::Result {
    writeln!(f, "{heading}")?;
    if records.is_empty() {
        return writeln!(f, "  {NO_RESULTS}");
    }
    for record in records {
        writeln!(f, "  {} {}회", record.word, record.count)?;
    }
    Ok(())
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title {
            writeln!(f, "=== {title} ===")?;
        }
        self.write_statistics(f)?;
        writeln!(f)?;
        self.write_entities(f)?;
        writeln!(f)?;
        self.write_endings(f)?;
        writeln!(f)?;
        self.write_keywords(f)
    }
}

/// Entity counts per category label, in display order
pub fn category_counts(result: &AnalysisResult) -> Vec<(&'static str, usize)> {
    EntityCategory::ALL
        .iter()
        .map(|&category| (category.label(), result.entities.in_category(category).count()))
        .collect()
}

/// Pretty JSON for any report value
pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize analysis report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(Some(0.4833)), "48.3%");
        assert_eq!(format_ratio(Some(1.0)), "100.0%");
        assert_eq!(format_ratio(None), "데이터 없음");
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(Some(12.26)), "12.3자");
        assert_eq!(format_average(Some(7.0)), "7.0자");
        assert_eq!(format_average(None), "데이터 없음");
    }

    #[test]
    fn test_text_report_sections() {
        let result = analyze("철수는 말했다. \"안녕.\" 철수가 웃었다.");
        let text = TextReport::titled("1장", &result).to_string();

        assert!(text.starts_with("=== 1장 ===\n"));
        assert!(text.contains("문장수: 3개"));
        assert!(text.contains("  - 직접대사: 1개"));
        assert!(text.contains("인명 (1개)"));
        assert!(text.contains("  철수 2회 (1문단 첫 등장)"));
        assert!(text.contains("묘사문: 2회"));
        assert!(text.contains("2. 대화문 어미\n  안녕 1회"));
    }

    #[test]
    fn test_empty_document_report() {
        let result = analyze("");
        let text = TextReport::new(&result).to_string();
        assert!(text.contains("평균 문장 길이: 데이터 없음"));
        assert!(text.contains("대화문 비율: 데이터 없음"));
        assert!(text.contains("검색 결과가 없습니다."));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_category_counts_cover_every_category() {
        let result = analyze("김철수님이 서울시에 갔다.");
        let counts = category_counts(&result);
        assert_eq!(counts.len(), 8);
        assert_eq!(counts[0].0, "인명");
        assert_eq!(counts[7].0, "기타");
    }

    #[test]
    fn test_json_uses_null_for_missing_data() {
        let json = render_json(&analyze("")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["statistics"]["average_sentence_length"].is_null());
        assert!(value["style"]["dialogue_ratio"].is_null());
        assert_eq!(value["statistics"]["paragraph_count"], 0);
    }
}
