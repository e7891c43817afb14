use serde::Serialize;

use super::normalization::char_len;
use super::particles::SuffixStripper;
use super::tally::rank_by_frequency;

/// Default number of keywords reported
pub const DEFAULT_KEYWORD_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub word: String,
    pub count: usize,
}

/// Most frequent particle-stripped words of at least two characters
pub fn extract_keywords(text: &str, limit: usize) -> Vec<Keyword> {
    let stripper = SuffixStripper::particles();
    let words = text
        .split_whitespace()
        .map(|token| stripper.strip(token))
        .filter(|word| char_len(word) >= 2)
        .map(str::to_string);

    let mut ranked = rank_by_frequency(words);
    ranked.truncate(limit);
    ranked
        .into_iter()
        .map(|(word, count)| Keyword { word, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_merge_surface_forms() {
        let keywords = extract_keywords("바다는 넓다. 바다를 보았다. 바다의 냄새", 10);
        assert_eq!(keywords[0], Keyword { word: "바다".into(), count: 3 });
    }

    #[test]
    fn test_short_words_dropped() {
        // "책을" strips to a single character
        let keywords = extract_keywords("책을 나 그 소설", 10);
        let words: Vec<_> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["소설"]);
    }

    #[test]
    fn test_limit_and_first_seen_ties() {
        let text = "하나 둘둘 셋셋 넷넷 다섯 여섯 일곱 여덟 아홉 열열 열하나 열둘 둘둘";
        let keywords = extract_keywords(text, DEFAULT_KEYWORD_LIMIT);
        assert_eq!(keywords.len(), DEFAULT_KEYWORD_LIMIT);
        assert_eq!(keywords[0].word, "둘둘");
        assert_eq!(keywords[1].word, "하나");
        assert_eq!(keywords[2].word, "셋셋");
        assert!(keywords.iter().all(|k| char_len(&k.word) >= 2));
    }

    #[test]
    fn test_punctuation_stays_attached() {
        let keywords = extract_keywords("끝이다. 끝이다", 10);
        let words: Vec<_> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["끝이다.", "끝이다"]);
    }

    #[test]
    fn test_zero_limit_and_blank_text() {
        assert!(extract_keywords("바다 바다", 0).is_empty());
        assert!(extract_keywords("   \n ", 10).is_empty());
    }
}
