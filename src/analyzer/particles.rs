// WHY: Centralized Korean particle and honorific tables shared by entity, keyword and
// ending analysis so every stage strips the same suffix set

use std::collections::HashSet;

/// Grammatical particles that attach directly to the preceding noun
pub const PARTICLES: &[char] = &['은', '는', '이', '가', '을', '를', '의', '와', '과'];

/// Honorific and address suffixes attached to personal names
pub const HONORIFICS: &[char] = &['님', '씨', '군', '양'];

/// Suffix lookup for canonicalizing surface forms
#[derive(Debug, Clone)]
pub struct SuffixStripper {
    suffixes: HashSet<char>,
}

impl SuffixStripper {
    /// Stripper for bare particles only (keywords and the generic entity pass)
    pub fn particles() -> Self {
        Self {
            suffixes: PARTICLES.iter().copied().collect(),
        }
    }

    /// Stripper for particles plus honorifics (category-specific entity rules)
    pub fn particles_and_honorifics() -> Self {
        Self {
            suffixes: PARTICLES.iter().chain(HONORIFICS).copied().collect(),
        }
    }

    pub fn is_suffix(&self, ch: char) -> bool {
        self.suffixes.contains(&ch)
    }

    /// Remove every trailing suffix character, then surrounding whitespace
    pub fn strip<'a>(&self, surface: &'a str) -> &'a str {
        surface
            .trim()
            .trim_end_matches(|c: char| self.is_suffix(c))
            .trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_trailing_particle() {
        let stripper = SuffixStripper::particles();
        assert_eq!(stripper.strip("철수는"), "철수");
        assert_eq!(stripper.strip("학교를 "), "학교");
        assert_eq!(stripper.strip("  바다와\n"), "바다");
    }

    #[test]
    fn test_only_tail_is_stripped() {
        let stripper = SuffixStripper::particles();
        // Leading particle-shaped syllables belong to the stem
        assert_eq!(stripper.strip("이순신은"), "이순신");
        assert_eq!(stripper.strip("가나다"), "가나다");
    }

    #[test]
    fn test_consecutive_suffixes_collapse() {
        let stripper = SuffixStripper::particles_and_honorifics();
        assert_eq!(stripper.strip("민수씨는"), "민수");
        assert_eq!(stripper.strip("선생님이"), "선생");
    }

    #[test]
    fn test_honorifics_ignored_by_particle_stripper() {
        let stripper = SuffixStripper::particles();
        assert_eq!(stripper.strip("민수씨"), "민수씨");
        assert!(!stripper.is_suffix('님'));
        assert!(SuffixStripper::particles_and_honorifics().is_suffix('님'));
    }

    #[test]
    fn test_all_suffix_input_becomes_empty() {
        let stripper = SuffixStripper::particles();
        assert_eq!(stripper.strip("이가"), "");
    }
}
