// Korean manuscript fixtures with known analysis results
// WHY: Golden-file testing requires deterministic input/output pairs for validation

#![allow(dead_code)]

/// Two paragraphs, one quoted line
pub const GOLDEN_TEXT: &str = "민수는 웃었다. \"가자.\" 민수가 말했다.\n\n\n바다는 조용했다.";

/// Text summary panel expected for GOLDEN_TEXT
pub const GOLDEN_REPORT: &str = r#"[기본 통계]
글자수: 32자
문단수: 2개
문장수: 4개
대화문: 1개
  - 직접대사: 1개
  - 내적독백: 0개
  - 특수대사: 0개
평균 문장 길이: 7.0자
대화문 비율: 25.0%
묘사문 비율: 75.0%
짧은 문장: 100.0%
긴 문장: 0.0%

[개체명]
인명 (2개)
  민수 2회 (1문단 첫 등장)
  바다 1회 (2문단 첫 등장)
조직명 (0개)
  검색 결과가 없습니다.
장소명 (0개)
  검색 결과가 없습니다.
기술명 (0개)
  검색 결과가 없습니다.
사물명 (0개)
  검색 결과가 없습니다.
지위명 (0개)
  검색 결과가 없습니다.
사건명 (0개)
  검색 결과가 없습니다.
기타 (0개)
  검색 결과가 없습니다.

[어미 분석]
묘사문: 3회
대화문: 1회
1. 묘사문 어미
  웃었다 1회
  말했다 1회
  조용했다 1회
2. 대화문 어미
  가자 1회

[주요 단어]
  민수 2회
  웃었다. 1회
  "가자." 1회
  말했다. 1회
  바다 1회
  조용했다. 1회"#;

/// Every dialogue kind, a section divider and several entity categories
pub const RICH_TEXT: &str = "김철수님은 한빛연구소에 출근했다. \u{201C}좋은 아침입니다.\u{201D} 그가 인사했다.\n\
'오늘도 길겠군.' 철수는 생각했다.\n\
- 회의는 오후 세 시입니다.\n\
┌긴급 공지┘\n\
\n\
\n\
박영희 부장이 서울시 광장으로 향했다. 그녀는 \"용어(\"정의\") 확인\"이라고 적었다.\n\
***\n\
임진전쟁 기록은 무쇠검 옆에 놓여 있었다. 철수는 다시 웃었다.";

/// Narrative only: no quotes and no paragraph breaks
pub const PLAIN_TEXT: &str = "해가 졌다. 바람이 불었다. 마을은 조용했다. 해가 졌다.";

/// Prose without any terminal punctuation
pub const UNPUNCTUATED_TEXT: &str = "끝없이 이어지는 길 위에서 그는 걸었다";

/// Whitespace only
pub const BLANK_TEXT: &str = " \n\n\t\n ";

/// A corpus for property checks
pub const ALL_TEXTS: &[&str] = &[
    GOLDEN_TEXT,
    RICH_TEXT,
    PLAIN_TEXT,
    UNPUNCTUATED_TEXT,
    BLANK_TEXT,
    "",
];
