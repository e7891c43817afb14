// WHY: Named entities are classified by suffix cues alone; an ordered rule table keeps
// category precedence explicit and lets one dispatch function drive every pass

use anyhow::Result;
use regex_automata::meta::Regex;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use super::normalization::char_len;
use super::particles::SuffixStripper;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Person,
    Organization,
    Place,
    Technology,
    Object,
    Rank,
    Event,
    Other,
}

impl EntityCategory {
    /// All categories in priority order, catch-all last
    pub const ALL: [EntityCategory; 8] = [
        EntityCategory::Person,
        EntityCategory::Organization,
        EntityCategory::Place,
        EntityCategory::Technology,
        EntityCategory::Object,
        EntityCategory::Rank,
        EntityCategory::Event,
        EntityCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityCategory::Person => "person",
            EntityCategory::Organization => "organization",
            EntityCategory::Place => "place",
            EntityCategory::Technology => "technology",
            EntityCategory::Object => "object",
            EntityCategory::Rank => "rank",
            EntityCategory::Event => "event",
            EntityCategory::Other => "other",
        }
    }

    /// Korean display label
    pub fn label(self) -> &'static str {
        match self {
            EntityCategory::Person => "인명",
            EntityCategory::Organization => "조직명",
            EntityCategory::Place => "장소명",
            EntityCategory::Technology => "기술명",
            EntityCategory::Object => "사물명",
            EntityCategory::Rank => "지위명",
            EntityCategory::Event => "사건명",
            EntityCategory::Other => "기타",
        }
    }
}

/// Token followed by a bare particle, then whitespace or end of text
const PARTICLE_SUFFIXED: &str = r"[가-힣]{2,4}(?:은|는|이|가|을|를|의|와|과)(?:\s|$)";

/// Category rules in priority order; a name keeps the first category that yields it
const CATEGORY_RULES: &[(EntityCategory, &str)] = &[
    (EntityCategory::Person, r"[가-힣]{2,4}(?:씨|군|양|님)(?:\s|$)"),
    (EntityCategory::Person, PARTICLE_SUFFIXED),
    (
        EntityCategory::Organization,
        r"[가-힣a-zA-Z0-9]{2,}(?:주식회사|연구소|대학교|고등학교|중학교|초등학교|학원|기업|재단|그룹|사|팀)(?:\s|$)",
    ),
    (
        EntityCategory::Place,
        r"[가-힣]{2,}(?:시|군|구|동|읍|면|리|로|길|산|강|천|호|공원|광장)(?:\s|$)",
    ),
    (
        EntityCategory::Technology,
        r"[가-힣a-zA-Z0-9]{2,}(?:기술|시스템|엔진|프로그램|알고리즘|플랫폼)(?:\s|$)",
    ),
    (
        EntityCategory::Object,
        r"[가-힣]{2,}(?:검|칼|총|차|배|책|컴퓨터|전화|시계)(?:\s|$)",
    ),
    (
        EntityCategory::Rank,
        r"[가-힣]{2,4}(?:왕|공주|왕자|장군|총수|사장|대표|부장|과장|차장|팀장|실장|이사|사원|선생|교수|학생)(?:\s|$)",
    ),
    (EntityCategory::Event, r"[가-힣]{2,}(?:전쟁|사건|혁명|운동|축제|행사)(?:\s|$)"),
];

/// Names shorter than this many characters are discarded
const MIN_NAME_CHARS: usize = 2;

/// One compiled classification rule
struct EntityRule {
    category: EntityCategory,
    pattern: Regex,
    stripper: SuffixStripper,
}

/// An extracted name with its document-level occurrence data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub name: String,
    pub category: EntityCategory,
    /// Substring occurrences summed over all paragraphs
    pub frequency: usize,
    /// 1-based index of the first paragraph containing the name; `None` when
    /// the stripped name never occurs literally
    pub first_appearance: Option<usize>,
}

/// All entities of one document, in classification order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EntityInventory {
    pub entities: Vec<Entity>,
}

impl EntityInventory {
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    pub fn in_category(&self, category: EntityCategory) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |entity| entity.category == category)
    }

    pub fn names_in(&self, category: EntityCategory) -> Vec<&str> {
        self.in_category(category).map(|e| e.name.as_str()).collect()
    }

    /// Every category with its entities, including empty categories
    pub fn by_category(&self) -> Vec<(EntityCategory, Vec<&Entity>)> {
        EntityCategory::ALL
            .iter()
            .map(|&category| (category, self.in_category(category).collect()))
            .collect()
    }
}

pub struct EntityExtractor {
    rules: Vec<EntityRule>,
    generic: EntityRule,
}

impl EntityExtractor {
    pub fn new() -> Result<Self> {
        let rules = CATEGORY_RULES
            .iter()
            .map(|&(category, pattern)| {
                compile_rule(category, pattern, SuffixStripper::particles_and_honorifics())
            })
            .collect::<Result<Vec<_>>>()?;

        let generic = compile_rule(
            EntityCategory::Other,
            PARTICLE_SUFFIXED,
            SuffixStripper::particles(),
        )?;

        Ok(Self { rules, generic })
    }

    /// Tagged `(name, category)` list: specific rules first, then the generic
    /// pass, each name kept once under the first category that produced it
    pub fn classify(&self, text: &str) -> Vec<(String, EntityCategory)> {
        let (classified, _) = self
            .rules
            .iter()
            .chain(std::iter::once(&self.generic))
            .flat_map(|rule| candidates(rule, text))
            .fold(
                (Vec::new(), HashSet::new()),
                |(mut classified, mut seen), (name, category)| {
                    if seen.insert(name.clone()) {
                        classified.push((name, category));
                    }
                    (classified, seen)
                },
            );

        debug!("Classified {} entity names", classified.len());
        classified
    }

    /// Classify names over the whole document, then locate them paragraph by paragraph
    pub fn extract(&self, text: &str, paragraphs: &[String]) -> EntityInventory {
        let entities = self
            .classify(text)
            .into_iter()
            .map(|(name, category)| {
                let (frequency, first_appearance) = locate(&name, paragraphs);
                Entity {
                    name,
                    category,
                    frequency,
                    first_appearance,
                }
            })
            .collect();

        EntityInventory { entities }
    }
}

fn compile_rule(
    category: EntityCategory,
    pattern: &str,
    stripper: SuffixStripper,
) -> Result<EntityRule> {
    Ok(EntityRule {
        category,
        pattern: Regex::new(pattern)?,
        stripper,
    })
}

/// Canonical names produced by one rule, in match order
fn candidates<'a>(
    rule: &'a EntityRule,
    text: &'a str,
) -> impl Iterator<Item = (String, EntityCategory)> + 'a {
    rule.pattern.find_iter(text).filter_map(move |mat| {
        let name = rule.stripper.strip(&text[mat.range()]);
        (char_len(name) >= MIN_NAME_CHARS).then(|| (name.to_string(), rule.category))
    })
}

/// Total occurrences and 1-based first paragraph
fn locate(name: &str, paragraphs: &[String]) -> (usize, Option<usize>) {
    paragraphs
        .iter()
        .enumerate()
        .fold((0, None), |(total, first), (index, paragraph)| {
            let hits = paragraph.matches(name).count();
            let first = first.or_else(|| (hits > 0).then_some(index + 1));
            (total + hits, first)
        })
}
