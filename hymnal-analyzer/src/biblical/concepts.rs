//! Theological concept terms
//!
//! A cheap lower-cased substring test screens each term before the
//! word-boundary pattern confirms it, so "sin" in "singing" is not a hit.

use crate::error::AnalyzerResult;
use crate::patterns::{context_window, GuardedPattern};
use hymnal_common::{BiblicalMatch, MatchKind};

pub const CONCEPT_CONFIDENCE: f64 = 0.7;

/// Points each detected concept adds to the biblical score
pub const CONCEPT_POINTS: i32 = 5;

const CONCEPT_CONTEXT_CHARS: usize = 30;

static CONCEPT_GROUPS: &[(&str, &[&str])] = &[
    (
        "theology",
        &[
            "atonement", "sanctification", "justification", "righteousness", "resurrection",
            "incarnation", "trinity", "repentance", "sin", "holiness", "eternal life",
        ],
    ),
    (
        "discipline",
        &["fasting", "baptism", "communion", "tithe", "sabbath", "scripture", "gospel"],
    ),
    (
        "location",
        &["jerusalem", "zion", "galilee", "bethlehem", "jordan", "eden", "golgotha", "canaan"],
    ),
    (
        "symbol",
        &["manna", "living water", "bread of life", "cornerstone", "shepherd", "dove", "ark"],
    ),
];

struct CompiledConcept {
    term: &'static str,
    group: &'static str,
    pattern: GuardedPattern,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConceptMatch {
    pub term: &'static str,
    pub group: &'static str,
    pub matched_text: String,
    pub context: String,
}

impl ConceptMatch {
    pub fn to_match(&self) -> BiblicalMatch {
        BiblicalMatch::new(
            MatchKind::Concept,
            CONCEPT_CONFIDENCE,
            self.matched_text.clone(),
            self.context.clone(),
        )
        .with_category(format!("{}:{}", self.group, self.term))
    }
}

pub struct ConceptIndex {
    concepts: Vec<CompiledConcept>,
}

impl ConceptIndex {
    pub fn new() -> AnalyzerResult<Self> {
        let mut concepts = Vec::new();
        for &(group, terms) in CONCEPT_GROUPS {
            for &term in terms {
                let words: Vec<String> = term.split_whitespace().map(regex::escape).collect();
                let pattern = format!(r"\b{}\b", words.join(r"\s+"));
                concepts.push(CompiledConcept {
                    term,
                    group,
                    pattern: GuardedPattern::plain(&pattern, "concept")?,
                });
            }
        }
        Ok(Self { concepts })
    }

    /// At most one hit per concept, in table order
    pub fn find_concepts(&self, text: &str) -> Vec<ConceptMatch> {
        let lowered = text.to_lowercase();
        self.concepts
            .iter()
            .filter(|c| c.term.split_whitespace().all(|w| lowered.contains(w)))
            .filter_map(|c| {
                let span = c.pattern.find_first(text)?;
                Some(ConceptMatch {
                    term: c.term,
                    group: c.group,
                    matched_text: span.as_str(text).to_string(),
                    context: context_window(text, span, CONCEPT_CONTEXT_CHARS),
                })
            })
            .collect()
    }
}
