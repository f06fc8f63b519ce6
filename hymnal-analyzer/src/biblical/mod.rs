//! Biblical Reference Detector
//!
//! Extracts explicit scripture citations, biblical names, weighted themes,
//! fuzzy verse-content matches and theological concepts from lyric text, and
//! aggregates them into a 0-100 biblical-content score.
//!
//! # Aggregate Score
//! - 15 per scripture reference
//! - 12 per divine name, 8 per New Testament name, 6 per Old Testament name
//! - round(10 × weight × confidence) per theme
//! - round(20 × confidence) per verse match
//! - 5 per concept
//!
//! The sum is clamped to 0-100; `confidence_score` is `total / 100`.
//!
//! The score is informational: the aggregation adapter reports it alongside
//! the suitability score but never folds it into that score.

mod books;
mod concepts;
mod names;
mod themes;
mod verses;

pub use books::{BookIndex, BookSpec, ScriptureReference, BOOKS};
pub use concepts::{ConceptIndex, ConceptMatch};
pub use names::{NameCategory, NameIndex, NameMatch};
pub use themes::{theme_confidence, ThemeDefinition, ThemeIndex, ThemeMatch, THEMES};
pub use verses::{normalize, VerseCorpus, VerseMatch, MAX_VERSE_MATCHES};

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::MAX_LYRICS_BYTES;
use hymnal_common::{BiblicalFindings, SupportingVerse};
use std::collections::BTreeMap;
use tracing::{debug, error};

const REFERENCE_POINTS: i32 = 15;
const VERSE_POINTS: f64 = 20.0;

/// Everything the detector found in one lyric text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
    pub scripture_references: Vec<ScriptureReference>,
    /// Ordered by position
    pub biblical_names: Vec<NameMatch>,
    /// Highest confidence first
    pub themes: Vec<ThemeMatch>,
    /// Highest score first, at most five
    pub verse_matches: Vec<VerseMatch>,
    pub concepts: Vec<ConceptMatch>,
    /// Theme key -> stored verses supporting that theme
    pub supporting_scripture: BTreeMap<String, Vec<SupportingVerse>>,
    /// Aggregate biblical-content score (0-100)
    pub total_biblical_score: u8,
    /// `total_biblical_score / 100`
    pub confidence_score: f64,
    /// Set when detection failed and the result is empty
    pub error: Option<String>,
}

impl DetectionResult {
    /// Empty result carrying an error description
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Convert to the grouped form stored in `AnalysisResult`
    ///
    /// Explicit citations carry the stored verse text when the corpus has the
    /// cited verse.
    pub fn findings(&self, corpus: &VerseCorpus) -> BiblicalFindings {
        BiblicalFindings {
            scripture_references: self
                .scripture_references
                .iter()
                .map(|r| {
                    let m = r.to_match();
                    match r.first_verse().and_then(|v| corpus.text(&v)) {
                        Some(text) => m.with_verse_text(text),
                        None => m,
                    }
                })
                .collect(),
            biblical_names: self.biblical_names.iter().map(NameMatch::to_match).collect(),
            themes: self.themes.iter().map(ThemeMatch::to_match).collect(),
            concepts: self.concepts.iter().map(ConceptMatch::to_match).collect(),
            verse_matches: self.verse_matches.iter().map(VerseMatch::to_match).collect(),
        }
    }
}

/// Biblical Reference Detector
///
/// All tables are compiled once in [`BiblicalDetector::new`]; detection is
/// read-only and the detector can be shared across threads.
pub struct BiblicalDetector {
    books: BookIndex,
    names: NameIndex,
    themes: ThemeIndex,
    concepts: ConceptIndex,
    corpus: VerseCorpus,
}

impl BiblicalDetector {
    /// Compile every knowledge table
    ///
    /// # Errors
    /// Returns the first pattern or table error encountered.
    pub fn new() -> AnalyzerResult<Self> {
        let detector = Self {
            books: BookIndex::new()?,
            names: NameIndex::new()?,
            themes: ThemeIndex::new()?,
            concepts: ConceptIndex::new()?,
            corpus: VerseCorpus::new(),
        };

        debug!(
            books = BOOKS.len(),
            themes = THEMES.len(),
            verses = detector.corpus.len(),
            "Biblical detector compiled"
        );

        Ok(detector)
    }

    pub fn corpus(&self) -> &VerseCorpus {
        &self.corpus
    }

    /// Detect biblical content
    ///
    /// Never fails: internal errors are logged and produce the empty result
    /// with `error` set.
    pub fn detect(&self, lyrics: &str) -> DetectionResult {
        if lyrics.trim().is_empty() {
            return DetectionResult::default();
        }

        match self.try_detect(lyrics) {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, lyrics_len = lyrics.len(), "Biblical detection failed");
                DetectionResult::failed(e.to_string())
            }
        }
    }

    fn try_detect(&self, lyrics: &str) -> AnalyzerResult<DetectionResult> {
        if lyrics.len() > MAX_LYRICS_BYTES {
            return Err(AnalyzerError::InputTooLarge {
                len: lyrics.len(),
                limit: MAX_LYRICS_BYTES,
            });
        }

        let mut result = DetectionResult {
            scripture_references: self.books.find_references(lyrics),
            biblical_names: self.names.find_names(lyrics),
            themes: self.themes.find_themes(lyrics),
            verse_matches: self.corpus.match_lyrics(lyrics),
            concepts: self.concepts.find_concepts(lyrics),
            ..DetectionResult::default()
        };

        result.supporting_scripture = result
            .themes
            .iter()
            .filter_map(|theme| {
                let verses = self.supporting_verses(theme.scriptures, theme.confidence);
                (!verses.is_empty()).then(|| (theme.key.to_string(), verses))
            })
            .collect();

        let total = aggregate_score(&result).clamp(0, 100);
        result.total_biblical_score = total as u8;
        result.confidence_score = (f64::from(total) / 100.0).min(1.0);

        debug!(
            references = result.scripture_references.len(),
            names = result.biblical_names.len(),
            themes = result.themes.len(),
            verses = result.verse_matches.len(),
            concepts = result.concepts.len(),
            score = result.total_biblical_score,
            "Biblical content detected"
        );

        Ok(result)
    }

    /// Supporting verses for arbitrary theme keys
    ///
    /// Unknown keys are skipped. Relevance is the theme's table weight, since
    /// no detection confidence exists.
    pub fn recommend_scripture<S: AsRef<str>>(
        &self,
        theme_keys: &[S],
    ) -> BTreeMap<String, Vec<SupportingVerse>> {
        theme_keys
            .iter()
            .filter_map(|key| {
                let definition = self.themes.definition(key.as_ref())?;
                let verses = self.supporting_verses(definition.scriptures, definition.weight);
                (!verses.is_empty()).then(|| (definition.key.to_string(), verses))
            })
            .collect()
    }

    /// References with stored text; the rest are dropped
    fn supporting_verses(&self, references: &[&str], relevance: f64) -> Vec<SupportingVerse> {
        references
            .iter()
            .filter_map(|&reference| {
                self.corpus.text(reference).map(|text| SupportingVerse {
                    reference: reference.to_string(),
                    verse_text: text.to_string(),
                    relevance,
                })
            })
            .collect()
    }
}

/// Unclamped sum of every finding's contribution
fn aggregate_score(result: &DetectionResult) -> i32 {
    let references = REFERENCE_POINTS * result.scripture_references.len() as i32;
    let names: i32 = result
        .biblical_names
        .iter()
        .map(|n| n.category.score_points())
        .sum();
    let themes: i32 = result.themes.iter().map(ThemeMatch::score_points).sum();
    let verses: i32 = result
        .verse_matches
        .iter()
        .map(|v| (VERSE_POINTS * v.confidence).round() as i32)
        .sum();
    let concepts = concepts::CONCEPT_POINTS * result.concepts.len() as i32;

    references + names + themes + verses + concepts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> BiblicalDetector {
        BiblicalDetector::new().expect("biblical tables compile")
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let d = detector();
        assert_eq!(d.detect(""), DetectionResult::default());
        assert_eq!(d.detect("  \n\t "), DetectionResult::default());
    }

    #[test]
    fn test_citation_detected_and_scored() {
        let result = detector().detect("As written in John 3:16");
        assert_eq!(result.scripture_references.len(), 1);
        assert_eq!(result.scripture_references[0].canonical(), "John 3:16");
        assert!(result.total_biblical_score >= 15);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_unknown_book_dropped() {
        let result = detector().detect("Frobnicate 9:9");
        assert!(result.scripture_references.is_empty());
    }

    #[test]
    fn test_score_clamped_and_confidence_matches() {
        let lyrics = "Jesus Christ the Lord God, John 3:16, Romans 8:28, Psalm 23, \
                      praise and worship, grace and mercy, the cross at calvary, \
                      the kingdom and the throne, salvation, faith, hope, covenant, prayer, amen. \
                      Zion, Jerusalem, baptism, atonement. The LORD is my shepherd; I shall not want."
            .repeat(3);
        let result = detector().detect(&lyrics);
        assert_eq!(result.total_biblical_score, 100);
        assert_eq!(result.confidence_score, 1.0);
    }

    #[test]
    fn test_supporting_scripture_for_detected_themes() {
        let result = detector().detect("Amazing grace, how sweet the sound");
        let verses = result
            .supporting_scripture
            .get("love_grace")
            .expect("love_grace theme detected");
        assert!(!verses.is_empty());
        assert!(verses.iter().all(|v| !v.verse_text.is_empty()));
        let theme = result.themes.iter().find(|t| t.key == "love_grace").unwrap();
        assert!(verses.iter().all(|v| v.relevance == theme.confidence));
    }

    #[test]
    fn test_supporting_scripture_drops_missing_text() {
        let recommended = detector().recommend_scripture(&["prayer"]);
        let prayer = &recommended["prayer"];
        // James 5:16 is listed for the theme but not stored
        assert!(prayer.iter().all(|v| v.reference != "James 5:16"));
        assert_eq!(prayer.len(), 3);
    }

    #[test]
    fn test_recommend_skips_unknown_keys() {
        let recommended = detector().recommend_scripture(&["hope", "nonsense"]);
        assert_eq!(recommended.len(), 1);
        assert!(recommended.contains_key("hope"));
        assert!((recommended["hope"][0].relevance - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_oversized_input_sets_error() {
        let lyrics = "a".repeat(MAX_LYRICS_BYTES + 1);
        let result = detector().detect(&lyrics);
        assert!(result.error.is_some());
        assert_eq!(result.total_biblical_score, 0);
        assert!(result.themes.is_empty());
    }

    #[test]
    fn test_findings_attach_verse_text() {
        let d = detector();
        let result = d.detect("John 3:16");
        let findings = result.findings(d.corpus());
        let citation = &findings.scripture_references[0];
        assert_eq!(citation.reference.as_deref(), Some("John 3:16"));
        assert!(citation
            .verse_text
            .as_deref()
            .is_some_and(|t| t.starts_with("For God so loved")));
    }
}
