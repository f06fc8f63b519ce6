//! Analysis result contract
//!
//! Types shared between the analysis engine and whatever persists or presents
//! its output. Every type here is a plain value that serializes to JSON with
//! stable field order; maps use `BTreeMap` so two identical analyses produce
//! byte-identical output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{Error, Result};

// ========================================
// Content Flags
// ========================================

/// Category of a negative content flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagCategory {
    Profanity,
    Sexual,
    Drugs,
    Violence,
    /// Set from the source's explicit-content flag rather than from lyric text
    ExplicitMarker,
}

impl FlagCategory {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FlagCategory::Profanity => "profanity",
            FlagCategory::Sexual => "sexual",
            FlagCategory::Drugs => "drugs",
            FlagCategory::Violence => "violence",
            FlagCategory::ExplicitMarker => "explicit-marker",
        }
    }
}

impl fmt::Display for FlagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tier of a negative content flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Strong,
}

impl Severity {
    /// Weight used for both penalty scaling and flag confidence
    pub fn weight(&self) -> f64 {
        match self {
            Severity::Mild => 0.6,
            Severity::Moderate => 0.8,
            Severity::Strong => 1.0,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Mild => "mild",
            Severity::Moderate => "moderate",
            Severity::Strong => "strong",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected negative-content occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFlag {
    pub category: FlagCategory,
    pub severity: Severity,
    /// Detection confidence (0.0-1.0)
    pub confidence: f64,
    /// Points subtracted from the score
    pub penalty: i32,
    /// Human-readable description of where/how often the content occurred
    pub context: String,
    /// Literal excerpt that triggered the flag
    pub matched_text: String,
}

// ========================================
// Biblical Matches
// ========================================

/// Kind of detected biblical element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    ScriptureReference,
    BiblicalName,
    Theme,
    Concept,
}

/// One detected biblical element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiblicalMatch {
    pub kind: MatchKind,
    /// Detection confidence (0.0-1.0)
    pub confidence: f64,
    pub matched_text: String,
    /// Snippet of the lyrics surrounding the match
    pub context: String,
    /// Canonical "Book Chapter:Verse" string, when one applies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verse_text: Option<String>,
    /// Name category, theme key or concept group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl BiblicalMatch {
    /// Create a match with no reference, verse text or category
    pub fn new(
        kind: MatchKind,
        confidence: f64,
        matched_text: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            confidence: confidence.clamp(0.0, 1.0),
            matched_text: matched_text.into(),
            context: context.into(),
            reference: None,
            verse_text: None,
            category: None,
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_verse_text(mut self, verse_text: impl Into<String>) -> Self {
        self.verse_text = Some(verse_text.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Biblical findings grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiblicalFindings {
    pub scripture_references: Vec<BiblicalMatch>,
    pub biblical_names: Vec<BiblicalMatch>,
    /// Sorted by descending confidence
    pub themes: Vec<BiblicalMatch>,
    pub concepts: Vec<BiblicalMatch>,
    /// Fuzzy matches of lyric text against stored verse texts
    pub verse_matches: Vec<BiblicalMatch>,
}

impl BiblicalFindings {
    pub fn is_empty(&self) -> bool {
        self.scripture_references.is_empty()
            && self.biblical_names.is_empty()
            && self.themes.is_empty()
            && self.concepts.is_empty()
            && self.verse_matches.is_empty()
    }
}

/// A stored verse offered in support of a detected theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportingVerse {
    pub reference: String,
    pub verse_text: String,
    /// Confidence of the theme this verse supports
    pub relevance: f64,
}

// ========================================
// Concern Level
// ========================================

/// Four-valued summary label derived from score and flag overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcernLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ConcernLevel {
    /// Threshold mapping shared by every scoring profile
    pub fn from_score(score: u8) -> Self {
        match score {
            85..=u8::MAX => ConcernLevel::Low,
            70..=84 => ConcernLevel::Medium,
            50..=69 => ConcernLevel::High,
            _ => ConcernLevel::VeryHigh,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConcernLevel::Low => "Low",
            ConcernLevel::Medium => "Medium",
            ConcernLevel::High => "High",
            ConcernLevel::VeryHigh => "VeryHigh",
        }
    }
}

impl fmt::Display for ConcernLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ========================================
// Scoring Profile
// ========================================

/// Fixed scoring constants for a generation of the engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringProfile {
    /// Current profile: guarded patterns, baseline 85
    #[default]
    ContextAware,
    /// Earlier baseline of 80, kept for comparison with stored results
    Legacy,
}

impl ScoringProfile {
    pub fn base_score(&self) -> i32 {
        match self {
            ScoringProfile::ContextAware => 85,
            ScoringProfile::Legacy => 80,
        }
    }

    /// Version tag written into every result produced under this profile
    pub fn version_tag(&self) -> &'static str {
        match self {
            ScoringProfile::ContextAware => "context-aware-2.0",
            ScoringProfile::Legacy => "legacy-1.0",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringProfile::ContextAware => "context-aware",
            ScoringProfile::Legacy => "legacy",
        }
    }
}

impl fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScoringProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "context-aware" | "context_aware" | "enhanced" => Ok(ScoringProfile::ContextAware),
            "legacy" => Ok(ScoringProfile::Legacy),
            other => Err(Error::InvalidInput(format!("Unknown scoring profile: {}", other))),
        }
    }
}

// ========================================
// Analysis Config
// ========================================

/// Sensitivity tier requested by the caller
///
/// Advisory only: recorded for presentation, does not alter arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    Conservative,
    #[default]
    Moderate,
    Progressive,
}

/// Per-category penalty multipliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub profanity: f64,
    pub violence: f64,
    pub sexual: f64,
    pub drugs: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            profanity: 1.0,
            violence: 1.0,
            sexual: 1.0,
            drugs: 1.0,
        }
    }
}

impl CategoryWeights {
    /// Multiplier for a flag category (explicit markers scale with profanity)
    pub fn for_category(&self, category: FlagCategory) -> f64 {
        match category {
            FlagCategory::Profanity | FlagCategory::ExplicitMarker => self.profanity,
            FlagCategory::Violence => self.violence,
            FlagCategory::Sexual => self.sexual,
            FlagCategory::Drugs => self.drugs,
        }
    }
}

/// Caller-supplied tuning for one analysis request
///
/// Loaded from the `[analysis]` table of the bootstrap TOML file, or built
/// directly by library callers. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sensitivity: Sensitivity,
    pub weights: CategoryWeights,
    /// Multiplier applied to the classifier's positive bonus
    pub positive_boost: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sensitivity: Sensitivity::default(),
            weights: CategoryWeights::default(),
            positive_boost: 1.0,
        }
    }
}

impl AnalysisConfig {
    /// Reject multipliers that would make the score arithmetic meaningless
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("weights.profanity", self.weights.profanity),
            ("weights.violence", self.weights.violence),
            ("weights.sexual", self.weights.sexual),
            ("weights.drugs", self.weights.drugs),
            ("positive_boost", self.positive_boost),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

// ========================================
// Analysis Result
// ========================================

/// Complete output of one song analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Suitability score (0-100)
    pub score: u8,
    pub concern_level: ConcernLevel,
    pub flags: Vec<ContentFlag>,
    pub biblical: BiblicalFindings,
    /// Theme key -> stored verses supporting that theme
    pub supporting_scripture: BTreeMap<String, Vec<SupportingVerse>>,
    /// Positive bonus after the caller's boost multiplier
    pub positive_bonus: i32,
    /// Aggregate biblical-content score (0-100), informational
    pub biblical_score: u8,
    /// Biblical-content confidence (0.0-1.0), informational
    pub biblical_confidence: f64,
    /// Whether any lyric text was scanned
    pub lyrics_analyzed: bool,
    pub explanation: String,
    /// Degradation notes (missing lyrics, detector errors)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub analysis_version: String,
}

impl AnalysisResult {
    /// Neutral result returned when analysis cannot proceed
    pub fn neutral(analysis_version: impl Into<String>, warning: impl Into<String>) -> Self {
        Self {
            score: 50,
            concern_level: ConcernLevel::Medium,
            flags: Vec::new(),
            biblical: BiblicalFindings::default(),
            supporting_scripture: BTreeMap::new(),
            positive_bonus: 0,
            biblical_score: 0,
            biblical_confidence: 0.0,
            lyrics_analyzed: false,
            explanation: "Analysis failed - assigned neutral score".to_string(),
            warnings: vec![warning.into()],
            analysis_version: analysis_version.into(),
        }
    }

    pub fn has_flag(&self, category: FlagCategory) -> bool {
        self.flags.iter().any(|f| f.category == category)
    }

    /// Sum of all flag penalties
    pub fn total_penalty(&self) -> i32 {
        self.flags.iter().map(|f| f.penalty).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concern_thresholds() {
        assert_eq!(ConcernLevel::from_score(100), ConcernLevel::Low);
        assert_eq!(ConcernLevel::from_score(85), ConcernLevel::Low);
        assert_eq!(ConcernLevel::from_score(84), ConcernLevel::Medium);
        assert_eq!(ConcernLevel::from_score(70), ConcernLevel::Medium);
        assert_eq!(ConcernLevel::from_score(69), ConcernLevel::High);
        assert_eq!(ConcernLevel::from_score(50), ConcernLevel::High);
        assert_eq!(ConcernLevel::from_score(49), ConcernLevel::VeryHigh);
        assert_eq!(ConcernLevel::from_score(0), ConcernLevel::VeryHigh);
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.positive_boost, 1.0);
        assert_eq!(config.weights.for_category(FlagCategory::Drugs), 1.0);
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = AnalysisConfig::default();
        config.weights.violence = -0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("weights.violence"));
    }

    #[test]
    fn test_nan_boost_rejected() {
        let config = AnalysisConfig {
            positive_boost: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_marker_scales_with_profanity() {
        let weights = CategoryWeights {
            profanity: 2.0,
            ..Default::default()
        };
        assert_eq!(weights.for_category(FlagCategory::ExplicitMarker), 2.0);
    }

    #[test]
    fn test_serialization_field_names() {
        let flag = ContentFlag {
            category: FlagCategory::ExplicitMarker,
            severity: Severity::Strong,
            confidence: 1.0,
            penalty: 50,
            context: "explicit flag".to_string(),
            matched_text: String::new(),
        };
        let json = serde_json::to_value(&flag).unwrap();
        assert_eq!(json["category"], "explicit-marker");
        assert_eq!(json["severity"], "strong");

        let level = serde_json::to_value(ConcernLevel::VeryHigh).unwrap();
        assert_eq!(level, "VeryHigh");
    }

    #[test]
    fn test_category_display_matches_json() {
        for category in [
            FlagCategory::Profanity,
            FlagCategory::Sexual,
            FlagCategory::Drugs,
            FlagCategory::Violence,
            FlagCategory::ExplicitMarker,
        ] {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.as_str());
        }
    }

    #[test]
    fn test_profile_constants() {
        assert_eq!(ScoringProfile::ContextAware.base_score(), 85);
        assert_eq!(ScoringProfile::Legacy.base_score(), 80);
        assert_eq!("legacy".parse::<ScoringProfile>().unwrap(), ScoringProfile::Legacy);
        assert_eq!(
            "Context-Aware".parse::<ScoringProfile>().unwrap(),
            ScoringProfile::ContextAware
        );
        assert!("newest".parse::<ScoringProfile>().is_err());
    }

    #[test]
    fn test_neutral_result() {
        let result = AnalysisResult::neutral("test-1.0", "boom");
        assert_eq!(result.score, 50);
        assert_eq!(result.concern_level, ConcernLevel::Medium);
        assert!(result.flags.is_empty());
        assert!(result.biblical.is_empty());
        assert_eq!(result.warnings, vec!["boom".to_string()]);
    }
}
