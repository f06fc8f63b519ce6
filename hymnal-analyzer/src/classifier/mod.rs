//! Pattern Category Classifier
//!
//! Converts lyric text into negative content flags, a net penalty, and a
//! positive-content bonus.
//!
//! # Scoring Algorithm
//! For each (category, severity) tier, only the first pattern with an
//! accepted match counts, so overlapping patterns in one tier never
//! double-count:
//! - **Penalty** = base × severity weight × min(matches, 3) × category weight
//! - **Confidence** = min(0.98, 0.8 + 0.2 × severity weight)
//! - **Bonus** (positive categories) = 10 × category weight × min(matches, 2)
//!
//! The explicit-content flag supplied by the source is handled independently
//! of lyric scanning and always produces one explicit-marker flag.
//!
//! Score composition is the aggregation layer's job, not the classifier's.

mod categories;

pub use categories::PositiveCategory;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::patterns::{compile_all, GuardedPattern, Span};
use crate::MAX_LYRICS_BYTES;
use categories::{base_penalty, NEGATIVE_CATEGORIES, POSITIVE_CATEGORIES};
use hymnal_common::{AnalysisConfig, ContentFlag, FlagCategory, Severity};
use tracing::{debug, error};

/// Matches beyond this count add no further penalty
pub const NEGATIVE_FREQUENCY_CAP: usize = 3;

/// Matches beyond this count add no further bonus
pub const POSITIVE_FREQUENCY_CAP: usize = 2;

/// Penalty for the source's explicit flag before profanity weighting
pub const EXPLICIT_MARKER_PENALTY: f64 = 50.0;

const MAX_FLAG_CONFIDENCE: f64 = 0.98;
const POSITIVE_BASE_BONUS: f64 = 10.0;

/// Compiled patterns for one negative tier
struct CompiledTier {
    category: FlagCategory,
    severity: Severity,
    patterns: Vec<GuardedPattern>,
}

/// Compiled patterns for one positive category
struct CompiledPositive {
    category: PositiveCategory,
    weight: f64,
    patterns: Vec<GuardedPattern>,
}

/// Positive category that contributed to the bonus
#[derive(Debug, Clone, PartialEq)]
pub struct PositiveMatch {
    pub category: PositiveCategory,
    pub matches: usize,
    pub bonus: i32,
    pub matched_text: String,
}

/// Classifier output for one lyric text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierOutput {
    /// Negative flags in table order, explicit marker last
    pub flags: Vec<ContentFlag>,
    /// Sum of flag penalties
    pub net_penalty: i32,
    /// Sum of positive category bonuses (before the caller's boost)
    pub positive_bonus: i32,
    pub positive_matches: Vec<PositiveMatch>,
    /// Why the lyric scan was skipped, if it was
    pub error: Option<String>,
}

/// Pattern Category Classifier
///
/// All patterns are compiled once in [`PatternClassifier::new`] and owned by
/// the instance; classification is read-only and safe to share across
/// threads.
pub struct PatternClassifier {
    tiers: Vec<CompiledTier>,
    positives: Vec<CompiledPositive>,
}

impl PatternClassifier {
    /// Compile all category tables
    ///
    /// # Errors
    /// Returns `PatternCompile` if any pattern fails to build, or
    /// `InvalidTable` if a tier is empty or a weight is not positive.
    pub fn new() -> AnalyzerResult<Self> {
        let mut tiers = Vec::new();
        for spec in NEGATIVE_CATEGORIES {
            for tier in spec.tiers {
                if tier.patterns.is_empty() {
                    return Err(AnalyzerError::InvalidTable {
                        table: "negative category",
                        reason: format!("{} {} tier has no patterns", spec.category, tier.severity),
                    });
                }
                tiers.push(CompiledTier {
                    category: spec.category,
                    severity: tier.severity,
                    patterns: compile_all(tier.patterns, "negative category")?,
                });
            }
        }

        let mut positives = Vec::new();
        for spec in POSITIVE_CATEGORIES {
            if spec.patterns.is_empty() || spec.weight <= 0.0 {
                return Err(AnalyzerError::InvalidTable {
                    table: "positive category",
                    reason: format!("{} needs patterns and a positive weight", spec.category.as_str()),
                });
            }
            positives.push(CompiledPositive {
                category: spec.category,
                weight: spec.weight,
                patterns: compile_all(spec.patterns, "positive category")?,
            });
        }

        debug!(
            negative_tiers = tiers.len(),
            positive_categories = positives.len(),
            "Pattern classifier compiled"
        );

        Ok(Self { tiers, positives })
    }

    /// Classify lyric text
    ///
    /// Never fails. A lyric scan that cannot run (oversized input, invalid
    /// weights) is logged and contributes nothing, with the reason kept in
    /// [`ClassifierOutput::error`]. The explicit marker is appended either way.
    pub fn classify(&self, lyrics: &str, explicit: bool, config: &AnalysisConfig) -> ClassifierOutput {
        let mut output = match self.scan_lyrics(lyrics, config) {
            Ok(output) => output,
            Err(e) => {
                error!(
                    error = %e,
                    lyrics_len = lyrics.len(),
                    explicit,
                    "Lyric scan failed, no lyric flags or bonus applied"
                );
                ClassifierOutput {
                    error: Some(e.to_string()),
                    ..ClassifierOutput::default()
                }
            }
        };

        if explicit {
            let flag = explicit_marker_flag(config);
            output.net_penalty += flag.penalty;
            output.flags.push(flag);
        }

        debug!(
            flags = output.flags.len(),
            net_penalty = output.net_penalty,
            positive_bonus = output.positive_bonus,
            "Lyrics classified"
        );

        output
    }

    fn scan_lyrics(&self, lyrics: &str, config: &AnalysisConfig) -> AnalyzerResult<ClassifierOutput> {
        if lyrics.len() > MAX_LYRICS_BYTES {
            return Err(AnalyzerError::InputTooLarge {
                len: lyrics.len(),
                limit: MAX_LYRICS_BYTES,
            });
        }
        config.validate()?;

        let mut output = ClassifierOutput::default();
        if lyrics.trim().is_empty() {
            return Ok(output);
        }

        for tier in &self.tiers {
            if let Some(flag) = Self::score_tier(tier, lyrics, config) {
                output.net_penalty += flag.penalty;
                output.flags.push(flag);
            }
        }

        for positive in &self.positives {
            if let Some(hit) = Self::score_positive(positive, lyrics) {
                output.positive_bonus += hit.bonus;
                output.positive_matches.push(hit);
            }
        }

        Ok(output)
    }

    fn score_tier(tier: &CompiledTier, lyrics: &str, config: &AnalysisConfig) -> Option<ContentFlag> {
        let spans = first_matching_pattern(&tier.patterns, lyrics)?;
        let matches = spans.len();
        let capped = matches.min(NEGATIVE_FREQUENCY_CAP);
        let severity_weight = tier.severity.weight();

        let penalty = (f64::from(base_penalty(tier.category, tier.severity))
            * severity_weight
            * capped as f64
            * config.weights.for_category(tier.category))
        .round() as i32;

        let context = if matches > NEGATIVE_FREQUENCY_CAP {
            format!("{} matches (counted {})", matches, NEGATIVE_FREQUENCY_CAP)
        } else if matches == 1 {
            "1 match".to_string()
        } else {
            format!("{} matches", matches)
        };

        Some(ContentFlag {
            category: tier.category,
            severity: tier.severity,
            confidence: (0.8 + 0.2 * severity_weight).min(MAX_FLAG_CONFIDENCE),
            penalty,
            context,
            matched_text: spans[0].as_str(lyrics).to_string(),
        })
    }

    fn score_positive(positive: &CompiledPositive, lyrics: &str) -> Option<PositiveMatch> {
        let spans = first_matching_pattern(&positive.patterns, lyrics)?;
        let capped = spans.len().min(POSITIVE_FREQUENCY_CAP);
        let bonus = (POSITIVE_BASE_BONUS * positive.weight * capped as f64).round() as i32;

        Some(PositiveMatch {
            category: positive.category,
            matches: spans.len(),
            bonus,
            matched_text: spans[0].as_str(lyrics).to_string(),
        })
    }
}

/// Match set of the first pattern in the tier that matches at all
fn first_matching_pattern(patterns: &[GuardedPattern], lyrics: &str) -> Option<Vec<Span>> {
    patterns
        .iter()
        .map(|p| p.find_all(lyrics))
        .find(|spans| !spans.is_empty())
}

fn explicit_marker_flag(config: &AnalysisConfig) -> ContentFlag {
    // Invalid weights fall back to 1.0 so the marker still counts
    let weight = match config.weights.profanity {
        w if w.is_finite() && w >= 0.0 => w,
        _ => 1.0,
    };
    ContentFlag {
        category: FlagCategory::ExplicitMarker,
        severity: Severity::Strong,
        confidence: 1.0,
        penalty: (EXPLICIT_MARKER_PENALTY * weight).round() as i32,
        context: "Marked explicit by source".to_string(),
        matched_text: String::new(),
    }
}
