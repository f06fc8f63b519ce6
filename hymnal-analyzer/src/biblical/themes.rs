//! Weighted theological themes
//!
//! A theme fires when any of its patterns has an accepted match. Its
//! confidence grows with the total match count across all its patterns
//! (capped) and with the theme's own weight.

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::patterns::{compile_all, context_window, GuardedPattern, PatternSpec, Span};
use hymnal_common::{BiblicalMatch, MatchKind};

const THEME_CONTEXT_CHARS: usize = 30;
const BASE_CONFIDENCE: f64 = 0.6;
const PER_MATCH_CONFIDENCE: f64 = 0.1;
const MAX_MATCH_CONFIDENCE: f64 = 0.3;
const MAX_THEME_CONFIDENCE: f64 = 0.95;

/// Static theme definition
pub struct ThemeDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub weight: f64,
    pub patterns: &'static [PatternSpec],
    /// Canonical references offered as supporting scripture
    pub scriptures: &'static [&'static str],
}

pub static THEMES: &[ThemeDefinition] = &[
    ThemeDefinition {
        key: "salvation",
        name: "Salvation",
        weight: 1.0,
        patterns: &[
            PatternSpec::new(r"\bsav(?:ed|es|ing)\s+(?:me|us|a\s+wretch|my\s+soul)\b"),
            PatternSpec::new(r"\bsalvation\b"),
            PatternSpec::new(r"\bredeem(?:ed|er|s)?\b"),
            PatternSpec::new(r"\bborn\s+again\b"),
            PatternSpec::new(r"\bwas\s+lost\b.{0,40}\bfound\b"),
            PatternSpec::new(r"\bset\s+(?:me|us)\s+free\b"),
        ],
        scriptures: &["John 3:16", "Romans 10:9", "Ephesians 2:8", "Acts 4:12", "Romans 6:23"],
    },
    ThemeDefinition {
        key: "worship",
        name: "Worship and Praise",
        weight: 0.9,
        patterns: &[
            PatternSpec::new(r"\bpraise\b"),
            PatternSpec::new(r"\bworship\b"),
            PatternSpec::new(r"\b(?:hallelujah|alleluia|hosanna)\b"),
            PatternSpec::new(r"\bglorif(?:y|ied)\b"),
            PatternSpec::new(r"\b(?:lift|raise)\s+(?:my|our)\s+(?:hands|voice|voices)\b"),
        ],
        scriptures: &["Psalms 150:6", "Psalms 100:4", "Psalms 95:6", "John 4:24"],
    },
    ThemeDefinition {
        key: "faith",
        name: "Faith and Trust",
        weight: 0.9,
        patterns: &[
            PatternSpec::new(r"\bfaith\b"),
            PatternSpec::new(r"\btrust\b").unless_after(r"\b(?:can't|cannot|don't|never)\s+"),
            PatternSpec::new(r"\bbeliev(?:e|ed|ing)\b").unless_after(r"\b(?:don't|never)\s+"),
            PatternSpec::new(r"\bfaithful(?:ness)?\b"),
        ],
        scriptures: &["Hebrews 11:1", "Hebrews 11:6", "Proverbs 3:5", "Hebrews 10:23"],
    },
    ThemeDefinition {
        key: "love_grace",
        name: "Love and Grace",
        weight: 0.8,
        patterns: &[
            PatternSpec::new(r"\bgrace\b"),
            PatternSpec::new(r"\bmerc(?:y|ies|iful)\b"),
            PatternSpec::new(r"\b(?:god|jesus|his|your)\s+love\b"),
            PatternSpec::new(r"\bforgiv(?:e|en|eness)\b"),
            PatternSpec::new(r"\bcompassion\b"),
        ],
        scriptures: &["1 John 4:8", "Romans 5:8", "2 Corinthians 12:9", "Lamentations 3:22"],
    },
    ThemeDefinition {
        key: "prayer",
        name: "Prayer",
        weight: 0.8,
        patterns: &[
            PatternSpec::new(r"\bpray(?:er|ers|ing|ed)?\b"),
            PatternSpec::new(r"\bour\s+father\b"),
            PatternSpec::new(r"\b(?:call|cry)\s+(?:out\s+)?(?:to|on)\s+(?:you|him|the\s+lord)\b"),
            PatternSpec::new(r"\bamen\b"),
        ],
        scriptures: &["Matthew 6:9", "Philippians 4:6", "1 Thessalonians 5:17", "James 5:16"],
    },
    ThemeDefinition {
        key: "spiritual_warfare",
        name: "Spiritual Warfare",
        weight: 0.7,
        patterns: &[
            PatternSpec::new(r"\bfight\s+the\s+good\s+fight\b"),
            PatternSpec::new(r"\barmou?r\s+of\s+god\b"),
            PatternSpec::new(r"\bsword\s+of\s+the\s+spirit\b"),
            PatternSpec::new(r"\b(?:victory|overcome|overcomer)\b"),
            PatternSpec::new(r"\bstrongholds?\b"),
            PatternSpec::new(r"\bchains?\s+(?:are\s+|be\s+)?broken\b"),
        ],
        scriptures: &["Ephesians 6:11", "2 Corinthians 10:4", "1 Timothy 6:12"],
    },
    ThemeDefinition {
        key: "hope",
        name: "Hope",
        weight: 0.7,
        patterns: &[
            PatternSpec::new(r"\bhope\b").unless_after(r"\b(?:no|lost\s+all|without)\s+"),
            PatternSpec::new(r"\bpromises?\b"),
            PatternSpec::new(r"\b(?:renew(?:s|ed)?|restor(?:e|es|ed))\b"),
            PatternSpec::new(r"\bno\s+more\s+(?:tears|pain|sorrow)\b"),
        ],
        scriptures: &["Jeremiah 29:11", "Romans 15:13", "Isaiah 40:31", "Revelation 21:4"],
    },
    ThemeDefinition {
        key: "cross",
        name: "The Cross",
        weight: 1.0,
        patterns: &[
            PatternSpec::new(r"\b(?:the|old\s+rugged|his)\s+cross\b"),
            PatternSpec::new(r"\bcrucifi(?:ed|xion)\b"),
            PatternSpec::new(r"\bcalvary\b"),
            PatternSpec::new(r"\b(?:his|the|precious)\s+blood\b"),
            PatternSpec::new(r"\b(?:rose|risen)\s+(?:again|from\s+the\s+(?:dead|grave))\b"),
            PatternSpec::new(r"\bempty\s+(?:tomb|grave)\b"),
        ],
        scriptures: &["1 Corinthians 1:18", "Galatians 2:20", "Isaiah 53:5"],
    },
    ThemeDefinition {
        key: "kingdom",
        name: "Kingdom of God",
        weight: 0.8,
        patterns: &[
            PatternSpec::new(r"\bkingdom\b"),
            PatternSpec::new(r"\bking\s+of\s+kings\b"),
            PatternSpec::new(r"\b(?:he|you|jesus|god)\s+reigns?\b"),
            PatternSpec::new(r"\bthrone\b"),
        ],
        scriptures: &["Matthew 6:33", "Revelation 21:4", "Luke 17:21"],
    },
    ThemeDefinition {
        key: "covenant",
        name: "Covenant",
        weight: 0.7,
        patterns: &[
            PatternSpec::new(r"\bcovenant\b"),
            PatternSpec::new(r"\b(?:faithful|true)\s+to\s+(?:your|his)\s+(?:word|promise)\b"),
            PatternSpec::new(r"\bnever\s+(?:leave|forsake)\b"),
            PatternSpec::new(r"\bchosen\s+(?:people|ones)\b"),
        ],
        scriptures: &["Jeremiah 31:33", "Hebrews 10:23", "Genesis 9:13"],
    },
];

struct CompiledTheme {
    definition: &'static ThemeDefinition,
    patterns: Vec<GuardedPattern>,
}

/// Theme that fired on a lyric text
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeMatch {
    pub key: &'static str,
    pub name: &'static str,
    pub weight: f64,
    pub confidence: f64,
    /// Accepted matches across all the theme's patterns
    pub match_count: usize,
    /// First accepted match in text order
    pub matched_text: String,
    pub context: String,
    pub scriptures: &'static [&'static str],
}

impl ThemeMatch {
    pub fn to_match(&self) -> BiblicalMatch {
        BiblicalMatch::new(
            MatchKind::Theme,
            self.confidence,
            self.matched_text.clone(),
            self.context.clone(),
        )
        .with_category(self.key)
    }

    /// Contribution to the aggregate biblical score
    pub fn score_points(&self) -> i32 {
        (10.0 * self.weight * self.confidence).round() as i32
    }
}

/// Confidence for a theme with `matches` accepted matches
pub fn theme_confidence(matches: usize, weight: f64) -> f64 {
    let frequency = (matches as f64 * PER_MATCH_CONFIDENCE).min(MAX_MATCH_CONFIDENCE);
    (BASE_CONFIDENCE + frequency + weight * 0.1).min(MAX_THEME_CONFIDENCE)
}

pub struct ThemeIndex {
    themes: Vec<CompiledTheme>,
}

impl ThemeIndex {
    pub fn new() -> AnalyzerResult<Self> {
        let themes = THEMES
            .iter()
            .map(|definition| {
                if definition.patterns.is_empty() || definition.weight <= 0.0 {
                    return Err(AnalyzerError::InvalidTable {
                        table: "theme",
                        reason: format!("{} needs patterns and a positive weight", definition.key),
                    });
                }
                Ok(CompiledTheme {
                    definition,
                    patterns: compile_all(definition.patterns, "theme")?,
                })
            })
            .collect::<AnalyzerResult<Vec<_>>>()?;

        Ok(Self { themes })
    }

    pub fn definition(&self, key: &str) -> Option<&'static ThemeDefinition> {
        self.themes
            .iter()
            .map(|t| t.definition)
            .find(|d| d.key == key)
    }

    /// Themes present in the text, highest confidence first
    ///
    /// Equal confidences keep table order.
    pub fn find_themes(&self, text: &str) -> Vec<ThemeMatch> {
        let mut found: Vec<ThemeMatch> = self
            .themes
            .iter()
            .filter_map(|theme| {
                let spans: Vec<Span> = theme
                    .patterns
                    .iter()
                    .flat_map(|p| p.find_all(text))
                    .collect();
                let first = spans.iter().min_by_key(|s| s.start).copied()?;
                let def = theme.definition;

                Some(ThemeMatch {
                    key: def.key,
                    name: def.name,
                    weight: def.weight,
                    confidence: theme_confidence(spans.len(), def.weight),
                    match_count: spans.len(),
                    matched_text: first.as_str(text).to_string(),
                    context: context_window(text, first, THEME_CONTEXT_CHARS),
                    scriptures: def.scriptures,
                })
            })
            .collect();

        found.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> ThemeIndex {
        ThemeIndex::new().expect("theme table compiles")
    }

    #[test]
    fn test_table_shape() {
        assert_eq!(THEMES.len(), 10);
        for theme in THEMES {
            assert!(theme.weight > 0.0, "{}", theme.key);
            assert!((3..=7).contains(&theme.patterns.len()), "{}", theme.key);
            assert!(!theme.scriptures.is_empty(), "{}", theme.key);
        }
    }

    #[test]
    fn test_confidence_formula() {
        assert!((theme_confidence(1, 1.0) - 0.8).abs() < 1e-9);
        assert!((theme_confidence(2, 0.7) - 0.87).abs() < 1e-9);
        // Frequency contribution caps at 0.3, overall at 0.95
        assert!((theme_confidence(3, 0.5) - 0.95).abs() < 1e-9);
        assert!((theme_confidence(50, 1.0) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_counts_across_patterns() {
        let themes = index().find_themes("salvation came, the Redeemer saved me");
        let salvation = themes.iter().find(|t| t.key == "salvation").unwrap();
        assert_eq!(salvation.match_count, 3);
        assert_eq!(salvation.matched_text, "salvation");
    }

    #[test]
    fn test_sorted_by_confidence() {
        let themes = index().find_themes(
            "praise praise praise, at the cross, a kingdom, grace",
        );
        assert!(themes.len() >= 3);
        assert!(themes.windows(2).all(|w| w[0].confidence >= w[1].confidence));
        assert_eq!(themes[0].key, "worship");
    }

    #[test]
    fn test_good_fight_is_warfare() {
        let themes = index().find_themes("I will fight the good fight");
        assert!(themes.iter().any(|t| t.key == "spiritual_warfare"));
    }

    #[test]
    fn test_negated_hope_ignored() {
        assert!(index().find_themes("there is no hope").is_empty());
    }

    #[test]
    fn test_score_points_and_lookup() {
        let idx = index();
        let themes = idx.find_themes("calvary");
        assert_eq!(themes[0].score_points(), 8);
        assert_eq!(themes[0].to_match().category.as_deref(), Some("cross"));
        assert!(idx.definition("covenant").is_some());
        assert!(idx.definition("unknown").is_none());
    }
}
