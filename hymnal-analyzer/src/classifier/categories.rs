//! Pattern category tables
//!
//! Negative categories are split into severity tiers; positive categories are
//! a single weighted tier each. Within a tier only the first pattern with an
//! accepted match is counted, so ordering matters: put the most specific
//! pattern first.

use crate::patterns::PatternSpec;
use hymnal_common::{FlagCategory, Severity};

/// Patterns for one (category, severity) pair
pub struct TierSpec {
    pub severity: Severity,
    pub patterns: &'static [PatternSpec],
}

/// Negative content category
pub struct NegativeCategorySpec {
    pub category: FlagCategory,
    pub tiers: &'static [TierSpec],
}

/// Positive content category with its bonus weight
pub struct PositiveCategorySpec {
    pub category: PositiveCategory,
    pub weight: f64,
    pub patterns: &'static [PatternSpec],
}

/// Positive content categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositiveCategory {
    Worship,
    Faith,
    BiblicalCitation,
    Prayer,
    SpiritualWarfare,
}

impl PositiveCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositiveCategory::Worship => "worship",
            PositiveCategory::Faith => "faith",
            PositiveCategory::BiblicalCitation => "biblical-citation",
            PositiveCategory::Prayer => "prayer",
            PositiveCategory::SpiritualWarfare => "spiritual-warfare",
        }
    }
}

/// Base penalty before severity, frequency and caller weighting
pub fn base_penalty(category: FlagCategory, severity: Severity) -> i32 {
    match (category, severity) {
        (FlagCategory::Profanity, Severity::Mild) => 8,
        (FlagCategory::Profanity, Severity::Moderate) => 15,
        (FlagCategory::Profanity, Severity::Strong) => 25,
        (FlagCategory::Sexual, Severity::Mild) => 6,
        (FlagCategory::Sexual, Severity::Moderate) => 15,
        (FlagCategory::Sexual, Severity::Strong) => 30,
        (FlagCategory::Drugs, Severity::Mild) => 5,
        (FlagCategory::Drugs, Severity::Moderate) => 20,
        (FlagCategory::Drugs, Severity::Strong) => 35,
        (FlagCategory::Violence, Severity::Mild) => 5,
        (FlagCategory::Violence, Severity::Moderate) => 18,
        (FlagCategory::Violence, Severity::Strong) => 30,
        // Explicit markers carry their own fixed penalty
        (FlagCategory::ExplicitMarker, _) => 0,
    }
}

pub static NEGATIVE_CATEGORIES: &[NegativeCategorySpec] = &[
    NegativeCategorySpec {
        category: FlagCategory::Profanity,
        tiers: &[
            TierSpec {
                severity: Severity::Strong,
                patterns: &[
                    PatternSpec::new(r"\bmotherf\w*"),
                    PatternSpec::new(r"\bf+u+c+k+\w*"),
                    PatternSpec::new(r"\bcunts?\b"),
                ],
            },
            TierSpec {
                severity: Severity::Moderate,
                patterns: &[
                    PatternSpec::new(r"\bshit(?:s|ty|ting|ted)?\b"),
                    PatternSpec::new(r"\bbitch(?:es|y|in'?)?\b").unless_before(r"\s+brew\b"),
                    PatternSpec::new(r"\bassholes?\b"),
                    PatternSpec::new(r"\bbastards?\b"),
                    PatternSpec::new(r"\bdickheads?\b"),
                ],
            },
            TierSpec {
                severity: Severity::Mild,
                patterns: &[
                    PatternSpec::new(r"\bhell\b")
                        .unless_before(r"[\s,!.]+(?:yeah|yes|no)\b")
                        .unless_after(
                            r"(?:heaven\s+(?:and|or)|gates\s+of|fires?\s+of|depths\s+of|saved\s+(?:me\s+)?from|conquered)\s+",
                        ),
                    PatternSpec::new(r"\b(?:god)?damn(?:ed|ing|it)?\b").unless_before(r"[\s,!.]+right\b"),
                    PatternSpec::new(r"\bcrap(?:py)?\b"),
                    PatternSpec::new(r"\bpiss(?:ed)?\b"),
                ],
            },
        ],
    },
    NegativeCategorySpec {
        category: FlagCategory::Sexual,
        tiers: &[
            TierSpec {
                severity: Severity::Strong,
                patterns: &[
                    PatternSpec::new(r"\bporn\w*"),
                    PatternSpec::new(r"\borg(?:y|ies)\b"),
                    PatternSpec::new(r"\bblow\s*jobs?\b"),
                ],
            },
            TierSpec {
                severity: Severity::Moderate,
                patterns: &[
                    PatternSpec::new(r"\bsex(?:ual|ually)?\b"),
                    PatternSpec::new(r"\bstrip(?:per|pers|\s+club)\b"),
                    PatternSpec::new(r"\bhook(?:ing)?\s+up\b"),
                ],
            },
            TierSpec {
                severity: Severity::Mild,
                patterns: &[
                    PatternSpec::new(r"\bsexy\b"),
                    PatternSpec::new(r"\bseduc(?:e|ed|ing|tion)\b"),
                ],
            },
        ],
    },
    NegativeCategorySpec {
        category: FlagCategory::Drugs,
        tiers: &[
            TierSpec {
                severity: Severity::Strong,
                patterns: &[
                    PatternSpec::new(r"\b(?:cocaine|heroin|fentanyl|meth(?:amphetamine)?)\b"),
                    PatternSpec::new(r"\b(?:xanax|percocets?|oxy(?:contin|codone)?)\b"),
                    PatternSpec::new(r"\bsnort(?:s|ed|ing)?\b"),
                ],
            },
            TierSpec {
                severity: Severity::Moderate,
                patterns: &[
                    PatternSpec::new(r"\b(?:weed|marijuana|ganja|kush)\b")
                        .unless_after(r"\b(?:pull(?:s|ed|ing)?|garden|the\s+wheat\s+and)\s+"),
                    PatternSpec::new(r"\b(?:smok(?:e|ed|ing)|roll(?:ed|ing)?)\s+(?:a\s+|up\s+)?(?:blunts?|joints?)\b"),
                    PatternSpec::new(r"\b(?:get|getting|got)\s+(?:so\s+)?(?:high|stoned|lit)\b")
                        .unless_before(r"\s+(?:and\s+)?(?:lifted|on\s+(?:jesus|god|you|him))\b"),
                ],
            },
            TierSpec {
                severity: Severity::Mild,
                patterns: &[
                    PatternSpec::new(r"\b(?:drunk|tipsy|buzzed|hungover|wasted)\b")
                        .unless_after(r"\bnot\s+(?:be\s+)?"),
                    PatternSpec::new(r"\b(?:beers?|whiskey|vodka|liquor|tequila|shots\s+of)\b"),
                ],
            },
        ],
    },
    NegativeCategorySpec {
        category: FlagCategory::Violence,
        tiers: &[
            TierSpec {
                severity: Severity::Strong,
                patterns: &[
                    PatternSpec::new(r"\bmurder(?:s|ed|ing|er|ers)?\b")
                        .unless_after(r"\b(?:not|no)\s+"),
                    PatternSpec::new(r"\bkill(?:s|ed|ing)?\s+(?:him|her|you|them|everybody|everyone)\b")
                        .unless_after(r"\b(?:not|shalt\s+not)\s+"),
                    PatternSpec::new(r"\bblow\s+(?:your|his|her|their)\s+(?:brains|head)\s+(?:out|off)\b"),
                ],
            },
            TierSpec {
                severity: Severity::Moderate,
                patterns: &[
                    PatternSpec::new(r"\b(?:shoot(?:s|ing)?|shot)\s+(?:him|her|you|them|'?em|up)\b"),
                    PatternSpec::new(r"\bstab(?:s|bed|bing)?\b"),
                    PatternSpec::new(r"\b(?:guns?|glocks?|pistols?|rifles?)\b")
                        .unless_after(r"\b(?:lay|laid|put)\s+down\s+(?:the\s+|my\s+|our\s+)?"),
                ],
            },
            TierSpec {
                severity: Severity::Mild,
                patterns: &[
                    PatternSpec::new(r"\bfight(?:s|ing)?\b")
                        .unless_after(r"\b(?:good|(?:lord|god|jesus|he|you)\s+(?:will\s+)?)\s+")
                        .unless_before(r"\s+(?:the\s+good|for\s+(?:me|us|you))\b"),
                    PatternSpec::new(r"\bpunch(?:es|ed|ing)?\b"),
                    PatternSpec::new(r"\bbeat(?:s|ing)?\s+(?:him|her|you|them)\s+(?:up|down)\b"),
                ],
            },
        ],
    },
];

pub static POSITIVE_CATEGORIES: &[PositiveCategorySpec] = &[
    PositiveCategorySpec {
        category: PositiveCategory::Worship,
        weight: 1.0,
        patterns: &[
            PatternSpec::new(r"\bpraise\s+(?:the\s+lord|god|him|you|jesus|his\s+name)\b"),
            PatternSpec::new(r"\b(?:hallelujah|alleluia)\b"),
            PatternSpec::new(r"\bglory\s+to\s+(?:god|the\s+lord|his\s+name)\b"),
            PatternSpec::new(r"\bworship\s+(?:you|him|the\s+lord|the\s+king)\b"),
            PatternSpec::new(r"\bholy,?\s+holy\b"),
            PatternSpec::new(r"\bhosanna\b"),
        ],
    },
    PositiveCategorySpec {
        category: PositiveCategory::Faith,
        weight: 0.9,
        patterns: &[
            PatternSpec::new(r"\bgrace\b"),
            PatternSpec::new(r"\bfaith(?:ful|fulness)?\b"),
            PatternSpec::new(r"\btrust\s+in\s+(?:you|him|the\s+lord|god|jesus)\b"),
            PatternSpec::new(r"\bbelieve\s+in\s+(?:you|him|jesus|god)\b"),
        ],
    },
    PositiveCategorySpec {
        category: PositiveCategory::BiblicalCitation,
        weight: 0.8,
        patterns: &[
            PatternSpec::new(
                r"\b(?:genesis|exodus|psalms?|proverbs|isaiah|jeremiah|matthew|mark|luke|john|romans|corinthians|galatians|ephesians|philippians|hebrews|revelation)\s+\d{1,3}(?::\d{1,3})?\b",
            ),
            PatternSpec::new(r"\b(?:it\s+is\s+written|thus\s+saith\s+the\s+lord|the\s+word\s+of\s+god)\b"),
        ],
    },
    PositiveCategorySpec {
        category: PositiveCategory::Prayer,
        weight: 0.8,
        patterns: &[
            PatternSpec::new(r"\b(?:i|we)\s+pray\b"),
            PatternSpec::new(r"\bour\s+father\b"),
            PatternSpec::new(r"\bhear\s+(?:my|our)\s+(?:prayer|cry)\b"),
            PatternSpec::new(r"\bon\s+(?:my|our)\s+knees\b"),
            PatternSpec::new(r"\bamen\b"),
        ],
    },
    PositiveCategorySpec {
        category: PositiveCategory::SpiritualWarfare,
        weight: 0.7,
        patterns: &[
            PatternSpec::new(r"\bfight\s+the\s+good\s+fight\b"),
            PatternSpec::new(r"\barmou?r\s+of\s+god\b"),
            PatternSpec::new(r"\bsword\s+of\s+the\s+spirit\b"),
            PatternSpec::new(r"\b(?:victory|triumph)\s+(?:in|through)\s+(?:jesus|christ|the\s+lord)\b"),
            PatternSpec::new(r"\b(?:chains?\s+(?:are\s+|be\s+)?broken|break(?:s|ing)?\s+(?:every|the|my)\s+chains?)\b"),
        ],
    },
];
