//! Biblical proper-name detection
//!
//! Names are grouped by category and role. The same word may appear in more
//! than one group ("John" the apostle, "John the Baptist"); matches are
//! deduplicated by start offset so one mention is counted once, keeping the
//! highest-confidence reading.

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::patterns::{context_window, GuardedPattern};
use hymnal_common::{BiblicalMatch, MatchKind};
use std::collections::BTreeMap;

const NAME_CONTEXT_CHARS: usize = 30;

/// Which part of the canon a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameCategory {
    Divine,
    OldTestament,
    NewTestament,
}

impl NameCategory {
    pub fn confidence(&self) -> f64 {
        match self {
            NameCategory::Divine => 0.95,
            NameCategory::OldTestament | NameCategory::NewTestament => 0.8,
        }
    }

    /// Contribution of one mention to the biblical score
    pub fn score_points(&self) -> i32 {
        match self {
            NameCategory::Divine => 12,
            NameCategory::NewTestament => 8,
            NameCategory::OldTestament => 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NameCategory::Divine => "divine",
            NameCategory::OldTestament => "old_testament",
            NameCategory::NewTestament => "new_testament",
        }
    }
}

struct NameGroup {
    category: NameCategory,
    role: &'static str,
    names: &'static [&'static str],
}

static NAME_GROUPS: &[NameGroup] = &[
    NameGroup {
        category: NameCategory::Divine,
        role: "divine",
        names: &[
            "Holy Spirit",
            "Holy Ghost",
            "Jesus",
            "Christ",
            "God",
            "Lord",
            "Yahweh",
            "Jehovah",
            "Emmanuel",
            "Immanuel",
            "Messiah",
            "Savior",
            "Saviour",
            "Redeemer",
            "Lamb of God",
            "Prince of Peace",
            "King of Kings",
            "Alpha and Omega",
            "El Shaddai",
            "Adonai",
        ],
    },
    NameGroup {
        category: NameCategory::OldTestament,
        role: "patriarch",
        names: &["Adam", "Eve", "Noah", "Abraham", "Sarah", "Isaac", "Jacob", "Joseph", "Israel"],
    },
    NameGroup {
        category: NameCategory::OldTestament,
        role: "leader",
        names: &["Moses", "Aaron", "Joshua", "Gideon", "Samson", "Deborah", "Samuel", "Ruth", "Esther"],
    },
    NameGroup {
        category: NameCategory::OldTestament,
        role: "king",
        names: &["David", "Solomon", "Saul", "Hezekiah", "Josiah"],
    },
    NameGroup {
        category: NameCategory::OldTestament,
        role: "prophet",
        names: &["Elijah", "Elisha", "Isaiah", "Jeremiah", "Ezekiel", "Daniel", "Jonah"],
    },
    NameGroup {
        category: NameCategory::NewTestament,
        role: "apostle",
        names: &["Peter", "Paul", "John", "James", "Andrew", "Thomas", "Matthew", "Philip", "Bartholomew"],
    },
    NameGroup {
        category: NameCategory::NewTestament,
        role: "disciple",
        names: &[
            "John the Baptist",
            "Mary Magdalene",
            "Mary",
            "Martha",
            "Lazarus",
            "Nicodemus",
            "Zacchaeus",
            "Barnabas",
            "Timothy",
            "Stephen",
        ],
    },
];

struct CompiledName {
    name: &'static str,
    category: NameCategory,
    role: &'static str,
    pattern: GuardedPattern,
}

/// Detected name with its category, before conversion to `BiblicalMatch`
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub name: &'static str,
    pub category: NameCategory,
    pub role: &'static str,
    pub matched_text: String,
    pub context: String,
    pub start: usize,
}

impl NameMatch {
    pub fn confidence(&self) -> f64 {
        self.category.confidence()
    }

    pub fn to_match(&self) -> BiblicalMatch {
        BiblicalMatch::new(
            MatchKind::BiblicalName,
            self.confidence(),
            self.matched_text.clone(),
            self.context.clone(),
        )
        .with_category(format!("{}:{}", self.category.as_str(), self.role))
    }
}

/// Word-boundary patterns for every name in the table
pub struct NameIndex {
    names: Vec<CompiledName>,
}

impl NameIndex {
    pub fn new() -> AnalyzerResult<Self> {
        let mut names = Vec::new();
        for group in NAME_GROUPS {
            if group.names.is_empty() {
                return Err(AnalyzerError::InvalidTable {
                    table: "name",
                    reason: format!("{} group is empty", group.role),
                });
            }
            for &name in group.names {
                let words: Vec<String> = name.split_whitespace().map(regex::escape).collect();
                let pattern = format!(r"\b{}\b", words.join(r"\s+"));
                names.push(CompiledName {
                    name,
                    category: group.category,
                    role: group.role,
                    pattern: GuardedPattern::plain(&pattern, "name")?,
                });
            }
        }
        Ok(Self { names })
    }

    /// All name mentions, one per start offset, ordered by position
    ///
    /// When two entries fire at the same offset the higher confidence wins;
    /// on a tie the longer match wins.
    pub fn find_names(&self, text: &str) -> Vec<NameMatch> {
        let mut by_offset: BTreeMap<usize, NameMatch> = BTreeMap::new();

        for entry in &self.names {
            for span in entry.pattern.find_all(text) {
                let candidate = NameMatch {
                    name: entry.name,
                    category: entry.category,
                    role: entry.role,
                    matched_text: span.as_str(text).to_string(),
                    context: context_window(text, span, NAME_CONTEXT_CHARS),
                    start: span.start,
                };

                let keep_existing = by_offset
                    .get(&span.start)
                    .is_some_and(|existing| !Self::replaces(&candidate, existing));
                if !keep_existing {
                    by_offset.insert(span.start, candidate);
                }
            }
        }

        by_offset.into_values().collect()
    }

    fn replaces(candidate: &NameMatch, existing: &NameMatch) -> bool {
        let (c, e) = (candidate.confidence(), existing.confidence());
        c > e || (c == e && candidate.matched_text.len() > existing.matched_text.len())
    }
}
