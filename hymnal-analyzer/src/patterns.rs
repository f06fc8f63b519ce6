//! Guarded pattern matching
//!
//! The `regex` crate has no lookaround, so context-sensitive rules are split
//! into a primary pattern plus optional guards. A primary match is rejected
//! when the text just before it matches `not_preceded_by`, or the text just
//! after it matches `not_followed_by`. Guards only see a bounded window of
//! adjacent text, which keeps matching linear in the lyric length.
//!
//! All patterns are compiled case-insensitively.

use crate::error::{AnalyzerError, AnalyzerResult};
use regex::{Regex, RegexBuilder};

/// Bytes of adjacent text a guard may inspect on either side of a match
const GUARD_WINDOW_BYTES: usize = 64;

/// Uncompiled pattern with optional guards, as written in static tables
#[derive(Debug, Clone, Copy)]
pub struct PatternSpec {
    pub pattern: &'static str,
    pub not_preceded_by: Option<&'static str>,
    pub not_followed_by: Option<&'static str>,
}

impl PatternSpec {
    pub const fn new(pattern: &'static str) -> Self {
        Self {
            pattern,
            not_preceded_by: None,
            not_followed_by: None,
        }
    }

    /// Reject matches whose preceding text ends with `guard`
    pub const fn unless_after(mut self, guard: &'static str) -> Self {
        self.not_preceded_by = Some(guard);
        self
    }

    /// Reject matches whose following text starts with `guard`
    pub const fn unless_before(mut self, guard: &'static str) -> Self {
        self.not_followed_by = Some(guard);
        self
    }
}

/// Compiled pattern with guards
#[derive(Debug, Clone)]
pub struct GuardedPattern {
    regex: Regex,
    not_preceded_by: Option<Regex>,
    not_followed_by: Option<Regex>,
}

/// Accepted match span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn as_str<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

impl GuardedPattern {
    /// Compile a spec; `table` names the owning table for error reporting
    pub fn compile(spec: &PatternSpec, table: &'static str) -> AnalyzerResult<Self> {
        let regex = build_regex(spec.pattern, table)?;
        let not_preceded_by = spec
            .not_preceded_by
            .map(|guard| build_regex(&format!("(?:{})$", guard), table))
            .transpose()?;
        let not_followed_by = spec
            .not_followed_by
            .map(|guard| build_regex(&format!("^(?:{})", guard), table))
            .transpose()?;

        Ok(Self {
            regex,
            not_preceded_by,
            not_followed_by,
        })
    }

    /// Compile a plain pattern with no guards
    pub fn plain(pattern: &str, table: &'static str) -> AnalyzerResult<Self> {
        Ok(Self {
            regex: build_regex(pattern, table)?,
            not_preceded_by: None,
            not_followed_by: None,
        })
    }

    /// All non-overlapping matches that survive the guards
    pub fn find_all(&self, text: &str) -> Vec<Span> {
        self.regex
            .find_iter(text)
            .filter(|m| self.accepts(text, m.start(), m.end()))
            .map(|m| Span {
                start: m.start(),
                end: m.end(),
            })
            .collect()
    }

    /// First match that survives the guards
    pub fn find_first(&self, text: &str) -> Option<Span> {
        self.regex
            .find_iter(text)
            .find(|m| self.accepts(text, m.start(), m.end()))
            .map(|m| Span {
                start: m.start(),
                end: m.end(),
            })
    }

    /// Underlying primary regex
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    fn accepts(&self, text: &str, start: usize, end: usize) -> bool {
        if let Some(guard) = &self.not_preceded_by {
            let from = floor_char_boundary(text, start.saturating_sub(GUARD_WINDOW_BYTES));
            if guard.is_match(&text[from..start]) {
                return false;
            }
        }
        if let Some(guard) = &self.not_followed_by {
            let to = ceil_char_boundary(text, end + GUARD_WINDOW_BYTES);
            if guard.is_match(&text[end..to]) {
                return false;
            }
        }
        true
    }
}

fn build_regex(pattern: &str, table: &'static str) -> AnalyzerResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| AnalyzerError::PatternCompile {
            table,
            pattern: pattern.to_string(),
            source,
        })
}

/// Compile every spec of a table, failing on the first bad pattern
pub fn compile_all(specs: &[PatternSpec], table: &'static str) -> AnalyzerResult<Vec<GuardedPattern>> {
    specs
        .iter()
        .map(|spec| GuardedPattern::compile(spec, table))
        .collect()
}

/// Largest char boundary <= `index`
pub fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary >= `index`
pub fn ceil_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Snippet of `text` with up to `radius` characters on each side of a span
pub fn context_window(text: &str, span: Span, radius: usize) -> String {
    let start = text[..span.start]
        .char_indices()
        .rev()
        .nth(radius.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let start = if radius == 0 { span.start } else { start };

    let end = text[span.end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| span.end + i)
        .unwrap_or(text.len());

    text[start..end].trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(spec: PatternSpec) -> GuardedPattern {
        GuardedPattern::compile(&spec, "test").unwrap()
    }

    #[test]
    fn test_case_insensitive() {
        let p = compile(PatternSpec::new(r"\bgrace\b"));
        assert_eq!(p.find_all("Grace, GRACE and grace").len(), 3);
    }

    #[test]
    fn test_not_followed_by_guard() {
        let p = compile(PatternSpec::new(r"\bhell\b").unless_before(r"\s+yeah\b"));
        assert!(p.find_all("hell yeah").is_empty());
        assert!(p.find_all("hello there").is_empty());
        assert_eq!(p.find_all("what the hell").len(), 1);
    }

    #[test]
    fn test_not_preceded_by_guard() {
        let p = compile(PatternSpec::new(r"\bfight\b").unless_after(r"good\s+"));
        assert!(p.find_all("the good fight").is_empty());
        assert_eq!(p.find_all("a street fight").len(), 1);
    }

    #[test]
    fn test_guard_rejects_only_guarded_occurrence() {
        let p = compile(PatternSpec::new(r"\bdamn\b").unless_before(r"\s+right\b"));
        let text = "damn right, and damn it";
        let spans = p.find_all(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(&text[spans[0].start..], "damn it");
    }

    #[test]
    fn test_bad_pattern_reports_table() {
        let err = GuardedPattern::plain("(unclosed", "profanity").unwrap_err();
        assert!(matches!(err, AnalyzerError::PatternCompile { table: "profanity", .. }));
    }

    #[test]
    fn test_context_window_radius() {
        let text = "0123456789TARGET0123456789";
        let span = Span { start: 10, end: 16 };
        assert_eq!(context_window(text, span, 3), "789TARGET012");
        assert_eq!(context_window(text, span, 100), text);
    }

    #[test]
    fn test_context_window_multibyte() {
        let text = "ééé word ééé";
        let start = text.find("word").unwrap();
        let span = Span { start, end: start + 4 };
        assert_eq!(context_window(text, span, 2), "é word é");
    }

    #[test]
    fn test_guard_window_multibyte_boundary() {
        let p = compile(PatternSpec::new(r"\bamen\b").unless_after(r"x\s+"));
        // Window start lands inside a two-byte char and must be floored
        let text = format!("{} amen", "é".repeat(40));
        assert_eq!(p.find_all(&text).len(), 1);
    }
}
