//! Canonical book table and scripture citation parsing
//!
//! Recognized shapes:
//! - `Book Chapter` ("Psalm 23")
//! - `Book Chapter-Chapter` ("Psalms 23-24")
//! - `Book Chapter:Verse` ("John 3:16")
//! - `Book Chapter:Verse-Verse` ("1 John 3:16-18")
//! - `Book Chapter:Verse-Chapter:Verse` ("John 3:16-4:2")
//!
//! Numbered books accept "1", "1st", "First" and "I" style prefixes, and
//! books with a single chapter read "Jude 7" as verse 7 of chapter 1.

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::patterns::{context_window, GuardedPattern, Span};
use hymnal_common::{BiblicalMatch, MatchKind};
use regex::Captures;
use std::collections::HashMap;

/// Confidence for any citation the parser accepts
pub const REFERENCE_CONFIDENCE: f64 = 0.95;

/// Characters of context recorded on each side of a citation
pub const REFERENCE_CONTEXT_CHARS: usize = 30;

/// One canonical book with its chapter count and accepted abbreviations
pub struct BookSpec {
    pub name: &'static str,
    pub chapters: u16,
    pub aliases: &'static [&'static str],
}

const fn book(name: &'static str, chapters: u16, aliases: &'static [&'static str]) -> BookSpec {
    BookSpec {
        name,
        chapters,
        aliases,
    }
}

/// Protestant canon. Very short or common-word abbreviations ("Is", "Am",
/// "Song", "Act") are left out to keep ordinary lyrics from parsing as
/// citations.
pub static BOOKS: &[BookSpec] = &[
    book("Genesis", 50, &["Gen", "Gn"]),
    book("Exodus", 40, &["Exod", "Exo"]),
    book("Leviticus", 27, &["Lev", "Lv"]),
    book("Numbers", 36, &["Num", "Nm"]),
    book("Deuteronomy", 34, &["Deut", "Dt"]),
    book("Joshua", 24, &["Josh", "Jos"]),
    book("Judges", 21, &["Judg", "Jdg"]),
    book("Ruth", 4, &["Rth"]),
    book("1 Samuel", 31, &["1 Sam", "1 Sm"]),
    book("2 Samuel", 24, &["2 Sam", "2 Sm"]),
    book("1 Kings", 22, &["1 Kgs", "1 Ki"]),
    book("2 Kings", 25, &["2 Kgs", "2 Ki"]),
    book("1 Chronicles", 29, &["1 Chron", "1 Chr"]),
    book("2 Chronicles", 36, &["2 Chron", "2 Chr"]),
    book("Ezra", 10, &["Ezr"]),
    book("Nehemiah", 13, &["Neh"]),
    book("Esther", 10, &["Esth", "Est"]),
    book("Job", 42, &["Jb"]),
    book("Psalms", 150, &["Psalm", "Psa", "Pss", "Ps"]),
    book("Proverbs", 31, &["Prov", "Prv"]),
    book("Ecclesiastes", 12, &["Eccles", "Eccl", "Ecc", "Qoheleth"]),
    book("Song of Solomon", 8, &["Song of Songs", "Canticles", "SoS"]),
    book("Isaiah", 66, &["Isa"]),
    book("Jeremiah", 52, &["Jer"]),
    book("Lamentations", 5, &["Lam"]),
    book("Ezekiel", 48, &["Ezek", "Ezk"]),
    book("Daniel", 12, &["Dan", "Dn"]),
    book("Hosea", 14, &["Hos"]),
    book("Joel", 3, &["Jl"]),
    book("Amos", 9, &[]),
    book("Obadiah", 1, &["Obad"]),
    book("Jonah", 4, &["Jnh"]),
    book("Micah", 7, &["Mic"]),
    book("Nahum", 3, &["Nah"]),
    book("Habakkuk", 3, &["Hab"]),
    book("Zephaniah", 3, &["Zeph", "Zep"]),
    book("Haggai", 2, &["Hag"]),
    book("Zechariah", 14, &["Zech", "Zec"]),
    book("Malachi", 4, &["Mal"]),
    book("Matthew", 28, &["Matt", "Mt"]),
    book("Mark", 16, &["Mrk", "Mk"]),
    book("Luke", 24, &["Luk", "Lk"]),
    book("John", 21, &["Jhn", "Jn"]),
    book("Acts", 28, &[]),
    book("Romans", 16, &["Rom", "Rm"]),
    book("1 Corinthians", 16, &["1 Cor"]),
    book("2 Corinthians", 13, &["2 Cor"]),
    book("Galatians", 6, &["Gal"]),
    book("Ephesians", 6, &["Eph"]),
    book("Philippians", 4, &["Phil", "Php"]),
    book("Colossians", 4, &["Col"]),
    book("1 Thessalonians", 5, &["1 Thess", "1 Th"]),
    book("2 Thessalonians", 3, &["2 Thess", "2 Th"]),
    book("1 Timothy", 6, &["1 Tim", "1 Tm"]),
    book("2 Timothy", 4, &["2 Tim", "2 Tm"]),
    book("Titus", 3, &[]),
    book("Philemon", 1, &["Philem", "Phlm"]),
    book("Hebrews", 13, &["Heb"]),
    book("James", 5, &["Jas", "Jm"]),
    book("1 Peter", 5, &["1 Pet", "1 Pt"]),
    book("2 Peter", 3, &["2 Pet", "2 Pt"]),
    book("1 John", 5, &["1 Jn", "1 Jhn"]),
    book("2 John", 1, &["2 Jn", "2 Jhn"]),
    book("3 John", 1, &["3 Jn", "3 Jhn"]),
    book("Jude", 1, &[]),
    book("Revelation", 22, &["Revelations", "Rev", "Rv"]),
];

/// Spelled-out and roman forms of the leading number of a numbered book
fn ordinal_forms(number: char) -> (&'static [&'static str], &'static str) {
    match number {
        '1' => (&["1st", "First"], "I"),
        '2' => (&["2nd", "Second"], "II"),
        '3' => (&["3rd", "Third"], "III"),
        _ => (&[], ""),
    }
}

/// Lookup key: lower-cased with whitespace and periods removed
fn lookup_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Every surface form of a book: full name, aliases, ordinal variants
fn surface_forms(spec: &BookSpec) -> Vec<String> {
    let mut forms: Vec<String> = std::iter::once(spec.name)
        .chain(spec.aliases.iter().copied())
        .map(str::to_string)
        .collect();

    let mut chars = spec.name.chars();
    if let (Some(number), Some(' ')) = (chars.next(), chars.next()) {
        let (words, roman) = ordinal_forms(number);
        let numbered: Vec<String> = forms.clone();
        for form in numbered {
            let rest = &form[2..];
            for ordinal in words {
                forms.push(format!("{} {}", ordinal, rest));
            }
        }
        // Roman numerals only with the full name: "I Pet" reads as English
        if !roman.is_empty() {
            forms.push(format!("{} {}", roman, &spec.name[2..]));
        }
    }

    forms
}

/// Parsed scripture citation
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptureReference {
    /// Canonical title-cased book name
    pub book: &'static str,
    pub chapter: u16,
    pub verse_start: Option<u16>,
    pub verse_end: Option<u16>,
    /// Set for cross-chapter ranges ("3:16-4:2") and chapter ranges ("23-24")
    pub end_chapter: Option<u16>,
    pub matched_text: String,
    pub context: String,
    pub confidence: f64,
    pub start: usize,
}

impl ScriptureReference {
    /// Normalized "Book Chapter:Verse[-Verse]" form
    pub fn canonical(&self) -> String {
        match (self.verse_start, self.end_chapter, self.verse_end) {
            (None, None, _) => format!("{} {}", self.book, self.chapter),
            (None, Some(end), _) => format!("{} {}-{}", self.book, self.chapter, end),
            (Some(v), None, None) => format!("{} {}:{}", self.book, self.chapter, v),
            (Some(v), None, Some(e)) => format!("{} {}:{}-{}", self.book, self.chapter, v, e),
            (Some(v), Some(c), Some(e)) => {
                format!("{} {}:{}-{}:{}", self.book, self.chapter, v, c, e)
            }
            (Some(v), Some(_), None) => format!("{} {}:{}", self.book, self.chapter, v),
        }
    }

    /// Canonical reference of the first verse ("John 3:16"), if any
    pub fn first_verse(&self) -> Option<String> {
        self.verse_start
            .map(|v| format!("{} {}:{}", self.book, self.chapter, v))
    }

    pub fn to_match(&self) -> BiblicalMatch {
        BiblicalMatch::new(
            MatchKind::ScriptureReference,
            self.confidence,
            self.matched_text.clone(),
            self.context.clone(),
        )
        .with_reference(self.canonical())
    }
}

/// Compiled book table: citation regex plus alias lookup
pub struct BookIndex {
    pattern: GuardedPattern,
    lookup: HashMap<String, usize>,
}

impl BookIndex {
    /// Build the alternation (longest surface form first) and alias map
    pub fn new() -> AnalyzerResult<Self> {
        let mut lookup = HashMap::new();
        let mut forms: Vec<String> = Vec::new();

        for (index, spec) in BOOKS.iter().enumerate() {
            if spec.chapters == 0 {
                return Err(AnalyzerError::InvalidTable {
                    table: "book",
                    reason: format!("{} has no chapters", spec.name),
                });
            }
            for form in surface_forms(spec) {
                if let Some(previous) = lookup.insert(lookup_key(&form), index) {
                    if previous != index {
                        return Err(AnalyzerError::InvalidTable {
                            table: "book",
                            reason: format!(
                                "alias {:?} maps to both {} and {}",
                                form, BOOKS[previous].name, spec.name
                            ),
                        });
                    }
                }
                forms.push(form);
            }
        }

        // Longest first so "1 John" and "Song of Songs" are not shadowed
        forms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        forms.dedup();

        let alternation = forms
            .iter()
            .map(|form| {
                form.split_whitespace()
                    .map(regex::escape)
                    .collect::<Vec<_>>()
                    .join(r"\s*")
            })
            .collect::<Vec<_>>()
            .join("|");

        let pattern = format!(
            concat!(
                r"\b(?P<book>{})(?:\.\s*|\s+)(?P<chapter>\d{{1,3}})",
                r"(?:\s*:\s*(?P<verse>\d{{1,3}})",
                r"(?:\s*[-–]\s*(?:(?P<end_chapter>\d{{1,3}})\s*:\s*)?(?P<end_verse>\d{{1,3}}))?",
                r"|\s*[-–]\s*(?P<chapter_end>\d{{1,3}}))?\b"
            ),
            alternation
        );

        Ok(Self {
            pattern: GuardedPattern::plain(&pattern, "book")?,
            lookup,
        })
    }

    /// Resolve any surface form to its canonical book
    pub fn resolve(&self, name: &str) -> Option<&'static BookSpec> {
        self.lookup.get(&lookup_key(name)).map(|&i| &BOOKS[i])
    }

    /// Every citation in `text` that resolves to a real book and chapter
    pub fn find_references(&self, text: &str) -> Vec<ScriptureReference> {
        self.pattern
            .regex()
            .captures_iter(text)
            .filter_map(|caps| self.parse_captures(text, &caps))
            .collect()
    }

    fn parse_captures(&self, text: &str, caps: &Captures<'_>) -> Option<ScriptureReference> {
        let whole = caps.get(0)?;
        let spec = self.resolve(caps.name("book")?.as_str())?;

        let number = |name: &str| -> Option<Option<u16>> {
            match caps.name(name) {
                Some(m) => m.as_str().parse::<u16>().ok().filter(|n| *n > 0).map(Some),
                None => Some(None),
            }
        };

        let mut chapter = number("chapter")??;
        let mut verse_start = number("verse")?;
        let mut verse_end = number("end_verse")?;
        let mut end_chapter = number("end_chapter")?;
        let chapter_end = number("chapter_end")?;

        if spec.chapters == 1 && chapter > 1 && verse_start.is_none() {
            // "Jude 7": single-chapter books cite verses directly
            verse_start = Some(chapter);
            verse_end = chapter_end;
            chapter = 1;
        } else if chapter_end.is_some() {
            end_chapter = chapter_end;
        }

        if chapter > spec.chapters || end_chapter.is_some_and(|c| c > spec.chapters || c < chapter) {
            return None;
        }
        if end_chapter == Some(chapter) {
            end_chapter = None;
        }
        if end_chapter.is_none() {
            if let (Some(start), Some(end)) = (verse_start, verse_end) {
                if end < start {
                    return None;
                }
            }
        }

        let span = Span {
            start: whole.start(),
            end: whole.end(),
        };

        Some(ScriptureReference {
            book: spec.name,
            chapter,
            verse_start,
            verse_end,
            end_chapter,
            matched_text: whole.as_str().to_string(),
            context: context_window(text, span, REFERENCE_CONTEXT_CHARS),
            confidence: REFERENCE_CONFIDENCE,
            start: whole.start(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> BookIndex {
        BookIndex::new().expect("book table compiles")
    }

    #[test]
    fn test_sixty_six_books() {
        assert_eq!(BOOKS.len(), 66);
    }

    #[test]
    fn test_john_3_16() {
        let refs = index().find_references("John 3:16");
        assert_eq!(refs.len(), 1);
        let r = &refs[0];
        assert_eq!(r.book, "John");
        assert_eq!(r.chapter, 3);
        assert_eq!(r.verse_start, Some(16));
        assert_eq!(r.verse_end, None);
        assert_eq!(r.confidence, 0.95);
        assert_eq!(r.canonical(), "John 3:16");
    }

    #[test]
    fn test_numbered_book_range() {
        let refs = index().find_references("read 1 John 3:16-18 tonight");
        assert_eq!(refs.len(), 1);
        let r = &refs[0];
        assert_eq!(r.book, "1 John");
        assert_eq!(r.verse_start, Some(16));
        assert_eq!(r.verse_end, Some(18));
        assert_eq!(r.canonical(), "1 John 3:16-18");
        assert_eq!(r.matched_text, "1 John 3:16-18");
    }

    #[test]
    fn test_unknown_book_dropped() {
        assert!(index().find_references("Frobnicate 9:9").is_empty());
    }

    #[test]
    fn test_abbreviations_and_ordinals() {
        let idx = index();
        assert_eq!(idx.resolve("Ps").map(|b| b.name), Some("Psalms"));
        assert_eq!(idx.resolve("first john").map(|b| b.name), Some("1 John"));
        assert_eq!(idx.resolve("2nd  Cor.").map(|b| b.name), Some("2 Corinthians"));
        assert_eq!(idx.resolve("II Corinthians").map(|b| b.name), Some("2 Corinthians"));
        assert!(idx.resolve("II Cor").is_none());
        assert_eq!(idx.resolve("Song of Songs").map(|b| b.name), Some("Song of Solomon"));
        assert!(idx.resolve("Frobnicate").is_none());

        let refs = idx.find_references("Rom. 8:28 and 1st Cor 13:4");
        let canon: Vec<String> = refs.iter().map(|r| r.canonical()).collect();
        assert_eq!(canon, vec!["Romans 8:28", "1 Corinthians 13:4"]);
    }

    #[test]
    fn test_chapter_only_and_chapter_range() {
        let refs = index().find_references("Psalm 23 then Psalms 23-24");
        let canon: Vec<String> = refs.iter().map(|r| r.canonical()).collect();
        assert_eq!(canon, vec!["Psalms 23", "Psalms 23-24"]);
    }

    #[test]
    fn test_cross_chapter_range() {
        let refs = index().find_references("John 3:16-4:2");
        assert_eq!(refs[0].end_chapter, Some(4));
        assert_eq!(refs[0].verse_end, Some(2));
        assert_eq!(refs[0].canonical(), "John 3:16-4:2");
    }

    #[test]
    fn test_single_chapter_book_verse() {
        let refs = index().find_references("Jude 24");
        assert_eq!(refs[0].chapter, 1);
        assert_eq!(refs[0].verse_start, Some(24));
        assert_eq!(refs[0].canonical(), "Jude 1:24");
    }

    #[test]
    fn test_no_space_before_chapter_not_a_citation() {
        assert!(index().find_references("playing my PS2 all night").is_empty());
    }

    #[test]
    fn test_chapter_out_of_range_dropped() {
        assert!(index().find_references("Genesis 51:1").is_empty());
        assert!(index().find_references("Psalm 0").is_empty());
        assert!(index().find_references("John 3:18-16").is_empty());
    }

    #[test]
    fn test_context_window() {
        let text = "and so the preacher opened his book to John 3:16 and read it aloud to the crowd";
        let refs = index().find_references(text);
        let ctx = &refs[0].context;
        assert!(ctx.contains("John 3:16"));
        assert!(ctx.len() <= "John 3:16".len() + 60);
    }

    #[test]
    fn test_to_match_carries_reference() {
        let refs = index().find_references("Philippians 4:13");
        let m = refs[0].to_match();
        assert_eq!(m.kind, MatchKind::ScriptureReference);
        assert_eq!(m.reference.as_deref(), Some("Philippians 4:13"));
    }
}
