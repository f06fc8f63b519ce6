//! Embedded verse corpus and fuzzy verse-content matching
//!
//! Each stored verse is scored against the lyrics as
//! `0.6 × sequence similarity + 0.4 × word overlap`, where word overlap is
//! the share of the verse's distinct words that also occur in the lyrics.
//! Both sides are normalized (lower-cased, punctuation stripped, whitespace
//! collapsed) before comparison.
//!
//! The weights and the 0.3 cutoff were tuned by hand against worship lyrics;
//! they are constants here so they can be adjusted without touching the
//! matcher.

use hymnal_common::{BiblicalMatch, MatchKind};
use std::collections::{HashMap, HashSet};

/// Weight of normalized Levenshtein similarity in the combined score
pub const SEQUENCE_WEIGHT: f64 = 0.6;

/// Weight of verse-word overlap in the combined score
pub const OVERLAP_WEIGHT: f64 = 0.4;

/// Combined scores below this are discarded
pub const MATCH_CUTOFF: f64 = 0.3;

/// Matches kept after sorting
pub const MAX_VERSE_MATCHES: usize = 5;

/// King James Version text (public domain)
static VERSES: &[(&str, &str)] = &[
    ("John 3:16", "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life."),
    ("Romans 10:9", "That if thou shalt confess with thy mouth the Lord Jesus, and shalt believe in thine heart that God hath raised him from the dead, thou shalt be saved."),
    ("Ephesians 2:8", "For by grace are ye saved through faith; and that not of yourselves: it is the gift of God."),
    ("Acts 4:12", "Neither is there salvation in any other: for there is none other name under heaven given among men, whereby we must be saved."),
    ("Romans 6:23", "For the wages of sin is death; but the gift of God is eternal life through Jesus Christ our Lord."),
    ("Psalms 150:6", "Let every thing that hath breath praise the LORD. Praise ye the LORD."),
    ("Psalms 100:4", "Enter into his gates with thanksgiving, and into his courts with praise: be thankful unto him, and bless his name."),
    ("Psalms 95:6", "O come, let us worship and bow down: let us kneel before the LORD our maker."),
    ("John 4:24", "God is a Spirit: and they that worship him must worship him in spirit and in truth."),
    ("Hebrews 11:1", "Now faith is the substance of things hoped for, the evidence of things not seen."),
    ("Hebrews 11:6", "But without faith it is impossible to please him: for he that cometh to God must believe that he is, and that he is a rewarder of them that diligently seek him."),
    ("Proverbs 3:5", "Trust in the LORD with all thine heart; and lean not unto thine own understanding."),
    ("1 John 4:8", "He that loveth not knoweth not God; for God is love."),
    ("Romans 5:8", "But God commendeth his love toward us, in that, while we were yet sinners, Christ died for us."),
    ("2 Corinthians 12:9", "And he said unto me, My grace is sufficient for thee: for my strength is made perfect in weakness."),
    ("Lamentations 3:22", "It is of the LORD's mercies that we are not consumed, because his compassions fail not."),
    ("Matthew 6:9", "After this manner therefore pray ye: Our Father which art in heaven, Hallowed be thy name."),
    ("Philippians 4:6", "Be careful for nothing; but in every thing by prayer and supplication with thanksgiving let your requests be made known unto God."),
    ("1 Thessalonians 5:17", "Pray without ceasing."),
    ("Ephesians 6:11", "Put on the whole armour of God, that ye may be able to stand against the wiles of the devil."),
    ("2 Corinthians 10:4", "For the weapons of our warfare are not carnal, but mighty through God to the pulling down of strong holds."),
    ("1 Timothy 6:12", "Fight the good fight of faith, lay hold on eternal life, whereunto thou art also called, and hast professed a good profession before many witnesses."),
    ("Jeremiah 29:11", "For I know the thoughts that I think toward you, saith the LORD, thoughts of peace, and not of evil, to give you an expected end."),
    ("Romans 15:13", "Now the God of hope fill you with all joy and peace in believing, that ye may abound in hope, through the power of the Holy Ghost."),
    ("Isaiah 40:31", "But they that wait upon the LORD shall renew their strength; they shall mount up with wings as eagles; they shall run, and not be weary; and they shall walk, and not faint."),
    ("1 Corinthians 1:18", "For the preaching of the cross is to them that perish foolishness; but unto us which are saved it is the power of God."),
    ("Galatians 2:20", "I am crucified with Christ: nevertheless I live; yet not I, but Christ liveth in me: and the life which I now live in the flesh I live by the faith of the Son of God, who loved me, and gave himself for me."),
    ("Isaiah 53:5", "But he was wounded for our transgressions, he was bruised for our iniquities: the chastisement of our peace was upon him; and with his stripes we are healed."),
    ("Matthew 6:33", "But seek ye first the kingdom of God, and his righteousness; and all these things shall be added unto you."),
    ("Revelation 21:4", "And God shall wipe away all tears from their eyes; and there shall be no more death, neither sorrow, nor crying, neither shall there be any more pain: for the former things are passed away."),
    ("Hebrews 10:23", "Let us hold fast the profession of our faith without wavering; for he is faithful that promised."),
    ("Jeremiah 31:33", "But this shall be the covenant that I will make with the house of Israel; After those days, saith the LORD, I will put my law in their inward parts, and write it in their hearts; and will be their God, and they shall be my people."),
    ("Psalms 23:1", "The LORD is my shepherd; I shall not want."),
    ("Philippians 4:13", "I can do all things through Christ which strengtheneth me."),
];

/// Lower-case, replace punctuation with spaces, collapse whitespace
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else if c == '\'' || c == '’' {
                // Keep contractions together: "lord's" -> "lords"
                '\0'
            } else {
                ' '
            }
        })
        .filter(|c| *c != '\0')
        .flat_map(char::to_lowercase)
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distinct words in first-occurrence order
fn distinct_words(normalized: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    normalized
        .split_whitespace()
        .filter(|w| seen.insert(*w))
        .map(str::to_string)
        .collect()
}

/// Verse scored against a lyric text
#[derive(Debug, Clone, PartialEq)]
pub struct VerseMatch {
    pub reference: &'static str,
    pub verse_text: &'static str,
    /// Combined score, used as confidence
    pub confidence: f64,
    pub similarity: f64,
    pub overlap: f64,
    /// Verse words also present in the lyrics, in verse order
    pub shared_words: Vec<String>,
}

impl VerseMatch {
    pub fn to_match(&self) -> BiblicalMatch {
        BiblicalMatch::new(
            MatchKind::ScriptureReference,
            self.confidence,
            self.shared_words.join(" "),
            format!(
                "similarity {:.2}, word overlap {:.2}",
                self.similarity, self.overlap
            ),
        )
        .with_reference(self.reference)
        .with_verse_text(self.verse_text)
        .with_category("verse_content")
    }
}

struct StoredVerse {
    reference: &'static str,
    text: &'static str,
    normalized: String,
    /// Distinct words in first-occurrence order
    words: Vec<String>,
    char_len: usize,
}

/// Verse corpus with precomputed normalized forms
pub struct VerseCorpus {
    verses: Vec<StoredVerse>,
    by_reference: HashMap<&'static str, usize>,
}

impl VerseCorpus {
    pub fn new() -> Self {
        let verses: Vec<StoredVerse> = VERSES
            .iter()
            .map(|&(reference, text)| {
                let normalized = normalize(text);
                let words = distinct_words(&normalized);
                StoredVerse {
                    reference,
                    text,
                    char_len: normalized.chars().count(),
                    normalized,
                    words,
                }
            })
            .collect();

        let by_reference = verses
            .iter()
            .enumerate()
            .map(|(i, v)| (v.reference, i))
            .collect();

        Self {
            verses,
            by_reference,
        }
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Stored text for a canonical reference
    pub fn text(&self, reference: &str) -> Option<&'static str> {
        self.by_reference.get(reference).map(|&i| self.verses[i].text)
    }

    /// Top verse matches for the lyrics, best first
    pub fn match_lyrics(&self, lyrics: &str) -> Vec<VerseMatch> {
        let normalized = normalize(lyrics);
        if normalized.is_empty() {
            return Vec::new();
        }
        let lyric_words: HashSet<&str> = normalized.split_whitespace().collect();
        let lyric_len = normalized.chars().count();

        let mut matches: Vec<VerseMatch> = self
            .verses
            .iter()
            .filter_map(|verse| Self::score(verse, &normalized, lyric_len, &lyric_words))
            .collect();

        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        matches.truncate(MAX_VERSE_MATCHES);
        matches
    }

    fn score(
        verse: &StoredVerse,
        lyrics: &str,
        lyric_len: usize,
        lyric_words: &HashSet<&str>,
    ) -> Option<VerseMatch> {
        if verse.words.is_empty() {
            return None;
        }

        let shared_words: Vec<String> = verse
            .words
            .iter()
            .filter(|w| lyric_words.contains(w.as_str()))
            .cloned()
            .collect();
        let overlap = shared_words.len() as f64 / verse.words.len() as f64;

        // Levenshtein similarity can never exceed the length ratio, so
        // hopeless candidates skip the quadratic comparison
        let length_ratio =
            lyric_len.min(verse.char_len) as f64 / lyric_len.max(verse.char_len).max(1) as f64;
        if SEQUENCE_WEIGHT * length_ratio + OVERLAP_WEIGHT * overlap < MATCH_CUTOFF {
            return None;
        }

        let similarity = strsim::normalized_levenshtein(lyrics, &verse.normalized);
        let confidence = SEQUENCE_WEIGHT * similarity + OVERLAP_WEIGHT * overlap;
        if confidence < MATCH_CUTOFF {
            return None;
        }

        Some(VerseMatch {
            reference: verse.reference,
            verse_text: verse.text,
            confidence,
            similarity,
            overlap,
            shared_words,
        })
    }
}

impl Default for VerseCorpus {
    fn default() -> Self {
        Self::new()
    }
}
