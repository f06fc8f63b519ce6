//! Lyric sources
//!
//! The analyzer asks a [`LyricSource`] for lyrics only when the caller
//! supplied none and did not request a lyric skip. Fetch failures never fail
//! the analysis; they become a warning on the result.

use std::collections::HashMap;
use thiserror::Error;

/// Lyric lookup error
#[derive(Debug, Error)]
pub enum LyricSourceError {
    /// Source not configured or not reachable
    #[error("Lyric source unavailable: {0}")]
    Unavailable(String),
}

/// Provider of lyric text for a title/artist pair
///
/// Lookups run on the blocking pool during batch analysis, so
/// implementations may block.
pub trait LyricSource: Send + Sync {
    /// Source name for logs and warnings
    fn name(&self) -> &'static str;

    /// Fetch lyrics
    ///
    /// # Returns
    /// `Ok(None)` when the source has no lyrics for the song.
    ///
    /// # Errors
    /// Returns `LyricSourceError` if the lookup itself failed.
    fn fetch(&self, title: &str, artist: &str) -> Result<Option<String>, LyricSourceError>;
}

/// Source that never has lyrics
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLyricSource;

impl LyricSource for NoLyricSource {
    fn name(&self) -> &'static str {
        "none"
    }

    fn fetch(&self, _title: &str, _artist: &str) -> Result<Option<String>, LyricSourceError> {
        Ok(None)
    }
}

/// In-memory lyrics keyed by normalized title and artist
#[derive(Debug, Clone, Default)]
pub struct StaticLyricSource {
    entries: HashMap<(String, String), String>,
}

impl StaticLyricSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: &str, artist: &str, lyrics: impl Into<String>) {
        self.entries.insert(lookup_key(title, artist), lyrics.into());
    }

    /// Builder form of [`StaticLyricSource::insert`]
    pub fn with(mut self, title: &str, artist: &str, lyrics: impl Into<String>) -> Self {
        self.insert(title, artist, lyrics);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LyricSource for StaticLyricSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch(&self, title: &str, artist: &str) -> Result<Option<String>, LyricSourceError> {
        Ok(self.entries.get(&lookup_key(title, artist)).cloned())
    }
}

fn normalize_field(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn lookup_key(title: &str, artist: &str) -> (String, String) {
    (normalize_field(title), normalize_field(artist))
}
