//! Error types for hymnal-analyzer
//!
//! Construction-time errors (bad pattern tables, bad configuration) are fatal
//! and returned to the caller. Per-call errors never leave a component: they
//! are logged and converted to that component's neutral output.

use thiserror::Error;

/// Analyzer error type
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A pattern in a compiled table failed to build
    #[error("Pattern compilation failed in {table} table ({pattern:?}): {source}")]
    PatternCompile {
        table: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A static knowledge table violates its own invariants
    #[error("Invalid {table} table: {reason}")]
    InvalidTable { table: &'static str, reason: String },

    /// Lyric text beyond the size the matchers accept
    #[error("Lyrics too large: {len} bytes (limit {limit})")]
    InputTooLarge { len: usize, limit: usize },

    /// Caller configuration rejected
    #[error(transparent)]
    Config(#[from] hymnal_common::Error),
}

/// Result type for analyzer operations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
