//! hymnal-analyzer library interface
//!
//! Rule-driven lyric analysis: a pattern classifier for negative and
//! positive content, a biblical reference detector, and the adapter that
//! merges both into one scored `AnalysisResult`.

pub mod analyzer;
pub mod batch;
pub mod biblical;
pub mod classifier;
pub mod error;
pub mod lyrics;
pub mod patterns;

pub use crate::analyzer::{looks_instrumental, Analyzer, SongInput};
pub use crate::batch::{analyze_batch, DEFAULT_BATCH_CONCURRENCY};
pub use crate::biblical::{BiblicalDetector, DetectionResult};
pub use crate::classifier::{ClassifierOutput, PatternClassifier};
pub use crate::error::{AnalyzerError, AnalyzerResult};
pub use crate::lyrics::{LyricSource, LyricSourceError, NoLyricSource, StaticLyricSource};

/// Largest lyric text accepted, in bytes
///
/// Every lyric scan skips larger inputs and reports the failure as a warning.
/// The explicit marker still applies.
pub const MAX_LYRICS_BYTES: usize = 64 * 1024;
