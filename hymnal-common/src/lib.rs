//! # Hymnal Common Library
//!
//! Shared code for the Hymnal lyric analysis engine including:
//! - Analysis result contract (flags, biblical matches, concern levels)
//! - Caller-supplied analysis tuning (`AnalysisConfig`)
//! - TOML bootstrap configuration loading
//! - Common error types

pub mod analysis;
pub mod config;
pub mod error;

pub use analysis::{
    AnalysisConfig, AnalysisResult, BiblicalFindings, BiblicalMatch, CategoryWeights,
    ConcernLevel, ContentFlag, FlagCategory, MatchKind, ScoringProfile, Sensitivity, Severity,
    SupportingVerse,
};
pub use error::{Error, Result};
