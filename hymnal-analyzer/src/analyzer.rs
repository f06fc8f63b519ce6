//! Aggregation adapter
//!
//! Runs the pattern classifier and the biblical detector over one song and
//! merges their outputs into a single [`AnalysisResult`].
//!
//! # Score
//! `score = clamp(0, 100, base - net_penalty + round(positive_bonus × positive_boost))`
//!
//! # Concern Level
//! 1. Any explicit-marker flag => High
//! 2. Else any strong-severity flag => High
//! 3. Else thresholds on the score (>=85 Low, >=70 Medium, >=50 High, else VeryHigh)
//!
//! The adapter never fails. Invalid configuration yields the neutral result
//! (score 50, Medium) with the reason in `warnings`. Oversized lyrics are
//! skipped by each component on its own; an explicit marker still applies.

use crate::biblical::BiblicalDetector;
use crate::classifier::{ClassifierOutput, PatternClassifier};
use crate::error::AnalyzerResult;
use crate::lyrics::LyricSource;
use hymnal_common::{
    AnalysisConfig, AnalysisResult, ConcernLevel, ContentFlag, FlagCategory, ScoringProfile,
    Severity, SupportingVerse,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Title markers that indicate a track without sung lyrics
const INSTRUMENTAL_MARKERS: &[&str] = &[
    "instrumental",
    "karaoke",
    "backing track",
    "minus one",
    "accompaniment track",
    "(inst)",
    "(inst.)",
    "[inst]",
];

/// One song to analyze
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SongInput {
    pub title: String,
    pub artist: String,
    /// Lyric text, when the caller already has it
    pub lyrics: Option<String>,
    /// Explicit-content flag supplied by the catalog
    pub explicit: bool,
    /// Do not ask the lyric source when `lyrics` is absent
    pub skip_lyrics: bool,
}

impl SongInput {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            ..Self::default()
        }
    }

    pub fn with_lyrics(mut self, lyrics: impl Into<String>) -> Self {
        self.lyrics = Some(lyrics.into());
        self
    }

    pub fn with_explicit(mut self, explicit: bool) -> Self {
        self.explicit = explicit;
        self
    }

    pub fn with_skip_lyrics(mut self, skip_lyrics: bool) -> Self {
        self.skip_lyrics = skip_lyrics;
        self
    }
}

/// Heuristic skip signal for callers that decide `skip_lyrics` themselves
///
/// ```
/// use hymnal_analyzer::looks_instrumental;
/// assert!(looks_instrumental("Be Thou My Vision (Instrumental)"));
/// assert!(!looks_instrumental("Be Thou My Vision"));
/// ```
pub fn looks_instrumental(title: &str) -> bool {
    let lowered = title.to_lowercase();
    INSTRUMENTAL_MARKERS.iter().any(|m| lowered.contains(m))
}

/// Lyrics chosen for one analysis, with any degradation notes
struct ResolvedLyrics {
    text: String,
    warnings: Vec<String>,
}

/// Song content analyzer
///
/// Owns the compiled classifier and detector. Immutable after construction;
/// share it across tasks with `Arc`.
pub struct Analyzer {
    classifier: PatternClassifier,
    detector: BiblicalDetector,
    profile: ScoringProfile,
    lyric_source: Option<Arc<dyn LyricSource>>,
}

impl Analyzer {
    /// Build an analyzer with the context-aware profile and no lyric source
    ///
    /// # Errors
    /// Returns the first pattern-table error from either component.
    pub fn new() -> AnalyzerResult<Self> {
        Ok(Self {
            classifier: PatternClassifier::new()?,
            detector: BiblicalDetector::new()?,
            profile: ScoringProfile::default(),
            lyric_source: None,
        })
    }

    pub fn with_profile(mut self, profile: ScoringProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_lyric_source(mut self, source: Arc<dyn LyricSource>) -> Self {
        self.lyric_source = Some(source);
        self
    }

    pub fn profile(&self) -> ScoringProfile {
        self.profile
    }

    pub fn detector(&self) -> &BiblicalDetector {
        &self.detector
    }

    /// Supporting verses for arbitrary theme keys
    pub fn recommend_scripture<S: AsRef<str>>(
        &self,
        theme_keys: &[S],
    ) -> BTreeMap<String, Vec<SupportingVerse>> {
        self.detector.recommend_scripture(theme_keys)
    }

    /// Analyze one song
    ///
    /// Always returns a complete result; see the module docs for the
    /// fail-safe behavior.
    pub fn analyze(&self, song: &SongInput, config: &AnalysisConfig) -> AnalysisResult {
        match self.try_analyze(song, config) {
            Ok(result) => result,
            Err(e) => {
                error!(
                    title = %song.title,
                    artist = %song.artist,
                    error = %e,
                    "Analysis failed, assigning neutral score"
                );
                AnalysisResult::neutral(self.profile.version_tag(), e.to_string())
            }
        }
    }

    fn try_analyze(&self, song: &SongInput, config: &AnalysisConfig) -> AnalyzerResult<AnalysisResult> {
        config.validate()?;

        let ResolvedLyrics { text, mut warnings } = self.resolve_lyrics(song);

        let classified = self.classifier.classify(&text, song.explicit, config);
        if let Some(e) = &classified.error {
            warnings.push(format!("Content classification failed: {}", e));
        }
        let detection = self.detector.detect(&text);
        if let Some(e) = &detection.error {
            warnings.push(format!("Biblical detection failed: {}", e));
        }

        let base = self.profile.base_score();
        let final_bonus = (f64::from(classified.positive_bonus) * config.positive_boost).round() as i32;
        let raw_score = base - classified.net_penalty + final_bonus;
        let score = raw_score.clamp(0, 100) as u8;
        let concern_level = concern_level(&classified.flags, score);

        let explanation = self.explain(&classified, final_bonus, raw_score, score, &warnings);

        debug!(
            title = %song.title,
            score,
            concern = %concern_level,
            flags = classified.flags.len(),
            biblical_score = detection.total_biblical_score,
            "Song analyzed"
        );

        Ok(AnalysisResult {
            score,
            concern_level,
            biblical: detection.findings(self.detector.corpus()),
            supporting_scripture: detection.supporting_scripture,
            positive_bonus: final_bonus,
            biblical_score: detection.total_biblical_score,
            biblical_confidence: detection.confidence_score,
            lyrics_analyzed: !text.trim().is_empty()
                && classified.error.is_none()
                && detection.error.is_none(),
            flags: classified.flags,
            explanation,
            warnings,
            analysis_version: self.profile.version_tag().to_string(),
        })
    }

    fn resolve_lyrics(&self, song: &SongInput) -> ResolvedLyrics {
        let mut warnings = Vec::new();

        if let Some(lyrics) = &song.lyrics {
            return ResolvedLyrics {
                text: lyrics.clone(),
                warnings,
            };
        }

        if song.skip_lyrics {
            warnings.push("Lyric lookup skipped; scored on metadata only".to_string());
            return ResolvedLyrics {
                text: String::new(),
                warnings,
            };
        }

        let text = match &self.lyric_source {
            None => {
                warnings.push("No lyrics available; scored on metadata only".to_string());
                String::new()
            }
            Some(source) => match source.fetch(&song.title, &song.artist) {
                Ok(Some(lyrics)) => {
                    info!(
                        title = %song.title,
                        artist = %song.artist,
                        source = source.name(),
                        "Fetched lyrics"
                    );
                    lyrics
                }
                Ok(None) => {
                    warnings.push(format!(
                        "No lyrics found by {} source; scored on metadata only",
                        source.name()
                    ));
                    String::new()
                }
                Err(e) => {
                    warn!(
                        title = %song.title,
                        artist = %song.artist,
                        source = source.name(),
                        error = %e,
                        "Lyric fetch failed"
                    );
                    warnings.push(format!("Lyric fetch from {} source failed: {}", source.name(), e));
                    String::new()
                }
            },
        };

        ResolvedLyrics { text, warnings }
    }

    fn explain(
        &self,
        classified: &ClassifierOutput,
        final_bonus: i32,
        raw_score: i32,
        score: u8,
        warnings: &[String],
    ) -> String {
        let base = self.profile.base_score();
        let mut lines = vec![format!("Baseline score: {} ({} profile)", base, self.profile)];

        for flag in &classified.flags {
            lines.push(format!(
                "- {} ({}): -{} [{}]",
                flag.category, flag.severity, flag.penalty, flag.context
            ));
        }

        if final_bonus != 0 {
            let categories: Vec<&str> = classified
                .positive_matches
                .iter()
                .map(|m| m.category.as_str())
                .collect();
            lines.push(format!(
                "Positive content bonus: +{} ({})",
                final_bonus,
                categories.join(", ")
            ));
        }

        let mut arithmetic = format!(
            "Final score: {} + {} - {} = {}",
            base, final_bonus, classified.net_penalty, score
        );
        if raw_score != i32::from(score) {
            arithmetic.push_str(" (clamped)");
        }
        lines.push(arithmetic);

        lines.extend(warnings.iter().map(|w| format!("Note: {}", w)));
        lines.join("\n")
    }
}

/// Explicit marker, then strong severity, then score thresholds
fn concern_level(flags: &[ContentFlag], score: u8) -> ConcernLevel {
    let explicit = flags.iter().any(|f| f.category == FlagCategory::ExplicitMarker);
    let strong = flags.iter().any(|f| f.severity == Severity::Strong);
    if explicit || strong {
        ConcernLevel::High
    } else {
        ConcernLevel::from_score(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::{LyricSourceError, StaticLyricSource};
    use crate::MAX_LYRICS_BYTES;

    fn analyzer() -> Analyzer {
        Analyzer::new().expect("analyzer builds")
    }

    struct FailingSource;

    impl LyricSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn fetch(&self, _title: &str, _artist: &str) -> Result<Option<String>, LyricSourceError> {
            Err(LyricSourceError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_positive_lyrics_raise_score() {
        let song = SongInput::new("Amazing Grace", "Traditional")
            .with_lyrics("Amazing grace how sweet the sound, praise the Lord");
        let result = analyzer().analyze(&song, &AnalysisConfig::default());
        assert!(result.flags.is_empty());
        assert_eq!(result.positive_bonus, 19);
        assert_eq!(result.score, 100);
        assert_eq!(result.concern_level, ConcernLevel::Low);
        assert!(result.explanation.contains("Final score: 85 + 19 - 0 = 100 (clamped)"));
        assert!(result.lyrics_analyzed);
    }

    #[test]
    fn test_positive_boost_scales_bonus() {
        let song = SongInput::new("t", "a").with_lyrics("hallelujah");
        let config = AnalysisConfig {
            positive_boost: 0.5,
            ..AnalysisConfig::default()
        };
        let result = analyzer().with_profile(ScoringProfile::Legacy).analyze(&song, &config);
        assert_eq!(result.positive_bonus, 5);
        assert_eq!(result.score, 85);
        assert_eq!(result.analysis_version, "legacy-1.0");
    }

    #[test]
    fn test_strong_flag_forces_high_concern() {
        let song = SongInput::new("t", "a").with_lyrics("hallelujah hallelujah, what the fuck");
        let result = analyzer().analyze(&song, &AnalysisConfig::default());
        // 85 - 25 + 20 = 80 would be Medium by threshold
        assert_eq!(result.score, 80);
        assert_eq!(result.concern_level, ConcernLevel::High);
    }

    #[test]
    fn test_mild_flag_uses_thresholds() {
        let song = SongInput::new("t", "a").with_lyrics("oh crap");
        let result = analyzer().analyze(&song, &AnalysisConfig::default());
        // 85 - round(8 × 0.6) = 80
        assert_eq!(result.score, 80);
        assert_eq!(result.concern_level, ConcernLevel::Medium);
        assert!(result.explanation.contains("- profanity (mild): -5 [1 match]"));
    }

    #[test]
    fn test_invalid_config_is_neutral() {
        let song = SongInput::new("t", "a").with_lyrics("fuck");
        let config = AnalysisConfig {
            positive_boost: f64::NAN,
            ..AnalysisConfig::default()
        };
        let result = analyzer().analyze(&song, &config);
        assert_eq!(result.score, 50);
        assert_eq!(result.concern_level, ConcernLevel::Medium);
        assert!(result.flags.is_empty());
        assert_eq!(result.explanation, "Analysis failed - assigned neutral score");
        assert!(result.warnings[0].contains("positive_boost"));
    }

    #[test]
    fn test_oversized_explicit_song_keeps_marker() {
        let song = SongInput::new("t", "a")
            .with_lyrics("praise the lord ".repeat(MAX_LYRICS_BYTES / 16 + 1))
            .with_explicit(true);
        let result = analyzer().analyze(&song, &AnalysisConfig::default());

        assert_eq!(result.flags.len(), 1);
        assert_eq!(result.flags[0].category, FlagCategory::ExplicitMarker);
        assert_eq!(result.score, 35);
        assert_eq!(result.concern_level, ConcernLevel::High);
        assert_eq!(result.positive_bonus, 0);
        assert!(!result.lyrics_analyzed);
        assert!(result.warnings.iter().any(|w| w.starts_with("Content classification failed")));
        assert!(result.warnings.iter().any(|w| w.starts_with("Biblical detection failed")));
        assert!(result.warnings.iter().all(|w| w.contains("too large")));
    }

    #[test]
    fn test_oversized_lyrics_degrade_to_base_score() {
        let song = SongInput::new("t", "a").with_lyrics("la ".repeat(MAX_LYRICS_BYTES));
        let result = analyzer().analyze(&song, &AnalysisConfig::default());
        assert!(result.flags.is_empty());
        assert_eq!(result.score, 85);
        assert!(!result.lyrics_analyzed);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_lyric_source_consulted_when_absent() {
        let source = StaticLyricSource::new().with("Doxology", "Ken", "Praise God from whom all blessings flow");
        let a = analyzer().with_lyric_source(Arc::new(source));
        let result = a.analyze(&SongInput::new("Doxology", "Ken"), &AnalysisConfig::default());
        assert!(result.lyrics_analyzed);
        assert!(result.positive_bonus > 0);
        assert!(result.warnings.is_empty());

        let missing = a.analyze(&SongInput::new("Other", "Ken"), &AnalysisConfig::default());
        assert!(!missing.lyrics_analyzed);
        assert_eq!(missing.score, 85);
        assert_eq!(missing.warnings.len(), 1);
    }

    #[test]
    fn test_skip_lyrics_never_fetches() {
        let a = analyzer().with_lyric_source(Arc::new(FailingSource));
        let song = SongInput::new("Song", "Band").with_skip_lyrics(true);
        let result = a.analyze(&song, &AnalysisConfig::default());
        assert_eq!(result.score, 85);
        assert!(result.warnings[0].contains("skipped"));
    }

    #[test]
    fn test_fetch_failure_degrades_to_empty_lyrics() {
        let a = analyzer().with_lyric_source(Arc::new(FailingSource));
        let result = a.analyze(&SongInput::new("Song", "Band"), &AnalysisConfig::default());
        assert_eq!(result.score, 85);
        assert_eq!(result.concern_level, ConcernLevel::Low);
        assert!(result.warnings[0].contains("offline"));
        assert!(result.explanation.ends_with(&format!("Note: {}", result.warnings[0])));
    }

    #[test]
    fn test_looks_instrumental() {
        assert!(looks_instrumental("How Great Thou Art - Karaoke Version"));
        assert!(looks_instrumental("Holy Holy Holy (Inst.)"));
        assert!(looks_instrumental("In Christ Alone [Backing Track]"));
        assert!(!looks_instrumental("Instrument of Peace"));
    }
}
