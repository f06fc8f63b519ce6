//! Batch analysis tests

use hymnal_analyzer::{analyze_batch, Analyzer, SongInput, StaticLyricSource};
use hymnal_common::AnalysisConfig;
use std::sync::Arc;

fn songs() -> Vec<SongInput> {
    vec![
        SongInput::new("Clean", "A").with_lyrics("walking in the sun"),
        SongInput::new("Rough", "B").with_lyrics("fuck fuck"),
        SongInput::new("Hymn", "C").with_lyrics("hallelujah, praise the Lord"),
        SongInput::new("Explicit", "D").with_explicit(true),
        SongInput::new("Fetched", "E"),
        SongInput::new("Empty", "F").with_lyrics(""),
    ]
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let source = StaticLyricSource::new().with("Fetched", "E", "oh crap");
    let analyzer = Arc::new(Analyzer::new().unwrap().with_lyric_source(Arc::new(source)));
    let input = songs();

    let results = analyze_batch(Arc::clone(&analyzer), input.clone(), AnalysisConfig::default(), 3).await;

    assert_eq!(results.len(), input.len());
    let scores: Vec<u8> = results.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![85, 35, 95, 35, 80, 85]);
}

#[tokio::test]
async fn test_batch_matches_sequential_analysis() {
    let analyzer = Arc::new(Analyzer::new().unwrap());
    let config = AnalysisConfig::default();
    let input = songs();

    let sequential: Vec<String> = input
        .iter()
        .map(|s| serde_json::to_string(&analyzer.analyze(s, &config)).unwrap())
        .collect();
    let batched: Vec<String> = analyze_batch(Arc::clone(&analyzer), input, config, 4)
        .await
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect();

    assert_eq!(sequential, batched);
}

#[tokio::test]
async fn test_zero_concurrency_still_runs() {
    let analyzer = Arc::new(Analyzer::new().unwrap());
    let results = analyze_batch(analyzer, songs(), AnalysisConfig::default(), 0).await;
    assert_eq!(results.len(), 6);
}

#[tokio::test]
async fn test_empty_batch() {
    let analyzer = Arc::new(Analyzer::new().unwrap());
    let results = analyze_batch(analyzer, Vec::new(), AnalysisConfig::default(), 4).await;
    assert!(results.is_empty());
}
