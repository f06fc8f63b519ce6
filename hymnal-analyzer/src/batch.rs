//! Batch analysis
//!
//! Fans songs out to tokio's blocking pool with a bounded number in flight.
//! Results come back in input order. A worker that panics degrades to the
//! neutral result for its song; the rest of the batch is unaffected.

use crate::analyzer::{Analyzer, SongInput};
use futures::stream::{self, StreamExt};
use hymnal_common::{AnalysisConfig, AnalysisResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Default number of songs analyzed concurrently
pub const DEFAULT_BATCH_CONCURRENCY: usize = 4;

/// Analyze many songs concurrently
///
/// # Arguments
/// * `analyzer` - Shared analyzer
/// * `songs` - Songs in the order results should be returned
/// * `config` - Tuning applied to every song
/// * `concurrency` - Songs in flight at once (values below 1 are treated as 1)
pub async fn analyze_batch(
    analyzer: Arc<Analyzer>,
    songs: Vec<SongInput>,
    config: AnalysisConfig,
    concurrency: usize,
) -> Vec<AnalysisResult> {
    let total = songs.len();
    let started = Instant::now();
    let config = Arc::new(config);
    let version = analyzer.profile().version_tag();

    let results: Vec<AnalysisResult> = stream::iter(songs.into_iter().enumerate())
        .map(|(index, song)| {
            let analyzer = Arc::clone(&analyzer);
            let config = Arc::clone(&config);

            async move {
                let title = song.title.clone();
                match tokio::task::spawn_blocking(move || analyzer.analyze(&song, &config)).await {
                    Ok(result) => result,
                    Err(e) => {
                        error!(
                            song_index = index,
                            title = %title,
                            error = %e,
                            "Analysis worker failed"
                        );
                        AnalysisResult::neutral(version, format!("Analysis worker failed: {}", e))
                    }
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    info!(
        songs = total,
        concurrency = concurrency.max(1),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Batch analysis completed"
    );

    results
}
