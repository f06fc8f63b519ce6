//! Hymnal Analyzer - command-line entry point
//!
//! Analyzes one song (or a batch file of songs) and prints the
//! `AnalysisResult` as JSON on stdout. Logs go to stderr.

use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hymnal_analyzer::{analyze_batch, Analyzer, SongInput};
use hymnal_common::config::ConfigResolver;
use hymnal_common::ScoringProfile;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for hymnal-analyzer
#[derive(Parser, Debug)]
#[command(name = "hymnal-analyzer")]
#[command(about = "Score song lyrics for content concerns and biblical themes")]
#[command(version)]
struct Args {
    /// Song title
    #[arg(long, required_unless_present = "batch")]
    title: Option<String>,

    /// Song artist
    #[arg(long, required_unless_present = "batch")]
    artist: Option<String>,

    /// File containing the lyrics (stdin is read when piped and this is absent)
    #[arg(long, conflicts_with = "batch")]
    lyrics_file: Option<PathBuf>,

    /// Song is marked explicit by its source
    #[arg(long)]
    explicit: bool,

    /// Do not read or look up lyrics
    #[arg(long)]
    skip_lyrics: bool,

    /// Scoring profile (context-aware or legacy); overrides the config file
    #[arg(long, env = "HYMNAL_PROFILE")]
    profile: Option<ScoringProfile>,

    /// Bootstrap config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file holding an array of songs to analyze concurrently
    #[arg(long)]
    batch: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigResolver::new(args.config.clone())
        .load()
        .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let profile = args.profile.unwrap_or(config.profile);
    info!(profile = %profile, "Starting hymnal-analyzer");

    let analyzer = Arc::new(
        Analyzer::new()
            .context("Failed to build analyzer")?
            .with_profile(profile),
    );

    let output = match &args.batch {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read batch file {}", path.display()))?;
            let songs: Vec<SongInput> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid batch file {}", path.display()))?;
            let results = analyze_batch(
                analyzer,
                songs,
                config.analysis.clone(),
                config.batch_concurrency,
            )
            .await;
            to_json(&results, args.pretty)?
        }
        None => {
            let song = SongInput {
                title: args.title.clone().unwrap_or_default(),
                artist: args.artist.clone().unwrap_or_default(),
                lyrics: read_lyrics(&args)?,
                explicit: args.explicit,
                skip_lyrics: args.skip_lyrics,
            };
            let result = analyzer.analyze(&song, &config.analysis);
            to_json(&result, args.pretty)?
        }
    };

    println!("{}", output);
    Ok(())
}

/// Lyrics from `--lyrics-file`, else piped stdin, else none
fn read_lyrics(args: &Args) -> Result<Option<String>> {
    if args.skip_lyrics {
        return Ok(None);
    }

    if let Some(path) = &args.lyrics_file {
        let lyrics = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read lyrics file {}", path.display()))?;
        return Ok(Some(lyrics));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut lyrics = String::new();
    stdin
        .lock()
        .read_to_string(&mut lyrics)
        .context("Failed to read lyrics from stdin")?;
    Ok(Some(lyrics))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize analysis result")
}
