//! Command-line interface for dgscribe
//!
//! Provides argument parsing using clap derive macros.

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::time::Duration;

/// Batch speech-to-text with cached transcripts, subtitles and speaking rates
#[derive(Parser, Debug)]
#[command(
    name = "dgscribe",
    version,
    about = "Batch speech-to-text with cached transcripts, subtitles and speaking rates"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-file stages, -vv: cache decisions, -vvv: everything)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse a timeout string into a duration.
///
/// Bare numbers are seconds; anything else goes through `humantime`
/// (`90s`, `10m`, `1h30m`).
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe every matching file and write the speaking-rate summary
    Transcribe(TranscribeArgs),

    /// Regenerate .srt subtitles from cached *_response.json transcripts
    Captions {
        /// Glob patterns matching cached transcript files
        #[arg(required = true, value_name = "GLOB")]
        patterns: Vec<String>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct TranscribeArgs {
    /// Glob patterns matching audio or video files
    #[arg(required = true, value_name = "GLOB")]
    pub patterns: Vec<String>,

    /// Number of files processed in parallel (default: 4)
    #[arg(long, short = 'j', value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Acoustic model requested from the service (default: nova-2)
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Language code for transcription (default: en-US)
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Where to write the JSON summary (default: wpms.json)
    #[arg(long, value_name = "PATH")]
    pub summary: Option<PathBuf>,

    /// Per-file request timeout. Examples: 90s, 10m, 1h
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout)]
    pub timeout: Option<Duration>,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value by key (e.g., transcription.model)
    Get {
        /// Dotted key path (e.g., transcription.model, pipeline.workers)
        key: String,
    },
    /// Set a configuration value by key
    Set {
        /// Dotted key path (e.g., transcription.model, pipeline.workers)
        key: String,
        /// Value to set
        value: String,
    },
    /// Print the effective configuration with the API key hidden
    List,
    /// Print the configuration file path
    Path,
}
