use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an SRT file from a transcript and its translation
    Sync {
        /// Transcript JSON produced by the transcriber
        #[arg(short, long)]
        transcript: PathBuf,

        /// Translated text file
        #[arg(short = 'x', long)]
        text: PathBuf,

        /// Output SRT file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        tuning: SyncTuning,
    },

    /// Build SRT files for every transcript in a directory
    Batch {
        /// Directory containing <name>.json transcripts and <name>.<lang>.txt translations
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Language code of the translations to use
        #[arg(short, long)]
        lang: String,

        /// Output directory for generated subtitles
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        tuning: SyncTuning,
    },

    /// Parse an SRT file and verify cue ordering
    Check {
        /// SRT file to check
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        #[arg(short, long, default_value = "config.toml")]
        output: PathBuf,
    },
}

/// Overrides for the synchronization settings from the config file
#[derive(clap::Args, Debug, Default)]
pub struct SyncTuning {
    /// Synchronization method (basic, delayed, smart)
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Subtitle delay in seconds
    #[arg(short, long)]
    pub delay: Option<f64>,

    /// Reading speed multiplier for the smart method
    #[arg(short, long)]
    pub reading_speed: Option<f64>,

    /// Maximum characters per cue
    #[arg(long)]
    pub max_chars: Option<usize>,

    /// Maximum characters per display line
    #[arg(long)]
    pub max_line_chars: Option<usize>,

    /// Transcript format (auto, whisper-cpp, openai)
    #[arg(short, long)]
    pub format: Option<String>,
}
