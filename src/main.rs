//! cuesync - Subtitle Synchronization
//!
//! Entry point for the cuesync command line tool, which aligns translated text
//! with transcriber speech timing and writes SRT subtitles.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use tracing::{Level, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cuesync::cli::{Args, Commands, SyncTuning};
use cuesync::config::{Config, SyncMethod, TranscriptFormat};
use cuesync::timestamp::format_timestamp;
use cuesync::workflow::{Workflow, check_file};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    let _log_guard = setup_logging(args.verbose)?;

    info!("Starting cuesync - Subtitle Synchronization");

    match args.command {
        Commands::Sync { transcript, text, output, tuning } => {
            let mut config = load_config(args.config.as_deref())?;
            apply_tuning(&mut config, &tuning)?;

            let workflow = Workflow::new(config)?;
            let outcome = workflow.sync_file(&transcript, &text, &output).await?;

            for diagnostic in &outcome.diagnostics {
                warn!("{}", diagnostic);
            }
            println!("Wrote {} cues to {}", outcome.cues.len(), output.display());
        }
        Commands::Batch { input_dir, lang, output_dir, tuning } => {
            let mut config = load_config(args.config.as_deref())?;
            apply_tuning(&mut config, &tuning)?;

            let workflow = Workflow::new(config)?;
            let summary = workflow.process_directory(&input_dir, &lang, output_dir.as_ref()).await?;

            println!(
                "Processed: {}, skipped: {}, failed: {}",
                summary.processed, summary.skipped, summary.failed
            );
        }
        Commands::Check { input } => {
            let cues = check_file(&input).await?;

            match (cues.first(), cues.last()) {
                (Some(first), Some(last)) => println!(
                    "{}: {} cues, {} --> {}",
                    input.display(),
                    cues.len(),
                    format_timestamp(first.start),
                    format_timestamp(last.end)
                ),
                _ => println!("{}: no cues", input.display()),
            }
        }
        Commands::InitConfig { output } => {
            let config = load_config(args.config.as_deref())?;
            config.save_to_file(&output)?;
            println!("Configuration written to {}", output.display());
        }
    }

    Ok(())
}

/// Load `--config`, else ./config.toml, else built-in defaults
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    if let Some(config_path) = config_path {
        return Ok(Config::from_file(config_path)?);
    }

    // Try to load config.toml from current directory first
    if Path::new("config.toml").exists() {
        info!("Found config.toml in current directory, loading...");
        return Ok(Config::from_file("config.toml")?);
    }

    Ok(Config::default())
}

/// Apply command line overrides on top of the loaded configuration
fn apply_tuning(config: &mut Config, tuning: &SyncTuning) -> Result<()> {
    if let Some(strategy) = &tuning.strategy {
        config.sync.method = SyncMethod::parse(strategy)?;
    }
    if let Some(delay) = tuning.delay {
        config.sync.delay = delay;
    }
    if let Some(reading_speed) = tuning.reading_speed {
        config.sync.reading_speed = reading_speed;
    }
    if let Some(max_chars) = tuning.max_chars {
        config.layout.max_chars = max_chars;
    }
    if let Some(max_line_chars) = tuning.max_line_chars {
        config.layout.max_line_chars = max_line_chars;
    }
    if let Some(format) = &tuning.format {
        config.transcript.format = TranscriptFormat::parse(format)?;
    }

    config.validate()?;
    info!("Using {} synchronization", config.sync.strategy()?);
    Ok(())
}

/// Console plus daily-rolling file output under `.cuesync/log`.
///
/// The returned guard flushes the file writer when dropped.
fn setup_logging(verbose: bool) -> Result<WorkerGuard> {
    let log_dir = std::env::current_dir()?.join(".cuesync").join("log");
    std::fs::create_dir_all(&log_dir)?;

    let (file_writer, guard) = non_blocking(rolling::daily(&log_dir, "cuesync.log"));
    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(fmt::layer().with_target(false))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging to {}", log_dir.join("cuesync.log").display());
    Ok(guard)
}
