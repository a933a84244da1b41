//! Sift - Thread and triage a batch of fetched messages
//!
//! Reads a JSON array of message records, classifies and groups them, and
//! prints the two inbox sections.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{error, info};
use std::path::PathBuf;

use triage::{Message, TriageConfig, ingest_batch, partition_threads};

mod output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(about = "Group a message batch into threads and split human mail from updates")]
struct Args {
    /// JSON file holding an array of message records
    #[arg(required_unless_present = "write_default_config")]
    batch: Option<PathBuf>,

    /// Triage config file (defaults to ~/.config/sift/triage.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Show which rule flagged each automated thread
    #[arg(long)]
    explain: bool,

    /// Write the default config to the config directory and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    if args.write_default_config {
        let path = config::save_json(triage::config::CONFIG_FILE, &TriageConfig::default())?;
        info!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let settings = TriageConfig::load(args.config.as_deref())?;
    let classifier = settings.classifier()?;

    let Some(batch_path) = args.batch else {
        anyhow::bail!("No batch file given");
    };
    let raw = std::fs::read_to_string(&batch_path)
        .with_context(|| format!("Failed to read batch file: {}", batch_path.display()))?;
    let messages: Vec<Message> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse batch file: {}", batch_path.display()))?;

    let outcome = ingest_batch(messages, &classifier, &settings);
    let stats = outcome.stats.clone();
    let buckets = partition_threads(outcome.threads);

    let rendered = match args.format {
        Format::Text => output::render_text(&buckets, &stats, args.explain.then_some(&classifier)),
        Format::Json => output::render_json(&buckets, &stats)?,
    };
    println!("{}", rendered);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["sift", "batch.json", "--format", "json", "--explain"]).unwrap();
        assert_eq!(args.batch, Some(PathBuf::from("batch.json")));
        assert_eq!(args.format, Format::Json);
        assert!(args.explain);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_batch_required() {
        assert!(Args::try_parse_from(["sift"]).is_err());
        assert!(Args::try_parse_from(["sift", "--write-default-config"]).is_ok());
    }

    #[test]
    fn test_run_reports_unreadable_batch() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let config_path = dir.path().join("triage.json");
        std::fs::write(&config_path, "{}").unwrap();

        let args = Args::try_parse_from([
            OsString::from("sift"),
            missing.into_os_string(),
            OsString::from("--config"),
            config_path.into_os_string(),
        ])
        .unwrap();
        let err = run(args).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read batch file"));
    }
}
