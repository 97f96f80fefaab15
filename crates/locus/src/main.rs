use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use locus_common::Document;
use locus_engine::{ConfigLoader, EngineConfig, Finder};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "locus", version, about = "Locate controls in a rendered document snapshot")]
struct Args {
    #[command(subcommand)]
    mode: Mode,

    /// Config file (default: ./locus.yaml, then ~/.locus/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worker threads, overriding the config (0 = available parallelism)
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Mode {
    /// Print the ranked controls, best first
    Find {
        /// JSON snapshot of the rendered document
        #[arg(long)]
        snapshot: PathBuf,
        /// Locator, e.g. "Billing > Street"
        locator: String,
    },
    /// Print every hit with how it was found, ranked hits first and
    /// superseded hits for the same element after them
    Explain {
        #[arg(long)]
        snapshot: PathBuf,
        locator: String,
    },
}

async fn load_config(args: &Args) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from(path).await?,
        None => ConfigLoader::load_default().await?,
    };
    if let Some(workers) = args.workers {
        config.finder.workers = workers;
    }
    Ok(config)
}

async fn load_document(path: &Path) -> anyhow::Result<Document> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    Ok(Document::from_json(&json)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, results to stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = load_config(&args).await?;
    let finder = Finder::new(&config)?;

    let (snapshot, locator, explain) = match &args.mode {
        Mode::Find { snapshot, locator } => (snapshot, locator, false),
        Mode::Explain { snapshot, locator } => (snapshot, locator, true),
    };
    let document = load_document(snapshot).await?;
    let path = finder.parse(locator)?;
    tracing::info!(locator = %path, nodes = document.len(), "Looking up control");

    let results = finder.find(&path, &document)?;
    if results.is_empty() {
        bail!("No control found for '{locator}'");
    }

    if explain {
        let entries = results.explained();
        if args.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else {
            for entry in entries {
                println!("{entry}");
            }
        }
        return Ok(());
    }

    let controls = results.controls();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&controls)?);
    } else {
        for control in &controls {
            println!("{control}");
        }
    }
    if results.has_multiple() {
        tracing::warn!(count = controls.len(), "Locator is ambiguous, first control ranks best");
    }
    Ok(())
}
