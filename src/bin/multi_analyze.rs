//! Batch analysis CLI for floodns run collections.
//!
//! Runs the single-run analysis entrypoint once per run directory of a
//! collection, spread round-robin over a fixed number of workers.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Context, Result};

use floodns_analysis::config_loader;
use floodns_analysis::orchestrator::{self, SubprocessAnalyzer};
use floodns_analysis::utils::validation::{parse_existing_dir, parse_worker_count};

#[derive(Parser)]
#[command(name = "floodns-multi-analyze")]
#[command(about = "Analyze every run of a floodns collection in parallel")]
#[command(version)]
struct Cli {
    /// Per-run analysis entrypoint (e.g. the floodns-analyze binary)
    entrypoint: PathBuf,

    /// Number of parallel workers
    #[arg(value_parser = parse_worker_count)]
    workers: usize,

    /// Path to the folder of run folders
    #[arg(value_parser = parse_existing_dir)]
    collection_dir: PathBuf,

    /// YAML analysis configuration, forwarded to every run
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let mut analyzer = SubprocessAnalyzer::new(&cli.entrypoint);
    if let Some(config_path) = &cli.config {
        // Fail here rather than once per run
        config_loader::load_config(config_path)?;
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Failed to resolve {}", config_path.display()))?;
        analyzer = analyzer.with_args([PathBuf::from("--config"), config_path]);
    }

    log::info!(
        "Analyzing runs in {} with {} workers using {}",
        cli.collection_dir.display(),
        cli.workers,
        cli.entrypoint.display()
    );
    orchestrator::run_batch(&cli.collection_dir, cli.workers, &analyzer)?;

    Ok(())
}
