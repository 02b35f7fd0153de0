use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use floodns_analysis::analysis;
use floodns_analysis::config_loader;
use floodns_analysis::utils::validation::parse_existing_dir;

/// Compute flow, connection, link and node statistics for one floodns run
#[derive(Parser, Debug)]
#[command(name = "floodns-analyze", version, about, long_about = None)]
struct Args {
    /// Path to the run folder holding the simulator's info logs
    #[arg(value_parser = parse_existing_dir)]
    run_dir: PathBuf,

    /// Optional YAML analysis configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Also print all four reports as one JSON object on stdout
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let config = config_loader::load_config_or_default(args.config.as_deref())?;
    info!("Run folder: {:?}", args.run_dir);

    let reports = analysis::analyze_run(&args.run_dir, &config)
        .wrap_err_with(|| format!("Analysis of '{}' failed", args.run_dir.display()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&reports).wrap_err("Failed to serialize reports to JSON")?;
        println!("{}", json);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["floodns-analyze", "."]);
        assert_eq!(args.run_dir, PathBuf::from("."));
        assert_eq!(args.config, None);
        assert!(!args.json);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_missing_run_dir_rejected() {
        assert!(Args::try_parse_from(["floodns-analyze", "/nonexistent/run"]).is_err());
    }

    #[test]
    fn test_wrong_arity_rejected() {
        assert!(Args::try_parse_from(["floodns-analyze"]).is_err());
        assert!(Args::try_parse_from(["floodns-analyze", ".", "."]).is_err());
    }
}
