//! Solmosa CLI
//!
//! # Usage
//!
//! ```bash
//! # Generate tests for every contract under the configured directory
//! solmosa run --config solmosa.yaml
//!
//! # Print the control-dependency graph of one contract
//! solmosa inspect-cdg --cfg cfg/Token.json --artifact build/contracts/Token.json
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use solmosa_core::config::SearchConfig;
use solmosa_runner::{inspect_cdg, CommandExecutorFactory, Orchestrator, RunnerConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "solmosa")]
#[command(about = "Branch-coverage test generation for EVM contracts", long_about = None)]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. `debug` or `solmosa_core=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate tests for every discovered contract
    Run {
        /// Run configuration (YAML)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print the CDG of one contract as JSON
    InspectCdg {
        /// Recovered CFG dump
        #[arg(long)]
        cfg: PathBuf,

        /// Compiled artifact
        #[arg(long)]
        artifact: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("invalid log level '{}'", level))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { config } => {
            let config = RunnerConfig::from_yaml_file(&config)
                .with_context(|| format!("failed to load {}", config.display()))?;
            let factory = CommandExecutorFactory::new(config.executor.clone());
            let report = Orchestrator::new(config, factory).run()?;
            println!(
                "{} run(s) completed, {} failed",
                report.summaries.len(),
                report.failures.len()
            );
        }
        Commands::InspectCdg { cfg, artifact } => {
            let inspection = inspect_cdg(&cfg, &artifact, &SearchConfig::default())?;
            println!("{}", serde_json::to_string_pretty(&inspection)?);
        }
    }
    Ok(())
}
