use crate::config::AnalyzerConfig;
use crate::orchestrator::{print_summary, Orchestrator, RunSummary};
use anyhow::Result;
use clap::Parser;
use shared::scoring::HttpScorerFactory;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(
    name = "wallet-analyzer",
    version,
    about = "Score a batch of Ethereum wallets and write one credit report per wallet"
)]
pub struct Cli {
    /// Ethereum JSON-RPC endpoint (env: RPC_URL)
    #[arg(short = 'r', long)]
    pub rpc_url: Option<String>,

    /// Credit scoring service base URL (env: SCORER_URL)
    #[arg(long)]
    pub scorer_url: Option<String>,

    /// File with one wallet address per line
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Directory for reports, summary.csv and invalid_addresses.txt
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// JSON file recording processed and failed addresses between runs
    #[arg(long)]
    pub cache_file: Option<PathBuf>,

    /// Attempts per wallet before it is recorded as failed
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Base delay between attempts in milliseconds, multiplied by the attempt number
    #[arg(long)]
    pub retry_delay_ms: Option<u64>,

    /// Wallets processed concurrently [default: 2 x CPU count]
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Per-attempt limit in seconds, 0 disables it
    #[arg(long)]
    pub task_timeout_secs: Option<u64>,

    /// Optional TOML config file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Resolves the effective config; flags win over file and environment.
    pub fn resolve_config(&self) -> Result<AnalyzerConfig> {
        let mut config = AnalyzerConfig::load(self.config.as_deref())?;

        if let Some(rpc_url) = &self.rpc_url {
            config.rpc_url = rpc_url.clone();
        }
        if let Some(scorer_url) = &self.scorer_url {
            config.scorer_url = scorer_url.clone();
        }
        if let Some(input) = &self.input {
            config.input_file = input.clone();
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(cache_file) = &self.cache_file {
            config.cache_file = cache_file.clone();
        }
        if let Some(max_retries) = self.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(retry_delay_ms) = self.retry_delay_ms {
            config.retry_delay_ms = retry_delay_ms;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(task_timeout_secs) = self.task_timeout_secs {
            config.task_timeout_secs = task_timeout_secs;
        }

        Ok(config)
    }

    pub async fn run(&self, cancel: CancellationToken) -> Result<RunSummary> {
        let config = self.resolve_config()?;
        let factory = HttpScorerFactory::new(config.rpc_url()?, config.scorer_url()?)?;

        let orchestrator = Orchestrator::new(config.clone(), Box::new(factory));
        let summary = orchestrator.run(cancel).await?;
        print_summary(&summary, &config);
        Ok(summary)
    }
}
